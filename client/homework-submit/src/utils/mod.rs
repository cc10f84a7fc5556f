pub mod scoring;
pub mod time;
