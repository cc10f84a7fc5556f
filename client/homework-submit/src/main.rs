use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use homework_submit::{
    config::Config,
    models::{payload::parse_answer_list, CooldownKey, GateDecision, QuizDefinition},
    parse_reply,
    services::{build_gate, build_submission_service},
    utils::{
        scoring::score_locally,
        time::{millis_to_rfc3339, now_millis},
    },
    AssignmentContext, StudentIdentity, SubmitError,
};

#[derive(Debug, Parser)]
#[command(name = "homework-submit", version, about = "Submit homework answers to the class scorer")]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send answers to the scorer and print its verdict
    Submit(AnswerArgs),
    /// Score answers locally without contacting the scorer
    Score(AnswerArgs),
    /// Show the cooldown state for a student
    Status(StudentArgs),
    /// Print the message for a raw scorer reply
    Interpret {
        /// Number of questions in the homework
        #[arg(long)]
        total: usize,
        reply: String,
    },
}

#[derive(Debug, Args)]
struct StudentArgs {
    /// Homework definition (JSON)
    #[arg(long)]
    quiz: PathBuf,
    #[arg(long)]
    first: String,
    #[arg(long)]
    last: String,
}

#[derive(Debug, Args)]
struct AnswerArgs {
    #[command(flatten)]
    student: StudentArgs,
    /// Comma-separated letters, one per question; leave a slot empty to skip it
    #[arg(long, default_value = "")]
    answers: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Submit(args) => submit(args).await,
        Command::Score(args) => score(args).await,
        Command::Status(args) => status(args).await,
        Command::Interpret { total, reply } => {
            println!("{}", parse_reply(&reply, total).message());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "homework_submit=info".into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn load_student(args: &StudentArgs) -> Result<(AssignmentContext, StudentIdentity)> {
    let quiz = QuizDefinition::from_path(&args.quiz).await?;
    let context = AssignmentContext::from_quiz(&quiz)?;
    let student = StudentIdentity::new(&args.first, &args.last)?;
    tracing::info!(
        "Loaded homework {} ({}) with {} questions",
        context.assignment_id(),
        quiz.title,
        context.question_count()
    );
    Ok((context, student))
}

async fn submit(args: AnswerArgs) -> Result<ExitCode> {
    let (context, student) = load_student(&args.student).await?;
    let answers = parse_answer_list(&args.answers);

    let config = Config::load()?;
    let service = build_submission_service(&config).await?;

    match service.submit(&context, &student, &answers).await {
        Ok(result) => {
            println!("{}", result.message());
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ SubmitError::Transport(_)) => {
            println!("{}", e);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

async fn score(args: AnswerArgs) -> Result<ExitCode> {
    let (context, student) = load_student(&args.student).await?;
    let answers = parse_answer_list(&args.answers);

    println!("{}", score_locally(&context, &answers).message(&student));
    Ok(ExitCode::SUCCESS)
}

async fn status(args: StudentArgs) -> Result<ExitCode> {
    let (context, student) = load_student(&args).await?;

    let config = Config::load()?;
    let gate = build_gate(&config).await?;
    let key = CooldownKey::derive(&context, &student);

    if let Some(last) = gate.last_attempt(&key).await {
        let at = millis_to_rfc3339(last).unwrap_or_else(|| last.to_string());
        println!("Last attempt: {}", at);
    } else {
        println!("No attempt recorded.");
    }

    match gate.check_and_proceed(&context, &student, now_millis()).await {
        GateDecision::Allowed => println!("Submission allowed."),
        blocked => println!("{}", blocked.message().unwrap_or_default()),
    }

    Ok(ExitCode::SUCCESS)
}
