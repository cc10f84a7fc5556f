use std::sync::Arc;

use super::cooldown_service::SubmissionGate;
use super::reply_service::parse_reply;
use super::scorer_client::ScorerClient;
use crate::error::SubmitError;
use crate::models::{AssignmentContext, GateDecision, Outcome, StudentIdentity, SubmissionPayload};
use crate::utils::time::now_millis;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    /// Nothing was sent.
    CooldownBlocked { remaining_ms: i64 },
    Completed(Outcome),
}

impl SubmissionResult {
    pub fn message(&self) -> String {
        match self {
            SubmissionResult::CooldownBlocked { remaining_ms } => GateDecision::Blocked {
                remaining_ms: *remaining_ms,
            }
            .message()
            .unwrap_or_default(),
            SubmissionResult::Completed(outcome) => outcome.message(),
        }
    }
}

pub struct SubmissionService {
    gate: SubmissionGate,
    scorer: Arc<dyn ScorerClient>,
}

impl SubmissionService {
    pub fn new(gate: SubmissionGate, scorer: Arc<dyn ScorerClient>) -> Self {
        Self { gate, scorer }
    }

    pub fn gate(&self) -> &SubmissionGate {
        &self.gate
    }

    pub async fn submit(
        &self,
        context: &AssignmentContext,
        student: &StudentIdentity,
        answers: &[Option<String>],
    ) -> Result<SubmissionResult, SubmitError> {
        self.submit_at(context, student, answers, now_millis()).await
    }

    /// Gate, send, record, interpret.
    ///
    /// The attempt is recorded once the request has completed, whatever the
    /// reply was and even when the transport failed. Payload errors and
    /// cooldown blocks send nothing and record nothing.
    pub async fn submit_at(
        &self,
        context: &AssignmentContext,
        student: &StudentIdentity,
        answers: &[Option<String>],
        now_ms: i64,
    ) -> Result<SubmissionResult, SubmitError> {
        let payload = SubmissionPayload::build(context, student, answers)?;

        if let GateDecision::Blocked { remaining_ms } =
            self.gate.check_and_proceed(context, student, now_ms).await
        {
            return Ok(SubmissionResult::CooldownBlocked { remaining_ms });
        }

        let reply = self.scorer.submit(&payload).await;

        if let Err(e) = self.gate.record_attempt(context, student, now_ms).await {
            tracing::warn!("Could not persist cooldown timestamp: {:#}", e);
        }

        let body = reply.map_err(|e| {
            tracing::warn!(
                "Submission transport failed: homework={}, error={}",
                context.assignment_id(),
                e
            );
            SubmitError::Transport(e)
        })?;

        let outcome = parse_reply(&body, context.question_count());
        tracing::info!(
            "Submission processed: homework={}, outcome={}, effective_score={:?}",
            context.assignment_id(),
            outcome.label(),
            outcome.effective_score()
        );

        Ok(SubmissionResult::Completed(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::models::DEFAULT_COOLDOWN_WINDOW_MS;
    use crate::services::cooldown_store::{CooldownStore, MemoryCooldownStore};
    use async_trait::async_trait;
    use std::sync::Mutex;

    const T0: i64 = 1_700_000_000_000;

    /// Scripted scorer: pops one reply per call and remembers payloads.
    struct ScriptedScorer {
        replies: Mutex<Vec<Result<String, u16>>>,
        seen: Mutex<Vec<SubmissionPayload>>,
    }

    impl ScriptedScorer {
        fn new(mut replies: Vec<Result<String, u16>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ScorerClient for ScriptedScorer {
        async fn submit(&self, payload: &SubmissionPayload) -> Result<String, TransportError> {
            self.seen.lock().unwrap().push(payload.clone());
            match self.replies.lock().unwrap().pop() {
                Some(Ok(body)) => Ok(body),
                Some(Err(status)) => Err(TransportError::Status { status }),
                None => Ok("garbage".to_string()),
            }
        }
    }

    fn fixtures() -> (AssignmentContext, StudentIdentity, Vec<Option<String>>) {
        (
            AssignmentContext::new("geo-9b", "hw3", 2, vec!["A".into(), "B".into()]).unwrap(),
            StudentIdentity::new("Jane", "Doe").unwrap(),
            vec![Some("A".to_string()), None],
        )
    }

    fn service(
        store: Arc<MemoryCooldownStore>,
        scorer: Arc<ScriptedScorer>,
    ) -> SubmissionService {
        SubmissionService::new(
            SubmissionGate::new(store, DEFAULT_COOLDOWN_WINDOW_MS),
            scorer,
        )
    }

    #[tokio::test]
    async fn successful_submission_is_interpreted_and_recorded() {
        let (ctx, jane, answers) = fixtures();
        let store = Arc::new(MemoryCooldownStore::new());
        let scorer = Arc::new(ScriptedScorer::new(vec![Ok("SUBMITTED|1|ONTIME".into())]));
        let service = service(store.clone(), scorer.clone());

        let result = service.submit_at(&ctx, &jane, &answers, T0).await.unwrap();
        assert_eq!(
            result,
            SubmissionResult::Completed(Outcome::FirstSubmission {
                raw_score: 1,
                total: 2,
                late: false
            })
        );
        assert!(result.message().contains("1/2"));
        assert_eq!(
            store.get("geo-9b:hw3:jane:doe").await.unwrap().as_deref(),
            Some("1700000000000")
        );
        assert_eq!(scorer.seen.lock().unwrap()[0].answers, vec!["A", ""]);
    }

    #[tokio::test]
    async fn resubmission_inside_window_is_blocked_without_sending() {
        let (ctx, jane, answers) = fixtures();
        let scorer = Arc::new(ScriptedScorer::new(vec![Ok("SUBMITTED|2|LATE".into())]));
        let service = service(Arc::new(MemoryCooldownStore::new()), scorer.clone());

        service.submit_at(&ctx, &jane, &answers, T0).await.unwrap();
        let second = service
            .submit_at(&ctx, &jane, &answers, T0 + 30_000)
            .await
            .unwrap();

        assert_eq!(
            second,
            SubmissionResult::CooldownBlocked {
                remaining_ms: 90_000
            }
        );
        assert_eq!(second.message(), "Please wait 90s before retrying.");
        assert_eq!(scorer.calls(), 1);
    }

    #[tokio::test]
    async fn error_replies_still_start_the_cooldown() {
        let (ctx, jane, answers) = fixtures();
        let scorer = Arc::new(ScriptedScorer::new(vec![
            Ok("ERR|INVALID_NAME".into()),
            Ok("RETRY_LOW|1|2".into()),
        ]));
        let service = service(Arc::new(MemoryCooldownStore::new()), scorer.clone());

        let first = service.submit_at(&ctx, &jane, &answers, T0).await.unwrap();
        assert_eq!(first, SubmissionResult::Completed(Outcome::InvalidName));

        let blocked = service
            .submit_at(&ctx, &jane, &answers, T0 + 1_000)
            .await
            .unwrap();
        assert!(matches!(blocked, SubmissionResult::CooldownBlocked { .. }));

        let retry = service
            .submit_at(&ctx, &jane, &answers, T0 + 120_000)
            .await
            .unwrap();
        assert!(matches!(
            retry,
            SubmissionResult::Completed(Outcome::RetryRejected { .. })
        ));
        assert_eq!(scorer.calls(), 2);
    }

    #[tokio::test]
    async fn transport_failure_propagates_and_is_recorded() {
        let (ctx, jane, answers) = fixtures();
        let store = Arc::new(MemoryCooldownStore::new());
        let scorer = Arc::new(ScriptedScorer::new(vec![Err(502)]));
        let service = service(store.clone(), scorer);

        let err = service
            .submit_at(&ctx, &jane, &answers, T0)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Transport(TransportError::Status { status: 502 })
        ));
        assert!(err.to_string().starts_with("Network / script error: "));
        assert!(store.get("geo-9b:hw3:jane:doe").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn wrong_answer_count_sends_and_records_nothing() {
        let (ctx, jane, _) = fixtures();
        let store = Arc::new(MemoryCooldownStore::new());
        let scorer = Arc::new(ScriptedScorer::new(Vec::new()));
        let service = service(store.clone(), scorer.clone());

        let err = service
            .submit_at(&ctx, &jane, &[Some("A".to_string())], T0)
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Payload(_)));
        assert_eq!(scorer.calls(), 0);
        assert!(store.get("geo-9b:hw3:jane:doe").await.unwrap().is_none());
    }
}
