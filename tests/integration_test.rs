//! Integration tests for the KSA planner
//!
//! These drive a full session actor through its handle against a scripted
//! generation backend, using paused tokio time to make the debounce and
//! in-flight-request interleavings deterministic.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use ksa_planner::config::Config;
use ksa_planner::domain::KsaField;
use ksa_planner::generation::Generator;
use ksa_planner::llm::{GenerationError, GenerationRequest, TextGenerator};
use ksa_planner::session::{GenerationStatus, Session, SessionHandle, SessionState};

/// Opt-in log output for debugging test runs (RUST_LOG=ksa_planner=debug)
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Backend that replays scripted responses in order, optionally delaying
/// each one, and records every request it sees.
struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
    delay: Duration,
}

impl ScriptedBackend {
    fn new(responses: Vec<Result<String, GenerationError>>) -> Arc<Self> {
        Self::with_delay(responses, Duration::ZERO)
    }

    fn with_delay(responses: Vec<Result<String, GenerationError>>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            delay,
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn prompts(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|r| r.prompt.clone()).collect()
    }
}

#[async_trait]
impl TextGenerator for ScriptedBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(GenerationError::InvalidResponse("No scripted response".to_string())))
    }
}

/// Spawn a session over the given backend; 500ms debounce from defaults
fn start_session(backend: Arc<ScriptedBackend>) -> SessionHandle {
    init_tracing();
    let config = Config::default();
    let generator = Arc::new(Generator::new(backend, &config));
    let session = Session::new(&config, generator);
    let handle = session.handle();
    tokio::spawn(session.run());
    handle
}

fn valid_plan_json() -> String {
    r#"{
        "masteryStandard": "Handles returns accurately and confidently.",
        "learningObjective": "Given a POS terminal, process a return meeting policy with full accuracy.",
        "learningPath": {
            "phase1": {"title": "Foundations", "description": "Policy", "activities": ["Read docs", "Watch video", "Quiz"]},
            "phase2": {"title": "Practice", "description": "POS", "activities": ["Simulation", "Workshop", "Demo"]},
            "phase3": {"title": "Mastery", "description": "Apply", "activities": ["Scenarios", "Assessment", "Mentoring"]}
        }
    }"#
    .to_string()
}

/// Fill all four fields (task first, since a task edit clears the others)
async fn fill_form(handle: &SessionHandle) {
    handle.edit_field(KsaField::Task, "Process a return").await.unwrap();
    handle.edit_field(KsaField::Knowledge, "Return policy rules").await.unwrap();
    handle.edit_field(KsaField::Skills, "POS navigation steps").await.unwrap();
    handle
        .edit_field(KsaField::Abilities, "Complete within 3 minutes")
        .await
        .unwrap();
}

// =============================================================================
// Suggestion flow
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_debounce_coalesces_rapid_task_edits() {
    let backend = ScriptedBackend::new(vec![Ok("{}".to_string())]);
    let handle = start_session(backend.clone());

    handle.edit_field(KsaField::Task, "Proc").await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.edit_field(KsaField::Task, "Process a").await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.edit_field(KsaField::Task, "Process a return").await.unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;

    // Only the last edit's window fired; intermediate values never did
    assert_eq!(backend.request_count(), 1);
    let prompts = backend.prompts();
    assert!(prompts[0].contains("**Task:** Process a return"));
}

#[tokio::test(start_paused = true)]
async fn test_suggestions_fill_blank_fields_and_flag_them() {
    let backend = ScriptedBackend::new(vec![Ok(
        r#"{"knowledge": "Return policy rules", "skills": "POS navigation steps"}"#.to_string(),
    )]);
    let handle = start_session(backend.clone());

    handle.edit_field(KsaField::Task, "Process a return").await.unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;

    let state = handle.state().await.unwrap();
    assert_eq!(state.ksa.knowledge, "Return policy rules");
    assert!(state.suggested.knowledge);
    assert_eq!(state.ksa.skills, "POS navigation steps");
    assert!(state.suggested.skills);
    assert_eq!(state.ksa.abilities, "");
    assert!(!state.suggested.abilities);

    // The request asked for exactly the three blank fields
    let prompt = &backend.prompts()[0];
    assert!(prompt.contains("- Knowledge\n"));
    assert!(prompt.contains("- Skills\n"));
    assert!(prompt.contains("- Abilities\n"));
}

#[tokio::test(start_paused = true)]
async fn test_suggestion_request_skips_filled_fields() {
    let backend = ScriptedBackend::new(vec![Ok(r#"{"abilities": "Under 3 minutes"}"#.to_string())]);
    let handle = start_session(backend.clone());

    handle.edit_field(KsaField::Task, "Process a return").await.unwrap();
    handle.edit_field(KsaField::Knowledge, "I know this part").await.unwrap();
    handle.edit_field(KsaField::Skills, "And this one").await.unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;

    let prompt = &backend.prompts()[0];
    assert!(!prompt.contains("- Knowledge\n"));
    assert!(!prompt.contains("- Skills\n"));
    assert!(prompt.contains("- Abilities\n"));

    let state = handle.state().await.unwrap();
    assert_eq!(state.ksa.abilities, "Under 3 minutes");
    assert!(state.suggested.abilities);
    assert!(!state.suggested.knowledge);
}

#[tokio::test(start_paused = true)]
async fn test_suggestion_never_overwrites_field_typed_mid_flight() {
    // Backend takes 1s to answer, well past the debounce
    let backend = ScriptedBackend::with_delay(
        vec![Ok(
            r#"{"knowledge": "Return policy rules", "skills": "POS navigation steps"}"#.to_string(),
        )],
        Duration::from_millis(1000),
    );
    let handle = start_session(backend.clone());

    handle.edit_field(KsaField::Task, "Process a return").await.unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;
    // Request is now in flight; the user types into knowledge
    handle.edit_field(KsaField::Knowledge, "typed while waiting").await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let state = handle.state().await.unwrap();
    assert_eq!(state.ksa.knowledge, "typed while waiting");
    assert!(!state.suggested.knowledge);
    assert_eq!(state.ksa.skills, "POS navigation steps");
    assert!(state.suggested.skills);
}

#[tokio::test(start_paused = true)]
async fn test_task_reedit_discards_in_flight_suggestions() {
    let backend = ScriptedBackend::with_delay(
        vec![
            Ok(r#"{"knowledge": "About the old task"}"#.to_string()),
            Ok(r#"{"knowledge": "About shelving"}"#.to_string()),
        ],
        Duration::from_millis(1000),
    );
    let handle = start_session(backend.clone());

    handle.edit_field(KsaField::Task, "Process a return").await.unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;
    // First fetch in flight; the task changes underneath it
    handle.edit_field(KsaField::Task, "Stock shelves").await.unwrap();
    tokio::time::sleep(Duration::from_millis(3000)).await;

    let state = handle.state().await.unwrap();
    // Stale fetch for the old task never merged; the new task's own fetch did
    assert_eq!(state.ksa.knowledge, "About shelving");
    assert!(state.suggested.knowledge);
    assert_eq!(backend.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_suggestion_failure_is_silent() {
    let backend = ScriptedBackend::new(vec![Err(GenerationError::InvalidResponse("boom".to_string()))]);
    let handle = start_session(backend.clone());

    handle.edit_field(KsaField::Task, "Process a return").await.unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;

    let state = handle.state().await.unwrap();
    assert!(state.error.is_none());
    assert_eq!(state.ksa.knowledge, "");
    assert_eq!(state.suggested, Default::default());
    assert_eq!(backend.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_blank_task_never_triggers_suggestions() {
    let backend = ScriptedBackend::new(vec![]);
    let handle = start_session(backend.clone());

    handle.edit_field(KsaField::Task, "   ").await.unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(backend.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_editing_task_resets_dependent_fields() {
    let backend = ScriptedBackend::new(vec![Ok(
        r#"{"knowledge": "Return policy rules", "skills": "POS navigation steps", "abilities": "Under 3 minutes"}"#
            .to_string(),
    )]);
    let handle = start_session(backend.clone());

    handle.edit_field(KsaField::Task, "Process a return").await.unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;

    let state = handle.state().await.unwrap();
    assert!(state.suggested.knowledge && state.suggested.skills && state.suggested.abilities);

    handle.edit_field(KsaField::Task, "Something else").await.unwrap();

    let state = handle.state().await.unwrap();
    assert_eq!(state.ksa.task, "Something else");
    assert_eq!(state.ksa.knowledge, "");
    assert_eq!(state.ksa.skills, "");
    assert_eq!(state.ksa.abilities, "");
    assert_eq!(state.suggested, Default::default());
}

// =============================================================================
// Plan generation flow
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_plan_generation_success() {
    let backend = ScriptedBackend::new(vec![Ok(valid_plan_json())]);
    let handle = start_session(backend.clone());

    fill_form(&handle).await;
    handle.set_behavior("Accuracy", true).await.unwrap();
    handle.set_behavior("Completion", true).await.unwrap();
    handle.generate().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = handle.state().await.unwrap();
    assert_eq!(state.status, GenerationStatus::Idle);
    assert!(state.error.is_none());
    let plan = state.plan.expect("plan should be set");
    assert_eq!(plan.learning_path.phase1.activities.len(), 3);

    // Behaviors appear in fixed list order, with no custom clause
    let prompt = &backend.prompts()[0];
    assert!(prompt.contains("will demonstrate: Accuracy, Completion."));
    assert!(!prompt.contains("exhibit the following"));
}

#[tokio::test(start_paused = true)]
async fn test_plan_failure_sets_error_and_retry_clears_it() {
    let backend = ScriptedBackend::new(vec![
        Ok("this is not json".to_string()),
        Ok(valid_plan_json()),
    ]);
    let handle = start_session(backend.clone());

    fill_form(&handle).await;
    handle.generate().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = handle.state().await.unwrap();
    assert!(state.plan.is_none());
    let error = state.error.as_deref().expect("error should be set");
    assert!(!error.is_empty());
    assert_eq!(state.status, GenerationStatus::Idle);

    // Retry fully clears the previous error
    handle.generate().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = handle.state().await.unwrap();
    assert!(state.plan.is_some());
    assert!(state.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_blocked_plan_request_surfaces_decline_message() {
    let backend = ScriptedBackend::new(vec![Err(GenerationError::Blocked("SAFETY".to_string()))]);
    let handle = start_session(backend.clone());

    fill_form(&handle).await;
    handle.generate().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = handle.state().await.unwrap();
    assert!(state.plan.is_none());
    let error = state.error.as_deref().expect("error should be set");
    assert!(error.contains("declined"));
    assert!(error.contains("SAFETY"));
    assert_eq!(state.status, GenerationStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_generate_is_noop_when_form_incomplete() {
    let backend = ScriptedBackend::new(vec![]);
    let handle = start_session(backend.clone());

    handle.edit_field(KsaField::Task, "Process a return").await.unwrap();
    handle.edit_field(KsaField::Knowledge, "Policy").await.unwrap();
    handle.generate().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = handle.state().await.unwrap();
    assert_eq!(state.status, GenerationStatus::Idle);
    assert!(state.plan.is_none());
    assert!(state.error.is_none());
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_second_generate_while_in_flight_is_rejected() {
    let backend = ScriptedBackend::with_delay(vec![Ok(valid_plan_json())], Duration::from_millis(1000));
    let handle = start_session(backend.clone());

    fill_form(&handle).await;
    handle.generate().await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let state = handle.state().await.unwrap();
    assert_eq!(state.status, GenerationStatus::Generating);

    handle.generate().await.unwrap();
    tokio::time::sleep(Duration::from_millis(2000)).await;

    let state = handle.state().await.unwrap();
    assert!(state.plan.is_some());
    assert_eq!(backend.request_count(), 1);
}

// =============================================================================
// Clear-all
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_clear_all_restores_initial_defaults() {
    let backend = ScriptedBackend::new(vec![Ok(valid_plan_json())]);
    let handle = start_session(backend.clone());

    fill_form(&handle).await;
    handle.set_behavior("Efficiency", true).await.unwrap();
    handle.set_custom("Stays calm with upset customers").await.unwrap();
    handle.generate().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = handle.state().await.unwrap();
    assert!(state.is_clearable());
    assert!(state.plan.is_some());

    handle.clear_all().await.unwrap();

    let state = handle.state().await.unwrap();
    assert_eq!(state, SessionState::default());
    assert!(!state.is_clearable());
}

#[tokio::test(start_paused = true)]
async fn test_late_plan_after_clear_all_is_discarded() {
    let backend = ScriptedBackend::with_delay(vec![Ok(valid_plan_json())], Duration::from_millis(1000));
    let handle = start_session(backend.clone());

    fill_form(&handle).await;
    handle.generate().await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    handle.clear_all().await.unwrap();
    tokio::time::sleep(Duration::from_millis(2000)).await;

    // The plan resolved after the clear; its epoch no longer matches
    let state = handle.state().await.unwrap();
    assert_eq!(state, SessionState::default());
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[tokio::test]
async fn test_session_shutdown() {
    init_tracing();
    let backend = ScriptedBackend::new(vec![]);
    let config = Config::default();
    let generator = Arc::new(Generator::new(backend, &config));
    let session = Session::new(&config, generator);
    let handle = session.handle();
    let join = tokio::spawn(session.run());

    handle.shutdown().await.unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), join).await;
    assert!(result.is_ok(), "Session should shut down gracefully");

    // Further requests fail cleanly once the actor is gone
    assert!(handle.state().await.is_err());
}
