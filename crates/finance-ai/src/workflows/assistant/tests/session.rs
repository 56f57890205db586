use super::common::*;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::workflows::assistant::domain::{ChatMessage, ChatRole, LoanType, UiMarker};
use crate::workflows::assistant::greeting::{FALLBACK_REPLY, GREETING_REPLY};
use crate::config::SimulationConfig;
use crate::workflows::assistant::session::{
    AssistantSession, AutomationStart, DispatchOutcome, SkipReason,
};
use crate::workflows::assistant::voice::VoiceInputError;
use crate::workflows::automation::{default_steps, AutomationOutcome, AUTOMATION_STEPS};

fn assistant_contents(transcript: &[ChatMessage]) -> Vec<String> {
    transcript
        .iter()
        .filter(|message| message.role == ChatRole::Assistant)
        .map(|message| message.content.clone())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn greeting_is_answered_locally_after_typing_delay() {
    let (session, backend) = stub_session();

    let outcome = session.submit("HELLO there").await;

    assert_eq!(outcome, DispatchOutcome::Greeting);
    assert!(backend.requests().is_empty(), "greetings never reach the backend");
    assert_eq!(session.transcript(), vec![ChatMessage::user("HELLO there")]);
    assert!(session.is_typing());
    assert!(session.input().is_empty());

    sleep(Duration::from_millis(799)).await;
    assert_eq!(session.transcript().len(), 1);

    sleep(Duration::from_millis(2)).await;
    let transcript = session.transcript();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1], ChatMessage::assistant(GREETING_REPLY));
    assert_eq!(transcript[2].marker(), Some(UiMarker::LoanOptions));
    assert!(!session.is_typing());
}

#[tokio::test(start_paused = true)]
async fn non_greetings_are_forwarded_with_chat_id() {
    let (session, backend) = stub_session();

    let first = session.submit("I need a loan").await;
    assert_eq!(
        first,
        DispatchOutcome::Forwarded {
            chat_id: "chat-1".to_string()
        }
    );
    assert_eq!(session.chat_id().as_deref(), Some("chat-1"));

    session.submit("what about EMI?").await;

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].message, "I need a loan");
    assert_eq!(requests[0].chat_id, None);
    assert_eq!(requests[1].chat_id.as_deref(), Some("chat-1"));

    sleep(Duration::from_millis(801)).await;
    assert_eq!(
        assistant_contents(&session.transcript()),
        vec!["echo: I need a loan", "echo: what about EMI?"]
    );
}

#[tokio::test(start_paused = true)]
async fn backend_failure_is_masked_with_fallback() {
    let session = session_with(Arc::new(OfflineBackend));

    let outcome = session.submit("check my documents").await;

    assert_eq!(outcome, DispatchOutcome::Fallback);
    sleep(Duration::from_millis(801)).await;
    assert_eq!(
        session.transcript().last(),
        Some(&ChatMessage::assistant(FALLBACK_REPLY))
    );
}

#[tokio::test(start_paused = true)]
async fn blank_input_is_ignored() {
    let (session, backend) = stub_session();

    assert_eq!(session.submit("   ").await, DispatchOutcome::Ignored);
    assert!(session.transcript().is_empty());
    assert!(backend.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn automation_without_file_is_a_silent_no_op() {
    let (session, _) = stub_session();
    session.select_loan_type(LoanType::Home);

    match session.run_automation() {
        AutomationStart::Skipped(SkipReason::MissingFile) => {}
        other => panic!("expected missing file skip, got {other:?}"),
    }

    sleep(Duration::from_secs(30)).await;
    assert!(session.transcript().is_empty());
    assert_eq!(session.progress(), 0);
    assert!(!session.is_typing());
}

#[tokio::test(start_paused = true)]
async fn automation_without_loan_type_is_skipped() {
    let (session, _) = stub_session();
    session.attach_file("salary_slip.pdf");

    assert!(matches!(
        session.run_automation(),
        AutomationStart::Skipped(SkipReason::MissingLoanType)
    ));
    assert_eq!(session.selected_file().as_deref(), Some("salary_slip.pdf"));
}

#[tokio::test(start_paused = true)]
async fn automation_streams_steps_then_summary_and_resets_selection() {
    let (session, _) = stub_session();
    session.attach_file("bank_statement.pdf");
    session.select_loan_type(LoanType::Business);

    let handle = match session.run_automation() {
        AutomationStart::Started(handle) => handle,
        other => panic!("expected automation to start, got {other:?}"),
    };
    assert_eq!(session.progress(), 5);
    assert!(matches!(
        session.run_automation(),
        AutomationStart::Skipped(SkipReason::AlreadyRunning)
    ));

    sleep(Duration::from_millis(401)).await;
    assert_eq!(
        assistant_contents(&session.transcript()),
        vec![AUTOMATION_STEPS[0]]
    );
    assert_eq!(session.progress(), 18);

    let result = match handle.await.expect("sequencer joins") {
        AutomationOutcome::Completed(result) => result,
        other => panic!("expected completion, got {other:?}"),
    };
    assert_eq!(session.progress(), 100);
    assert_eq!(session.selected_file(), None);
    assert_eq!(session.selected_loan_type(), None);

    sleep(Duration::from_millis(601)).await;
    let transcript = session.transcript();
    let contents = assistant_contents(&transcript);
    assert_eq!(contents.len(), AUTOMATION_STEPS.len() + 1);
    assert_eq!(&contents[..AUTOMATION_STEPS.len()], &AUTOMATION_STEPS[..]);
    assert_eq!(contents[AUTOMATION_STEPS.len()], result.summary_message());
    assert_eq!(
        transcript.last().and_then(ChatMessage::marker),
        Some(UiMarker::ExportReport(result))
    );
}

#[tokio::test(start_paused = true)]
async fn closing_session_cancels_pending_deliveries() {
    let (session, _) = stub_session();
    session.attach_file("pan.jpg");
    session.select_loan_type(LoanType::Car);

    let handle = match session.run_automation() {
        AutomationStart::Started(handle) => handle,
        other => panic!("expected automation to start, got {other:?}"),
    };

    sleep(Duration::from_millis(1000)).await;
    session.close();

    assert_eq!(
        handle.await.expect("sequencer joins"),
        AutomationOutcome::Cancelled { delivered: 2 }
    );
    sleep(Duration::from_secs(30)).await;
    assert_eq!(
        assistant_contents(&session.transcript()),
        vec![AUTOMATION_STEPS[0]]
    );
    assert!(matches!(
        session.run_automation(),
        AutomationStart::Skipped(SkipReason::Closed)
    ));
}

#[tokio::test]
async fn voice_input_requires_a_recognizer() {
    let (session, _) = stub_session();
    session.set_input("typed text");

    assert_eq!(
        session.apply_voice_input(None),
        Err(VoiceInputError::Unsupported)
    );
    assert_eq!(
        VoiceInputError::Unsupported.to_string(),
        "Voice not supported in this browser"
    );
    assert_eq!(session.input(), "typed text");

    session
        .apply_voice_input(Some(&FixedTranscript("home loan eligibility")))
        .expect("recognizer available");
    assert_eq!(session.input(), "home loan eligibility");
}

#[tokio::test(start_paused = true)]
async fn shorter_delays_never_overtake_queued_replies() {
    let (session, _) = stub_session();

    session.submit("what documents do you need").await;
    session.attach_file("itr.pdf");
    session.select_loan_type(LoanType::Personal);
    assert!(matches!(
        session.run_automation(),
        AutomationStart::Started(_)
    ));

    // the first step types for 400ms but queues behind the 800ms reply
    sleep(Duration::from_millis(401)).await;
    assert!(assistant_contents(&session.transcript()).is_empty());

    sleep(Duration::from_millis(400)).await;
    assert_eq!(
        assistant_contents(&session.transcript()),
        vec!["echo: what documents do you need", AUTOMATION_STEPS[0]]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn zero_delay_automation_keeps_step_order_across_workers() {
    for run in 0..100 {
        let session = AssistantSession::new(Arc::new(StubBackend::default()), zero_delays());
        session.attach_file("form16.pdf");
        session.select_loan_type(LoanType::Home);

        let handle = match session.run_automation() {
            AutomationStart::Started(handle) => handle,
            other => panic!("run {run}: expected automation to start, got {other:?}"),
        };
        let result = match handle.await.expect("sequencer joins") {
            AutomationOutcome::Completed(result) => result,
            other => panic!("run {run}: expected completion, got {other:?}"),
        };
        settle(&session).await;

        let mut expected = default_steps();
        expected.push(result.summary_message());
        assert_eq!(assistant_contents(&session.transcript()), expected, "run {run}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn consecutive_replies_land_in_submission_order() {
    for run in 0..100 {
        let delays = SimulationConfig {
            reply_typing_delay: Duration::from_millis(2),
            ..zero_delays()
        };
        let session = AssistantSession::new(Arc::new(StubBackend::default()), delays);

        session.submit("first question").await;
        session.submit("second question").await;
        settle(&session).await;

        assert_eq!(
            assistant_contents(&session.transcript()),
            vec!["echo: first question", "echo: second question"],
            "run {run}"
        );
    }
}
