use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::workflows::automation::{
    default_steps, AutomationListener, AutomationOutcome, StepSequencer, StepUpdate,
    COMPLETE_PROGRESS,
};
use crate::workflows::evaluation::EvaluationResult;

use super::domain::{ChatMessage, ChatRequest, LoanType};
use super::greeting::{is_greeting, FALLBACK_REPLY, GREETING_REPLY};
use super::service::ChatBackend;
use super::voice::{SpeechToText, VoiceInputError, RECOGNITION_LANGUAGE};

/// Progress shown as soon as an automation run is accepted.
pub const INITIAL_PROGRESS: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Blank input; nothing was recorded.
    Ignored,
    Greeting,
    Forwarded { chat_id: String },
    /// Backend failed and the canned reply was queued instead.
    Fallback,
}

#[derive(Debug)]
pub enum AutomationStart {
    Started(JoinHandle<AutomationOutcome>),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingFile,
    MissingLoanType,
    AlreadyRunning,
    Closed,
}

#[derive(Debug, Default)]
struct SessionState {
    transcript: Vec<ChatMessage>,
    input: String,
    file: Option<String>,
    loan_type: Option<LoanType>,
    progress: u8,
    pending_replies: usize,
    chat_id: Option<String>,
    automation_running: bool,
    outbox: Option<mpsc::UnboundedSender<Delivery>>,
    /// Deadline of the most recently queued delivery.
    last_deadline: Option<Instant>,
}

/// A batch of messages appended together once `deadline` passes.
#[derive(Debug)]
struct Delivery {
    deadline: Instant,
    messages: Vec<ChatMessage>,
}

struct SessionShared {
    state: Mutex<SessionState>,
    delays: SimulationConfig,
    cancel: CancellationToken,
}

impl SessionShared {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("session mutex poisoned")
    }

    /// Append `messages` after `delay`, showing the typing indicator meanwhile.
    ///
    /// Deliveries land in the order they were queued: a batch never overtakes one queued
    /// before it, even when its own delay is shorter.
    fn type_messages(self: &Arc<Self>, messages: Vec<ChatMessage>, delay: Duration) {
        if self.cancel.is_cancelled() {
            return;
        }

        let mut state = self.lock();
        let requested = Instant::now() + delay;
        let deadline = state
            .last_deadline
            .map_or(requested, |last| last.max(requested));
        state.last_deadline = Some(deadline);

        let outbox = state.outbox.get_or_insert_with(|| {
            let (sender, receiver) = mpsc::unbounded_channel();
            tokio::spawn(deliver(Arc::clone(self), receiver));
            sender
        });
        let queued = outbox.send(Delivery { deadline, messages }).is_ok();
        if queued {
            state.pending_replies += 1;
        }
    }
}

/// Single writer for a session's transcript; appends each delivery at its deadline, in queue order.
async fn deliver(shared: Arc<SessionShared>, mut outbox: mpsc::UnboundedReceiver<Delivery>) {
    loop {
        let delivery = tokio::select! {
            biased;
            _ = shared.cancel.cancelled() => break,
            next = outbox.recv() => match next {
                Some(delivery) => delivery,
                None => break,
            },
        };

        tokio::select! {
            biased;
            _ = shared.cancel.cancelled() => break,
            _ = sleep_until(delivery.deadline) => {}
        }

        let mut state = shared.lock();
        state.transcript.extend(delivery.messages);
        state.pending_replies = state.pending_replies.saturating_sub(1);
    }

    debug!("assistant session writer stopped");
    shared.lock().pending_replies = 0;
}

struct SessionListener {
    shared: Arc<SessionShared>,
}

impl AutomationListener for SessionListener {
    fn on_step(&self, update: StepUpdate) {
        self.shared.lock().progress = update.progress;
        let delay = self.shared.delays.step_typing_delay;
        self.shared
            .type_messages(vec![ChatMessage::assistant(update.label)], delay);
    }

    fn on_complete(&self, result: EvaluationResult) {
        {
            let mut state = self.shared.lock();
            state.progress = COMPLETE_PROGRESS;
            state.file = None;
            state.loan_type = None;
            state.automation_running = false;
        }

        let mut messages = vec![ChatMessage::assistant(result.summary_message())];
        match ChatMessage::export_prompt(&result) {
            Ok(marker) => messages.push(marker),
            Err(err) => warn!(error = %err, "unable to encode export marker"),
        }
        let delay = self.shared.delays.summary_typing_delay;
        self.shared.type_messages(messages, delay);
    }
}

/// One assistant conversation: transcript, selections, and every timer it has scheduled.
///
/// Dropping or closing the session cancels pending deliveries.
pub struct AssistantSession {
    shared: Arc<SessionShared>,
    backend: Arc<dyn ChatBackend>,
    sequencer: StepSequencer,
    steps: Vec<String>,
}

impl AssistantSession {
    pub fn new(backend: Arc<dyn ChatBackend>, delays: SimulationConfig) -> Self {
        Self {
            shared: Arc::new(SessionShared {
                state: Mutex::new(SessionState::default()),
                delays,
                cancel: CancellationToken::new(),
            }),
            backend,
            sequencer: StepSequencer::new(delays.step_interval),
            steps: default_steps(),
        }
    }

    pub fn with_sequencer(mut self, sequencer: StepSequencer) -> Self {
        self.sequencer = sequencer;
        self
    }

    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.shared.lock().transcript.clone()
    }

    pub fn input(&self) -> String {
        self.shared.lock().input.clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.shared.lock().input = text.into();
    }

    pub fn attach_file(&self, file_name: impl Into<String>) {
        self.shared.lock().file = Some(file_name.into());
    }

    pub fn select_loan_type(&self, loan_type: LoanType) {
        self.shared.lock().loan_type = Some(loan_type);
    }

    pub fn selected_file(&self) -> Option<String> {
        self.shared.lock().file.clone()
    }

    pub fn selected_loan_type(&self) -> Option<LoanType> {
        self.shared.lock().loan_type
    }

    pub fn progress(&self) -> u8 {
        self.shared.lock().progress
    }

    pub fn is_typing(&self) -> bool {
        self.shared.lock().pending_replies > 0
    }

    pub fn chat_id(&self) -> Option<String> {
        self.shared.lock().chat_id.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Set the input to `text` and send it.
    pub async fn submit(&self, text: impl Into<String>) -> DispatchOutcome {
        self.set_input(text);
        self.send_message().await
    }

    /// Send the current input: greetings are answered locally, everything else goes to the backend.
    pub async fn send_message(&self) -> DispatchOutcome {
        let (text, chat_id) = {
            let mut state = self.shared.lock();
            if state.input.trim().is_empty() {
                return DispatchOutcome::Ignored;
            }
            let text = std::mem::take(&mut state.input);
            state.transcript.push(ChatMessage::user(text.clone()));
            (text, state.chat_id.clone())
        };
        let delay = self.shared.delays.reply_typing_delay;

        if is_greeting(&text) {
            debug!("greeting detected, offering loan types");
            self.shared.type_messages(
                vec![
                    ChatMessage::assistant(GREETING_REPLY),
                    ChatMessage::loan_options(),
                ],
                delay,
            );
            return DispatchOutcome::Greeting;
        }

        let request = ChatRequest {
            message: text,
            chat_id,
        };
        match self.backend.send(request).await {
            Ok(reply) => {
                self.shared.lock().chat_id = Some(reply.chat_id.clone());
                self.shared
                    .type_messages(vec![ChatMessage::assistant(reply.reply)], delay);
                DispatchOutcome::Forwarded {
                    chat_id: reply.chat_id,
                }
            }
            Err(err) => {
                warn!(error = %err, "chat backend failed, using fallback reply");
                self.shared
                    .type_messages(vec![ChatMessage::assistant(FALLBACK_REPLY)], delay);
                DispatchOutcome::Fallback
            }
        }
    }

    /// Kick off the scripted automation when both a file and a loan type are selected.
    pub fn run_automation(&self) -> AutomationStart {
        {
            let mut state = self.shared.lock();
            let skip = if self.shared.cancel.is_cancelled() {
                Some(SkipReason::Closed)
            } else if state.file.is_none() {
                Some(SkipReason::MissingFile)
            } else if state.loan_type.is_none() {
                Some(SkipReason::MissingLoanType)
            } else if state.automation_running {
                Some(SkipReason::AlreadyRunning)
            } else {
                None
            };

            if let Some(reason) = skip {
                debug!(?reason, "automation request ignored");
                return AutomationStart::Skipped(reason);
            }

            state.automation_running = true;
            state.progress = INITIAL_PROGRESS;
            info!(
                file = state.file.as_deref().unwrap_or_default(),
                loan_type = ?state.loan_type,
                "automation accepted"
            );
        }

        let listener = Arc::new(SessionListener {
            shared: Arc::clone(&self.shared),
        });
        AutomationStart::Started(self.sequencer.spawn(
            self.steps.clone(),
            listener,
            self.shared.cancel.child_token(),
        ))
    }

    /// Replace the input with a recognized transcript, if the host can recognize speech.
    pub fn apply_voice_input(
        &self,
        recognizer: Option<&dyn SpeechToText>,
    ) -> Result<(), VoiceInputError> {
        let recognizer = recognizer.ok_or(VoiceInputError::Unsupported)?;
        let transcript = recognizer.recognize(RECOGNITION_LANGUAGE)?;
        self.set_input(transcript);
        Ok(())
    }

    /// Stop every pending delivery scheduled by this session.
    pub fn close(&self) {
        if !self.shared.cancel.is_cancelled() {
            info!("assistant session closed");
        }
        self.shared.cancel.cancel();
    }
}

impl Drop for AssistantSession {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}
