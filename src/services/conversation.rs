use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    Actor, Appointment, AppointmentDraft, AssistantProfile, BookingEdit, BookingMethod,
    ConversationTurn, DraftError, FinalizedBooking, SessionStatus, Transcript,
};
use crate::services::ai::extraction::{extract_booking, strip_booking_blocks, Extraction};
use crate::services::ai::prompt::build_system_prompt;
use crate::services::ai::{GenerationParams, LlmProvider, Message};
use crate::services::backend::{AppointmentStore, EmployeeDirectory};
use crate::services::materializer::{materialize, BookingError};
use crate::services::sanitizer::sanitize_for_voice;
use crate::services::speech::{SpeechError, SpeechIo, SpeechState};
use crate::services::temporal::{check_not_elapsed, Clock, TemporalError};

const APOLOGY: &str = "I apologize, but I encountered an error. Please try again.";
const REVIEW_PROMPT: &str = "I have all the details. Please review your appointment below.";
const EDITED: &str = "Your appointment details have been updated successfully!";
const SAVED: &str = "Your appointment has been successfully saved to our system!";

/// Collaborators shared by every session.
#[derive(Clone)]
pub struct SessionDeps {
    pub llm: Arc<dyn LlmProvider>,
    pub directory: Arc<dyn EmployeeDirectory>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub clock: Arc<dyn Clock>,
    pub profile: Arc<AssistantProfile>,
    pub params: GenerationParams,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("there is no appointment to work with yet")]
    NoBooking,

    #[error("this appointment has already been saved")]
    AlreadySubmitted,

    #[error("the appointment is already being saved")]
    SaveInProgress,

    #[error(transparent)]
    InvalidBooking(#[from] DraftError),

    #[error(transparent)]
    Temporal(#[from] TemporalError),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Speech(#[from] SpeechError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank text, or another submission is still waiting on the model.
    Ignored,
    /// The session was reset while the model was thinking; the reply was dropped.
    Superseded,
    Answered(String),
}

#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub status: SessionStatus,
    pub transcript: Transcript,
    pub draft: AppointmentDraft,
    pub booking: Option<FinalizedBooking>,
    pub speech: SpeechState,
    pub pending_speech: Vec<String>,
}

#[derive(Default)]
struct SessionInner {
    transcript: Transcript,
    draft: AppointmentDraft,
    booking: Option<FinalizedBooking>,
    submitted: bool,
    // Bumped on reset so replies that arrive afterwards are dropped.
    epoch: u64,
}

impl SessionInner {
    fn install(&mut self, booking: FinalizedBooking) {
        self.draft = booking.to_draft();
        self.booking = Some(booking);
    }

    fn say(&mut self, text: &str) {
        self.transcript.push(ConversationTurn::assistant(text));
    }
}

/// Clears an in-flight flag when the holder goes out of scope, including on
/// cancellation of the surrounding future.
struct FlagGuard<'a>(&'a AtomicBool);

impl<'a> FlagGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlagGuard(flag))
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One visitor's booking conversation, bound to the actor that opened it.
pub struct ConversationSession {
    id: Uuid,
    actor: Option<Actor>,
    deps: SessionDeps,
    speech: Box<dyn SpeechIo>,
    thinking: AtomicBool,
    saving: AtomicBool,
    inner: Mutex<SessionInner>,
}

impl ConversationSession {
    pub fn new(actor: Option<Actor>, deps: SessionDeps, speech: Box<dyn SpeechIo>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            actor,
            deps,
            speech,
            thinking: AtomicBool::new(false),
            saving: AtomicBool::new(false),
            inner: Mutex::new(SessionInner::default()),
        };
        session.greet();
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        let inner = self.inner.lock().unwrap();
        match (&inner.booking, inner.submitted) {
            (Some(_), true) => SessionStatus::Saved,
            (Some(_), false) => SessionStatus::AwaitingConfirmation,
            (None, _) => SessionStatus::Collecting,
        }
    }

    pub fn booking(&self) -> Option<FinalizedBooking> {
        self.inner.lock().unwrap().booking.clone()
    }

    pub fn transcript(&self) -> Transcript {
        self.inner.lock().unwrap().transcript.clone()
    }

    /// Current state for the client. Pending utterances are handed out once.
    pub fn snapshot(&self) -> SessionSnapshot {
        let status = self.status();
        let inner = self.inner.lock().unwrap();
        SessionSnapshot {
            id: self.id,
            status,
            transcript: inner.transcript.clone(),
            draft: inner.draft.clone(),
            booking: inner.booking.clone(),
            speech: SpeechState::of(self.speech.as_ref()),
            pending_speech: self.speech.drain_utterances(),
        }
    }

    /// Sends one visitor turn to the model and records the reply.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }
        let Some(_thinking) = FlagGuard::acquire(&self.thinking) else {
            tracing::debug!(session_id = %self.id, "submission ignored, reply still pending");
            return SubmitOutcome::Ignored;
        };

        let (messages, epoch) = {
            let mut inner = self.inner.lock().unwrap();
            inner.transcript.push(ConversationTurn::visitor(text));
            let messages: Vec<Message> = inner.transcript.turns().iter().map(Message::from).collect();
            (messages, inner.epoch)
        };

        let directory = match self.deps.directory.list_employees(self.actor.as_ref()).await {
            Ok(directory) => directory,
            Err(e) => {
                tracing::warn!(session_id = %self.id, error = %e, "employee directory unavailable");
                Vec::new()
            }
        };

        let system_prompt =
            build_system_prompt(&self.deps.profile, &directory, self.deps.clock.now());
        let reply = self
            .deps
            .llm
            .chat(&system_prompt, &messages, &self.deps.params)
            .await;

        let visible = {
            let mut inner = self.inner.lock().unwrap();
            if inner.epoch != epoch {
                tracing::debug!(session_id = %self.id, "session reset while waiting, reply dropped");
                return SubmitOutcome::Superseded;
            }

            let visible = match reply {
                Ok(raw) => self.absorb_reply(&mut inner, &raw),
                Err(e) => {
                    tracing::error!(session_id = %self.id, error = %e, "reasoning call failed");
                    APOLOGY.to_string()
                }
            };
            inner.say(&visible);
            visible
        };

        self.speak_if_idle(&visible);
        SubmitOutcome::Answered(visible)
    }

    /// Installs a booking if the reply finalized one and returns the text to show.
    fn absorb_reply(&self, inner: &mut SessionInner, raw: &str) -> String {
        let visible = strip_booking_blocks(raw);
        let now = self.deps.clock.now();

        match extract_booking(raw, now.date()) {
            Extraction::NotFound => visible,
            Extraction::Malformed(reason) => {
                tracing::warn!(session_id = %self.id, reason = %reason, "ignoring unusable booking block");
                visible
            }
            Extraction::Booking(booking) => {
                if let Err(e) =
                    check_not_elapsed(booking.appointment_date, booking.appointment_time, now)
                {
                    tracing::info!(
                        session_id = %self.id,
                        starts_at = %booking.starts_at(),
                        "finalized booking rejected, time already passed"
                    );
                    return e.to_string();
                }

                if inner.submitted {
                    tracing::debug!(
                        session_id = %self.id,
                        starts_at = %booking.starts_at(),
                        "booking block after save ignored"
                    );
                    return if visible.is_empty() { SAVED.to_string() } else { visible };
                }

                tracing::info!(
                    session_id = %self.id,
                    employee = %booking.employee_name,
                    starts_at = %booking.starts_at(),
                    "booking finalized"
                );
                inner.install(booking);
                if visible.is_empty() {
                    REVIEW_PROMPT.to_string()
                } else {
                    visible
                }
            }
        }
    }

    /// Back to a single greeting turn with an empty draft.
    pub fn reset(&self) {
        self.speech.stop_speaking();
        {
            let mut inner = self.inner.lock().unwrap();
            inner.transcript.clear();
            inner.draft = AppointmentDraft::default();
            inner.booking = None;
            inner.submitted = false;
            inner.epoch += 1;
        }
        self.greet();
        tracing::debug!(session_id = %self.id, "session reset");
    }

    fn greet(&self) {
        let greeting = self.deps.profile.greeting();
        self.inner.lock().unwrap().say(&greeting);
        self.speak_if_idle(&greeting);
    }

    pub fn edit_booking(&self, edit: &BookingEdit) -> Result<FinalizedBooking, SessionError> {
        // Checked under the lock: `save` copies the booking while holding it.
        let mut inner = self.inner.lock().unwrap();
        if self.saving.load(Ordering::Acquire) {
            return Err(SessionError::SaveInProgress);
        }
        let current = inner.booking.as_ref().ok_or(SessionError::NoBooking)?;
        if inner.submitted {
            return Err(SessionError::AlreadySubmitted);
        }

        let edited = current.apply_edit(edit)?;
        check_not_elapsed(
            edited.appointment_date,
            edited.appointment_time,
            self.deps.clock.now(),
        )?;

        inner.install(edited.clone());
        inner.say(EDITED);
        Ok(edited)
    }

    /// Persists the finalized booking through the backend.
    pub async fn save(&self) -> Result<Appointment, SessionError> {
        let Some(_saving) = FlagGuard::acquire(&self.saving) else {
            return Err(SessionError::SaveInProgress);
        };

        let (booking, epoch) = {
            let inner = self.inner.lock().unwrap();
            let booking = inner.booking.clone().ok_or(SessionError::NoBooking)?;
            if inner.submitted {
                return Err(SessionError::AlreadySubmitted);
            }
            (booking, inner.epoch)
        };

        if let Err(e) = check_not_elapsed(
            booking.appointment_date,
            booking.appointment_time,
            self.deps.clock.now(),
        ) {
            self.inner.lock().unwrap().say(&e.to_string());
            return Err(e.into());
        }

        let request = booking.to_create_request(BookingMethod::Voice);
        let result = materialize(
            self.actor.as_ref(),
            &request,
            self.deps.appointments.as_ref(),
        )
        .await;

        let mut inner = self.inner.lock().unwrap();
        if inner.epoch != epoch {
            tracing::warn!(session_id = %self.id, "session reset during save");
        }
        match result {
            Ok(appointment) => {
                if inner.epoch == epoch {
                    inner.submitted = true;
                    inner.say(SAVED);
                }
                Ok(appointment)
            }
            Err(e) => {
                tracing::warn!(session_id = %self.id, error = %e, "saving appointment failed");
                if inner.epoch == epoch {
                    inner.say(&format!("Sorry, I couldn't save your appointment: {e}"));
                }
                Err(e.into())
            }
        }
    }

    pub fn start_listening(&self) -> Result<(), SessionError> {
        if self.speech.is_speaking() {
            return Err(SpeechError::Busy.into());
        }
        self.speech.start_listening()?;
        Ok(())
    }

    pub fn stop_listening(&self) {
        self.speech.stop_listening();
    }

    /// Final transcript from the recognizer.
    pub async fn recognition_result(&self, text: &str) -> SubmitOutcome {
        self.speech.stop_listening();
        self.submit(text).await
    }

    pub fn speech_finished(&self) {
        self.speech.stop_speaking();
    }

    /// Stops synthesis, then recognition. Runs before a session is dropped.
    pub fn teardown(&self) {
        self.speech.stop_speaking();
        self.speech.stop_listening();
        tracing::debug!(session_id = %self.id, "session torn down");
    }

    fn speak_if_idle(&self, text: &str) {
        if self.speech.is_speaking() {
            return;
        }
        let spoken = sanitize_for_voice(text);
        if spoken.is_empty() {
            return;
        }
        if let Err(e) = self.speech.speak(&spoken) {
            tracing::warn!(session_id = %self.id, error = %e, "speech synthesis unavailable");
        }
    }
}
