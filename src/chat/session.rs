//! Session state — everything one user's conversation owns.

use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SessionError;
use crate::onboarding::{UserProfile, system_prompt};

use super::message::{Message, Role};

/// Coarse lifecycle of a session.
///
/// NotOnboarded → Idle on profile submission; Idle ⇄ Processing around each
/// model call; Idle → NotOnboarded on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NotOnboarded,
    Idle,
    Processing,
}

impl SessionPhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: SessionPhase) -> bool {
        use SessionPhase::*;
        matches!(
            (self, target),
            (NotOnboarded, Idle) | (Idle, Processing) | (Processing, Idle) | (Idle, NotOnboarded)
        )
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotOnboarded => "not_onboarded",
            Self::Idle => "idle",
            Self::Processing => "processing",
        };
        write!(f, "{s}")
    }
}

/// Profile fields copied into each history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub name: String,
    pub restrictions: Vec<String>,
    pub notes: Option<String>,
}

impl From<&UserProfile> for ProfileSummary {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            restrictions: profile.dietary_restrictions.clone(),
            notes: profile.additional_notes.clone(),
        }
    }
}

/// Snapshot archived after every answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub profile: ProfileSummary,
    pub messages: Vec<Message>,
}

/// Mutable state of one conversation.
///
/// `transcript[0]` is the system prompt once onboarding completes and is
/// never replaced until `reset`.
#[derive(Debug, Clone)]
pub struct SessionState {
    id: Uuid,
    onboarding_complete: bool,
    profile: Option<UserProfile>,
    transcript: Vec<Message>,
    in_flight: bool,
    history_log: Vec<HistoryEntry>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            onboarding_complete: false,
            profile: None,
            transcript: Vec::new(),
            in_flight: false,
            history_log: Vec::new(),
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier used to correlate log records.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_onboarded(&self) -> bool {
        self.onboarding_complete
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Full transcript, system prompt included.
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Messages the user gets to see (everything after the system prompt).
    pub fn visible_messages(&self) -> &[Message] {
        match self.transcript.first() {
            Some(first) if first.role() == Role::System => &self.transcript[1..],
            _ => &self.transcript,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history_log
    }

    pub fn phase(&self) -> SessionPhase {
        if !self.onboarding_complete {
            SessionPhase::NotOnboarded
        } else if self.in_flight {
            SessionPhase::Processing
        } else {
            SessionPhase::Idle
        }
    }

    /// Store the profile and seed the transcript with its system prompt.
    pub fn complete_onboarding(&mut self, profile: UserProfile) -> Result<(), SessionError> {
        if self.onboarding_complete {
            return Err(SessionError::AlreadyOnboarded);
        }

        self.transcript = vec![Message::system(system_prompt(&profile))];
        self.profile = Some(profile);
        self.onboarding_complete = true;
        info!(session_id = %self.id, "Onboarding complete");
        Ok(())
    }

    /// Drop everything and start over with a fresh session id.
    pub fn reset(&mut self) {
        info!(session_id = %self.id, "Session reset");
        *self = Self::default();
    }

    /// Mark a model call as outstanding.
    ///
    /// Returns `None` when one already is. The flag clears when the guard is
    /// dropped, including when the owning future is cancelled.
    pub(crate) fn begin_request(&mut self) -> Option<InFlightGuard<'_>> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;
        debug!(session_id = %self.id, "Request started");
        Some(InFlightGuard { session: self })
    }

    fn push(&mut self, message: Message) {
        debug_assert!(
            message.role() != Role::System,
            "only onboarding writes system messages"
        );
        self.transcript.push(message);
    }

    fn archive_snapshot(&mut self) {
        let Some(ref profile) = self.profile else {
            return;
        };
        self.history_log.push(HistoryEntry {
            timestamp: Utc::now(),
            profile: ProfileSummary::from(profile),
            messages: self.transcript.clone(),
        });
    }
}

/// Exclusive access to a session while a model call is outstanding.
pub(crate) struct InFlightGuard<'a> {
    session: &'a mut SessionState,
}

impl InFlightGuard<'_> {
    pub(crate) fn push_user(&mut self, content: &str) {
        self.session.push(Message::user(content));
    }

    /// Append the reply and archive the conversation.
    pub(crate) fn push_assistant(&mut self, content: &str) {
        self.session.push(Message::assistant(content));
        self.session.archive_snapshot();
    }
}

impl Deref for InFlightGuard<'_> {
    type Target = SessionState;

    fn deref(&self) -> &SessionState {
        &*self.session
    }
}

impl DerefMut for InFlightGuard<'_> {
    fn deref_mut(&mut self) -> &mut SessionState {
        &mut *self.session
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.session.in_flight = false;
        debug!(session_id = %self.session.id, "Request finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> UserProfile {
        UserProfile {
            name: "Ana".to_string(),
            dietary_restrictions: vec!["Lactose".to_string()],
            additional_notes: None,
        }
    }

    #[test]
    fn new_session_is_not_onboarded() {
        let session = SessionState::new();
        assert_eq!(session.phase(), SessionPhase::NotOnboarded);
        assert!(session.transcript().is_empty());
        assert!(session.profile().is_none());
        assert!(!session.is_in_flight());
        assert!(session.history().is_empty());
    }

    #[test]
    fn onboarding_seeds_system_prompt() {
        let mut session = SessionState::new();
        session.complete_onboarding(ana()).unwrap();

        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].role(), Role::System);
        assert!(session.transcript()[0].content().contains("Ana"));
        assert!(session.visible_messages().is_empty());
        assert_eq!(session.profile().unwrap().name, "Ana");
    }

    #[test]
    fn second_onboarding_is_rejected() {
        let mut session = SessionState::new();
        session.complete_onboarding(ana()).unwrap();
        let original = session.transcript()[0].clone();

        let other = UserProfile {
            name: "Rui".to_string(),
            ..ana()
        };
        assert_eq!(
            session.complete_onboarding(other),
            Err(SessionError::AlreadyOnboarded)
        );
        assert_eq!(session.transcript()[0], original);
        assert_eq!(session.profile().unwrap().name, "Ana");
    }

    #[test]
    fn guard_clears_flag_on_drop() {
        let mut session = SessionState::new();
        session.complete_onboarding(ana()).unwrap();
        {
            let guard = session.begin_request().unwrap();
            assert!(guard.is_in_flight());
            assert_eq!(guard.phase(), SessionPhase::Processing);
        }
        assert!(!session.is_in_flight());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn begin_request_refuses_while_in_flight() {
        let mut session = SessionState::new();
        session.complete_onboarding(ana()).unwrap();
        // Leak a guard to simulate a call that never returned.
        std::mem::forget(session.begin_request().unwrap());
        assert!(session.is_in_flight());
        assert!(session.begin_request().is_none());

        session.reset();
        assert!(!session.is_in_flight());
    }

    #[test]
    fn assistant_reply_archives_snapshot() {
        let mut session = SessionState::new();
        session.complete_onboarding(ana()).unwrap();
        {
            let mut guard = session.begin_request().unwrap();
            guard.push_user("Posso comer queijo?");
            guard.push_assistant("Não, queijo contém lactose.");
        }

        let history = session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].messages.len(), 3);
        assert_eq!(history[0].profile.name, "Ana");
        assert_eq!(history[0].profile.restrictions, vec!["Lactose"]);

        let visible: Vec<Role> = session.visible_messages().iter().map(|m| m.role()).collect();
        assert_eq!(visible, vec![Role::User, Role::Assistant]);
    }

    #[test]
    fn reset_returns_to_not_onboarded() {
        let mut session = SessionState::new();
        let first_id = session.id();
        session.complete_onboarding(ana()).unwrap();
        session.reset();

        assert_eq!(session.phase(), SessionPhase::NotOnboarded);
        assert!(session.transcript().is_empty());
        assert!(session.profile().is_none());
        assert_ne!(session.id(), first_id);
        session.complete_onboarding(ana()).unwrap();
    }

    #[test]
    fn phase_transitions() {
        use SessionPhase::*;
        assert!(NotOnboarded.can_transition_to(Idle));
        assert!(Idle.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Idle));
        assert!(Idle.can_transition_to(NotOnboarded));

        assert!(!NotOnboarded.can_transition_to(Processing));
        assert!(!Processing.can_transition_to(NotOnboarded));
        assert!(!Idle.can_transition_to(Idle));
    }

    #[test]
    fn phase_display_matches_serde() {
        for phase in [SessionPhase::NotOnboarded, SessionPhase::Idle, SessionPhase::Processing] {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(format!("\"{phase}\""), json);
        }
    }
}
