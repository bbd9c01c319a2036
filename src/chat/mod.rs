//! Chat — transcript, per-session state, and the model round trip.

pub mod message;
pub mod orchestrator;
pub mod session;

pub use message::{Message, Role};
pub use orchestrator::{ChatOrchestrator, IgnoreReason, SubmitOutcome};
pub use session::{HistoryEntry, ProfileSummary, SessionPhase, SessionState};
