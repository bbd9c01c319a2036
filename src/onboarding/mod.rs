//! Onboarding — collects the user's dietary restrictions.
//!
//! The form is validated into a `UserProfile`, which is rendered into the
//! system prompt that opens every conversation.

pub mod builder;
pub mod model;
pub mod prompts;

pub use builder::{build_profile, log_profile_created};
pub use model::{OnboardingForm, UserProfile};
pub use prompts::system_prompt;
