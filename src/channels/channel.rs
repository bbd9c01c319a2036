//! Channel trait — how the assistant talks to whoever is using it.

use async_trait::async_trait;

use crate::error::ChannelError;

/// A presentation surface for the onboarding form and the chat.
///
/// Implementations render text and hand back one line of input per call.
#[async_trait]
pub trait Channel: Send {
    /// Channel name, for logs.
    fn name(&self) -> &str;

    /// Ask for one line of input. `Ok(None)` means the user is gone.
    async fn read_line(&mut self, label: &str) -> Result<Option<String>, ChannelError>;

    /// Render regular output.
    async fn show(&mut self, text: &str) -> Result<(), ChannelError>;

    /// Render an error next to the current view.
    async fn show_error(&mut self, text: &str) -> Result<(), ChannelError>;

    /// Render a transient status line (e.g. while waiting on the model).
    async fn show_status(&mut self, text: &str) -> Result<(), ChannelError>;
}
