//! CLI channel — stdin/stdout terminal front end.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

use crate::channels::Channel;
use crate::error::ChannelError;

/// Reads lines from stdin and writes to stdout.
pub struct CliChannel {
    lines: Lines<BufReader<Stdin>>,
    stdout: Stdout,
}

impl CliChannel {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            stdout: tokio::io::stdout(),
        }
    }

    async fn write(&mut self, text: &str) -> Result<(), ChannelError> {
        self.stdout.write_all(text.as_bytes()).await?;
        self.stdout.flush().await?;
        Ok(())
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn read_line(&mut self, label: &str) -> Result<Option<String>, ChannelError> {
        self.write(&format!("{label} ")).await?;
        match self.lines.next_line().await {
            Ok(Some(line)) => Ok(Some(line)),
            Ok(None) => Ok(None), // EOF
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                Err(e.into())
            }
        }
    }

    async fn show(&mut self, text: &str) -> Result<(), ChannelError> {
        self.write(&format!("{text}\n")).await
    }

    async fn show_error(&mut self, text: &str) -> Result<(), ChannelError> {
        self.write(&format!("❌ {text}\n")).await
    }

    async fn show_status(&mut self, text: &str) -> Result<(), ChannelError> {
        self.write(&format!("⏳ {text}\n")).await
    }
}
