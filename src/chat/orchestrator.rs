//! Chat orchestrator — forwards user questions to the model.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::AssistantConfig;
use crate::error::LlmError;
use crate::llm::{CompletionRequest, LlmProvider};

use super::message::Message;
use super::session::SessionState;

/// Label that introduces the new question at the end of the context.
const USER_LABEL: &str = "Usuário";

/// Why a submission was not forwarded to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A model call is already outstanding for this session.
    Busy,
    /// No profile yet, so there is no system prompt to send.
    NotOnboarded,
    /// Nothing but whitespace was typed.
    EmptyPrompt,
}

/// Result of one `submit` call.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The model answered; the reply is now the last transcript message.
    Replied(String),
    /// The model call failed; only the user message was appended.
    Failed(LlmError),
    /// Nothing happened.
    Ignored(IgnoreReason),
}

/// Sends accumulated conversation context to the model and records replies.
pub struct ChatOrchestrator {
    llm: Arc<dyn LlmProvider>,
    temperature: f32,
}

impl ChatOrchestrator {
    pub fn new(llm: Arc<dyn LlmProvider>, temperature: f32) -> Self {
        Self { llm, temperature }
    }

    pub fn from_config(llm: Arc<dyn LlmProvider>, config: &AssistantConfig) -> Self {
        Self::new(llm, config.temperature)
    }

    /// Ask the model one question on behalf of the session.
    ///
    /// The session's in-flight flag is held for the duration of the call and
    /// is always clear again when this returns or is dropped.
    pub async fn submit(&self, session: &mut SessionState, prompt: &str) -> SubmitOutcome {
        let session_id = session.id();

        if session.is_in_flight() {
            warn!(session_id = %session_id, "Submission ignored: request already in flight");
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        }
        if !session.is_onboarded() {
            warn!(session_id = %session_id, "Submission ignored: session not onboarded");
            return SubmitOutcome::Ignored(IgnoreReason::NotOnboarded);
        }
        if prompt.trim().is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::EmptyPrompt);
        }

        let Some(mut guard) = session.begin_request() else {
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        };

        guard.push_user(prompt);
        let context = build_context(guard.transcript(), prompt);
        let request = CompletionRequest::new(context).with_temperature(self.temperature);

        info!(
            session_id = %session_id,
            model = self.llm.model_name(),
            messages = guard.transcript().len(),
            "Requesting assistant response"
        );

        let result = self.llm.complete(request).await.and_then(|response| {
            if response.content.trim().is_empty() {
                Err(LlmError::EmptyResponse {
                    provider: self.llm.model_name().to_string(),
                })
            } else {
                Ok(response.content)
            }
        });

        match result {
            Ok(reply) => {
                guard.push_assistant(&reply);
                info!(
                    session_id = %session_id,
                    history_entries = guard.history().len(),
                    "Assistant response recorded"
                );
                SubmitOutcome::Replied(reply)
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Failed to get assistant response");
                SubmitOutcome::Failed(e)
            }
        }
    }
}

/// Join every transcript message, then restate the new question.
pub fn build_context(transcript: &[Message], prompt: &str) -> String {
    let mut context = transcript
        .iter()
        .map(Message::content)
        .collect::<Vec<_>>()
        .join("\n");
    context.push_str(&format!("\n{USER_LABEL}: {prompt}"));
    context
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::chat::message::Role;
    use crate::llm::CompletionResponse;
    use crate::onboarding::UserProfile;

    /// Stub LLM that replays a fixed outcome and records what it was sent.
    struct StubLlm {
        reply: Option<String>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl StubLlm {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        fn model_name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request);
            match self.reply {
                Some(ref content) => Ok(CompletionResponse {
                    content: content.clone(),
                }),
                None => Err(LlmError::RequestFailed {
                    provider: "stub".to_string(),
                    reason: "connection refused".to_string(),
                }),
            }
        }
    }

    /// Never answers.
    struct HangingLlm;

    #[async_trait]
    impl LlmProvider for HangingLlm {
        fn model_name(&self) -> &str {
            "hanging"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            std::future::pending().await
        }
    }

    fn onboarded_session() -> SessionState {
        let mut session = SessionState::new();
        session
            .complete_onboarding(UserProfile {
                name: "Ana".to_string(),
                dietary_restrictions: vec!["Lactose".to_string()],
                additional_notes: None,
            })
            .unwrap();
        session
    }

    #[tokio::test]
    async fn successful_reply_is_recorded() {
        let llm = StubLlm::replying("Não, queijo contém lactose.");
        let orchestrator = ChatOrchestrator::new(llm.clone(), 0.2);
        let mut session = onboarded_session();

        let outcome = orchestrator.submit(&mut session, "Posso comer queijo?").await;
        assert!(matches!(outcome, SubmitOutcome::Replied(ref r) if r == "Não, queijo contém lactose."));

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[0].role(), Role::System);
        assert_eq!(transcript[1], Message::user("Posso comer queijo?"));
        assert_eq!(transcript[2], Message::assistant("Não, queijo contém lactose."));

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].messages.len(), 3);
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn context_includes_transcript_and_prompt() {
        let llm = StubLlm::replying("ok");
        let orchestrator = ChatOrchestrator::new(llm.clone(), 0.2);
        let mut session = onboarded_session();
        let system = session.transcript()[0].content().to_string();

        orchestrator.submit(&mut session, "Posso comer queijo?").await;

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, Some(0.2));
        assert_eq!(
            requests[0].prompt,
            format!("{system}\nPosso comer queijo?\nUsuário: Posso comer queijo?")
        );
    }

    #[tokio::test]
    async fn later_questions_carry_earlier_turns() {
        let llm = StubLlm::replying("resposta");
        let orchestrator = ChatOrchestrator::new(llm.clone(), 0.2);
        let mut session = onboarded_session();

        orchestrator.submit(&mut session, "primeira").await;
        orchestrator.submit(&mut session, "segunda").await;

        let requests = llm.requests();
        assert!(requests[1].prompt.contains("primeira\nresposta\nsegunda"));
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[1].messages.len(), 5);
    }

    #[tokio::test]
    async fn failure_keeps_user_message_only() {
        let orchestrator = ChatOrchestrator::new(StubLlm::failing(), 0.2);
        let mut session = onboarded_session();

        let outcome = orchestrator.submit(&mut session, "Posso comer queijo?").await;
        assert!(matches!(outcome, SubmitOutcome::Failed(LlmError::RequestFailed { .. })));

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].role(), Role::User);
        assert!(session.history().is_empty());
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn blank_reply_counts_as_failure() {
        let orchestrator = ChatOrchestrator::new(StubLlm::replying("  "), 0.2);
        let mut session = onboarded_session();

        let outcome = orchestrator.submit(&mut session, "oi").await;
        assert!(matches!(outcome, SubmitOutcome::Failed(LlmError::EmptyResponse { .. })));
        assert_eq!(session.transcript().len(), 2);
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn empty_prompt_is_ignored() {
        let llm = StubLlm::replying("ok");
        let orchestrator = ChatOrchestrator::new(llm.clone(), 0.2);
        let mut session = onboarded_session();

        let outcome = orchestrator.submit(&mut session, "   ").await;
        assert!(matches!(outcome, SubmitOutcome::Ignored(IgnoreReason::EmptyPrompt)));
        assert_eq!(session.transcript().len(), 1);
        assert!(llm.requests().is_empty());
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn not_onboarded_is_ignored() {
        let llm = StubLlm::replying("ok");
        let orchestrator = ChatOrchestrator::new(llm.clone(), 0.2);
        let mut session = SessionState::new();

        let outcome = orchestrator.submit(&mut session, "oi").await;
        assert!(matches!(outcome, SubmitOutcome::Ignored(IgnoreReason::NotOnboarded)));
        assert!(session.transcript().is_empty());
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn busy_session_is_ignored() {
        let llm = StubLlm::replying("ok");
        let orchestrator = ChatOrchestrator::new(llm.clone(), 0.2);
        let mut session = onboarded_session();
        std::mem::forget(session.begin_request().unwrap());

        let outcome = orchestrator.submit(&mut session, "oi").await;
        assert!(matches!(outcome, SubmitOutcome::Ignored(IgnoreReason::Busy)));
        assert_eq!(session.transcript().len(), 1);
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn cancelled_call_clears_in_flight() {
        let orchestrator = ChatOrchestrator::new(Arc::new(HangingLlm), 0.2);
        let mut session = onboarded_session();

        let result = tokio::time::timeout(
            Duration::from_millis(20),
            orchestrator.submit(&mut session, "oi"),
        )
        .await;
        assert!(result.is_err());
        assert!(!session.is_in_flight());
        assert_eq!(session.transcript().len(), 2);
    }

    #[test]
    fn build_context_joins_with_newlines() {
        let transcript = vec![Message::system("sys"), Message::user("q")];
        assert_eq!(build_context(&transcript, "q"), "sys\nq\nUsuário: q");
    }
}
