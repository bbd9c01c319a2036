//! Interactive assistant — drives onboarding and chat over a `Channel`.

use tracing::{debug, info, warn};

use crate::catalog::{self, OTHER_OPTION};
use crate::channels::Channel;
use crate::chat::{ChatOrchestrator, Message, Role, SessionState, SubmitOutcome};
use crate::error::{ChannelError, ValidationError};
use crate::onboarding::{OnboardingForm, build_profile, log_profile_created};

/// Shown when the model call fails.
pub const ERROR_MESSAGE: &str =
    "Desculpe, ocorreu um erro ao processar sua mensagem. Por favor, tente novamente.";

/// Shown while a question is with the model.
pub const PROCESSING_STATUS: &str = "Processando sua pergunta...";

const WELCOME_TITLE: &str = "🥗 Bem-vindo ao Assistente de Restrições Alimentares";

const NAME_LABEL: &str = "Como você gostaria de ser chamado?";
const RESTRICTIONS_LABEL: &str =
    "Selecione suas restrições alimentares (números ou nomes, separados por vírgula):";
const OTHER_LABEL: &str = "Especifique sua restrição alimentar:";
const NOTES_LABEL: &str = "Observações adicionais (opcional):";
const CHAT_LABEL: &str = "Digite sua pergunta sobre restrições alimentares:";

const HELP: &str = "\
Comandos: /perfil (seu perfil), /conversa (mensagens até agora), \
/recursos (dicas e links), /modificar (refazer o cadastro), /ajuda, /sair";

const RESOURCES: &str = "\
📚 Recursos Úteis

Dicas de Segurança:
- Sempre leia os rótulos dos alimentos
- Informe suas restrições em restaurantes
- Tenha cuidado com contaminação cruzada
- Mantenha um diário alimentar

Links Úteis:
- Anvisa - Rotulagem de Alimentos: https://www.gov.br/anvisa
- Sociedade Brasileira de Alimentação e Nutrição: https://sban.org.br
- Associação Brasileira de Alergia e Imunologia: https://asbai.org.br

⚠️ Importante: As informações fornecidas são apenas para orientação geral. \
Sempre consulte profissionais de saúde para recomendações personalizadas.";

/// Chat commands typed instead of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Profile,
    Conversation,
    Resources,
    Modify,
    Help,
    Quit,
}

/// Recognize a chat command. Anything else is a question for the model.
pub fn parse_command(input: &str) -> Option<Command> {
    match input.trim().to_lowercase().as_str() {
        "/perfil" => Some(Command::Profile),
        "/conversa" => Some(Command::Conversation),
        "/recursos" => Some(Command::Resources),
        "/modificar" => Some(Command::Modify),
        "/ajuda" => Some(Command::Help),
        "/sair" => Some(Command::Quit),
        _ => None,
    }
}

/// Resolve a multi-select answer into option names, in the order typed.
///
/// Tokens are comma separated and may be 1-based option numbers or option
/// names (case-insensitive).
pub fn parse_selection(input: &str, options: &[&str]) -> Result<Vec<String>, ValidationError> {
    let mut selected: Vec<String> = Vec::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let option = match token.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => options[n - 1],
            Ok(_) => return Err(ValidationError::UnknownOption(token.to_string())),
            Err(_) => options
                .iter()
                .copied()
                .find(|o| o.to_lowercase() == token.to_lowercase())
                .ok_or_else(|| ValidationError::UnknownOption(token.to_string()))?,
        };
        if !selected.iter().any(|s| s == option) {
            selected.push(option.to_string());
        }
    }
    Ok(selected)
}

/// Render one transcript message for display. System messages are never shown.
pub fn render_message(message: &Message) -> Option<String> {
    match message.role() {
        Role::System => None,
        Role::User => Some(format!("🧑 Você: {}", message.content())),
        Role::Assistant => Some(format!("🥗 Assistente: {}", message.content())),
    }
}

enum Flow {
    Continue,
    Quit,
}

/// One user's session, from onboarding to the end of input.
pub struct DietaryAssistant<C> {
    channel: C,
    orchestrator: ChatOrchestrator,
    session: SessionState,
}

impl<C: Channel> DietaryAssistant<C> {
    pub fn new(channel: C, orchestrator: ChatOrchestrator) -> Self {
        Self {
            channel,
            orchestrator,
            session: SessionState::new(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Run until the user quits or input ends.
    pub async fn run(&mut self) -> Result<(), ChannelError> {
        info!(channel = self.channel.name(), "Assistant started");
        loop {
            let flow = if self.session.is_onboarded() {
                self.chat_turn().await?
            } else {
                self.onboard().await?
            };
            if let Flow::Quit = flow {
                break;
            }
        }
        info!(session_id = %self.session.id(), "Assistant stopped");
        Ok(())
    }

    /// Show the form until it validates.
    async fn onboard(&mut self) -> Result<Flow, ChannelError> {
        self.channel.show(WELCOME_TITLE).await?;
        let options = catalog::form_options();

        loop {
            let Some(name) = self.channel.read_line(NAME_LABEL).await? else {
                return Ok(Flow::Quit);
            };

            let listing = options
                .iter()
                .enumerate()
                .map(|(i, option)| format!("  {}. {}", i + 1, option))
                .collect::<Vec<_>>()
                .join("\n");
            self.channel.show(&listing).await?;

            let Some(raw_selection) = self.channel.read_line(RESTRICTIONS_LABEL).await? else {
                return Ok(Flow::Quit);
            };
            let restrictions = match parse_selection(&raw_selection, &options) {
                Ok(restrictions) => restrictions,
                Err(e) => {
                    self.channel.show_error(&e.user_message()).await?;
                    continue;
                }
            };

            let other_restriction = if restrictions.iter().any(|r| r == OTHER_OPTION) {
                let Some(other) = self.channel.read_line(OTHER_LABEL).await? else {
                    return Ok(Flow::Quit);
                };
                Some(other)
            } else {
                None
            };

            let Some(notes) = self.channel.read_line(NOTES_LABEL).await? else {
                return Ok(Flow::Quit);
            };

            let form = OnboardingForm {
                name,
                restrictions,
                other_restriction,
                notes: Some(notes),
            };

            let profile = match build_profile(&form) {
                Ok(profile) => profile,
                Err(e) => {
                    debug!(error = %e, "Onboarding form rejected");
                    self.channel.show_error(&e.user_message()).await?;
                    continue;
                }
            };

            log_profile_created(&profile);
            let greeting = format!("🥗 Olá, {}!", profile.name);
            if let Err(e) = self.session.complete_onboarding(profile) {
                warn!(error = %e, "Profile submitted for an onboarded session");
            }
            self.channel.show(&greeting).await?;
            self.channel.show(HELP).await?;
            return Ok(Flow::Continue);
        }
    }

    /// Handle one line typed in the chat view.
    async fn chat_turn(&mut self) -> Result<Flow, ChannelError> {
        let Some(line) = self.channel.read_line(CHAT_LABEL).await? else {
            return Ok(Flow::Quit);
        };

        if let Some(command) = parse_command(&line) {
            return self.run_command(command).await;
        }
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        self.channel.show_status(PROCESSING_STATUS).await?;
        match self.orchestrator.submit(&mut self.session, &line).await {
            SubmitOutcome::Replied(_) => {
                if let Some(rendered) = self.session.transcript().last().and_then(render_message) {
                    self.channel.show(&rendered).await?;
                }
            }
            SubmitOutcome::Failed(_) => {
                self.channel.show_error(ERROR_MESSAGE).await?;
            }
            SubmitOutcome::Ignored(reason) => {
                debug!(?reason, "Question not submitted");
            }
        }
        Ok(Flow::Continue)
    }

    async fn run_command(&mut self, command: Command) -> Result<Flow, ChannelError> {
        match command {
            Command::Profile => {
                if let Some(panel) = self.session.profile().map(|p| p.to_panel()) {
                    self.channel.show(&panel).await?;
                }
            }
            Command::Conversation => {
                let rendered: Vec<String> = self
                    .session
                    .visible_messages()
                    .iter()
                    .filter_map(render_message)
                    .collect();
                if rendered.is_empty() {
                    self.channel.show("Nenhuma mensagem ainda.").await?;
                } else {
                    self.channel.show(&rendered.join("\n\n")).await?;
                }
            }
            Command::Resources => self.channel.show(RESOURCES).await?,
            Command::Modify => {
                self.session.reset();
                self.channel.show("✏️ Vamos atualizar suas informações.").await?;
            }
            Command::Help => self.channel.show(HELP).await?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}
