//! System prompt composition for the dietary assistant.

use crate::catalog;

use super::model::UserProfile;

/// Placeholder used when the user left no additional notes.
pub const NO_NOTES_PLACEHOLDER: &str = "Nenhuma observação adicional.";

const GUIDELINES: &str = "\
Diretrizes:
1. Personalize todas as respostas considerando as restrições específicas.
2. Forneça informações detalhadas sobre substituições seguras de ingredientes.
3. Alerte sobre riscos de contaminação cruzada quando relevante.
4. Sugira alternativas nutricionalmente equivalentes quando possível.
5. Recomende consulta a profissionais de saúde para casos específicos.
6. Mantenha um tom amigável e empático, reconhecendo os desafios das restrições alimentares.";

const RESPONSE_FORMAT: &str = "\
Formato das respostas:
- Inicie com um cumprimento personalizado
- Forneça a informação principal de forma clara
- Adicione alertas de segurança quando necessário
- Conclua com sugestões práticas quando apropriado";

/// Build the system prompt for a profile.
///
/// Deterministic: the same profile always renders the same string. The result
/// becomes the first transcript message and is never rewritten.
pub fn system_prompt(profile: &UserProfile) -> String {
    let notes = profile
        .additional_notes
        .as_deref()
        .unwrap_or(NO_NOTES_PLACEHOLDER);

    format!(
        "Você é um assistente especializado em restrições alimentares, conversando com {name}.\n\
         \n\
         Restrições alimentares do usuário:\n\
         {restrictions}\n\
         \n\
         Observações adicionais:\n\
         {notes}\n\
         \n\
         {GUIDELINES}\n\
         \n\
         {RESPONSE_FORMAT}",
        name = profile.name,
        restrictions = format_restrictions(&profile.dietary_restrictions),
    )
}

/// Render one line block per restriction, enriched from the catalog when known.
pub fn format_restrictions(restrictions: &[String]) -> String {
    restrictions
        .iter()
        .map(|restriction| match catalog::lookup(restriction) {
            Some(entry) => format!(
                "- {}:\n  Descrição: {}\n  Ingredientes comuns para evitar: {}",
                restriction,
                entry.description,
                entry.common_ingredients.join(", ")
            ),
            None => format!("- {restriction}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
