//! User profile and onboarding form models.

use serde::{Deserialize, Serialize};

/// User profile built during onboarding and used to personalize the assistant.
///
/// Immutable once created; a new profile requires resetting the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    /// Restrictions in the order the user selected them.
    pub dietary_restrictions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

impl UserProfile {
    /// Render the profile panel shown by the `/perfil` command.
    pub fn to_panel(&self) -> String {
        let mut parts = vec![
            "📋 Seu Perfil".to_string(),
            format!("Nome: {}", self.name),
            "Restrições Alimentares:".to_string(),
        ];

        for restriction in &self.dietary_restrictions {
            parts.push(format!("- {restriction}"));
        }

        if let Some(ref notes) = self.additional_notes {
            parts.push("Observações:".to_string());
            parts.push(notes.clone());
        }

        parts.join("\n")
    }
}

/// Raw values submitted through the onboarding form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingForm {
    pub name: String,
    /// Selected options in selection order, possibly including "Outra".
    pub restrictions: Vec<String>,
    /// Free text for the "Outra" option.
    pub other_restriction: Option<String>,
    pub notes: Option<String>,
}
