//! Profile builder — validates the onboarding form and produces a `UserProfile`.

use chrono::Utc;
use tracing::{info, warn};

use crate::catalog::OTHER_OPTION;
use crate::error::ValidationError;

use super::model::{OnboardingForm, UserProfile};

/// Validate the form and build the profile.
///
/// The name is checked before the restrictions. "Outra" is replaced by the
/// free-text restriction when one was typed, and dropped otherwise.
pub fn build_profile(form: &OnboardingForm) -> Result<UserProfile, ValidationError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    if form.restrictions.is_empty() {
        return Err(ValidationError::MissingRestrictions);
    }

    let mut restrictions: Vec<String> = Vec::with_capacity(form.restrictions.len());
    let mut other_selected = false;
    for selected in &form.restrictions {
        let selected = selected.trim();
        if selected == OTHER_OPTION {
            other_selected = true;
            continue;
        }
        push_unique(&mut restrictions, selected);
    }

    if other_selected {
        match non_blank(form.other_restriction.as_deref()) {
            Some(other) => push_unique(&mut restrictions, other),
            None => warn!("\"{OTHER_OPTION}\" selected without a description; dropping it"),
        }
    }

    Ok(UserProfile {
        name: name.to_string(),
        dietary_restrictions: restrictions,
        additional_notes: non_blank(form.notes.as_deref()).map(str::to_string),
    })
}

/// Emit the structured record for a newly created profile.
///
/// This is the only persistence the profile gets.
pub fn log_profile_created(profile: &UserProfile) {
    let record = serde_json::json!({
        "timestamp": Utc::now().to_rfc3339(),
        "name": profile.name,
        "restrictions": profile.dietary_restrictions,
        "notes": profile.additional_notes,
    });
    info!(profile = %record, "Profile saved");
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}
