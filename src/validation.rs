//! Input validation for user-authored quest text and shadow types

/// Quest text validation errors with helpful messages
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuestTextError {
    #[error("Quest title cannot be empty")]
    EmptyTitle,

    #[error("Quest title is too long (maximum {max} characters)")]
    TitleTooLong { max: usize },

    #[error("Quest title contains control characters: {chars}")]
    InvalidCharacters { chars: String },

    #[error("Quest description is too long (maximum {max} bytes)")]
    DescriptionTooLong { max: usize },

    #[error("Shadow type must be 1-{max} letters, digits, '-' or '_'")]
    InvalidShadowType { max: usize },
}

pub const MAX_TITLE_CHARS: usize = 80;
pub const MAX_DESCRIPTION_BYTES: usize = 500;
pub const MAX_SHADOW_TYPE_CHARS: usize = 24;

/// Validate a quest title: trimmed, non-empty, bounded, no control characters.
pub fn validate_quest_title(title: &str) -> Result<String, QuestTextError> {
    let trimmed = title.trim();

    if trimmed.is_empty() {
        return Err(QuestTextError::EmptyTitle);
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(QuestTextError::TitleTooLong { max: MAX_TITLE_CHARS });
    }

    if trimmed.chars().any(|c| c.is_control()) {
        let control_chars: String = trimmed
            .chars()
            .filter(|c| c.is_control())
            .map(|c| format!("\\u{{{:04x}}}", c as u32))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(QuestTextError::InvalidCharacters { chars: control_chars });
    }

    Ok(trimmed.to_string())
}

/// Sanitize a quest description (strip control characters, validate length)
pub fn sanitize_quest_description(description: &str) -> Result<String, QuestTextError> {
    if description.len() > MAX_DESCRIPTION_BYTES {
        return Err(QuestTextError::DescriptionTooLong {
            max: MAX_DESCRIPTION_BYTES,
        });
    }

    // Keep newlines and tabs so multi-line workout notes survive
    let sanitized: String = description
        .chars()
        .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
        .collect();

    Ok(sanitized.trim().to_string())
}

/// Normalize a shadow type to lowercase ASCII identifier form.
pub fn normalize_shadow_type(shadow_type: &str) -> Result<String, QuestTextError> {
    let trimmed = shadow_type.trim();
    let valid = !trimmed.is_empty()
        && trimmed.len() <= MAX_SHADOW_TYPE_CHARS
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(QuestTextError::InvalidShadowType {
            max: MAX_SHADOW_TYPE_CHARS,
        });
    }
    Ok(trimmed.to_ascii_lowercase())
}
