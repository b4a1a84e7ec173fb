use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone)]
pub struct SubmitterName(String);

impl SubmitterName {
    pub fn parse(s: String) -> Result<SubmitterName, String> {
        let trimmed = s.trim();
        let is_empty_or_whitespace = trimmed.is_empty();

        let is_too_long = trimmed.graphemes(true).count() > 256;

        // Names end up in subject lines, so no line breaks or other control characters.
        let contains_control_characters = trimmed.chars().any(char::is_control);

        if is_empty_or_whitespace {
            Err("Name is required".to_string())
        } else if is_too_long || contains_control_characters {
            Err(format!("{} is not a valid name", trimmed))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for SubmitterName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubmitterName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
