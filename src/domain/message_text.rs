const MAX_CHARS: usize = 5000;

#[derive(Debug, Clone)]
pub struct MessageText(String);

impl MessageText {
    pub fn parse(s: String) -> Result<MessageText, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Err("Message is required".to_string())
        } else if trimmed.chars().count() > MAX_CHARS {
            Err(format!("Message must be at most {} characters long", MAX_CHARS))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for MessageText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
