const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// An uploaded resume, buffered in memory for the lifetime of one request.
#[derive(Debug, Clone)]
pub struct Resume {
    filename: String,
    content_type: String,
    content: Vec<u8>,
}

impl Resume {
    /// Returns `None` for the empty file part browsers submit when no file was chosen.
    pub fn parse(
        filename: Option<String>,
        content_type: Option<String>,
        content: Vec<u8>,
    ) -> Option<Resume> {
        let filename = filename
            .as_deref()
            .map(base_name)
            .filter(|name| !name.is_empty())?
            .to_string();
        if content.is_empty() {
            return None;
        }
        let content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        Some(Self {
            filename,
            content_type,
            content,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn into_content(self) -> Vec<u8> {
        self.content
    }
}

// Old browsers send the full client-side path; only the final component is kept.
fn base_name(filename: &str) -> &str {
    filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim()
}
