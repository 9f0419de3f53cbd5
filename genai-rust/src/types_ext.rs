use crate::{Content, GenerateRequest, GenerateResponse, InlineDataPart, Part, Role, TextPart};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};

impl TextPart {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for TextPart {
    fn from(value: &str) -> Self {
        Self {
            text: value.to_string(),
        }
    }
}

impl From<String> for TextPart {
    fn from(value: String) -> Self {
        Self { text: value }
    }
}

impl InlineDataPart {
    /// Create a part from data that is already base64 encoded.
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Create a part from raw bytes.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self::new(BASE64_STANDARD.encode(bytes), mime_type)
    }
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextPart::new(text))
    }

    pub fn inline_data(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::InlineData(InlineDataPart::new(data, mime_type))
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text_part) => Some(&text_part.text),
            Self::InlineData(_) => None,
        }
    }
}

impl From<TextPart> for Part {
    fn from(value: TextPart) -> Self {
        Self::Text(value)
    }
}

impl From<InlineDataPart> for Part {
    fn from(value: InlineDataPart) -> Self {
        Self::InlineData(value)
    }
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Role::User,
            parts,
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::text(text)],
        }
    }
}

impl GenerateRequest {
    /// Whether any turn carries inline binary data.
    #[must_use]
    pub fn has_inline_data(&self) -> bool {
        self.contents
            .iter()
            .flat_map(|content| content.parts.iter())
            .any(|part| matches!(part, Part::InlineData(_)))
    }

    /// Concatenated text of every text part, in order. Useful for logging and
    /// for matching requests in tests.
    #[must_use]
    pub fn prompt_text(&self) -> String {
        self.contents
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl GenerateResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_encodes_base64() {
        let part = InlineDataPart::from_bytes(b"leaf", "image/png");
        assert_eq!(part.data, "bGVhZg==");
        assert_eq!(part.mime_type, "image/png");
    }

    #[test]
    fn detects_inline_data_in_any_turn() {
        let mut request = GenerateRequest {
            contents: vec![Content::model("hello"), Content::user(vec![Part::text("hi")])],
            ..Default::default()
        };
        assert!(!request.has_inline_data());

        request.contents[1]
            .parts
            .insert(0, Part::inline_data("AAAA", "image/jpeg"));
        assert!(request.has_inline_data());
        assert_eq!(request.prompt_text(), "hello\nhi");
    }
}
