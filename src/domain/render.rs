// Render results - structured content written to an output region

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    pub image_url: Option<String>,
    pub lines: Vec<String>,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image_url: None,
            lines: Vec::new(),
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderResult {
    /// Placeholder written the moment a dispatch starts
    Loading,
    /// Informational outcome that is not a failure ("No GIFs found")
    Message(String),
    /// Validation, transport or exhaustion failure
    Error(String),
    Text {
        heading: Option<String>,
        lines: Vec<String>,
    },
    Image {
        url: String,
        alt: String,
        heading: Option<String>,
        lines: Vec<String>,
    },
    Cards(Vec<Card>),
}

impl RenderResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// A single emphasised line, the most common shape
    pub fn headline(text: impl Into<String>) -> Self {
        Self::Text {
            heading: Some(text.into()),
            lines: Vec::new(),
        }
    }

    pub fn text(heading: Option<String>, lines: Vec<String>) -> Self {
        Self::Text { heading, lines }
    }

    pub fn image(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self::Image {
            url: url.into(),
            alt: alt.into(),
            heading: None,
            lines: Vec::new(),
        }
    }

    /// The piece worth saving from this result: the image URL for images,
    /// the visible text for text. Nothing for placeholders and failures.
    pub fn artifact(&self) -> Option<String> {
        match self {
            Self::Image { url, .. } => Some(url.clone()),
            Self::Text { heading, lines } => {
                let text = heading
                    .iter()
                    .chain(lines.iter())
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join("\n");
                (!text.is_empty()).then_some(text)
            }
            Self::Loading | Self::Message(_) | Self::Error(_) | Self::Cards(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_for_image_is_url() {
        let r = RenderResult::image("https://img/1.jpg", "Dog");
        assert_eq!(r.artifact().as_deref(), Some("https://img/1.jpg"));
    }

    #[test]
    fn test_artifact_for_text_joins_visible_lines() {
        let r = RenderResult::text(
            Some("Why?".to_string()),
            vec!["Because.".to_string()],
        );
        assert_eq!(r.artifact().as_deref(), Some("Why?\nBecause."));
    }

    #[test]
    fn test_no_artifact_for_loading_or_error() {
        assert_eq!(RenderResult::Loading.artifact(), None);
        assert_eq!(RenderResult::error("boom").artifact(), None);
        assert_eq!(RenderResult::text(None, Vec::new()).artifact(), None);
    }
}
