//! Rich text and inline-level types.

use serde::{Deserialize, Serialize};

/// An ordered sequence of annotated text runs and inline mentions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<InlineContent>);

impl RichText {
    /// Create an empty rich text value.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create rich text holding a single unstyled run, or nothing for empty text.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut rt = Self::new();
        if !text.is_empty() {
            rt.push_text(text);
        }
        rt
    }

    /// Add plain text.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.0.push(InlineContent::Text(TextRun::new(text)));
    }

    /// Add a styled text run.
    pub fn push_run(&mut self, run: TextRun) {
        self.0.push(InlineContent::Text(run));
    }

    /// Add an inline mention or equation.
    pub fn push_mention(&mut self, mention: Mention) {
        self.0.push(InlineContent::Mention(mention));
    }

    /// Builder-style variant of [`RichText::push_run`].
    pub fn with_run(mut self, run: TextRun) -> Self {
        self.push_run(run);
        self
    }

    /// Builder-style variant of [`RichText::push_mention`].
    pub fn with_mention(mut self, mention: Mention) -> Self {
        self.push_mention(mention);
        self
    }

    /// Spans in order.
    pub fn spans(&self) -> &[InlineContent] {
        &self.0
    }

    /// Get the plain text content, with mentions rendered as their display text.
    pub fn plain_text(&self) -> String {
        self.0
            .iter()
            .map(|c| match c {
                InlineContent::Text(run) => run.text.clone(),
                InlineContent::Mention(m) => m.plain_text(),
            })
            .collect()
    }

    /// Check if there is no content at all.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|c| match c {
            InlineContent::Text(run) => run.text.is_empty(),
            InlineContent::Mention(_) => false,
        })
    }

    /// Merge adjacent runs that share style and link, and drop empty runs.
    ///
    /// Two rich text values are span-equivalent when their normalized forms are equal.
    pub fn normalized(&self) -> RichText {
        let mut out: Vec<InlineContent> = Vec::with_capacity(self.0.len());
        for item in &self.0 {
            match item {
                InlineContent::Text(run) if run.text.is_empty() => {}
                InlineContent::Text(run) => {
                    if let Some(InlineContent::Text(prev)) = out.last_mut() {
                        if prev.style == run.style && prev.link == run.link {
                            prev.text.push_str(&run.text);
                            continue;
                        }
                    }
                    out.push(item.clone());
                }
                InlineContent::Mention(_) => out.push(item.clone()),
            }
        }
        RichText(out)
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        RichText::plain(text)
    }
}

impl From<String> for RichText {
    fn from(text: String) -> Self {
        RichText::plain(text)
    }
}

impl From<Vec<InlineContent>> for RichText {
    fn from(spans: Vec<InlineContent>) -> Self {
        RichText(spans)
    }
}

/// Inline content within rich text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineContent {
    /// A text run with annotations
    Text(TextRun),

    /// A mention or equation; never carries annotations
    Mention(Mention),
}

/// A run of text with consistent annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text annotations
    pub style: TextStyle,

    /// Link target, if the run is a link
    pub link: Option<String>,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(text).with_style(TextStyle {
            bold: true,
            ..Default::default()
        })
    }

    /// Create an italic text run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self::new(text).with_style(TextStyle {
            italic: true,
            ..Default::default()
        })
    }

    /// Create an inline code run.
    pub fn code(text: impl Into<String>) -> Self {
        Self::new(text).with_style(TextStyle {
            code: true,
            ..Default::default()
        })
    }

    /// Set the style and return self.
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the link and return self.
    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Text annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Strikethrough text
    pub strikethrough: bool,

    /// Underlined text
    pub underline: bool,

    /// Inline code
    pub code: bool,

    /// Annotation colour token (e.g. `red`, `blue_background`); `None` is the default colour
    pub color: Option<String>,
}

impl TextStyle {
    /// Check if any annotation is applied.
    pub fn has_styling(&self) -> bool {
        self.bold
            || self.italic
            || self.strikethrough
            || self.underline
            || self.code
            || self.color.is_some()
    }
}

/// Inline mentions and equations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mention", rename_all = "snake_case")]
pub enum Mention {
    /// A user mention
    User {
        /// User id
        id: String,
        /// Display name, when known
        name: Option<String>,
    },

    /// A page mention
    Page {
        /// Page id
        id: String,
    },

    /// A database mention
    Database {
        /// Database id
        id: String,
    },

    /// A date mention
    Date(DateMention),

    /// An inline equation
    Equation {
        /// The expression source
        expression: String,
    },
}

impl Mention {
    /// Display text for the mention.
    pub fn plain_text(&self) -> String {
        match self {
            Mention::User { name, id } => format!("@{}", name.as_deref().unwrap_or(id)),
            Mention::Page { id } | Mention::Database { id } => id.clone(),
            Mention::Date(date) => match &date.end {
                Some(end) => format!("{} → {}", date.start, end),
                None => date.start.clone(),
            },
            Mention::Equation { expression } => expression.clone(),
        }
    }
}

/// A date mention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateMention {
    /// Start date (ISO 8601)
    pub start: String,

    /// End date (ISO 8601)
    pub end: Option<String>,

    /// IANA time zone name
    pub timezone: Option<String>,
}

impl DateMention {
    /// Create a single-day date mention.
    pub fn on(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            ..Default::default()
        }
    }
}
