//! Section Parser
//!
//! Extracts the six bracketed sections (`[사주요약]`, `[건강주의]`, ...) from
//! generated text. This is a lenient extractor: a missing or malformed header
//! leaves that section empty and never fails the parse.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The six fixed sections the generator is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionLabel {
    Summary,
    Health,
    Foods,
    Avoid,
    ProductKeywords,
    Promo,
}

impl SectionLabel {
    /// All labels, in prompt order.
    pub const ALL: [SectionLabel; 6] = [
        SectionLabel::Summary,
        SectionLabel::Health,
        SectionLabel::Foods,
        SectionLabel::Avoid,
        SectionLabel::ProductKeywords,
        SectionLabel::Promo,
    ];

    /// Header text as it appears between the brackets.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Summary => "사주요약",
            Self::Health => "건강주의",
            Self::Foods => "추천음식",
            Self::Avoid => "피해야할음식",
            Self::ProductKeywords => "상품추천키워드",
            Self::Promo => "홍보문구",
        }
    }

    /// Position in [`SectionLabel::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The bracketed header, e.g. `[사주요약]`.
    pub fn header(&self) -> String {
        format!("[{}]", self.title())
    }
}

/// Content of the six sections. Any of them may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSections {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub health: String,
    #[serde(default)]
    pub foods: String,
    #[serde(default)]
    pub avoid: String,
    #[serde(default)]
    pub product_keywords: String,
    #[serde(default)]
    pub promo: String,
}

impl ParsedSections {
    pub fn get(&self, label: SectionLabel) -> &str {
        match label {
            SectionLabel::Summary => &self.summary,
            SectionLabel::Health => &self.health,
            SectionLabel::Foods => &self.foods,
            SectionLabel::Avoid => &self.avoid,
            SectionLabel::ProductKeywords => &self.product_keywords,
            SectionLabel::Promo => &self.promo,
        }
    }

    pub fn set(&mut self, label: SectionLabel, value: String) {
        let slot = match label {
            SectionLabel::Summary => &mut self.summary,
            SectionLabel::Health => &mut self.health,
            SectionLabel::Foods => &mut self.foods,
            SectionLabel::Avoid => &mut self.avoid,
            SectionLabel::ProductKeywords => &mut self.product_keywords,
            SectionLabel::Promo => &mut self.promo,
        };
        *slot = value;
    }

    /// Number of sections with non-empty content.
    pub fn found_count(&self) -> usize {
        SectionLabel::ALL
            .iter()
            .filter(|label| !self.get(**label).is_empty())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.found_count() == 0
    }
}

/// Any bracketed header; the end of a section is the next one of these.
fn next_header_regex() -> &'static Regex {
    static NEXT_HEADER: OnceLock<Regex> = OnceLock::new();
    NEXT_HEADER.get_or_init(|| Regex::new(r"\[[^\]]+\]").expect("static header pattern"))
}

/// Case-insensitive matcher for one label's header, compiled once per label.
fn label_header_regex(label: SectionLabel) -> &'static Regex {
    static LABEL_HEADERS: OnceLock<[Regex; 6]> = OnceLock::new();
    let headers = LABEL_HEADERS.get_or_init(|| {
        SectionLabel::ALL.map(|label| {
            Regex::new(&format!(r"(?i)\[{}\]", regex::escape(label.title())))
                .expect("static header pattern")
        })
    });
    &headers[label.index()]
}

/// Parse generated text into its six sections.
pub fn parse_sections(text: &str) -> ParsedSections {
    tracing::debug!(chars = text.chars().count(), "parsing generated sections");

    let mut sections = ParsedSections::default();
    for label in SectionLabel::ALL {
        let value = extract_section(text, label);
        if value.is_empty() {
            tracing::debug!(label = label.title(), "section not found");
        } else {
            tracing::debug!(
                label = label.title(),
                preview = %preview(&value, 50),
                "section found"
            );
        }
        sections.set(label, value);
    }
    sections
}

/// Content between `label`'s header and the next bracketed header (or end
/// of text), trimmed. Empty when the header is absent.
pub fn extract_section(text: &str, label: SectionLabel) -> String {
    let Some(found) = label_header_regex(label).find(text) else {
        return String::new();
    };

    let rest = &text[found.end()..];
    let end = next_header_regex()
        .find(rest)
        .map(|next| next.start())
        .unwrap_or(rest.len());

    rest[..end].trim().to_string()
}

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
