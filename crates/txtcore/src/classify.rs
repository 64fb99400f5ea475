use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Structural style of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleTag {
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    Quote,
    UnorderedItem,
    OrderedItem,
    Rule,
    Code,
    Paragraph,
}

impl StyleTag {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleTag::Heading1 => "heading1",
            StyleTag::Heading2 => "heading2",
            StyleTag::Heading3 => "heading3",
            StyleTag::Heading4 => "heading4",
            StyleTag::Heading5 => "heading5",
            StyleTag::Heading6 => "heading6",
            StyleTag::Quote => "quote",
            StyleTag::UnorderedItem => "unordered-item",
            StyleTag::OrderedItem => "ordered-item",
            StyleTag::Rule => "rule",
            StyleTag::Code => "code",
            StyleTag::Paragraph => "paragraph",
        }
    }

    /// CSS class used by the HTML render adapter.
    pub fn css_class(self) -> &'static str {
        match self {
            StyleTag::Heading1 => "md-h1",
            StyleTag::Heading2 => "md-h2",
            StyleTag::Heading3 => "md-h3",
            StyleTag::Heading4 => "md-h4",
            StyleTag::Heading5 => "md-h5",
            StyleTag::Heading6 => "md-h6",
            StyleTag::Quote => "md-quote",
            StyleTag::UnorderedItem => "md-li",
            StyleTag::OrderedItem => "md-oli",
            StyleTag::Rule => "md-hr",
            StyleTag::Code => "md-code",
            StyleTag::Paragraph => "md-p",
        }
    }
}

lazy_static! {
    static ref FENCE: Regex = Regex::new(r"^```").expect("Invalid FENCE regex pattern");
    // Checked in order, first match wins.
    static ref PREFIX_RULES: Vec<(Regex, StyleTag)> = [
        (r"^###### ", StyleTag::Heading6),
        (r"^##### ", StyleTag::Heading5),
        (r"^#### ", StyleTag::Heading4),
        (r"^### ", StyleTag::Heading3),
        (r"^## ", StyleTag::Heading2),
        (r"^# ", StyleTag::Heading1),
        (r"^> ", StyleTag::Quote),
        (r"^[-*] ", StyleTag::UnorderedItem),
        (r"^[0-9]+\. ", StyleTag::OrderedItem),
        (r"^-{3,}$", StyleTag::Rule),
    ]
    .into_iter()
    .map(|(pattern, tag)| {
        (
            Regex::new(pattern).expect("Invalid PREFIX_RULES regex pattern"),
            tag,
        )
    })
    .collect();
}

pub fn is_fence(line: &str) -> bool {
    FENCE.is_match(line)
}

/// Style of a line outside any code block.
pub fn prefix_style(line: &str) -> StyleTag {
    PREFIX_RULES
        .iter()
        .find(|(re, _)| re.is_match(line))
        .map(|(_, tag)| *tag)
        .unwrap_or(StyleTag::Paragraph)
}

/// Styles every line in order. Fence lines toggle code mode and are styled
/// as code themselves; the scan always starts outside a code block.
pub fn classify<S: AsRef<str>>(lines: &[S]) -> Vec<StyleTag> {
    let mut in_code = false;
    lines
        .iter()
        .map(|line| {
            let line = line.as_ref();
            if is_fence(line) {
                in_code = !in_code;
                StyleTag::Code
            } else if in_code {
                StyleTag::Code
            } else {
                prefix_style(line)
            }
        })
        .collect()
}

/// Holds the styles last handed to the renderer so a reclassification can
/// report only the lines whose style actually changed.
#[derive(Debug, Clone, Default)]
pub struct LineClassifier {
    styles: Vec<StyleTag>,
}

impl LineClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styles(&self) -> &[StyleTag] {
        &self.styles
    }

    /// Reclassifies all of `lines` and returns the indices whose style
    /// differs from the previous pass. New lines always count as changed.
    pub fn apply<S: AsRef<str>>(&mut self, lines: &[S]) -> Vec<usize> {
        let next = classify(lines);
        let changed: Vec<usize> = next
            .iter()
            .enumerate()
            .filter(|(i, tag)| self.styles.get(*i) != Some(*tag))
            .map(|(i, _)| i)
            .collect();
        self.styles = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings() {
        assert_eq!(prefix_style("# A"), StyleTag::Heading1);
        assert_eq!(prefix_style("### Title"), StyleTag::Heading3);
        assert_eq!(prefix_style("###### six"), StyleTag::Heading6);
        assert_eq!(prefix_style("####### seven"), StyleTag::Paragraph);
        assert_eq!(prefix_style("#nospace"), StyleTag::Paragraph);
    }

    #[test]
    fn test_block_prefixes() {
        assert_eq!(prefix_style("> quoted"), StyleTag::Quote);
        assert_eq!(prefix_style("- item"), StyleTag::UnorderedItem);
        assert_eq!(prefix_style("* item"), StyleTag::UnorderedItem);
        assert_eq!(prefix_style("12. item"), StyleTag::OrderedItem);
        assert_eq!(prefix_style("1.item"), StyleTag::Paragraph);
        assert_eq!(prefix_style("---"), StyleTag::Rule);
        assert_eq!(prefix_style("-----"), StyleTag::Rule);
        assert_eq!(prefix_style("--- x"), StyleTag::Paragraph);
        assert_eq!(prefix_style(""), StyleTag::Paragraph);
    }

    #[test]
    fn test_fences_toggle_code() {
        let styles = classify(&["```", "# not a heading", "", "```", "- item"]);
        assert_eq!(
            styles,
            [
                StyleTag::Code,
                StyleTag::Code,
                StyleTag::Code,
                StyleTag::Code,
                StyleTag::UnorderedItem,
            ]
        );
    }

    #[test]
    fn test_fence_with_language_and_unclosed_block() {
        let styles = classify(&["text", "````rust", "fn main() {}"]);
        assert_eq!(styles, [StyleTag::Paragraph, StyleTag::Code, StyleTag::Code]);
    }

    #[test]
    fn test_classifier_reports_changes_only() {
        let mut classifier = LineClassifier::new();
        assert_eq!(classifier.apply(&["# Hi", "world"]), [0, 1]);
        assert_eq!(classifier.apply(&["# Hi", "world"]), Vec::<usize>::new());
        assert_eq!(classifier.apply(&["```", "world", "x"]), [0, 1, 2]);
        assert_eq!(classifier.apply(&["```", "world", "```"]), Vec::<usize>::new());
        assert_eq!(classifier.styles().len(), 3);
    }

    #[test]
    fn test_style_names() {
        assert_eq!(StyleTag::UnorderedItem.as_str(), "unordered-item");
        assert_eq!(StyleTag::OrderedItem.css_class(), "md-oli");
        assert_eq!(StyleTag::Paragraph.css_class(), "md-p");
    }
}
