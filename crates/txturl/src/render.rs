//! HTML render adapter: one `<div>` per line carrying its style class.

use txtcore::StyleTag;

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Renders lines with their styles. Empty lines become `<br>` so they keep
/// their height. `styles` shorter than `lines` falls back to paragraph.
pub fn to_html<S: AsRef<str>>(lines: &[S], styles: &[StyleTag]) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let class = styles
                .get(i)
                .copied()
                .unwrap_or(StyleTag::Paragraph)
                .css_class();
            let line = line.as_ref();
            let body = if line.is_empty() {
                "<br>".to_string()
            } else {
                escape_html(line)
            };
            format!("<div class=\"{class}\">{body}</div>")
        })
        .collect()
}

/// Classifies and renders in one step.
pub fn document_to_html<S: AsRef<str>>(lines: &[S]) -> String {
    to_html(lines, &txtcore::classify(lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_html("\"quotes\" stay"), "\"quotes\" stay");
    }

    #[test]
    fn test_document_to_html() {
        let html = document_to_html(&["# Hi", "", "<script>", "```", "x", "```"]);
        insta::assert_snapshot!(html.replace("</div>", "</div>\n").trim_end(), @r#"
        <div class="md-h1"># Hi</div>
        <div class="md-p"><br></div>
        <div class="md-p">&lt;script&gt;</div>
        <div class="md-code">```</div>
        <div class="md-code">x</div>
        <div class="md-code">```</div>
        "#);
    }

    #[test]
    fn test_missing_styles_default_to_paragraph() {
        assert_eq!(
            to_html(&["a", "b"], &[StyleTag::Quote]),
            "<div class=\"md-quote\">a</div><div class=\"md-p\">b</div>"
        );
    }
}
