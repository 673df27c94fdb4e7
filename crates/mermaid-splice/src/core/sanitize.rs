//! Escaping for text embedded in HTML comments

/// Make `text` safe to embed inside `<!-- ... -->`
///
/// Every `--` becomes `- -` and every `>` becomes `&gt;`, so the text can
/// never close the comment early.
pub fn sanitize_comment(text: &str) -> String {
    text.replace("--", "- -").replace('>', "&gt;")
}

/// Format a single-line diagnostic comment
pub fn diagnostic_comment(prefix: &str, message: &str) -> String {
    format!("<!-- {}{} -->", prefix, sanitize_comment(message))
}
