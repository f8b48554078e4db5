//! Post-processing and the structural-completeness heuristic for generated pages.

use crate::errors::GenError;

/// Strip surrounding whitespace, a markdown code fence around the document
/// (```` ```html ... ``` ````, possibly after a line of prose), and anything
/// the model wrote after the last `</html>`.
pub fn clean(raw: &str) -> String {
    let trimmed = raw.trim();
    let body = unfence(trimmed).unwrap_or(trimmed);
    cut_after_close(body).trim().to_string()
}

/// Body of the first fenced block, or `None` when the text is already a bare
/// document or has no fence.
fn unfence(text: &str) -> Option<&str> {
    if text.starts_with('<') {
        return None;
    }
    let start = text.find("```")?;
    let rest = &text[start + 3..];
    // Drop the info string ("html", "HTML", ...) on the opening fence line.
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest,
    };
    // Unterminated fence: keep what is there.
    Some(match body.find("\n```") {
        Some(end) => &body[..end],
        None => body.trim_end().strip_suffix("```").unwrap_or(body),
    })
}

fn cut_after_close(text: &str) -> &str {
    match closing_tag_end(text) {
        Some(end) => &text[..end],
        None => text,
    }
}

/// Byte offset just past the last `</html>`, matched case-insensitively.
fn closing_tag_end(text: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets stable.
    text.to_ascii_lowercase().rfind("</html>").map(|i| i + "</html>".len())
}

/// Check that `html` looks like a whole document: an opening `<!DOCTYPE html>`
/// or `<html`, a closing `</html>`, and at least `min_bytes` of content.
/// Trailing text after the closing tag is tolerated.
///
/// This is a proxy for "not truncated", not an HTML validator.
pub fn check_completeness(html: &str, min_bytes: usize) -> Result<(), GenError> {
    let lower = html.to_ascii_lowercase();
    if !(lower.starts_with("<!doctype html") || lower.contains("<html")) {
        return Err(GenError::Incomplete("missing opening <!DOCTYPE html> or <html> tag".into()));
    }
    if !lower.contains("</html>") {
        return Err(GenError::Incomplete("missing closing </html> tag".into()));
    }
    if html.len() < min_bytes {
        return Err(GenError::Incomplete(format!(
            "document is {} bytes, expected at least {min_bytes}",
            html.len()
        )));
    }
    Ok(())
}
