//! Pulls explicit color and font hints out of a free-text design request.
//!
//! Extraction is pattern based and pure. Anything not recognized is left as
//! `None` so the composer can fall back to its default guidance.

use regex::Regex;
use std::sync::LazyLock;

use crate::wire::Preferences;

/// Hue names recognized next to a theme/color keyword.
pub const HUES: &[&str] = &[
    "red", "orange", "yellow", "gold", "green", "lime", "emerald", "teal", "turquoise", "cyan",
    "blue", "navy", "indigo", "violet", "purple", "magenta", "pink", "coral", "maroon", "brown",
    "beige", "black", "white", "gray", "grey", "silver",
];

/// Font families recognized by name anywhere in the request.
pub const KNOWN_FONTS: &[&str] = &[
    "Playfair Display", "Source Sans Pro", "IBM Plex Sans", "Space Grotesk", "Josefin Sans",
    "Open Sans", "Work Sans", "Fira Sans", "Noto Sans", "DM Sans", "PT Sans",
    "Inter", "Roboto", "Lato", "Montserrat", "Poppins", "Raleway", "Nunito", "Merriweather",
    "Oswald", "Ubuntu", "Manrope", "Lora", "Quicksand", "Karla", "Mulish", "Barlow", "Archivo",
];

fn hue_group() -> String {
    HUES.join("|")
}

/// Color patterns in priority order; the first one that matches wins.
static COLOR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let hues = hue_group();
    [
        // "theme: blue", "color scheme : navy", "the color blue"
        format!(r"(?i)\b(?:themes?|colou?rs?|palettes?|schemes?)(?:\s*:\s*|\s+)({hues})\b"),
        // "blue themed", "green-colored", "teal palette"
        format!(r"(?i)\b({hues})[\s-]+(?:themed?|colou?r(?:s|ed)?|palettes?|schemes?)\b"),
        // "use red colors", "in black theme"
        format!(r"(?i)\b(?:use|with|in)\s+({hues})\s+(?:colou?rs?|themes?)\b"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("hue pattern is valid"))
    .collect()
});

static DARK_THEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdark[\s-]+(?:theme|mode)\b").expect("dark pattern is valid"));

static LIGHT_THEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\blight[\s-]+(?:theme|mode)\b").expect("light pattern is valid"));

/// Known family names, matched anywhere in the request.
static KNOWN_FONT: LazyLock<Regex> = LazyLock::new(|| {
    let known = KNOWN_FONTS
        .iter()
        .map(|f| f.split_whitespace().collect::<Vec<_>>().join(r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b({known})\b")).expect("font pattern is valid")
});

/// Fallback: a quoted capitalized name after font/typography/use/with.
static QUOTED_FONT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\b(?i:font(?:\s+family)?|typography|use|with)\s*:?\s*['"]([A-Z][A-Za-z0-9]*(?:\s+[A-Z][A-Za-z0-9]*)*)['"]"#,
    )
    .expect("quoted font pattern is valid")
});

pub fn extract(user_prompt: &str) -> Preferences {
    Preferences {
        colors: extract_colors(user_prompt),
        fonts: extract_fonts(user_prompt),
    }
}

fn extract_colors(text: &str) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    let hue = COLOR_PATTERNS
        .iter()
        .find_map(|re| re.captures(text).and_then(|c| c.get(1)))
        .map(|m| m.as_str().to_lowercase());
    if let Some(h) = hue {
        parts.push(h);
    }

    // Additive, independent of the hue match.
    if DARK_THEME.is_match(text) {
        parts.push("dark theme".to_string());
    }
    if LIGHT_THEME.is_match(text) {
        parts.push("light theme".to_string());
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn extract_fonts(text: &str) -> Option<String> {
    let raw = KNOWN_FONT
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .find(|m| !is_hyphenated(text, m.start(), m.end()))
        .or_else(|| QUOTED_FONT.captures(text).and_then(|c| c.get(1)))?
        .as_str();
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let canonical = KNOWN_FONTS
        .iter()
        .find(|f| f.eq_ignore_ascii_case(&normalized))
        .map(|f| f.to_string());
    Some(canonical.unwrap_or(normalized))
}

/// "inter-school", "lora-themed": a family name glued into a compound word.
fn is_hyphenated(text: &str, start: usize, end: usize) -> bool {
    let mut after = text[end..].chars();
    let glued_after = after.next() == Some('-') && after.next().is_some_and(char::is_alphabetic);
    let mut before = text[..start].chars().rev();
    let glued_before = before.next() == Some('-') && before.next().is_some_and(char::is_alphabetic);
    glued_after || glued_before
}
