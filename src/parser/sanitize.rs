//! Text cleanup for extracted article content
//!
//! This module provides functions to clean and normalize text extracted from
//! article pages: invisible characters, HTML entities, whitespace, English
//! month names, and author bylines.

use regex::{Captures, Regex};
use std::sync::LazyLock;

// Pre-compiled regex patterns for performance
static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{A0}]+").unwrap());

static MULTI_NEWLINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static MONTH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\b")
        .unwrap()
});

static MONTH_ABBR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)\b\.?").unwrap()
});

/// English to Indonesian month names
pub const MONTH_TRANSLATION: [(&str, &str); 12] = [
    ("January", "Januari"),
    ("February", "Februari"),
    ("March", "Maret"),
    ("April", "April"),
    ("May", "Mei"),
    ("June", "Juni"),
    ("July", "Juli"),
    ("August", "Agustus"),
    ("September", "September"),
    ("October", "Oktober"),
    ("November", "November"),
    ("December", "Desember"),
];

const MONTH_ABBR_TRANSLATION: [(&str, &str); 12] = [
    ("Jan", "Jan"),
    ("Feb", "Feb"),
    ("Mar", "Mar"),
    ("Apr", "Apr"),
    ("Jun", "Jun"),
    ("Jul", "Jul"),
    ("Aug", "Agu"),
    ("Sept", "Sep"),
    ("Sep", "Sep"),
    ("Oct", "Okt"),
    ("Nov", "Nov"),
    ("Dec", "Des"),
];

/// Sanitize extracted text content
///
/// This function applies multiple cleaning steps:
/// 1. Remove zero-width characters
/// 2. Remove control characters (except newline/tab)
/// 3. Decode HTML entities
/// 4. Normalize whitespace
/// 5. Trim each line
/// 6. Remove excessive blank lines
///
/// # Examples
///
/// ```
/// use cekfakta::parser::sanitize::sanitize_text;
///
/// let dirty = "Hoaks\u{200B} beredar  \n\n\n\n&quot;Faktanya&quot;";
/// assert_eq!(sanitize_text(dirty), "Hoaks beredar\n\n\"Faktanya\"");
/// ```
pub fn sanitize_text(text: &str) -> String {
    let mut result = remove_zero_width(text);

    result = remove_control_chars(&result);
    result = decode_html_entities(&result);
    result = collapse_spaces(&result);
    result = trim_lines(&result);
    result = collapse_newlines(&result);

    result.trim().to_string()
}

/// Remove zero-width spaces and similar invisible characters
pub fn remove_zero_width(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(*c,
                '\u{200B}'..='\u{200F}' |
                '\u{202A}'..='\u{202E}' |
                '\u{2060}' |
                '\u{FEFF}'
            )
        })
        .collect()
}

/// Remove control characters except newline and tab
pub fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Decode HTML entities, named and numeric
///
/// # Examples
///
/// ```
/// use cekfakta::parser::sanitize::decode_html_entities;
///
/// assert_eq!(decode_html_entities("Hoaks &amp; Fakta &#8220;asli&#8221;"), "Hoaks & Fakta “asli”");
/// ```
pub fn decode_html_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Normalize runs of spaces, tabs and non-breaking spaces to one space
///
/// Newlines are kept.
pub fn collapse_spaces(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").to_string()
}

/// Trim whitespace from each line
pub fn trim_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse three or more newlines to a single blank line
pub fn collapse_newlines(text: &str) -> String {
    MULTI_NEWLINE_REGEX.replace_all(text, "\n\n").to_string()
}

/// Remove all tags from a markup fragment
pub fn strip_html_tags(html: &str) -> String {
    TAG_REGEX.replace_all(html, " ").to_string()
}

/// Turn an embedded article body into plain text
///
/// Entities are decoded and stray tags are removed.
///
/// # Examples
///
/// ```
/// use cekfakta::parser::sanitize::payload_to_text;
///
/// let body = "&lt;p&gt;KOMPAS.com - Beredar video&lt;/p&gt;&lt;p&gt;Faktanya&lt;/p&gt;";
/// assert_eq!(payload_to_text(body), "KOMPAS.com - Beredar video\nFaktanya");
/// ```
pub fn payload_to_text(payload: &str) -> String {
    let decoded = decode_html_entities(payload);
    let with_breaks = decoded
        .replace("</p>", "\n")
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n");
    sanitize_text(&strip_html_tags(&with_breaks))
}

/// Translate English month names to Indonesian
///
/// Full names match case-insensitively. Common abbreviations (`Aug`, `Oct`,
/// `Dec`, ...) match only in their capitalized form.
///
/// # Examples
///
/// ```
/// use cekfakta::parser::sanitize::translate_months;
///
/// assert_eq!(translate_months("August 5, 2025"), "Agustus 5, 2025");
/// assert_eq!(translate_months("12 Oct 2024"), "12 Okt 2024");
/// assert_eq!(translate_months("5 Agustus 2025"), "5 Agustus 2025");
/// ```
pub fn translate_months(text: &str) -> String {
    let full = MONTH_REGEX.replace_all(text, |caps: &Captures| {
        let word = &caps[1];
        MONTH_TRANSLATION
            .iter()
            .find(|(en, _)| en.eq_ignore_ascii_case(word))
            .map_or_else(|| word.to_string(), |(_, id)| (*id).to_string())
    });

    MONTH_ABBR_REGEX
        .replace_all(&full, |caps: &Captures| {
            let word = &caps[1];
            MONTH_ABBR_TRANSLATION
                .iter()
                .find(|(en, _)| *en == word)
                .map_or_else(|| caps[0].to_string(), |(_, id)| (*id).to_string())
        })
        .into_owned()
}

/// Trim a byline and drop trailing separators such as `,` or `-`
///
/// # Examples
///
/// ```
/// use cekfakta::parser::sanitize::clean_author;
///
/// assert_eq!(clean_author("  Luqman Sulistiyawan, "), "Luqman Sulistiyawan");
/// assert_eq!(clean_author("Tim Cek Fakta -"), "Tim Cek Fakta");
/// ```
pub fn clean_author(raw: &str) -> String {
    let collapsed = crate::utils::normalize_whitespace(raw);
    collapsed
        .trim_end_matches(|c: char| matches!(c, ',' | ';' | '.' | '-' | '|' | ':') || c.is_whitespace())
        .trim_start_matches(|c: char| matches!(c, ',' | ';' | '-' | '|' | ':') || c.is_whitespace())
        .to_string()
}

/// Literal placeholder some layouts put between paragraphs
pub fn is_advertisement(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("advertisement")
}

/// Check if text contains meaningful content
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}
