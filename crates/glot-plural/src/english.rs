//! The preinstalled English pluralization handler.

use unicode_segmentation::UnicodeSegmentation;

use crate::engine::Pluralizer;

/// English pluralizer.
///
/// Strips a leading `"a "`/`"an "` article before pluralizing; a bare
/// `"a"`/`"an"` span yields the empty string, and the engine collapses
/// the adjacent space. Multi-word spans pluralize every constituent word.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishPluralizer;

impl Pluralizer for EnglishPluralizer {
    fn pluralize(&self, span: &str, _culture: &str) -> String {
        let stripped = if span.eq_ignore_ascii_case("a") || span.eq_ignore_ascii_case("an") {
            return String::new();
        } else if let Some(rest) = strip_article(span) {
            rest
        } else {
            span
        };

        let mut out = String::with_capacity(stripped.len() + 4);
        for segment in stripped.split_word_bounds() {
            if segment.chars().next().is_some_and(char::is_alphabetic) {
                out.push_str(&pluralize_word(segment));
            } else {
                out.push_str(segment);
            }
        }
        out
    }
}

fn strip_article(span: &str) -> Option<&str> {
    for article in ["a ", "an ", "A ", "An "] {
        if let Some(rest) = span.strip_prefix(article) {
            return Some(rest);
        }
    }
    None
}

/// Pluralize one English word.
fn pluralize_word(word: &str) -> String {
    if let Some(irregular) = irregular(word) {
        return irregular;
    }

    let lower = word.to_lowercase();
    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{word}es");
    }
    if lower.ends_with('y') && !ends_with_vowel_y(&lower) {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    if let Some(stem) = word.strip_suffix("fe") {
        return format!("{stem}ves");
    }
    if let Some(stem) = word.strip_suffix('f') {
        return format!("{stem}ves");
    }
    format!("{word}s")
}

/// `y` preceded by a vowel takes a plain `s` (day -> days).
fn ends_with_vowel_y(lower: &str) -> bool {
    let mut chars = lower.chars().rev();
    let _y = chars.next();
    matches!(chars.next(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}

fn irregular(word: &str) -> Option<String> {
    let table: &[(&str, &str)] = &[
        ("man", "men"),
        ("woman", "women"),
        ("child", "children"),
        ("person", "people"),
        ("mouse", "mice"),
        ("foot", "feet"),
        ("tooth", "teeth"),
        ("goose", "geese"),
    ];
    let lower = word.to_lowercase();
    let plural = table.iter().find(|(s, _)| *s == lower).map(|(_, p)| *p)?;
    let capitalized = word.chars().next().is_some_and(char::is_uppercase);
    if capitalized {
        let mut chars = plural.chars();
        let first = chars.next()?;
        Some(first.to_uppercase().chain(chars).collect())
    } else {
        Some(plural.to_string())
    }
}
