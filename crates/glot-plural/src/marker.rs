//! Pluralization marker extraction.
//!
//! Markers ride inside the authored placeholder grammar with the reserved
//! directive character `p`:
//!
//! - `item{0:p}` — binds the word immediately before the token.
//! - `{0:p:red apple}` — binds an explicit phrase, emitted into the text.
//! - `{0:!p}` / `{0:!p:…}` — inverted: plural when the argument *is* one.
//!
//! Extraction strips the tokens and returns clean text whose spans the
//! engine later substitutes. Offsets are local to the text the extraction
//! ran on, which is why every representation extracts its own list after
//! dialect transcoding.

/// One extracted marker: a text span bound to a positional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluralMarker {
    /// Referenced argument position.
    pub arg: usize,
    /// Byte offset of the bound span in the clean text.
    pub start: usize,
    /// Byte length of the bound span.
    pub len: usize,
    /// Pluralize when the argument *is* one instead of when it is not.
    pub inverted: bool,
}

/// A parsed marker token body.
struct MarkerToken<'a> {
    arg: usize,
    inverted: bool,
    phrase: Option<&'a str>,
    token_len: usize,
}

/// Try to parse a marker token at `text[i..]`, which must start with `{`.
fn marker_token_at(text: &str, i: usize) -> Option<MarkerToken<'_>> {
    let body = text[i..].strip_prefix('{')?;
    let digits = body.len() - body.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let arg: usize = body[..digits].parse().ok()?;
    let rest = body[digits..].strip_prefix(':')?;
    let (inverted, rest) = match rest.strip_prefix('!') {
        Some(r) => (true, r),
        None => (false, rest),
    };
    let rest = rest.strip_prefix('p')?;
    if let Some(r) = rest.strip_prefix('}') {
        return Some(MarkerToken {
            arg,
            inverted,
            phrase: None,
            token_len: body.len() - r.len() + 1,
        });
    }
    let rest = rest.strip_prefix(':')?;
    let end = rest.find('}')?;
    let phrase = &rest[..end];
    if phrase.contains('{') {
        return None;
    }
    Some(MarkerToken {
        arg,
        inverted,
        phrase: Some(phrase),
        token_len: body.len() - rest.len() + end + 1 + 1,
    })
}

/// Strip pluralization markers from `raw`, producing clean text and the
/// marker list. Placeholders (`{0}`, `{0:x}`) and escaped braces pass
/// through untouched.
#[must_use]
pub fn extract_markers(raw: &str) -> (String, Vec<PluralMarker>) {
    let mut clean = String::with_capacity(raw.len());
    let mut markers = Vec::new();
    let mut i = 0;

    while i < raw.len() {
        let rest = &raw[i..];
        if rest.starts_with("{{") || rest.starts_with("}}") {
            clean.push_str(&rest[..2]);
            i += 2;
            continue;
        }
        if rest.starts_with('{') {
            if let Some(token) = marker_token_at(raw, i) {
                match token.phrase {
                    Some(phrase) => {
                        let start = clean.len();
                        clean.push_str(phrase);
                        markers.push(PluralMarker {
                            arg: token.arg,
                            start,
                            len: phrase.len(),
                            inverted: token.inverted,
                        });
                    }
                    None => match trailing_word(&clean) {
                        Some(start) => markers.push(PluralMarker {
                            arg: token.arg,
                            start,
                            len: clean.len() - start,
                            inverted: token.inverted,
                        }),
                        None => {
                            tracing::debug!(
                                arg = token.arg,
                                "pluralization marker has no preceding word; dropped"
                            );
                        }
                    },
                }
                i += token.token_len;
                continue;
            }
        }
        let Some(ch) = rest.chars().next() else {
            break;
        };
        clean.push(ch);
        i += ch.len_utf8();
    }

    (clean, markers)
}

/// Byte offset where the trailing word of `clean` begins, if the text
/// ends in one. Placeholder tokens and whitespace terminate the scan.
fn trailing_word(clean: &str) -> Option<usize> {
    let mut start = clean.len();
    for (idx, ch) in clean.char_indices().rev() {
        if ch.is_whitespace() || ch == '}' || ch == '{' {
            break;
        }
        start = idx;
    }
    (start < clean.len()).then_some(start)
}

/// Highest argument index referenced by any placeholder or marker in
/// `raw`, if one is referenced at all.
///
/// Collections use this to reject stored rows that reference a position
/// beyond a translation's declared arity.
#[must_use]
pub fn max_argument_index(raw: &str) -> Option<usize> {
    let mut max = None;
    let mut i = 0;
    while i < raw.len() {
        let rest = &raw[i..];
        if rest.starts_with("{{") || rest.starts_with("}}") {
            i += 2;
            continue;
        }
        if let Some(body) = rest.strip_prefix('{') {
            let digits = body.len() - body.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            if digits > 0
                && let Ok(arg) = body[..digits].parse::<usize>()
                && matches!(body[digits..].chars().next(), Some('}' | ':'))
            {
                max = Some(max.map_or(arg, |m: usize| m.max(arg)));
            }
        }
        let Some(ch) = rest.chars().next() else {
            break;
        };
        i += ch.len_utf8();
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_the_preceding_word() {
        let (clean, markers) = extract_markers("You have {0} item{0:p}");
        assert_eq!(clean, "You have {0} item");
        assert_eq!(
            markers,
            vec![PluralMarker {
                arg: 0,
                start: 13,
                len: 4,
                inverted: false
            }]
        );
        assert_eq!(&clean[13..17], "item");
    }

    #[test]
    fn explicit_phrase_is_emitted_and_bound() {
        let (clean, markers) = extract_markers("{1:p:red apple} ready");
        assert_eq!(clean, "red apple ready");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].arg, 1);
        assert_eq!(&clean[markers[0].start..markers[0].start + markers[0].len], "red apple");
    }

    #[test]
    fn inverted_flag_round_trips() {
        let (_, markers) = extract_markers("loss{0:!p}");
        assert!(markers[0].inverted);
        let (_, markers) = extract_markers("{2:!p:thing}");
        assert!(markers[0].inverted);
    }

    #[test]
    fn plain_placeholders_pass_through() {
        let (clean, markers) = extract_markers("{0} of {1:x} and {{2}}");
        assert_eq!(clean, "{0} of {1:x} and {{2}}");
        assert!(markers.is_empty());
    }

    #[test]
    fn marker_without_preceding_word_is_dropped() {
        let (clean, markers) = extract_markers("{0:p} items");
        assert_eq!(clean, " items");
        assert!(markers.is_empty());
    }

    #[test]
    fn word_scan_stops_at_placeholder() {
        let (clean, markers) = extract_markers("{0}{0:p}");
        assert_eq!(clean, "{0}");
        assert!(markers.is_empty());
    }

    #[test]
    fn offsets_are_local_to_the_scanned_text() {
        let plain = "item{0:p}";
        let rich = "<color=#ff0000>item{0:p}</color>";
        let (_, plain_markers) = extract_markers(plain);
        let (_, rich_markers) = extract_markers(rich);
        assert_eq!(plain_markers[0].start, 0);
        assert_eq!(rich_markers[0].start, 15);
    }

    #[test]
    fn max_index_covers_placeholders_and_markers() {
        assert_eq!(max_argument_index("no tokens"), None);
        assert_eq!(max_argument_index("{0} and {3:p:x} and {1}"), Some(3));
        assert_eq!(max_argument_index("{{9}} literal"), None);
        assert_eq!(max_argument_index("{5:x}"), Some(5));
    }
}
