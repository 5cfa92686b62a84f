//! Color markup and its dialect transcoders.
//!
//! Authored text carries color spans in the plain markup grammar:
//! `[#rrggbb]…[/]` (or `[#rrggbbaa]`). A [`MarkupDialect`] rewrites those
//! tags into one rendering target — the rich-text dialect
//! (`<color=#rrggbb>…</color>`) or terminal SGR escapes — and knows how to
//! recognize its own tags again when the engine looks for a leading color
//! wrapper. Everything that is not a color tag passes through verbatim,
//! placeholders and pluralization markers included.
//!
//! Tag expansion changes byte positions between dialects, which is why
//! pluralization marker lists are extracted per representation *after*
//! transcoding.

use std::ops::Range;

use crate::color::Rgba;

/// A leading color wrapper: the color and the byte range of the inner
/// (unwrapped) content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorWrapper {
    /// Byte range of the content between the open and close tags.
    pub inner: Range<usize>,
    /// The wrapper's color.
    pub color: Rgba,
}

/// One rendering target's tag grammar.
pub trait MarkupDialect: Send + Sync {
    /// Rewrite plain color tags into this dialect. Non-tag text is
    /// copied verbatim.
    fn transcode(&self, plain: &str) -> String;

    /// Locate a leading color wrapper in *this dialect's* text: an open
    /// tag at offset zero whose matching close tag ends the text.
    fn leading_wrapper(&self, text: &str) -> Option<ColorWrapper>;
}

/// A color tag recognized while scanning dialect text.
enum Tag {
    Open(Rgba),
    Close,
}

/// Shared wrapper detection: walk the text with a dialect-specific tag
/// parser, tracking nesting depth of color tags.
fn scan_wrapper(text: &str, tag_at: impl Fn(&str, usize) -> Option<(usize, Tag)>) -> Option<ColorWrapper> {
    let (first_len, color) = match tag_at(text, 0)? {
        (len, Tag::Open(color)) => (len, color),
        _ => return None,
    };
    let mut depth = 1_usize;
    let mut i = first_len;
    while i < text.len() {
        if let Some((len, tag)) = tag_at(text, i) {
            match tag {
                Tag::Open(_) => depth += 1,
                Tag::Close => {
                    depth -= 1;
                    if depth == 0 {
                        // The wrapper only counts when it closes the text.
                        if i + len == text.len() {
                            return Some(ColorWrapper {
                                inner: first_len..i,
                                color,
                            });
                        }
                        return None;
                    }
                }
            }
            i += len;
        } else {
            let Some(ch) = text[i..].chars().next() else {
                break;
            };
            i += ch.len_utf8();
        }
    }
    None
}

/// Shared transcoding walk: copy text, rewriting plain color tags through
/// the given emitters.
fn transcode_plain(
    plain: &str,
    mut open: impl FnMut(&mut String, Rgba),
    mut close: impl FnMut(&mut String),
) -> String {
    let mut out = String::with_capacity(plain.len() + 16);
    let mut i = 0;
    while i < plain.len() {
        if let Some((len, Tag::Open(color))) = plain_tag_at(plain, i) {
            open(&mut out, color);
            i += len;
        } else if plain[i..].starts_with(PLAIN_CLOSE) {
            close(&mut out);
            i += PLAIN_CLOSE.len();
        } else {
            let Some(ch) = plain[i..].chars().next() else {
                break;
            };
            out.push(ch);
            i += ch.len_utf8();
        }
    }
    out
}

const PLAIN_CLOSE: &str = "[/]";

/// Parse a plain color tag at byte offset `i`.
fn plain_tag_at(text: &str, i: usize) -> Option<(usize, Tag)> {
    let rest = &text[i..];
    if rest.starts_with(PLAIN_CLOSE) {
        return Some((PLAIN_CLOSE.len(), Tag::Close));
    }
    let body = rest.strip_prefix("[#")?;
    let end = body.find(']')?;
    let color = Rgba::parse_hex(&body[..end])?;
    Some((2 + end + 1, Tag::Open(color)))
}

/// The identity dialect: authored plain markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainDialect;

impl MarkupDialect for PlainDialect {
    fn transcode(&self, plain: &str) -> String {
        plain.to_string()
    }

    fn leading_wrapper(&self, text: &str) -> Option<ColorWrapper> {
        scan_wrapper(text, plain_tag_at)
    }
}

/// The alternate rich-text dialect: `<color=#rrggbb>…</color>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RichTextDialect;

const RICH_OPEN_PREFIX: &str = "<color=#";
const RICH_CLOSE: &str = "</color>";

fn rich_tag_at(text: &str, i: usize) -> Option<(usize, Tag)> {
    let rest = &text[i..];
    if rest.starts_with(RICH_CLOSE) {
        return Some((RICH_CLOSE.len(), Tag::Close));
    }
    let body = rest.strip_prefix(RICH_OPEN_PREFIX)?;
    let end = body.find('>')?;
    let color = Rgba::parse_hex(&body[..end])?;
    Some((RICH_OPEN_PREFIX.len() + end + 1, Tag::Open(color)))
}

impl MarkupDialect for RichTextDialect {
    fn transcode(&self, plain: &str) -> String {
        transcode_plain(
            plain,
            |out, color| {
                out.push_str(RICH_OPEN_PREFIX);
                out.push_str(&color.to_hex());
                out.push('>');
            },
            |out| out.push_str(RICH_CLOSE),
        )
    }

    fn leading_wrapper(&self, text: &str) -> Option<ColorWrapper> {
        scan_wrapper(text, rich_tag_at)
    }
}

/// The terminal dialect: SGR truecolor foreground escapes. Alpha is
/// dropped; the close tag resets the foreground only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalDialect;

const TERM_OPEN_PREFIX: &str = "\u{1b}[38;2;";
const TERM_CLOSE: &str = "\u{1b}[39m";

fn term_tag_at(text: &str, i: usize) -> Option<(usize, Tag)> {
    let rest = &text[i..];
    if rest.starts_with(TERM_CLOSE) {
        return Some((TERM_CLOSE.len(), Tag::Close));
    }
    let body = rest.strip_prefix(TERM_OPEN_PREFIX)?;
    let end = body.find('m')?;
    let mut channels = body[..end].splitn(3, ';');
    let r = channels.next()?.parse::<u8>().ok()?;
    let g = channels.next()?.parse::<u8>().ok()?;
    let b = channels.next()?.parse::<u8>().ok()?;
    Some((TERM_OPEN_PREFIX.len() + end + 1, Tag::Open(Rgba::rgb(r, g, b))))
}

impl MarkupDialect for TerminalDialect {
    fn transcode(&self, plain: &str) -> String {
        transcode_plain(
            plain,
            |out, color| {
                out.push_str(TERM_OPEN_PREFIX);
                out.push_str(&format!("{};{};{}m", color.r, color.g, color.b));
            },
            |out| out.push_str(TERM_CLOSE),
        )
    }

    fn leading_wrapper(&self, text: &str) -> Option<ColorWrapper> {
        scan_wrapper(text, term_tag_at)
    }
}
