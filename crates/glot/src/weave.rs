//! Placeholder weaving: the arity>0 rendering pass.
//!
//! Runs after pluralization, so the text it scans no longer contains
//! marker tokens; whatever `{N:…}` directives remain are format strings
//! for the renderer. Escaped braces (`{{`, `}}`) collapse to literals.
//! A placeholder the renderer declines (unsupplied index) stays in the
//! output verbatim.

/// Replace `{N}` / `{N:directive}` tokens left to right.
///
/// `render` receives the argument index and the optional directive; a
/// `None` return leaves the token intact.
pub(crate) fn weave(
    text: &str,
    mut render: impl FnMut(usize, Option<&str>) -> Option<String>,
) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];
        if rest.starts_with("{{") {
            out.push('{');
            i += 2;
            continue;
        }
        if rest.starts_with("}}") {
            out.push('}');
            i += 2;
            continue;
        }
        if let Some((token_len, index, directive)) = placeholder_at(rest) {
            match render(index, directive) {
                Some(rendered) => out.push_str(&rendered),
                None => out.push_str(&rest[..token_len]),
            }
            i += token_len;
            continue;
        }
        let Some(ch) = rest.chars().next() else {
            break;
        };
        out.push(ch);
        i += ch.len_utf8();
    }

    out
}

/// Parse a placeholder at the start of `rest`.
fn placeholder_at(rest: &str) -> Option<(usize, usize, Option<&str>)> {
    let body = rest.strip_prefix('{')?;
    let digits = body.len() - body.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let index: usize = body[..digits].parse().ok()?;
    match body[digits..].chars().next() {
        Some('}') => Some((digits + 2, index, None)),
        Some(':') => {
            let directive = &body[digits + 1..];
            let end = directive.find('}')?;
            if directive[..end].contains('{') {
                return None;
            }
            Some((digits + 1 + end + 2, index, Some(&directive[..end])))
        }
        _ => None,
    }
}
