//! Built-in converters.

use std::any::TypeId;

use glot_core::{ArgValue, ValueFormatParams};

use crate::registry::{ConverterScope, ValueConverter};

/// The default fallback converter: basic text representation.
///
/// Honors a small format-directive vocabulary when the argument declares
/// one: `x`/`X`/`b` for integers, `.N` precision for floats. Everything
/// else renders through the value's `Display` capability; values without
/// one render as their bracketed type name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayConverter;

impl ValueConverter for DisplayConverter {
    fn can_convert(&self, _value_type: TypeId) -> bool {
        true
    }

    fn format(&self, value: ArgValue<'_>, params: &ValueFormatParams<'_>) -> String {
        if let Some(directive) = params.format_str()
            && let Some(text) = directed(value, directive)
        {
            return text;
        }
        if let Some(display) = value.as_display() {
            return display.to_string();
        }
        if let Some(variant) = value.as_variant() {
            return humanize_variant(variant.variant_name());
        }
        format!("<{}>", value.type_name())
    }
}

/// Apply a format directive, when the value's type supports it.
fn directed(value: ArgValue<'_>, directive: &str) -> Option<String> {
    macro_rules! int_directed {
        ($($ty:ty),*) => {
            $(
                if let Some(v) = value.downcast_ref::<$ty>() {
                    return match directive {
                        "x" => Some(format!("{v:x}")),
                        "X" => Some(format!("{v:X}")),
                        "b" => Some(format!("{v:b}")),
                        _ => None,
                    };
                }
            )*
        };
    }
    int_directed!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

    let precision = directive.strip_prefix('.')?.parse::<usize>().ok()?;
    if let Some(v) = value.downcast_ref::<f64>() {
        return Some(format!("{v:.precision$}"));
    }
    if let Some(v) = value.downcast_ref::<f32>() {
        return Some(format!("{v:.precision$}"));
    }
    None
}

/// The default enum converter: the case's humanized variant name.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantNameConverter;

impl ValueConverter for VariantNameConverter {
    fn scope(&self) -> ConverterScope {
        ConverterScope::EnumOnly
    }

    fn can_convert(&self, _value_type: TypeId) -> bool {
        true
    }

    fn format(&self, value: ArgValue<'_>, _params: &ValueFormatParams<'_>) -> String {
        match value.as_variant() {
            Some(variant) => humanize_variant(variant.variant_name()),
            None => format!("<{}>", value.type_name()),
        }
    }
}

/// Turn a `CamelCase` or `snake_case` identifier into spaced words:
/// `NotFound` becomes `Not Found`, `HTTPError` becomes `HTTP Error`.
#[must_use]
pub fn humanize_variant(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' {
            out.push(' ');
            continue;
        }
        if i > 0 && ch.is_uppercase() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                out.push(' ');
            }
        }
        out.push(ch);
    }
    out
}
