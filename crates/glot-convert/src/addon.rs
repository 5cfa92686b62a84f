//! Built-in post-processing addons.

use glot_core::{ArgValue, FormatAddon, Rgba};

/// Wrap the formatted text in a prefix and suffix.
#[derive(Debug, Clone)]
pub struct Surround {
    /// Text prepended to the formatted value.
    pub prefix: String,
    /// Text appended to the formatted value.
    pub suffix: String,
}

impl Surround {
    /// Create a surround addon.
    #[must_use]
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

impl FormatAddon for Surround {
    fn name(&self) -> &'static str {
        "surround"
    }

    fn apply(&self, text: String, _value: &ArgValue<'_>) -> String {
        format!("{}{}{}", self.prefix, text, self.suffix)
    }
}

/// Case transformation applied by [`CaseAddon`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCase {
    /// Uppercase the whole text.
    Upper,
    /// Lowercase the whole text.
    Lower,
}

/// Force the formatted text into one case.
#[derive(Debug, Clone, Copy)]
pub struct CaseAddon(pub TextCase);

impl FormatAddon for CaseAddon {
    fn name(&self) -> &'static str {
        "case"
    }

    fn apply(&self, text: String, _value: &ArgValue<'_>) -> String {
        match self.0 {
            TextCase::Upper => text.to_uppercase(),
            TextCase::Lower => text.to_lowercase(),
        }
    }
}

/// Wrap the formatted text in a plain-markup color span.
///
/// The tag is authored-grammar markup, so it survives dialect
/// transcoding like any hand-written color tag would.
#[derive(Debug, Clone, Copy)]
pub struct ColorAddon(pub Rgba);

impl FormatAddon for ColorAddon {
    fn name(&self) -> &'static str {
        "color"
    }

    fn apply(&self, text: String, _value: &ArgValue<'_>) -> String {
        format!("[#{}]{}[/]", self.0.to_hex(), text)
    }
}
