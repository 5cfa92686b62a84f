//! Argument format metadata and render-target selection.

use std::fmt;
use std::sync::Arc;

use crate::argument::{ArgSource, ArgValue};
use crate::language::Language;

/// One rendering target for the same logical text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// Authored color markup (`[#rrggbb]…[/]`).
    #[default]
    Plain,
    /// The alternate rich-text dialect (`<color=#rrggbb>…</color>`).
    Rich,
    /// Terminal escape sequences (SGR truecolor).
    Terminal,
}

/// Which of the six precomputed forms of a value a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderFlags {
    /// Target representation.
    pub dialect: Dialect,
    /// Select the color-stripped window instead of the full text.
    pub color_stripped: bool,
}

impl RenderFlags {
    /// Plain markup, full text.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            dialect: Dialect::Plain,
            color_stripped: false,
        }
    }

    /// Rich-text dialect, full text.
    #[must_use]
    pub const fn rich() -> Self {
        Self {
            dialect: Dialect::Rich,
            color_stripped: false,
        }
    }

    /// Terminal escape dialect, full text.
    #[must_use]
    pub const fn terminal() -> Self {
        Self {
            dialect: Dialect::Terminal,
            color_stripped: false,
        }
    }

    /// Select the color-stripped window.
    #[must_use]
    pub const fn stripped(mut self) -> Self {
        self.color_stripped = true;
        self
    }
}

/// Declared type of a translation argument slot.
///
/// Supplied values are coerced to this before rendering; see
/// `glot::Translation::translate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArgType {
    /// Accept any value as-is.
    #[default]
    Any,
    /// Format through the converter registry into text.
    Text,
    /// A boolean.
    Bool,
    /// A signed integer.
    Int,
    /// A floating-point number.
    Float,
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgType::Any => "any",
            ArgType::Text => "text",
            ArgType::Bool => "bool",
            ArgType::Int => "int",
            ArgType::Float => "float",
        };
        f.write_str(name)
    }
}

/// Post-processing decorator applied to a formatted argument string.
///
/// Addons run strictly in the order they were declared on the
/// [`ArgumentFormat`], each receiving the running text and the original
/// value.
pub trait FormatAddon: Send + Sync {
    /// Short name used in persisted documentation comments.
    fn name(&self) -> &'static str;

    /// Transform the formatted text.
    fn apply(&self, text: String, value: &ArgValue<'_>) -> String;
}

/// Per-argument directive: display name, declared type, explicit format
/// string, and ordered addons.
#[derive(Clone, Default)]
pub struct ArgumentFormat {
    /// Display name used in persisted documentation comments.
    pub name: Option<String>,
    /// Declared type of the slot.
    pub expected: ArgType,
    /// Explicit format string handed to the resolved converter.
    pub format: Option<String>,
    /// Ordered post-processing addons.
    pub addons: Vec<Arc<dyn FormatAddon>>,
}

impl ArgumentFormat {
    /// An unnamed slot accepting any value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the declared type.
    #[must_use]
    pub fn expecting(mut self, expected: ArgType) -> Self {
        self.expected = expected;
        self
    }

    /// Set the explicit format string.
    #[must_use]
    pub fn formatted(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Append an addon. Addons run in the order they are appended.
    #[must_use]
    pub fn addon(mut self, addon: Arc<dyn FormatAddon>) -> Self {
        self.addons.push(addon);
        self
    }
}

impl fmt::Debug for ArgumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentFormat")
            .field("name", &self.name)
            .field("expected", &self.expected)
            .field("format", &self.format)
            .field("addons", &self.addons.iter().map(|a| a.name()).collect::<Vec<_>>())
            .finish()
    }
}

/// Ephemeral parameter bundle handed to converters and addons.
///
/// Never stored; borrows live only for the duration of one format call.
pub struct ValueFormatParams<'a> {
    /// Position of the argument being formatted.
    pub index: usize,
    /// Culture identifier, e.g. `"en-US"`.
    pub culture: &'a str,
    /// Language the output is for.
    pub language: &'a Language,
    /// Render-target selection.
    pub flags: RenderFlags,
    /// The slot's declared format directive.
    pub format: &'a ArgumentFormat,
    /// Accessor for the other arguments of the call.
    pub args: &'a dyn ArgSource<'a>,
    /// Declared argument count of the owning translation.
    pub arg_count: usize,
}

impl<'a> ValueFormatParams<'a> {
    /// The explicit format string in effect for this call, if any.
    #[must_use]
    pub fn format_str(&self) -> Option<&'a str> {
        self.format.format.as_deref()
    }
}
