//! Call-scoped argument values and their capabilities.
//!
//! A translation call supplies its arguments as [`ArgValue`] records: a
//! borrowed `&dyn Any` plus the capabilities the engine cares about,
//! attached explicitly at the call site instead of probed by reflection.
//! The record is `Copy` and never stored beyond the call.
//!
//! Capabilities:
//! - `Display` — the value can render itself as basic text. This is what
//!   the fallback converter uses.
//! - [`Localize`] — the value knows how to translate itself. The converter
//!   registry delegates to it directly; registered converters cannot
//!   override it.
//! - [`VariantName`] — the value is an enumeration case with a stable
//!   variant name, dispatched through the enum converter list.

use std::any::{Any, TypeId};
use std::fmt;

use crate::format::ValueFormatParams;

/// A value that renders itself through the localization machinery instead
/// of a registered converter.
pub trait Localize {
    /// Produce the display text for this value.
    fn localize(&self, params: &ValueFormatParams<'_>) -> String;
}

/// An enumeration case with a stable variant name.
///
/// The Rust analogue of formatting a named constant: converters on the
/// enum list dispatch on this capability rather than on `Display`.
pub trait VariantName {
    /// Name of this case, e.g. `"NotFound"`.
    fn variant_name(&self) -> &'static str;

    /// Display name of the enumeration type, e.g. `"RequestOutcome"`.
    fn enum_name(&self) -> &'static str;
}

static UNIT: () = ();

/// A borrowed runtime value plus its formatting capabilities.
#[derive(Clone, Copy)]
pub struct ArgValue<'a> {
    any: &'a dyn Any,
    type_name: &'static str,
    display: Option<&'a dyn fmt::Display>,
    localize: Option<&'a dyn Localize>,
    variant: Option<&'a dyn VariantName>,
    null: bool,
}

impl<'a> ArgValue<'a> {
    /// A value with the basic-text capability.
    #[must_use]
    pub fn display<T: Any + fmt::Display>(value: &'a T) -> Self {
        Self {
            any: value,
            type_name: std::any::type_name::<T>(),
            display: Some(value),
            localize: None,
            variant: None,
            null: false,
        }
    }

    /// A value with no formatting capabilities. Only a registered
    /// converter (or the type-name fallback) can render it.
    #[must_use]
    pub fn opaque<T: Any>(value: &'a T) -> Self {
        Self {
            any: value,
            type_name: std::any::type_name::<T>(),
            display: None,
            localize: None,
            variant: None,
            null: false,
        }
    }

    /// A self-localizing value.
    #[must_use]
    pub fn localizing<T: Any + Localize>(value: &'a T) -> Self {
        Self {
            any: value,
            type_name: std::any::type_name::<T>(),
            display: None,
            localize: Some(value),
            variant: None,
            null: false,
        }
    }

    /// An enumeration case.
    #[must_use]
    pub fn enumeration<T: Any + VariantName>(value: &'a T) -> Self {
        Self {
            any: value,
            type_name: std::any::type_name::<T>(),
            display: None,
            localize: None,
            variant: Some(value),
            null: false,
        }
    }

    /// The null sentinel. Formats to the configured null text and is
    /// never "one" for pluralization.
    #[must_use]
    pub fn null() -> Self {
        Self {
            any: &UNIT,
            type_name: "null",
            display: None,
            localize: None,
            variant: None,
            null: true,
        }
    }

    /// Whether this is the null sentinel.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.null
    }

    /// Runtime type id of the underlying value.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.any.type_id()
    }

    /// Diagnostic name of the underlying type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Downcast the underlying value. Always `None` for the null sentinel.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        if self.null {
            return None;
        }
        self.any.downcast_ref::<T>()
    }

    /// The basic-text capability, if attached.
    #[must_use]
    pub fn as_display(&self) -> Option<&'a dyn fmt::Display> {
        self.display
    }

    /// The self-localizing capability, if attached.
    #[must_use]
    pub fn as_localize(&self) -> Option<&'a dyn Localize> {
        self.localize
    }

    /// The enumeration capability, if attached.
    #[must_use]
    pub fn as_variant(&self) -> Option<&'a dyn VariantName> {
        self.variant
    }
}

impl fmt::Debug for ArgValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgValue")
            .field("type_name", &self.type_name)
            .field("null", &self.null)
            .finish_non_exhaustive()
    }
}

/// Indexed access to the arguments of a translation call.
pub trait ArgSource<'a> {
    /// The argument at `index`, if supplied.
    fn arg(&self, index: usize) -> Option<ArgValue<'a>>;

    /// Number of supplied arguments.
    fn count(&self) -> usize;
}

impl<'a, 's> ArgSource<'a> for &'s [ArgValue<'a>] {
    fn arg(&self, index: usize) -> Option<ArgValue<'a>> {
        self.get(index).copied()
    }

    fn count(&self) -> usize {
        self.len()
    }
}

/// The empty argument source, for standalone format calls.
pub const NO_ARGS: &[ArgValue<'static>] = &[];
