//! Property values: the closed set of value kinds and their Rust types.

use std::fmt;

use crate::macros::Macros;

// ---------------------------------------------------------------------------
// ValueKind / Value
// ---------------------------------------------------------------------------

/// Kind of value a scalar property holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Double,
    Text,
    Enum,
    Color,
    Macros,
}

/// A dynamically typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
    /// Ordinal into the property's choices.
    Enum(usize),
    Color(Color),
    Macros(Macros),
}

impl Value {
    /// Kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Double(_) => ValueKind::Double,
            Value::Text(_) => ValueKind::Text,
            Value::Enum(_) => ValueKind::Enum,
            Value::Color(_) => ValueKind::Color,
            Value::Macros(_) => ValueKind::Macros,
        }
    }

    /// Parse text into a value of `kind`.
    ///
    /// Text is kept as written; other kinds ignore surrounding whitespace.
    /// Integers accept an integral decimal form (`"2.0"`). Enums accept the
    /// ordinal or a case-insensitive choice name. Colors and macros are
    /// structured and never parse from plain text.
    pub fn parse(kind: ValueKind, text: &str, choices: &[&str]) -> Result<Value, String> {
        let raw = text;
        let text = text.trim();
        match kind {
            ValueKind::Bool => match text.to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(format!("expected true or false, got '{text}'")),
            },
            ValueKind::Int => parse_int(text)
                .map(Value::Int)
                .ok_or_else(|| format!("expected integer, got '{text}'")),
            ValueKind::Double => text
                .parse()
                .map(Value::Double)
                .map_err(|_| format!("expected number, got '{text}'")),
            ValueKind::Text => Ok(Value::Text(raw.to_string())),
            ValueKind::Enum => {
                if let Ok(ordinal) = text.parse::<usize>() {
                    return if ordinal < choices.len() {
                        Ok(Value::Enum(ordinal))
                    } else {
                        Err(format!("ordinal {ordinal} out of range 0..{}", choices.len()))
                    };
                }
                choices
                    .iter()
                    .position(|choice| choice.eq_ignore_ascii_case(text))
                    .map(Value::Enum)
                    .ok_or_else(|| format!("'{text}' is not one of {choices:?}"))
            }
            ValueKind::Color | ValueKind::Macros => {
                Err(format!("{kind:?} values are structured, not text"))
            }
        }
    }
}

fn parse_int(text: &str) -> Option<i64> {
    if let Ok(value) = text.parse::<i64>() {
        return Some(value);
    }
    let value: f64 = text.parse().ok()?;
    (value.fract() == 0.0 && value.is_finite()).then_some(value as i64)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Enum(v) => write!(f, "{v}"),
            Value::Color(v) => write!(f, "{v}"),
            Value::Macros(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// RGBA color, optionally tagged with a named-palette entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    pub name: Option<String>,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    /// Opaque color.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            name: None,
            red,
            green,
            blue,
            alpha: 255,
        }
    }

    /// Color with explicit alpha.
    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            name: None,
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Tag the color with a palette name (builder).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Scale the RGB components by `percent` / 100. The result is unnamed.
    pub fn scaled(&self, percent: u32) -> Self {
        let scale = |c: u8| (u32::from(c).saturating_mul(percent) / 100).min(255) as u8;
        Self::rgba(
            scale(self.red),
            scale(self.green),
            scale(self.blue),
            self.alpha,
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            return f.write_str(name);
        }
        if self.alpha == 255 {
            write!(f, "RGB({},{},{})", self.red, self.green, self.blue)
        } else {
            write!(
                f,
                "RGBA({},{},{},{})",
                self.red, self.green, self.blue, self.alpha
            )
        }
    }
}

// ---------------------------------------------------------------------------
// PropertyType
// ---------------------------------------------------------------------------

/// Rust type usable as the value of a scalar property.
pub trait PropertyType: Sized + Clone + Send + Sync + 'static {
    /// Kind of the stored [`Value`].
    const KIND: ValueKind;

    /// Extract from a value of the matching kind.
    fn from_value(value: &Value) -> Option<Self>;

    /// Convert into a [`Value`].
    fn into_value(self) -> Value;

    /// Choice names for enumerated types.
    fn choices() -> &'static [&'static str] {
        &[]
    }
}

impl PropertyType for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl PropertyType for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl PropertyType for f64 {
    const KIND: ValueKind = ValueKind::Double;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Double(self)
    }
}

impl PropertyType for String {
    const KIND: ValueKind = ValueKind::Text;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl PropertyType for Color {
    const KIND: ValueKind = ValueKind::Color;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Color(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Color(self)
    }
}

impl PropertyType for Macros {
    const KIND: ValueKind = ValueKind::Macros;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Macros(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Macros(self)
    }
}

/// Declare an enumerated property type.
///
/// Variants are stored by ordinal; their names double as the choice names
/// accepted when reading text.
#[macro_export]
macro_rules! property_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            const VARIANTS: &'static [$name] = &[$($name::$variant),+];

            /// Position of this variant among the choices.
            pub fn ordinal(self) -> usize {
                self as usize
            }

            /// Variant at `ordinal`.
            pub fn from_ordinal(ordinal: usize) -> Option<Self> {
                Self::VARIANTS.get(ordinal).copied()
            }
        }

        impl $crate::property::PropertyType for $name {
            const KIND: $crate::property::ValueKind = $crate::property::ValueKind::Enum;

            fn from_value(value: &$crate::property::Value) -> Option<Self> {
                match value {
                    $crate::property::Value::Enum(ordinal) => Self::from_ordinal(*ordinal),
                    _ => None,
                }
            }

            fn into_value(self) -> $crate::property::Value {
                $crate::property::Value::Enum(self.ordinal())
            }

            fn choices() -> &'static [&'static str] {
                &[$(stringify!($variant)),+]
            }
        }
    };
}
