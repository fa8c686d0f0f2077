// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Simple type kinds and the `AnySimple` discriminated value.

use crate::error::Error;
use crate::time::{DateTime, Duration};
use std::borrow::Cow;
use std::fmt;

/// Kinds of simple values that can be exchanged through [`AnySimple`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleTypeKind {
    /// No type (void return, empty value).
    None,
    Char8,
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Duration,
    DateTime,
    String8,
}

impl SimpleTypeKind {
    /// All kinds that carry a payload.
    pub const VALUE_KINDS: [SimpleTypeKind; 15] = [
        Self::Char8,
        Self::Bool,
        Self::Int8,
        Self::UInt8,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Float32,
        Self::Float64,
        Self::Duration,
        Self::DateTime,
        Self::String8,
    ];

    /// In-memory size in bytes (None for strings, whose size is the buffer).
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::None => Some(0),
            Self::Bool | Self::Char8 | Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int64 | Self::UInt64 | Self::Float64 | Self::Duration | Self::DateTime => {
                Some(8)
            }
            Self::String8 => None,
        }
    }

    /// Canonical type name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Char8 => "Char8",
            Self::Bool => "Bool",
            Self::Int8 => "Int8",
            Self::UInt8 => "UInt8",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Duration => "Duration",
            Self::DateTime => "DateTime",
            Self::String8 => "String8",
        }
    }
}

impl fmt::Display for SimpleTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value of one simple kind.
///
/// The variant is the tag; only its payload is meaningful. String payloads
/// may borrow a `'static` string (not owner) or own a heap copy (owner).
/// Cloning always produces an owned copy of the string, so two values never
/// share a buffer that one of them could release.
#[derive(Debug, PartialEq, Default)]
pub enum AnySimple {
    #[default]
    None,
    Bool(bool),
    Char8(u8),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Duration(Duration),
    DateTime(DateTime),
    String8(Cow<'static, str>),
}

impl Clone for AnySimple {
    fn clone(&self) -> Self {
        match self {
            Self::String8(s) => Self::String8(Cow::Owned(s.as_ref().to_owned())),
            Self::None => Self::None,
            Self::Bool(v) => Self::Bool(*v),
            Self::Char8(v) => Self::Char8(*v),
            Self::Int8(v) => Self::Int8(*v),
            Self::UInt8(v) => Self::UInt8(*v),
            Self::Int16(v) => Self::Int16(*v),
            Self::UInt16(v) => Self::UInt16(*v),
            Self::Int32(v) => Self::Int32(*v),
            Self::UInt32(v) => Self::UInt32(*v),
            Self::Int64(v) => Self::Int64(*v),
            Self::UInt64(v) => Self::UInt64(*v),
            Self::Float32(v) => Self::Float32(*v),
            Self::Float64(v) => Self::Float64(*v),
            Self::Duration(v) => Self::Duration(*v),
            Self::DateTime(v) => Self::DateTime(*v),
        }
    }
}

impl AnySimple {
    /// Owned string value.
    pub fn string(value: impl Into<String>) -> Self {
        Self::String8(Cow::Owned(value.into()))
    }

    /// Character value from an ASCII `char`; `None` outside the 8-bit range.
    pub fn char8(value: char) -> Option<Self> {
        u8::try_from(u32::from(value)).ok().map(Self::Char8)
    }

    /// Kind tag of this value.
    pub fn kind(&self) -> SimpleTypeKind {
        match self {
            Self::None => SimpleTypeKind::None,
            Self::Bool(_) => SimpleTypeKind::Bool,
            Self::Char8(_) => SimpleTypeKind::Char8,
            Self::Int8(_) => SimpleTypeKind::Int8,
            Self::UInt8(_) => SimpleTypeKind::UInt8,
            Self::Int16(_) => SimpleTypeKind::Int16,
            Self::UInt16(_) => SimpleTypeKind::UInt16,
            Self::Int32(_) => SimpleTypeKind::Int32,
            Self::UInt32(_) => SimpleTypeKind::UInt32,
            Self::Int64(_) => SimpleTypeKind::Int64,
            Self::UInt64(_) => SimpleTypeKind::UInt64,
            Self::Float32(_) => SimpleTypeKind::Float32,
            Self::Float64(_) => SimpleTypeKind::Float64,
            Self::Duration(_) => SimpleTypeKind::Duration,
            Self::DateTime(_) => SimpleTypeKind::DateTime,
            Self::String8(_) => SimpleTypeKind::String8,
        }
    }

    /// Check if value is empty.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// True only for string values that own their buffer.
    pub fn is_owner(&self) -> bool {
        matches!(self, Self::String8(Cow::Owned(_)))
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String8(s) => Some(s),
            _ => None,
        }
    }

    /// Check the value against a declared kind.
    pub(crate) fn expect_kind(&self, expected: SimpleTypeKind) -> Result<(), Error> {
        let actual = self.kind();
        if actual == expected {
            Ok(())
        } else {
            Err(Error::InvalidAnyType { expected, actual })
        }
    }
}

// Accessors, conversions into AnySimple and checked extraction out of it
macro_rules! impl_simple {
    ($ty:ty, $variant:ident, $as_fn:ident) => {
        impl AnySimple {
            #[doc = concat!("Try to get as `", stringify!($ty), "`.")]
            pub fn $as_fn(&self) -> Option<$ty> {
                match self {
                    Self::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }

        impl From<$ty> for AnySimple {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }

        impl TryFrom<&AnySimple> for $ty {
            type Error = Error;

            fn try_from(value: &AnySimple) -> Result<Self, Error> {
                match value {
                    AnySimple::$variant(v) => Ok(*v),
                    other => Err(Error::InvalidAnyType {
                        expected: SimpleTypeKind::$variant,
                        actual: other.kind(),
                    }),
                }
            }
        }
    };
}

impl_simple!(bool, Bool, as_bool);
impl_simple!(i8, Int8, as_i8);
impl_simple!(u8, UInt8, as_u8);
impl_simple!(i16, Int16, as_i16);
impl_simple!(u16, UInt16, as_u16);
impl_simple!(i32, Int32, as_i32);
impl_simple!(u32, UInt32, as_u32);
impl_simple!(i64, Int64, as_i64);
impl_simple!(u64, UInt64, as_u64);
impl_simple!(f32, Float32, as_f32);
impl_simple!(f64, Float64, as_f64);
impl_simple!(Duration, Duration, as_duration);
impl_simple!(DateTime, DateTime, as_datetime);

impl AnySimple {
    /// Try to get as 8-bit character.
    pub fn as_char8(&self) -> Option<u8> {
        match self {
            Self::Char8(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&'static str> for AnySimple {
    fn from(v: &'static str) -> Self {
        Self::String8(Cow::Borrowed(v))
    }
}

impl From<String> for AnySimple {
    fn from(v: String) -> Self {
        Self::String8(Cow::Owned(v))
    }
}

impl TryFrom<&AnySimple> for String {
    type Error = Error;

    fn try_from(value: &AnySimple) -> Result<Self, Error> {
        match value {
            AnySimple::String8(s) => Ok(s.to_string()),
            other => Err(Error::InvalidAnyType {
                expected: SimpleTypeKind::String8,
                actual: other.kind(),
            }),
        }
    }
}

impl fmt::Display for AnySimple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("<none>"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Char8(v) => write!(f, "{}", char::from(*v)),
            Self::Int8(v) => write!(f, "{}", v),
            Self::UInt8(v) => write!(f, "{}", v),
            Self::Int16(v) => write!(f, "{}", v),
            Self::UInt16(v) => write!(f, "{}", v),
            Self::Int32(v) => write!(f, "{}", v),
            Self::UInt32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::UInt64(v) => write!(f, "{}", v),
            Self::Float32(v) => write!(f, "{}", v),
            Self::Float64(v) => write!(f, "{}", v),
            Self::Duration(v) => write!(f, "{}", v),
            Self::DateTime(v) => write!(f, "{}", v),
            Self::String8(v) => write!(f, "{:?}", v),
        }
    }
}
