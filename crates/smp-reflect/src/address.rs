// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Non-owning field addresses.
//!
//! A [`SimpleAddress`] is a typed borrow of component memory: the variant is
//! the simple kind, the slice length is the element count, and the element
//! size follows from the kind. Scalars are one-element slices. Because the
//! borrow carries the component's lifetime `'a`, a publication holding it
//! can never outlive the memory it points into; interior mutability (`Cell`)
//! lets the component and the publication both reach the same storage.
//!
//! Memory published through a registered type arrives as raw bytes
//! ([`RawAddress`]) and is decoded with native endianness.

use crate::error::{Error, Result};
use crate::time::{DateTime, Duration};
use crate::value::{AnySimple, SimpleTypeKind};
use std::cell::{Cell, RefCell};

/// Typed, lifetime-bound reference to one or more simple values.
#[derive(Debug, Clone, Copy)]
pub enum SimpleAddress<'a> {
    Bool(&'a [Cell<bool>]),
    Char8(&'a [Cell<u8>]),
    Int8(&'a [Cell<i8>]),
    UInt8(&'a [Cell<u8>]),
    Int16(&'a [Cell<i16>]),
    UInt16(&'a [Cell<u16>]),
    Int32(&'a [Cell<i32>]),
    UInt32(&'a [Cell<u32>]),
    Int64(&'a [Cell<i64>]),
    UInt64(&'a [Cell<u64>]),
    Float32(&'a [Cell<f32>]),
    Float64(&'a [Cell<f64>]),
    Duration(&'a [Cell<Duration>]),
    DateTime(&'a [Cell<DateTime>]),
    String8(&'a [RefCell<String>]),
    Raw(RawAddress<'a>),
}

/// Simple values laid out in a raw byte region.
#[derive(Debug, Clone, Copy)]
pub struct RawAddress<'a> {
    kind: SimpleTypeKind,
    memory: &'a [Cell<u8>],
    /// Bytes per element (string capacity including the terminator).
    element_size: usize,
    /// Distance between consecutive elements.
    stride: usize,
    count: usize,
}

impl<'a> RawAddress<'a> {
    /// Describe `count` elements of `kind` starting at `memory[0]`.
    ///
    /// For `String8`, `element_size` is the buffer capacity including the
    /// NUL terminator; for other kinds it must equal the kind's size.
    pub fn new(
        kind: SimpleTypeKind,
        memory: &'a [Cell<u8>],
        element_size: usize,
        stride: usize,
        count: usize,
    ) -> Result<Self> {
        let size_ok = match kind.size() {
            Some(size) => size > 0 && size == element_size,
            None => element_size > 0,
        };
        if !size_ok || stride < element_size {
            return Err(Error::InvalidLayout(format!(
                "{} element of {} bytes with stride {}",
                kind, element_size, stride
            )));
        }
        let needed = match count {
            0 => Some(0),
            n => (n - 1)
                .checked_mul(stride)
                .and_then(|span| span.checked_add(element_size)),
        }
        .ok_or_else(|| {
            Error::InvalidLayout(format!("{} elements with stride {} overflow", count, stride))
        })?;
        if memory.len() < needed {
            return Err(Error::InvalidLayout(format!(
                "{} bytes needed, {} provided",
                needed,
                memory.len()
            )));
        }
        Ok(Self {
            kind,
            memory,
            element_size,
            stride,
            count,
        })
    }

    fn element(&self, index: usize) -> &'a [Cell<u8>] {
        let start = index * self.stride;
        &self.memory[start..start + self.element_size]
    }

    fn read(&self, index: usize) -> AnySimple {
        let cells = self.element(index);
        match self.kind {
            SimpleTypeKind::None => AnySimple::None,
            SimpleTypeKind::Bool => AnySimple::Bool(cells[0].get() != 0),
            SimpleTypeKind::Char8 => AnySimple::Char8(cells[0].get()),
            SimpleTypeKind::Int8 => AnySimple::Int8(i8::from_ne_bytes(load(cells))),
            SimpleTypeKind::UInt8 => AnySimple::UInt8(cells[0].get()),
            SimpleTypeKind::Int16 => AnySimple::Int16(i16::from_ne_bytes(load(cells))),
            SimpleTypeKind::UInt16 => AnySimple::UInt16(u16::from_ne_bytes(load(cells))),
            SimpleTypeKind::Int32 => AnySimple::Int32(i32::from_ne_bytes(load(cells))),
            SimpleTypeKind::UInt32 => AnySimple::UInt32(u32::from_ne_bytes(load(cells))),
            SimpleTypeKind::Int64 => AnySimple::Int64(i64::from_ne_bytes(load(cells))),
            SimpleTypeKind::UInt64 => AnySimple::UInt64(u64::from_ne_bytes(load(cells))),
            SimpleTypeKind::Float32 => AnySimple::Float32(f32::from_ne_bytes(load(cells))),
            SimpleTypeKind::Float64 => AnySimple::Float64(f64::from_ne_bytes(load(cells))),
            SimpleTypeKind::Duration => {
                AnySimple::Duration(Duration(i64::from_ne_bytes(load(cells))))
            }
            SimpleTypeKind::DateTime => {
                AnySimple::DateTime(DateTime(i64::from_ne_bytes(load(cells))))
            }
            SimpleTypeKind::String8 => {
                let bytes: Vec<u8> = cells
                    .iter()
                    .map(Cell::get)
                    .take_while(|b| *b != 0)
                    .collect();
                AnySimple::string(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }

    fn validate(&self, value: &AnySimple) -> Result<()> {
        value.expect_kind(self.kind)?;
        if let AnySimple::String8(s) = value {
            if s.len() >= self.element_size || s.as_bytes().contains(&0) {
                return Err(Error::InvalidValue(format!(
                    "string of {} bytes does not fit a {}-byte buffer",
                    s.len(),
                    self.element_size
                )));
            }
        }
        Ok(())
    }

    fn write(&self, index: usize, value: &AnySimple) {
        let cells = self.element(index);
        match value {
            AnySimple::None => {}
            AnySimple::Bool(v) => cells[0].set(u8::from(*v)),
            AnySimple::Char8(v) | AnySimple::UInt8(v) => cells[0].set(*v),
            AnySimple::Int8(v) => store(cells, &v.to_ne_bytes()),
            AnySimple::Int16(v) => store(cells, &v.to_ne_bytes()),
            AnySimple::UInt16(v) => store(cells, &v.to_ne_bytes()),
            AnySimple::Int32(v) => store(cells, &v.to_ne_bytes()),
            AnySimple::UInt32(v) => store(cells, &v.to_ne_bytes()),
            AnySimple::Int64(v) => store(cells, &v.to_ne_bytes()),
            AnySimple::UInt64(v) => store(cells, &v.to_ne_bytes()),
            AnySimple::Float32(v) => store(cells, &v.to_ne_bytes()),
            AnySimple::Float64(v) => store(cells, &v.to_ne_bytes()),
            AnySimple::Duration(v) => store(cells, &v.0.to_ne_bytes()),
            AnySimple::DateTime(v) => store(cells, &v.0.to_ne_bytes()),
            AnySimple::String8(s) => {
                let bytes = s.as_bytes();
                for (i, cell) in cells.iter().enumerate() {
                    cell.set(bytes.get(i).copied().unwrap_or(0));
                }
            }
        }
    }
}

fn load<const N: usize>(cells: &[Cell<u8>]) -> [u8; N] {
    let mut out = [0u8; N];
    for (byte, cell) in out.iter_mut().zip(cells) {
        *byte = cell.get();
    }
    out
}

fn store(cells: &[Cell<u8>], bytes: &[u8]) {
    for (cell, byte) in cells.iter().zip(bytes) {
        cell.set(*byte);
    }
}

impl<'a> SimpleAddress<'a> {
    /// 8-bit character scalar (a `u8` cell is otherwise published as `UInt8`).
    pub fn char8(cell: &'a Cell<u8>) -> Self {
        Self::Char8(std::slice::from_ref(cell))
    }

    /// 8-bit character array.
    pub fn char8_array(cells: &'a [Cell<u8>]) -> Self {
        Self::Char8(cells)
    }

    /// Kind of the addressed values.
    pub fn kind(&self) -> SimpleTypeKind {
        match self {
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
            Self::Raw(raw) => raw.kind,
        }
    }

    /// Number of addressed elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(c) => c.len(),
            Self::Char8(c) | Self::UInt8(c) => c.len(),
            Self::Int8(c) => c.len(),
            Self::Int16(c) => c.len(),
            Self::UInt16(c) => c.len(),
            Self::Int32(c) => c.len(),
            Self::UInt32(c) => c.len(),
            Self::Int64(c) => c.len(),
            Self::UInt64(c) => c.len(),
            Self::Float32(c) => c.len(),
            Self::Float64(c) => c.len(),
            Self::Duration(c) => c.len(),
            Self::DateTime(c) => c.len(),
            Self::String8(c) => c.len(),
            Self::Raw(raw) => raw.count,
        }
    }

    /// Returns `true` if no elements are addressed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read element `index`.
    ///
    /// `index` must be below [`len`](Self::len).
    pub fn read(&self, index: usize) -> Result<AnySimple> {
        let out_of_range = || Error::InvalidFieldName(format!("[{}]", index));
        let value = match self {
            Self::Bool(c) => AnySimple::Bool(c.get(index).ok_or_else(out_of_range)?.get()),
            Self::Char8(c) => AnySimple::Char8(c.get(index).ok_or_else(out_of_range)?.get()),
            Self::Int8(c) => AnySimple::Int8(c.get(index).ok_or_else(out_of_range)?.get()),
            Self::UInt8(c) => AnySimple::UInt8(c.get(index).ok_or_else(out_of_range)?.get()),
            Self::Int16(c) => AnySimple::Int16(c.get(index).ok_or_else(out_of_range)?.get()),
            Self::UInt16(c) => AnySimple::UInt16(c.get(index).ok_or_else(out_of_range)?.get()),
            Self::Int32(c) => AnySimple::Int32(c.get(index).ok_or_else(out_of_range)?.get()),
            Self::UInt32(c) => AnySimple::UInt32(c.get(index).ok_or_else(out_of_range)?.get()),
            Self::Int64(c) => AnySimple::Int64(c.get(index).ok_or_else(out_of_range)?.get()),
            Self::UInt64(c) => AnySimple::UInt64(c.get(index).ok_or_else(out_of_range)?.get()),
            Self::Float32(c) => AnySimple::Float32(c.get(index).ok_or_else(out_of_range)?.get()),
            Self::Float64(c) => AnySimple::Float64(c.get(index).ok_or_else(out_of_range)?.get()),
            Self::Duration(c) => {
                AnySimple::Duration(c.get(index).ok_or_else(out_of_range)?.get())
            }
            Self::DateTime(c) => {
                AnySimple::DateTime(c.get(index).ok_or_else(out_of_range)?.get())
            }
            Self::String8(c) => {
                let cell = c.get(index).ok_or_else(out_of_range)?;
                let s = cell
                    .try_borrow()
                    .map_err(|_| Error::InvalidValue("string is mutably borrowed".into()))?;
                AnySimple::string(s.as_str())
            }
            Self::Raw(raw) => {
                if index >= raw.count {
                    return Err(out_of_range());
                }
                raw.read(index)
            }
        };
        Ok(value)
    }

    /// Check that `value` can be stored here without writing it.
    pub fn validate(&self, value: &AnySimple) -> Result<()> {
        match self {
            Self::Raw(raw) => raw.validate(value),
            _ => value.expect_kind(self.kind()),
        }
    }

    /// Write element `index`.
    ///
    /// Memory is left unchanged when the value is rejected.
    pub fn write(&self, index: usize, value: &AnySimple) -> Result<()> {
        self.validate(value)?;
        if index >= self.len() {
            return Err(Error::InvalidFieldName(format!("[{}]", index)));
        }
        match (self, value) {
            (Self::Bool(c), AnySimple::Bool(v)) => c[index].set(*v),
            (Self::Char8(c), AnySimple::Char8(v)) => c[index].set(*v),
            (Self::Int8(c), AnySimple::Int8(v)) => c[index].set(*v),
            (Self::UInt8(c), AnySimple::UInt8(v)) => c[index].set(*v),
            (Self::Int16(c), AnySimple::Int16(v)) => c[index].set(*v),
            (Self::UInt16(c), AnySimple::UInt16(v)) => c[index].set(*v),
            (Self::Int32(c), AnySimple::Int32(v)) => c[index].set(*v),
            (Self::UInt32(c), AnySimple::UInt32(v)) => c[index].set(*v),
            (Self::Int64(c), AnySimple::Int64(v)) => c[index].set(*v),
            (Self::UInt64(c), AnySimple::UInt64(v)) => c[index].set(*v),
            (Self::Float32(c), AnySimple::Float32(v)) => c[index].set(*v),
            (Self::Float64(c), AnySimple::Float64(v)) => c[index].set(*v),
            (Self::Duration(c), AnySimple::Duration(v)) => c[index].set(*v),
            (Self::DateTime(c), AnySimple::DateTime(v)) => c[index].set(*v),
            (Self::String8(c), AnySimple::String8(v)) => {
                let mut s = c[index]
                    .try_borrow_mut()
                    .map_err(|_| Error::InvalidValue("string is borrowed".into()))?;
                s.clear();
                s.push_str(v);
            }
            (Self::Raw(raw), v) => raw.write(index, v),
            (_, v) => {
                return Err(Error::InvalidAnyType {
                    expected: self.kind(),
                    actual: v.kind(),
                })
            }
        }
        Ok(())
    }
}

macro_rules! impl_address_from {
    ($ty:ty, $variant:ident) => {
        impl<'a> From<&'a Cell<$ty>> for SimpleAddress<'a> {
            fn from(cell: &'a Cell<$ty>) -> Self {
                Self::$variant(std::slice::from_ref(cell))
            }
        }

        impl<'a> From<&'a [Cell<$ty>]> for SimpleAddress<'a> {
            fn from(cells: &'a [Cell<$ty>]) -> Self {
                Self::$variant(cells)
            }
        }

        impl<'a, const N: usize> From<&'a [Cell<$ty>; N]> for SimpleAddress<'a> {
            fn from(cells: &'a [Cell<$ty>; N]) -> Self {
                Self::$variant(cells.as_slice())
            }
        }
    };
}

impl_address_from!(bool, Bool);
impl_address_from!(i8, Int8);
impl_address_from!(u8, UInt8);
impl_address_from!(i16, Int16);
impl_address_from!(u16, UInt16);
impl_address_from!(i32, Int32);
impl_address_from!(u32, UInt32);
impl_address_from!(i64, Int64);
impl_address_from!(u64, UInt64);
impl_address_from!(f32, Float32);
impl_address_from!(f64, Float64);
impl_address_from!(Duration, Duration);
impl_address_from!(DateTime, DateTime);

impl<'a> From<&'a RefCell<String>> for SimpleAddress<'a> {
    fn from(cell: &'a RefCell<String>) -> Self {
        Self::String8(std::slice::from_ref(cell))
    }
}

impl<'a> From<&'a [RefCell<String>]> for SimpleAddress<'a> {
    fn from(cells: &'a [RefCell<String>]) -> Self {
        Self::String8(cells)
    }
}

impl<'a, const N: usize> From<&'a [RefCell<String>; N]> for SimpleAddress<'a> {
    fn from(cells: &'a [RefCell<String>; N]) -> Self {
        Self::String8(cells.as_slice())
    }
}

impl<'a> From<RawAddress<'a>> for SimpleAddress<'a> {
    fn from(raw: RawAddress<'a>) -> Self {
        Self::Raw(raw)
    }
}
