// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type identifiers.
//!
//! Types are keyed by 128-bit [`Uuid`]s laid out as 4-2-2-8 byte groups.
//! Simple kinds have well-known identifiers: `Data1..Data3` are zero and
//! `Data4` holds the right-aligned ASCII kind name (e.g. `"   Int32"`).

use crate::error::{Error, Result};
use crate::value::SimpleTypeKind;

pub use ::uuid::Uuid;

/// Length of the canonical 8-4-4-4-12 text form.
pub const UUID_TEXT_LEN: usize = 36;

const fn well_known(tag: &[u8; 8]) -> Uuid {
    Uuid::from_fields(0, 0, 0, tag)
}

pub const UUID_VOID: Uuid = well_known(b"    Void");
pub const UUID_CHAR8: Uuid = well_known(b"   Char8");
pub const UUID_BOOL: Uuid = well_known(b"    Bool");
pub const UUID_INT8: Uuid = well_known(b"    Int8");
pub const UUID_INT16: Uuid = well_known(b"   Int16");
pub const UUID_INT32: Uuid = well_known(b"   Int32");
pub const UUID_INT64: Uuid = well_known(b"   Int64");
pub const UUID_UINT8: Uuid = well_known(b"   UInt8");
pub const UUID_UINT16: Uuid = well_known(b"  UInt16");
pub const UUID_UINT32: Uuid = well_known(b"  UInt32");
pub const UUID_UINT64: Uuid = well_known(b"  UInt64");
pub const UUID_FLOAT32: Uuid = well_known(b" Float32");
pub const UUID_FLOAT64: Uuid = well_known(b" Float64");
pub const UUID_DATETIME: Uuid = well_known(b"DateTime");
pub const UUID_DURATION: Uuid = well_known(b"Duration");
pub const UUID_STRING8: Uuid = well_known(b" String8");

/// Well-known identifier of a simple kind (`UUID_VOID` for `None`).
pub fn uuid_of(kind: SimpleTypeKind) -> Uuid {
    match kind {
        SimpleTypeKind::None => UUID_VOID,
        SimpleTypeKind::Char8 => UUID_CHAR8,
        SimpleTypeKind::Bool => UUID_BOOL,
        SimpleTypeKind::Int8 => UUID_INT8,
        SimpleTypeKind::UInt8 => UUID_UINT8,
        SimpleTypeKind::Int16 => UUID_INT16,
        SimpleTypeKind::UInt16 => UUID_UINT16,
        SimpleTypeKind::Int32 => UUID_INT32,
        SimpleTypeKind::UInt32 => UUID_UINT32,
        SimpleTypeKind::Int64 => UUID_INT64,
        SimpleTypeKind::UInt64 => UUID_UINT64,
        SimpleTypeKind::Float32 => UUID_FLOAT32,
        SimpleTypeKind::Float64 => UUID_FLOAT64,
        SimpleTypeKind::Duration => UUID_DURATION,
        SimpleTypeKind::DateTime => UUID_DATETIME,
        SimpleTypeKind::String8 => UUID_STRING8,
    }
}

/// Simple kind for a well-known identifier.
pub fn simple_kind_of(uuid: &Uuid) -> Option<SimpleTypeKind> {
    if *uuid == UUID_VOID {
        return Some(SimpleTypeKind::None);
    }
    SimpleTypeKind::VALUE_KINDS
        .iter()
        .copied()
        .find(|kind| uuid_of(*kind) == *uuid)
}

/// Parse the canonical 8-4-4-4-12 hexadecimal form (either case).
///
/// Other textual forms accepted by the `uuid` crate (simple, braced, URN)
/// are rejected.
pub fn parse_uuid(text: &str) -> Result<Uuid> {
    let bytes = text.as_bytes();
    let hyphens_ok = bytes.len() == UUID_TEXT_LEN
        && [8, 13, 18, 23].iter().all(|&i| bytes[i] == b'-');
    if !hyphens_ok {
        return Err(Error::InvalidUuid(text.to_string()));
    }
    Uuid::parse_str(text).map_err(|_| Error::InvalidUuid(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_layout() {
        let (d1, d2, d3, d4) = UUID_INT32.as_fields();
        assert_eq!((d1, d2, d3), (0, 0, 0));
        assert_eq!(d4, b"   Int32");
    }

    #[test]
    fn test_simple_kind_mapping() {
        for kind in SimpleTypeKind::VALUE_KINDS {
            assert_eq!(simple_kind_of(&uuid_of(kind)), Some(kind));
        }
        assert_eq!(simple_kind_of(&UUID_VOID), Some(SimpleTypeKind::None));
        assert_eq!(simple_kind_of(&Uuid::from_u128(0x1234)), None);
    }

    #[test]
    fn test_parse_canonical() {
        let uuid = parse_uuid("6F1E4A2B-0C3D-4E5F-8A9B-0C1D2E3F4A5B").expect("parse");
        assert_eq!(uuid.to_string(), "6f1e4a2b-0c3d-4e5f-8a9b-0c1d2e3f4a5b");
        assert_eq!(parse_uuid(&uuid.to_string()).expect("reparse"), uuid);
    }

    #[test]
    fn test_parse_rejects_other_forms() {
        assert!(parse_uuid("6f1e4a2b0c3d4e5f8a9b0c1d2e3f4a5b").is_err());
        assert!(parse_uuid("{6f1e4a2b-0c3d-4e5f-8a9b-0c1d2e3f4a5b}").is_err());
        assert!(parse_uuid("6f1e4a2b-0c3d-4e5f-8a9b-0c1d2e3f4a5g").is_err());
        assert!(parse_uuid("6f1e4a2b+0c3d-4e5f-8a9b-0c1d2e3f4a5b").is_err());
    }
}
