// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry boundary.
//!
//! Publication consumes type descriptions through the [`TypeRegistry`]
//! trait; it never owns or populates a registry itself. Hosts inject the
//! registry when creating a [`Publication`](crate::Publication).
//! [`HashMapTypeRegistry`] is a plain in-memory implementation suitable for
//! tests and small hosts.

use crate::error::{Error, Result};
use crate::type_uuid::{simple_kind_of, Uuid};
use crate::value::SimpleTypeKind;
use std::collections::HashMap;

/// Memory layout of a registered type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeLayout {
    /// Integer or float type mapped onto a simple kind.
    Simple(SimpleTypeKind),
    /// Enumeration stored as a signed integer of 1, 2, 4 or 8 bytes.
    Enumeration { memory_size: usize },
    /// Fixed-capacity, NUL-terminated 8-bit string of at most `length` chars.
    String { length: usize },
    /// Fixed-size array; item `i` starts at `i * item_size`.
    Array {
        item_type: Uuid,
        item_size: usize,
        count: usize,
    },
    /// Structure with members at fixed byte offsets.
    Structure(Vec<StructureField>),
}

/// Member of a structure type.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureField {
    pub name: String,
    pub description: String,
    pub type_uuid: Uuid,
    /// Byte offset from the start of the structure.
    pub offset: usize,
}

/// A registered type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    pub uuid: Uuid,
    pub name: String,
    pub description: String,
    pub layout: TypeLayout,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, uuid: Uuid, layout: TypeLayout) -> Self {
        Self {
            uuid,
            name: name.into(),
            description: String::new(),
            layout,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Simple kind used to exchange values of this type, if any.
    pub fn simple_kind(&self) -> Option<SimpleTypeKind> {
        match &self.layout {
            TypeLayout::Simple(kind) => Some(*kind),
            TypeLayout::Enumeration { memory_size } => enumeration_kind(*memory_size),
            TypeLayout::String { .. } => Some(SimpleTypeKind::String8),
            TypeLayout::Array { .. } | TypeLayout::Structure(_) => None,
        }
    }

    /// Get structure member by name.
    pub fn field(&self, name: &str) -> Option<&StructureField> {
        match &self.layout {
            TypeLayout::Structure(fields) => fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }
}

/// Integer kind backing an enumeration of the given size.
pub(crate) fn enumeration_kind(memory_size: usize) -> Option<SimpleTypeKind> {
    match memory_size {
        1 => Some(SimpleTypeKind::Int8),
        2 => Some(SimpleTypeKind::Int16),
        4 => Some(SimpleTypeKind::Int32),
        8 => Some(SimpleTypeKind::Int64),
        _ => None,
    }
}

/// Result of resolving a type identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedType<'r> {
    /// Well-known simple type (no registration needed).
    Simple(SimpleTypeKind),
    /// Type found in the registry.
    Registered(&'r TypeDescriptor),
}

impl ResolvedType<'_> {
    /// Simple kind used to exchange values of this type, if any.
    pub fn simple_kind(&self) -> Option<SimpleTypeKind> {
        match self {
            Self::Simple(kind) => Some(*kind),
            Self::Registered(desc) => desc.simple_kind(),
        }
    }
}

/// Lookup service mapping type identifiers to descriptions.
pub trait TypeRegistry: Send + Sync {
    /// Look up a registered type.
    ///
    /// Returns `None` if the identifier is unknown.
    fn lookup(&self, uuid: &Uuid) -> Option<&TypeDescriptor>;

    /// Resolve well-known simple identifiers, then registered types.
    fn resolve(&self, uuid: &Uuid) -> Option<ResolvedType<'_>> {
        if let Some(kind) = simple_kind_of(uuid) {
            return Some(ResolvedType::Simple(kind));
        }
        self.lookup(uuid).map(ResolvedType::Registered)
    }
}

/// Size in bytes of an instance of `uuid` in host memory.
///
/// `max_depth` bounds nesting of arrays and structures; exceeding it reports
/// the composite type as recursive.
pub fn type_size(registry: &dyn TypeRegistry, uuid: &Uuid, max_depth: usize) -> Result<usize> {
    match registry.resolve(uuid) {
        None => Err(Error::TypeNotRegistered(*uuid)),
        Some(ResolvedType::Simple(kind)) => kind
            .size()
            .filter(|size| *size > 0)
            .ok_or_else(|| Error::UnsupportedType(format!("{} has no fixed size", kind))),
        Some(ResolvedType::Registered(desc)) => match &desc.layout {
            TypeLayout::Simple(kind) => kind
                .size()
                .ok_or_else(|| Error::UnsupportedType(format!("{} has no fixed size", kind))),
            TypeLayout::Enumeration { memory_size } => Ok(*memory_size),
            TypeLayout::String { length } => length
                .checked_add(1)
                .ok_or_else(|| overflow(&desc.name)),
            _ if max_depth == 0 => Err(Error::RecursiveType(*uuid)),
            TypeLayout::Array {
                item_size, count, ..
            } => item_size
                .checked_mul(*count)
                .ok_or_else(|| overflow(&desc.name)),
            TypeLayout::Structure(fields) => {
                let mut size = 0;
                for field in fields {
                    let member = type_size(registry, &field.type_uuid, max_depth - 1)?;
                    let end = field
                        .offset
                        .checked_add(member)
                        .ok_or_else(|| overflow(&desc.name))?;
                    size = size.max(end);
                }
                Ok(size)
            }
        },
    }
}

fn overflow(name: &str) -> Error {
    Error::InvalidLayout(format!("size of '{}' overflows usize", name))
}

/// Simple [`HashMap`]-backed [`TypeRegistry`].
#[derive(Debug, Default)]
pub struct HashMapTypeRegistry {
    types: HashMap<Uuid, TypeDescriptor>,
}

impl HashMapTypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its own identifier.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<()> {
        if simple_kind_of(&descriptor.uuid).is_some() || self.types.contains_key(&descriptor.uuid) {
            return Err(Error::DuplicateName(descriptor.uuid.to_string()));
        }
        log::debug!(
            "[HashMapTypeRegistry::register] {} as {}",
            descriptor.name,
            descriptor.uuid
        );
        self.types.insert(descriptor.uuid, descriptor);
        Ok(())
    }

    /// Register an integer type backed by an integer kind.
    pub fn add_integer_type(
        &mut self,
        name: impl Into<String>,
        uuid: Uuid,
        kind: SimpleTypeKind,
    ) -> Result<()> {
        let is_integer = matches!(
            kind,
            SimpleTypeKind::Int8
                | SimpleTypeKind::Int16
                | SimpleTypeKind::Int32
                | SimpleTypeKind::Int64
                | SimpleTypeKind::UInt8
                | SimpleTypeKind::UInt16
                | SimpleTypeKind::UInt32
                | SimpleTypeKind::UInt64
        );
        if !is_integer {
            return Err(Error::UnsupportedType(format!("{} is not an integer", kind)));
        }
        self.register(TypeDescriptor::new(name, uuid, TypeLayout::Simple(kind)))
    }

    /// Register a float type backed by `Float32` or `Float64`.
    pub fn add_float_type(
        &mut self,
        name: impl Into<String>,
        uuid: Uuid,
        kind: SimpleTypeKind,
    ) -> Result<()> {
        if !matches!(kind, SimpleTypeKind::Float32 | SimpleTypeKind::Float64) {
            return Err(Error::UnsupportedType(format!("{} is not a float", kind)));
        }
        self.register(TypeDescriptor::new(name, uuid, TypeLayout::Simple(kind)))
    }

    /// Register an enumeration of 1, 2, 4 or 8 bytes.
    pub fn add_enumeration_type(
        &mut self,
        name: impl Into<String>,
        uuid: Uuid,
        memory_size: usize,
    ) -> Result<()> {
        if enumeration_kind(memory_size).is_none() {
            return Err(Error::UnsupportedType(format!(
                "enumeration size {} (expected 1, 2, 4 or 8)",
                memory_size
            )));
        }
        self.register(TypeDescriptor::new(
            name,
            uuid,
            TypeLayout::Enumeration { memory_size },
        ))
    }

    /// Register a fixed-capacity string type.
    pub fn add_string_type(&mut self, name: impl Into<String>, uuid: Uuid, length: usize) -> Result<()> {
        self.register(TypeDescriptor::new(name, uuid, TypeLayout::String { length }))
    }

    /// Register an array type.
    pub fn add_array_type(
        &mut self,
        name: impl Into<String>,
        uuid: Uuid,
        item_type: Uuid,
        item_size: usize,
        count: usize,
    ) -> Result<()> {
        self.register(TypeDescriptor::new(
            name,
            uuid,
            TypeLayout::Array {
                item_type,
                item_size,
                count,
            },
        ))
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeRegistry for HashMapTypeRegistry {
    fn lookup(&self, uuid: &Uuid) -> Option<&TypeDescriptor> {
        self.types.get(uuid)
    }
}

/// Fluent builder for structure types.
///
/// ```rust
/// use smp_reflect::{StructureTypeBuilder, UUID_FLOAT64, Uuid};
///
/// let vector3 = StructureTypeBuilder::new("Vector3", Uuid::from_u128(0x10))
///     .field("x", UUID_FLOAT64, 0)
///     .field("y", UUID_FLOAT64, 8)
///     .field("z", UUID_FLOAT64, 16)
///     .build();
/// assert!(vector3.field("y").is_some());
/// ```
#[derive(Debug)]
pub struct StructureTypeBuilder {
    name: String,
    description: String,
    uuid: Uuid,
    fields: Vec<StructureField>,
}

impl StructureTypeBuilder {
    /// Create a new builder for a structure type.
    pub fn new(name: impl Into<String>, uuid: Uuid) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            uuid,
            fields: Vec::new(),
        }
    }

    /// Set the type description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a member at a byte offset.
    pub fn field(mut self, name: impl Into<String>, type_uuid: Uuid, offset: usize) -> Self {
        self.fields.push(StructureField {
            name: name.into(),
            description: String::new(),
            type_uuid,
            offset,
        });
        self
    }

    /// Add a documented member at a byte offset.
    pub fn described_field(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        type_uuid: Uuid,
        offset: usize,
    ) -> Self {
        self.fields.push(StructureField {
            name: name.into(),
            description: description.into(),
            type_uuid,
            offset,
        });
        self
    }

    /// Build the descriptor.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::new(self.name, self.uuid, TypeLayout::Structure(self.fields))
            .with_description(self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_uuid::{UUID_FLOAT64, UUID_INT32, UUID_INT64};

    const VECTOR3: Uuid = Uuid::from_u128(0x5601);
    const SAMPLES: Uuid = Uuid::from_u128(0x5602);
    const NODE: Uuid = Uuid::from_u128(0x5603);

    #[test]
    fn test_resolve_simple_without_registration() {
        let registry = HashMapTypeRegistry::new();
        assert_eq!(
            registry.resolve(&UUID_INT32),
            Some(ResolvedType::Simple(SimpleTypeKind::Int32))
        );
        assert!(registry.resolve(&VECTOR3).is_none());
    }

    #[test]
    fn test_structure_size() {
        let mut registry = HashMapTypeRegistry::new();
        registry
            .register(
                StructureTypeBuilder::new("Vector3", VECTOR3)
                    .field("x", UUID_FLOAT64, 0)
                    .field("y", UUID_FLOAT64, 8)
                    .field("z", UUID_FLOAT64, 16)
                    .build(),
            )
            .expect("register");
        registry
            .add_array_type("Samples", SAMPLES, VECTOR3, 24, 4)
            .expect("register");

        assert_eq!(type_size(&registry, &VECTOR3, 8), Ok(24));
        assert_eq!(type_size(&registry, &SAMPLES, 8), Ok(96));
    }

    #[test]
    fn test_recursive_size_is_bounded() {
        let mut registry = HashMapTypeRegistry::new();
        registry
            .register(
                StructureTypeBuilder::new("Node", NODE)
                    .field("value", UUID_INT64, 0)
                    .field("next", NODE, 8)
                    .build(),
            )
            .expect("register");
        assert_eq!(type_size(&registry, &NODE, 8), Err(Error::RecursiveType(NODE)));
    }

    #[test]
    fn test_depth_limit_spares_simple_leaves() {
        let mut registry = HashMapTypeRegistry::new();
        registry
            .register(
                StructureTypeBuilder::new("Vector3", VECTOR3)
                    .field("x", UUID_INT64, 0)
                    .build(),
            )
            .expect("register");
        assert_eq!(type_size(&registry, &VECTOR3, 1), Ok(8));
        assert_eq!(type_size(&registry, &UUID_INT64, 0), Ok(8));
    }

    #[test]
    fn test_oversized_layouts_report_invalid_layout() {
        let mut registry = HashMapTypeRegistry::new();
        registry
            .add_array_type("Samples", SAMPLES, UUID_INT64, 8, usize::MAX)
            .expect("register");
        registry
            .register(
                StructureTypeBuilder::new("Vector3", VECTOR3)
                    .field("tail", UUID_INT64, usize::MAX - 4)
                    .build(),
            )
            .expect("register");
        assert!(matches!(
            type_size(&registry, &SAMPLES, 8),
            Err(Error::InvalidLayout(_))
        ));
        assert!(matches!(
            type_size(&registry, &VECTOR3, 8),
            Err(Error::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_register_rejects_duplicates_and_simple_uuids() {
        let mut registry = HashMapTypeRegistry::new();
        registry
            .add_enumeration_type("Mode", VECTOR3, 4)
            .expect("register");
        assert!(registry.add_enumeration_type("Mode", VECTOR3, 4).is_err());
        assert!(registry.add_string_type("Name", UUID_INT32, 8).is_err());
        assert!(registry.add_enumeration_type("Bad", SAMPLES, 3).is_err());
        assert!(registry.add_integer_type("Gain", SAMPLES, SimpleTypeKind::Float64).is_err());
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.lookup(&VECTOR3).and_then(TypeDescriptor::simple_kind),
            Some(SimpleTypeKind::Int32)
        );
    }
}
