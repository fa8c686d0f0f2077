// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-component publication registry.
//!
//! A component publishes its fields, arrays, structures and properties into
//! a [`Publication`] during initialization. Tooling then addresses any
//! published value by path and exchanges it as an [`AnySimple`].
//!
//! # Example
//!
//! ```rust
//! use smp_reflect::{AnySimple, FieldFlags, HashMapTypeRegistry, Publication};
//! use std::cell::Cell;
//! use std::sync::Arc;
//!
//! let altitude = Cell::new(0.0f64);
//! let samples = [Cell::new(0i32), Cell::new(0), Cell::new(0)];
//!
//! let mut publication = Publication::new(Arc::new(HashMapTypeRegistry::new()));
//! let mut state = publication.publish_structure("State", "Flight state").unwrap();
//! state.publish_field("Altitude", "Metres", &altitude, FieldFlags::default()).unwrap();
//! state.publish_array("Samples", "Last samples", &samples, FieldFlags::default()).unwrap();
//!
//! publication.set_field_value("State.Altitude", 1200.0f64).unwrap();
//! publication.set_field_value("State.Samples[2]", 7i32).unwrap();
//! assert_eq!(altitude.get(), 1200.0);
//! assert_eq!(publication.get_field_value("State.Samples[2]").unwrap(), AnySimple::Int32(7));
//! ```

use crate::address::{RawAddress, SimpleAddress};
use crate::config::{ReflectionConfig, GETTER_PREFIX, SETTER_PREFIX};
use crate::error::{Error, Result};
use crate::invocation::{OperationDescriptor, RequestTable};
use crate::path::{self, is_identifier};
use crate::type_uuid::Uuid;
use crate::types::{type_size, ResolvedType, TypeLayout, TypeRegistry};
use crate::value::{AnySimple, SimpleTypeKind};
use std::cell::Cell;
use std::sync::Arc;

/// Publication flags of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldFlags {
    /// Visible to tooling (model trees, editors).
    pub view: bool,
    /// Part of the component state (persisted by store/restore).
    pub state: bool,
    /// Input field (data-flow target).
    pub input: bool,
    /// Output field (data-flow source).
    pub output: bool,
}

impl Default for FieldFlags {
    fn default() -> Self {
        Self {
            view: true,
            state: true,
            input: false,
            output: false,
        }
    }
}

impl FieldFlags {
    #[must_use]
    pub fn with_view(mut self, view: bool) -> Self {
        self.view = view;
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: bool) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn with_input(mut self, input: bool) -> Self {
        self.input = input;
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: bool) -> Self {
        self.output = output;
        self
    }
}

/// Directions in which a property may be accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessKind {
    pub fn can_read(self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite)
    }

    pub fn can_write(self) -> bool {
        matches!(self, Self::WriteOnly | Self::ReadWrite)
    }
}

/// Published leaf as reported by [`Publication::fields`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Full path usable with `get_field_value` / `get_array_value`.
    pub path: String,
    pub description: String,
    pub kind: SimpleTypeKind,
    /// Element count (1 for scalars).
    pub count: usize,
    pub flags: FieldFlags,
}

// ============================================================================
// Publication tree
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    /// Children addressed by `.name`.
    Structure,
    /// Children addressed by `[index]` in publication order.
    Array,
}

#[derive(Debug)]
struct Scope<'a> {
    kind: ScopeKind,
    entries: Vec<Entry<'a>>,
}

impl<'a> Scope<'a> {
    fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    fn find(&self, name: &str) -> Option<&Entry<'a>> {
        self.entries.iter().find(|e| e.name == name)
    }

    fn insert(&mut self, name: &str, description: &str, node: Node<'a>) -> Result<&mut Entry<'a>> {
        if !is_identifier(name) {
            return Err(Error::InvalidFieldName(name.to_string()));
        }
        if self.find(name).is_some() {
            log::debug!("[Scope::insert] duplicate name '{}'", name);
            return Err(Error::DuplicateName(name.to_string()));
        }
        let index = self.entries.len();
        self.entries.push(Entry {
            name: name.to_string(),
            description: description.to_string(),
            node,
        });
        Ok(&mut self.entries[index])
    }
}

#[derive(Debug)]
struct Entry<'a> {
    name: String,
    description: String,
    node: Node<'a>,
}

#[derive(Debug)]
enum Node<'a> {
    Field(FieldNode<'a>),
    Scope(Scope<'a>),
    Property(PropertyNode),
}

#[derive(Debug)]
struct FieldNode<'a> {
    address: SimpleAddress<'a>,
    flags: FieldFlags,
    /// Published as an array (addressed with `[i]`), even with one element.
    array: bool,
}

#[derive(Debug)]
struct PropertyNode {
    kind: SimpleTypeKind,
    access: AccessKind,
}

/// What a path resolved to.
enum Located<'r, 'a> {
    Element(SimpleAddress<'a>, usize),
    Array(SimpleAddress<'a>),
    Property(&'r str, &'r PropertyNode),
    Composite,
}

// ============================================================================
// Publisher
// ============================================================================

/// Handle publishing into one scope (the component root, a structure or an
/// array scope).
pub struct Publisher<'p, 'a> {
    scope: &'p mut Scope<'a>,
    types: &'p dyn TypeRegistry,
    config: &'p ReflectionConfig,
}

impl<'p, 'a> Publisher<'p, 'a> {
    fn insert(&mut self, name: &str, description: &str, node: Node<'a>) -> Result<()> {
        self.scope.insert(name, description, node).map(|_| ())
    }

    fn reborrow(&mut self) -> Publisher<'_, 'a> {
        Publisher {
            scope: &mut *self.scope,
            types: self.types,
            config: self.config,
        }
    }

    // Consumes the publisher so the child scope borrows for `'p`.
    fn into_scope(
        self,
        name: &str,
        description: &str,
        kind: ScopeKind,
    ) -> Result<Publisher<'p, 'a>> {
        let Publisher {
            scope,
            types,
            config,
        } = self;
        let entry = scope.insert(name, description, Node::Scope(Scope::new(kind)))?;
        match &mut entry.node {
            Node::Scope(child) => Ok(Publisher {
                scope: child,
                types,
                config,
            }),
            _ => Err(Error::InvalidState(format!("'{}' is not a scope", name))),
        }
    }

    /// Publish a scalar field of a simple kind.
    ///
    /// Any `&Cell<T>` of a simple kind (or `&RefCell<String>`) converts into
    /// the address; use [`SimpleAddress::char8`] for 8-bit characters.
    pub fn publish_field(
        &mut self,
        name: &str,
        description: &str,
        address: impl Into<SimpleAddress<'a>>,
        flags: FieldFlags,
    ) -> Result<()> {
        let address = address.into();
        if address.len() != 1 {
            return Err(Error::InvalidLayout(format!(
                "field '{}' addresses {} elements (publish it as an array)",
                name,
                address.len()
            )));
        }
        log::debug!("[Publisher::publish_field] {} : {}", name, address.kind());
        self.insert(
            name,
            description,
            Node::Field(FieldNode {
                address,
                flags,
                array: false,
            }),
        )?;
        Ok(())
    }

    /// Publish a fixed-size array of a simple kind.
    ///
    /// Element `i` is `address[i]`.
    pub fn publish_array(
        &mut self,
        name: &str,
        description: &str,
        address: impl Into<SimpleAddress<'a>>,
        flags: FieldFlags,
    ) -> Result<()> {
        let address = address.into();
        if address.is_empty() {
            return Err(Error::InvalidLayout(format!("array '{}' has no elements", name)));
        }
        log::debug!(
            "[Publisher::publish_array] {} : {}[{}]",
            name,
            address.kind(),
            address.len()
        );
        self.insert(
            name,
            description,
            Node::Field(FieldNode {
                address,
                flags,
                array: true,
            }),
        )?;
        Ok(())
    }

    /// Publish a field of any type known to the type registry over a raw
    /// byte region.
    ///
    /// Structures, arrays and strings are expanded from the registered
    /// layout; values are stored with native endianness.
    pub fn publish_typed_field(
        &mut self,
        name: &str,
        description: &str,
        memory: &'a [Cell<u8>],
        type_uuid: Uuid,
        flags: FieldFlags,
    ) -> Result<()> {
        let size = type_size(self.types, &type_uuid, self.config.max_type_nesting)?;
        if memory.len() < size {
            return Err(Error::InvalidLayout(format!(
                "'{}' needs {} bytes, {} provided",
                name,
                size,
                memory.len()
            )));
        }
        let node = expand(
            self.types,
            &type_uuid,
            memory,
            flags,
            self.config.max_type_nesting,
        )?;
        log::debug!(
            "[Publisher::publish_typed_field] {} : {} ({} bytes)",
            name,
            type_uuid,
            size
        );
        self.insert(name, description, node)?;
        Ok(())
    }

    /// Publish a structure and return a publisher for its members.
    pub fn publish_structure(&mut self, name: &str, description: &str) -> Result<Publisher<'_, 'a>> {
        log::debug!("[Publisher::publish_structure] {}", name);
        self.reborrow().into_scope(name, description, ScopeKind::Structure)
    }

    /// Publish an array of complex or heterogeneous elements.
    ///
    /// Each item published through the returned handle becomes the next
    /// element: the first is `name[0]`, the second `name[1]`, and so on.
    pub fn publish_array_scope(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<Publisher<'_, 'a>> {
        log::debug!("[Publisher::publish_array_scope] {}", name);
        self.reborrow().into_scope(name, description, ScopeKind::Array)
    }

    /// Number of items published in this scope.
    pub fn len(&self) -> usize {
        self.scope.entries.len()
    }

    /// Returns `true` if nothing has been published in this scope.
    pub fn is_empty(&self) -> bool {
        self.scope.entries.is_empty()
    }
}

/// Build the node for a registered type laid out at `memory[0]`.
fn expand<'a>(
    types: &dyn TypeRegistry,
    uuid: &Uuid,
    memory: &'a [Cell<u8>],
    flags: FieldFlags,
    depth: usize,
) -> Result<Node<'a>> {
    let resolved = types
        .resolve(uuid)
        .ok_or(Error::TypeNotRegistered(*uuid))?;

    if let Some(kind) = resolved.simple_kind() {
        let size = type_size(types, uuid, depth)?;
        let raw = RawAddress::new(kind, memory, size, size, 1)?;
        return Ok(Node::Field(FieldNode {
            address: raw.into(),
            flags,
            array: false,
        }));
    }

    let layout = match resolved {
        ResolvedType::Registered(desc) => &desc.layout,
        ResolvedType::Simple(kind) => {
            return Err(Error::UnsupportedType(format!("{} cannot be published", kind)))
        }
    };
    if depth == 0 {
        return Err(Error::RecursiveType(*uuid));
    }

    match layout {
        TypeLayout::Array {
            item_type,
            item_size,
            count,
        } => {
            if *count == 0 {
                return Err(Error::InvalidLayout(format!("array type {} has no elements", uuid)));
            }
            let item = types
                .resolve(item_type)
                .ok_or(Error::TypeNotRegistered(*item_type))?;
            if let Some(kind) = item.simple_kind() {
                let element_size = type_size(types, item_type, depth - 1)?;
                let raw = RawAddress::new(kind, memory, element_size, *item_size, *count)?;
                return Ok(Node::Field(FieldNode {
                    address: raw.into(),
                    flags,
                    array: true,
                }));
            }
            let mut scope = Scope::new(ScopeKind::Array);
            for index in 0..*count {
                let offset = index.checked_mul(*item_size).ok_or_else(|| {
                    Error::InvalidLayout(format!("element {} offset overflows", index))
                })?;
                let slice = memory.get(offset..).ok_or_else(|| short(offset, memory))?;
                scope.entries.push(Entry {
                    name: index.to_string(),
                    description: String::new(),
                    node: expand(types, item_type, slice, flags, depth - 1)?,
                });
            }
            Ok(Node::Scope(scope))
        }
        TypeLayout::Structure(fields) => {
            let mut scope = Scope::new(ScopeKind::Structure);
            for field in fields {
                let slice = memory
                    .get(field.offset..)
                    .ok_or_else(|| short(field.offset, memory))?;
                let node = expand(types, &field.type_uuid, slice, flags, depth - 1)?;
                scope.insert(&field.name, &field.description, node)?;
            }
            Ok(Node::Scope(scope))
        }
        // Simple, enumeration and string layouts all have a simple kind.
        other => Err(Error::UnsupportedType(format!("{:?}", other))),
    }
}

fn short(offset: usize, memory: &[Cell<u8>]) -> Error {
    Error::InvalidLayout(format!(
        "offset {} beyond {}-byte region",
        offset,
        memory.len()
    ))
}

// ============================================================================
// Publication
// ============================================================================

/// Registry of everything one component has published.
///
/// The lifetime `'a` is the lifetime of the component memory and operation
/// handlers; the publication cannot outlive either.
pub struct Publication<'a> {
    root: Scope<'a>,
    pub(crate) types: Arc<dyn TypeRegistry>,
    config: ReflectionConfig,
    pub(crate) operations: Vec<OperationDescriptor<'a>>,
    pub(crate) requests: RequestTable,
}

impl<'a> Publication<'a> {
    /// Create an empty publication using `types` to resolve type identifiers.
    pub fn new(types: Arc<dyn TypeRegistry>) -> Self {
        Self {
            root: Scope::new(ScopeKind::Structure),
            types,
            config: ReflectionConfig::default(),
            operations: Vec::new(),
            requests: RequestTable::default(),
        }
    }

    /// Create an empty publication with explicit limits.
    pub fn with_config(types: Arc<dyn TypeRegistry>, config: ReflectionConfig) -> Result<Self> {
        config.validate()?;
        let mut publication = Self::new(types);
        publication.config = config;
        Ok(publication)
    }

    /// Injected type registry.
    pub fn type_registry(&self) -> &dyn TypeRegistry {
        &*self.types
    }

    pub fn config(&self) -> &ReflectionConfig {
        &self.config
    }

    /// Publisher for the component root scope.
    pub fn publisher(&mut self) -> Publisher<'_, 'a> {
        Publisher {
            scope: &mut self.root,
            types: &*self.types,
            config: &self.config,
        }
    }

    /// See [`Publisher::publish_field`].
    pub fn publish_field(
        &mut self,
        name: &str,
        description: &str,
        address: impl Into<SimpleAddress<'a>>,
        flags: FieldFlags,
    ) -> Result<()> {
        self.publisher().publish_field(name, description, address, flags)
    }

    /// See [`Publisher::publish_array`].
    pub fn publish_array(
        &mut self,
        name: &str,
        description: &str,
        address: impl Into<SimpleAddress<'a>>,
        flags: FieldFlags,
    ) -> Result<()> {
        self.publisher().publish_array(name, description, address, flags)
    }

    /// See [`Publisher::publish_typed_field`].
    pub fn publish_typed_field(
        &mut self,
        name: &str,
        description: &str,
        memory: &'a [Cell<u8>],
        type_uuid: Uuid,
        flags: FieldFlags,
    ) -> Result<()> {
        self.publisher()
            .publish_typed_field(name, description, memory, type_uuid, flags)
    }

    /// See [`Publisher::publish_structure`].
    pub fn publish_structure(&mut self, name: &str, description: &str) -> Result<Publisher<'_, 'a>> {
        log::debug!("[Publication::publish_structure] {}", name);
        self.publisher()
            .into_scope(name, description, ScopeKind::Structure)
    }

    /// See [`Publisher::publish_array_scope`].
    pub fn publish_array_scope(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<Publisher<'_, 'a>> {
        log::debug!("[Publication::publish_array_scope] {}", name);
        self.publisher()
            .into_scope(name, description, ScopeKind::Array)
    }

    /// Publish a property of a simple type.
    ///
    /// Reads go through operation `get_<name>` and writes through
    /// `set_<name>`; the component publishes those accessors with
    /// [`publish_operation`](Self::publish_operation).
    pub fn publish_property(
        &mut self,
        name: &str,
        description: &str,
        type_uuid: Uuid,
        access: AccessKind,
    ) -> Result<()> {
        let kind = self
            .types
            .resolve(&type_uuid)
            .ok_or(Error::TypeNotRegistered(type_uuid))?
            .simple_kind()
            .filter(|kind| *kind != SimpleTypeKind::None)
            .ok_or_else(|| {
                Error::UnsupportedType(format!("property '{}' needs a simple type", name))
            })?;
        log::debug!(
            "[Publication::publish_property] {} : {} ({:?})",
            name,
            kind,
            access
        );
        self.publisher()
            .insert(name, description, Node::Property(PropertyNode { kind, access }))?;
        Ok(())
    }

    // ========================================================================
    // Path access
    // ========================================================================

    fn locate(&self, path: &str) -> Result<Located<'_, 'a>> {
        let invalid = || Error::InvalidFieldName(path.to_string());
        let segments = path::parse(path, self.config.max_path_depth)?;
        let last = segments.len().saturating_sub(1);
        let mut scope = &self.root;

        for (position, segment) in segments.iter().enumerate() {
            let is_last = position == last;
            let mut entry = scope.find(segment.name).ok_or_else(invalid)?;

            if let Some(index) = segment.index {
                match &entry.node {
                    Node::Field(field) if field.array => {
                        if !is_last || index >= field.address.len() {
                            return Err(invalid());
                        }
                        return Ok(Located::Element(field.address, index));
                    }
                    Node::Scope(array) if array.kind == ScopeKind::Array => {
                        entry = array.entries.get(index).ok_or_else(invalid)?;
                    }
                    _ => return Err(invalid()),
                }
            }

            match &entry.node {
                Node::Field(field) if is_last => {
                    return Ok(if field.array {
                        Located::Array(field.address)
                    } else {
                        Located::Element(field.address, 0)
                    });
                }
                Node::Property(property) if is_last => {
                    return Ok(Located::Property(&entry.name, property));
                }
                Node::Scope(_) if is_last => return Ok(Located::Composite),
                Node::Scope(child) if child.kind == ScopeKind::Structure => scope = child,
                _ => return Err(invalid()),
            }
        }
        Err(invalid())
    }

    /// Read the simple value at `path`.
    pub fn get_field_value(&self, path: &str) -> Result<AnySimple> {
        log::trace!("[Publication::get_field_value] {}", path);
        match self.locate(path)? {
            Located::Element(address, index) => address.read(index),
            Located::Property(name, property) => self.read_property(name, property),
            Located::Array(_) | Located::Composite => {
                Err(Error::InvalidFieldName(path.to_string()))
            }
        }
    }

    /// Write the simple value at `path`.
    ///
    /// The value kind must equal the field kind; memory is left unchanged
    /// otherwise.
    pub fn set_field_value(&self, path: &str, value: impl Into<AnySimple>) -> Result<()> {
        let value = value.into();
        log::trace!("[Publication::set_field_value] {} = {}", path, value);
        match self.locate(path)? {
            Located::Element(address, index) => {
                check_kind(path, address.kind(), &value)?;
                address.write(index, &value)
            }
            Located::Property(name, property) => self.write_property(path, name, property, value),
            Located::Array(_) | Located::Composite => {
                Err(Error::InvalidFieldName(path.to_string()))
            }
        }
    }

    fn array_at(&self, path: &str, length: usize, buffer: usize) -> Result<SimpleAddress<'a>> {
        let address = match self.locate(path)? {
            Located::Array(address) => address,
            _ => return Err(Error::InvalidFieldName(path.to_string())),
        };
        let count = address.len();
        if length != count || buffer != count {
            return Err(Error::LengthMismatch {
                path: path.to_string(),
                expected: count,
                actual: if length != count { length } else { buffer },
            });
        }
        Ok(address)
    }

    /// Copy all `length` elements of the array at `path` into `out`.
    ///
    /// `length` and `out.len()` must both equal the published count.
    pub fn get_array_value(&self, path: &str, out: &mut [AnySimple], length: usize) -> Result<()> {
        let address = self.array_at(path, length, out.len())?;
        let values = (0..length)
            .map(|index| address.read(index))
            .collect::<Result<Vec<_>>>()?;
        for (slot, value) in out.iter_mut().zip(values) {
            *slot = value;
        }
        Ok(())
    }

    /// Copy `length` values into the array at `path`.
    ///
    /// Every value is checked before the first element is written.
    pub fn set_array_value(&self, path: &str, values: &[AnySimple], length: usize) -> Result<()> {
        let address = self.array_at(path, length, values.len())?;
        for (index, value) in values.iter().enumerate() {
            check_kind(&format!("{}[{}]", path, index), address.kind(), value)?;
            address.validate(value)?;
        }
        log::trace!("[Publication::set_array_value] {} ({} elements)", path, length);
        for (index, value) in values.iter().enumerate() {
            address.write(index, value)?;
        }
        Ok(())
    }

    fn read_property(&self, name: &str, property: &PropertyNode) -> Result<AnySimple> {
        if !property.access.can_read() {
            return Err(Error::AccessDenied(format!("property '{}' is write-only", name)));
        }
        let getter = format!("{}{}", GETTER_PREFIX, name);
        let operation = self
            .operation(&getter)
            .ok_or(Error::InvalidOperationName(getter))?;
        operation.check_signature(&[], property.kind)?;
        operation.call(&[])
    }

    fn write_property(
        &self,
        path: &str,
        name: &str,
        property: &PropertyNode,
        value: AnySimple,
    ) -> Result<()> {
        if !property.access.can_write() {
            return Err(Error::AccessDenied(format!("property '{}' is read-only", name)));
        }
        check_kind(path, property.kind, &value)?;
        let setter = format!("{}{}", SETTER_PREFIX, name);
        let operation = self
            .operation(&setter)
            .ok_or(Error::InvalidOperationName(setter))?;
        operation.check_signature(&[property.kind], SimpleTypeKind::None)?;
        operation.call(&[value]).map(|_| ())
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Every published field, depth first in publication order.
    pub fn fields(&self) -> Vec<FieldInfo> {
        let mut out = Vec::new();
        collect_fields(&self.root, "", &mut out);
        out
    }

    /// Published fields flagged as component state.
    pub fn state_fields(&self) -> Vec<FieldInfo> {
        self.fields().into_iter().filter(|f| f.flags.state).collect()
    }

    /// Current value of every state field element, keyed by path.
    ///
    /// Array elements are listed individually (`Samples[0]`, `Samples[1]`).
    pub fn store_state(&self) -> Result<Vec<(String, AnySimple)>> {
        let mut values = Vec::new();
        for field in self.state_fields() {
            if self.is_scalar(&field.path) {
                let value = self.get_field_value(&field.path)?;
                values.push((field.path, value));
            } else {
                for index in 0..field.count {
                    let path = format!("{}[{}]", field.path, index);
                    let value = self.get_field_value(&path)?;
                    values.push((path, value));
                }
            }
        }
        log::debug!("[Publication::store_state] {} values", values.len());
        Ok(values)
    }

    /// Write values produced by [`store_state`](Self::store_state).
    ///
    /// Every entry is checked before the first one is written.
    pub fn restore_state(&self, values: &[(String, AnySimple)]) -> Result<()> {
        for (path, value) in values {
            match self.locate(path)? {
                Located::Element(address, _) => {
                    check_kind(path, address.kind(), value)?;
                    address.validate(value)?;
                }
                _ => return Err(Error::InvalidFieldName(path.clone())),
            }
        }
        for (path, value) in values {
            if let Located::Element(address, index) = self.locate(path)? {
                address.write(index, value)?;
            }
        }
        log::debug!("[Publication::restore_state] {} values", values.len());
        Ok(())
    }

    fn is_scalar(&self, path: &str) -> bool {
        matches!(self.locate(path), Ok(Located::Element(..)))
    }

    /// Names of published properties.
    pub fn properties(&self) -> Vec<&str> {
        self.root
            .entries
            .iter()
            .filter_map(|e| match e.node {
                Node::Property(_) => Some(e.name.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn check_kind(path: &str, expected: SimpleTypeKind, value: &AnySimple) -> Result<()> {
    if value.kind() != expected {
        return Err(Error::TypeMismatch {
            path: path.to_string(),
            expected,
            actual: value.kind(),
        });
    }
    Ok(())
}

fn collect_fields(scope: &Scope<'_>, prefix: &str, out: &mut Vec<FieldInfo>) {
    for (index, entry) in scope.entries.iter().enumerate() {
        let path = match (scope.kind, prefix.is_empty()) {
            (ScopeKind::Array, _) => format!("{}[{}]", prefix, index),
            (ScopeKind::Structure, true) => entry.name.clone(),
            (ScopeKind::Structure, false) => format!("{}.{}", prefix, entry.name),
        };
        match &entry.node {
            Node::Field(field) => out.push(FieldInfo {
                path,
                description: entry.description.clone(),
                kind: field.address.kind(),
                count: field.address.len(),
                flags: field.flags,
            }),
            Node::Scope(child) => collect_fields(child, &path, out),
            Node::Property(_) => {}
        }
    }
}

impl Drop for Publication<'_> {
    fn drop(&mut self) {
        let live = self.requests.live();
        if self.config.leak_check && live > 0 {
            log::warn!(
                "[Publication::drop] {} request(s) never released with delete_request",
                live
            );
        }
    }
}

impl std::fmt::Debug for Publication<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publication")
            .field("fields", &self.fields().len())
            .field("operations", &self.operations.len())
            .field("live_requests", &self.requests.live())
            .finish()
    }
}
