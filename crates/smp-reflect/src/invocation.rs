// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Operation publication and dynamic invocation.
//!
//! Operations are published with a handler closure. Callers drive a call
//! through a [`RequestHandle`]: create, bind parameters, invoke, read the
//! return value, delete.
//!
//! # Example
//!
//! ```rust
//! use smp_reflect::{AnySimple, HashMapTypeRegistry, Publication, UUID_FLOAT64, UUID_INT32};
//! use std::sync::Arc;
//!
//! let mut publication = Publication::new(Arc::new(HashMapTypeRegistry::new()));
//! publication
//!     .publish_operation("Scale", "Scale a count", UUID_FLOAT64, |args| {
//!         let count = i32::try_from(&args[0])?;
//!         let factor = f64::try_from(&args[1])?;
//!         Ok(AnySimple::from(f64::from(count) * factor))
//!     })
//!     .unwrap()
//!     .publish_parameter("count", "Count", UUID_INT32)
//!     .unwrap()
//!     .publish_parameter("factor", "Factor", UUID_FLOAT64)
//!     .unwrap();
//!
//! let handle = publication.create_request("Scale").expect("published");
//! let request = publication.request_mut(handle).unwrap();
//! request.set_parameter_value(0, 4i32).unwrap();
//! request.set_parameter_by_name("factor", 0.5f64).unwrap();
//! publication.invoke(handle).unwrap();
//! let result = publication.request_mut(handle).unwrap().return_value().unwrap();
//! assert_eq!(result, AnySimple::Float64(2.0));
//! publication.delete_request(handle).unwrap();
//! ```

use crate::error::{Error, Result};
use crate::path::is_identifier;
use crate::publication::Publication;
use crate::request::{Request, RequestState};
use crate::type_uuid::Uuid;
use crate::types::TypeRegistry;
use crate::value::{AnySimple, SimpleTypeKind};
use std::cell::RefCell;

/// Handler executing a published operation on its arguments.
pub type OperationHandler<'a> = Box<dyn FnMut(&[AnySimple]) -> Result<AnySimple> + 'a>;

/// Formal parameter of a published operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub description: String,
    pub type_uuid: Uuid,
    pub kind: SimpleTypeKind,
}

/// A published operation.
pub struct OperationDescriptor<'a> {
    name: String,
    description: String,
    return_type: Uuid,
    return_kind: SimpleTypeKind,
    parameters: Vec<ParameterDescriptor>,
    handler: RefCell<OperationHandler<'a>>,
}

impl<'a> OperationDescriptor<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn return_type(&self) -> Uuid {
        self.return_type
    }

    /// Declared return kind (`None` for void operations).
    pub fn return_kind(&self) -> SimpleTypeKind {
        self.return_kind
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Check the declared signature against the expected one.
    pub(crate) fn check_signature(
        &self,
        parameters: &[SimpleTypeKind],
        return_kind: SimpleTypeKind,
    ) -> Result<()> {
        let matches = self.return_kind == return_kind
            && self.parameters.len() == parameters.len()
            && self
                .parameters
                .iter()
                .zip(parameters)
                .all(|(declared, expected)| declared.kind == *expected);
        if !matches {
            return Err(Error::UnsupportedType(format!(
                "operation '{}' does not have the expected signature",
                self.name
            )));
        }
        Ok(())
    }

    /// Run the handler and check the returned kind.
    pub(crate) fn call(&self, arguments: &[AnySimple]) -> Result<AnySimple> {
        let mut handler = self.handler.try_borrow_mut().map_err(|_| {
            Error::InvalidState(format!("operation '{}' is already running", self.name))
        })?;
        let value = (&mut **handler)(arguments)?;
        if value.kind() != self.return_kind {
            return Err(Error::InvalidReturnValue {
                operation: self.name.clone(),
                expected: self.return_kind,
                actual: value.kind(),
            });
        }
        Ok(value)
    }
}

impl std::fmt::Debug for OperationDescriptor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("name", &self.name)
            .field("return_kind", &self.return_kind)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Kind exchanged for a parameter or return type; `UUID_VOID` maps to `None`.
fn exchange_kind(types: &dyn TypeRegistry, uuid: &Uuid) -> Result<SimpleTypeKind> {
    types
        .resolve(uuid)
        .ok_or(Error::TypeNotRegistered(*uuid))?
        .simple_kind()
        .ok_or_else(|| Error::UnsupportedType(format!("{} is not a simple type", uuid)))
}

/// Handle declaring the parameters of a freshly published operation.
pub struct OperationPublisher<'p, 'a> {
    operation: &'p mut OperationDescriptor<'a>,
    types: &'p dyn TypeRegistry,
}

impl OperationPublisher<'_, '_> {
    /// Append a parameter of a simple type.
    pub fn publish_parameter(
        &mut self,
        name: &str,
        description: &str,
        type_uuid: Uuid,
    ) -> Result<&mut Self> {
        if !is_identifier(name) {
            return Err(Error::InvalidFieldName(name.to_string()));
        }
        if self.operation.parameters.iter().any(|p| p.name == name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        let kind = exchange_kind(self.types, &type_uuid)?;
        if kind == SimpleTypeKind::None {
            return Err(Error::UnsupportedType(format!(
                "parameter '{}' cannot be void",
                name
            )));
        }
        log::debug!(
            "[OperationPublisher::publish_parameter] {}.{} : {}",
            self.operation.name,
            name,
            kind
        );
        self.operation.parameters.push(ParameterDescriptor {
            name: name.to_string(),
            description: description.to_string(),
            type_uuid,
            kind,
        });
        Ok(self)
    }
}

// ============================================================================
// Request table
// ============================================================================

/// Generational reference to a request owned by a [`Publication`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestHandle {
    index: usize,
    generation: u64,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    request: Option<Request>,
}

/// Slot table; a slot's generation advances each time it is freed.
#[derive(Debug, Default)]
pub(crate) struct RequestTable {
    slots: Vec<Slot>,
    free: Vec<usize>,
}

impl RequestTable {
    fn insert(&mut self, request: Request) -> RequestHandle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[index];
        slot.request = Some(request);
        RequestHandle {
            index,
            generation: slot.generation,
        }
    }

    fn slot(&self, handle: RequestHandle) -> Option<&Slot> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
    }

    fn get(&self, handle: RequestHandle) -> Result<&Request> {
        self.slot(handle)
            .and_then(|slot| slot.request.as_ref())
            .ok_or(Error::UseAfterRelease)
    }

    fn get_mut(&mut self, handle: RequestHandle) -> Result<&mut Request> {
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.request.as_mut())
            .ok_or(Error::UseAfterRelease)
    }

    fn remove(&mut self, handle: RequestHandle) -> Result<Request> {
        let slot = self
            .slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .ok_or(Error::UseAfterRelease)?;
        let request = slot.request.take().ok_or(Error::UseAfterRelease)?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Ok(request)
    }

    /// Requests created and not yet deleted.
    pub(crate) fn live(&self) -> usize {
        self.slots.iter().filter(|s| s.request.is_some()).count()
    }
}

// ============================================================================
// Publication: operations and requests
// ============================================================================

impl<'a> Publication<'a> {
    /// Publish an operation.
    ///
    /// `return_type` is a simple type identifier (or a registered alias of
    /// one); `UUID_VOID` declares an operation without return value, whose
    /// handler returns `AnySimple::None`. Declare parameters on the returned
    /// publisher, in call order.
    pub fn publish_operation<F>(
        &mut self,
        name: &str,
        description: &str,
        return_type: Uuid,
        handler: F,
    ) -> Result<OperationPublisher<'_, 'a>>
    where
        F: FnMut(&[AnySimple]) -> Result<AnySimple> + 'a,
    {
        if !is_identifier(name) {
            return Err(Error::InvalidOperationName(name.to_string()));
        }
        if self.operation(name).is_some() {
            return Err(Error::DuplicateName(name.to_string()));
        }
        let types: &dyn TypeRegistry = &*self.types;
        let return_kind = exchange_kind(types, &return_type)?;
        log::debug!(
            "[Publication::publish_operation] {} -> {}",
            name,
            return_kind
        );
        let index = self.operations.len();
        self.operations.push(OperationDescriptor {
            name: name.to_string(),
            description: description.to_string(),
            return_type,
            return_kind,
            parameters: Vec::new(),
            handler: RefCell::new(Box::new(handler)),
        });
        Ok(OperationPublisher {
            operation: &mut self.operations[index],
            types,
        })
    }

    /// Published operation called `name`.
    pub fn operation(&self, name: &str) -> Option<&OperationDescriptor<'a>> {
        self.operations.iter().find(|op| op.name == name)
    }

    /// Names of published operations, in publication order.
    pub fn operations(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.name.as_str()).collect()
    }

    /// Create a request for operation `name`.
    ///
    /// Returns `None` when no such operation was published.
    pub fn create_request(&mut self, name: &str) -> Option<RequestHandle> {
        let index = match self.operations.iter().position(|op| op.name == name) {
            Some(index) => index,
            None => {
                log::debug!("[Publication::create_request] unknown operation '{}'", name);
                return None;
            }
        };
        let operation = &self.operations[index];
        let request = Request::new(
            &operation.name,
            index,
            operation
                .parameters
                .iter()
                .map(|p| (p.name.clone(), p.kind)),
            operation.return_kind,
        );
        let handle = self.requests.insert(request);
        log::trace!("[Publication::create_request] {} -> {:?}", name, handle);
        Some(handle)
    }

    /// Like [`create_request`](Self::create_request), reporting an unknown
    /// operation as [`Error::InvalidOperationName`].
    pub fn try_create_request(&mut self, name: &str) -> Result<RequestHandle> {
        self.create_request(name)
            .ok_or_else(|| Error::InvalidOperationName(name.to_string()))
    }

    /// Live request behind `handle`.
    pub fn request(&self, handle: RequestHandle) -> Result<&Request> {
        self.requests.get(handle)
    }

    /// Live request behind `handle`, for binding and reading the result.
    pub fn request_mut(&mut self, handle: RequestHandle) -> Result<&mut Request> {
        self.requests.get_mut(handle)
    }

    /// Execute the request's operation.
    ///
    /// All parameters must be bound, and a request is invoked at most once
    /// between resets.
    pub fn invoke(&mut self, handle: RequestHandle) -> Result<()> {
        let request = self.requests.get_mut(handle)?;
        match request.state() {
            RequestState::Invoked | RequestState::ReturnRead => {
                return Err(Error::AlreadyInvoked(request.operation_name().to_string()));
            }
            RequestState::Unbound | RequestState::ParametersBound => {}
        }
        if let Some(parameter) = request.first_unbound() {
            return Err(Error::MissingParameter {
                operation: request.operation_name().to_string(),
                parameter: parameter.name().to_string(),
            });
        }
        let operation = self
            .operations
            .get(request.operation_index)
            .ok_or_else(|| Error::InvalidOperationName(request.operation_name().to_string()))?;
        log::trace!("[Publication::invoke] {}", operation.name);
        let value = operation.call(&request.arguments())?;
        request.complete(value);
        Ok(())
    }

    /// Release a request.
    ///
    /// Accepts the `Option` returned by `create_request`; releasing `None`
    /// does nothing. Released or foreign handles report
    /// [`Error::UseAfterRelease`].
    pub fn delete_request(&mut self, handle: impl Into<Option<RequestHandle>>) -> Result<()> {
        let Some(handle) = handle.into() else {
            return Ok(());
        };
        let request = self.requests.remove(handle)?;
        log::trace!(
            "[Publication::delete_request] {} ({:?})",
            request.operation_name(),
            handle
        );
        Ok(())
    }

    /// Requests created and not yet deleted.
    pub fn live_requests(&self) -> usize {
        self.requests.live()
    }
}
