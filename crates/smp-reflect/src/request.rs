// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic operation requests.
//!
//! A [`Request`] carries the arguments and the return slot of one call to a
//! published operation. It is created by
//! [`Publication::create_request`](crate::Publication::create_request),
//! filled through its parameter setters, executed with
//! [`Publication::invoke`](crate::Publication::invoke) and released with
//! [`Publication::delete_request`](crate::Publication::delete_request).
//!
//! ```text
//! Unbound --bind all--> ParametersBound --invoke--> Invoked --return_value--> ReturnRead
//!                              ^                        |                         |
//!                              +--------- reset --------+-------------------------+
//! ```

use crate::error::{Error, Result};
use crate::value::{AnySimple, SimpleTypeKind};

/// Lifecycle position of a request.
///
/// Release is not a state: a released request no longer exists and its
/// handle reports [`Error::UseAfterRelease`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestState {
    /// At least one parameter has no value.
    Unbound,
    /// Every parameter has a value; ready to invoke.
    ParametersBound,
    /// Invoked; the return value has not been read yet.
    Invoked,
    /// Invoked and the return value has been read.
    ReturnRead,
}

/// One formal parameter and its bound value.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    kind: SimpleTypeKind,
    value: Option<AnySimple>,
}

impl Parameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SimpleTypeKind {
        self.kind
    }

    /// Bound value, if any.
    pub fn value(&self) -> Option<&AnySimple> {
        self.value.as_ref()
    }
}

/// Pending or completed call of a published operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    operation: String,
    /// Position of the operation in its publication.
    pub(crate) operation_index: usize,
    parameters: Vec<Parameter>,
    return_kind: SimpleTypeKind,
    return_value: Option<AnySimple>,
    state: RequestState,
}

impl Request {
    pub(crate) fn new(
        operation: &str,
        operation_index: usize,
        parameters: impl IntoIterator<Item = (String, SimpleTypeKind)>,
        return_kind: SimpleTypeKind,
    ) -> Self {
        let mut request = Self {
            operation: operation.to_string(),
            operation_index,
            parameters: parameters
                .into_iter()
                .map(|(name, kind)| Parameter {
                    name,
                    kind,
                    value: None,
                })
                .collect(),
            return_kind,
            return_value: None,
            state: RequestState::Unbound,
        };
        request.state = request.bound_state();
        request
    }

    fn bound_state(&self) -> RequestState {
        if self.parameters.iter().all(|p| p.value.is_some()) {
            RequestState::ParametersBound
        } else {
            RequestState::Unbound
        }
    }

    /// Name of the requested operation.
    pub fn operation_name(&self) -> &str {
        &self.operation
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Index of the parameter called `name`.
    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name == name)
    }

    /// Bind the parameter at `index`.
    ///
    /// Parameters may be bound in any order and rebound until the request
    /// is invoked.
    pub fn set_parameter_value(&mut self, index: usize, value: impl Into<AnySimple>) -> Result<()> {
        if matches!(self.state, RequestState::Invoked | RequestState::ReturnRead) {
            return Err(Error::AlreadyInvoked(self.operation.clone()));
        }
        let operation = &self.operation;
        let parameter = self
            .parameters
            .get_mut(index)
            .ok_or_else(|| Error::InvalidParameterIndex {
                operation: operation.clone(),
                index,
            })?;
        let value = value.into();
        if value.kind() != parameter.kind {
            return Err(Error::TypeMismatch {
                path: format!("{}.{}", operation, parameter.name),
                expected: parameter.kind,
                actual: value.kind(),
            });
        }
        parameter.value = Some(value);
        self.state = self.bound_state();
        Ok(())
    }

    /// Bind the parameter called `name`.
    pub fn set_parameter_by_name(&mut self, name: &str, value: impl Into<AnySimple>) -> Result<()> {
        let index = self
            .parameter_index(name)
            .ok_or_else(|| Error::MissingParameter {
                operation: self.operation.clone(),
                parameter: name.to_string(),
            })?;
        self.set_parameter_value(index, value)
    }

    /// Value bound at `index` (`None` while unbound).
    pub fn parameter_value(&self, index: usize) -> Result<Option<&AnySimple>> {
        self.parameters
            .get(index)
            .map(Parameter::value)
            .ok_or_else(|| Error::InvalidParameterIndex {
                operation: self.operation.clone(),
                index,
            })
    }

    /// Declared return kind (`None` for void operations).
    pub fn return_kind(&self) -> SimpleTypeKind {
        self.return_kind
    }

    /// Value returned by the invocation.
    pub fn return_value(&mut self) -> Result<AnySimple> {
        if self.return_kind == SimpleTypeKind::None {
            return Err(Error::VoidOperation(self.operation.clone()));
        }
        match (&self.return_value, self.state) {
            (Some(value), RequestState::Invoked | RequestState::ReturnRead) => {
                let value = value.clone();
                self.state = RequestState::ReturnRead;
                Ok(value)
            }
            _ => Err(Error::InvalidState(format!(
                "'{}' has not been invoked",
                self.operation
            ))),
        }
    }

    /// Clear the return slot so the request can be invoked again.
    ///
    /// Bound parameters are kept.
    pub fn reset(&mut self) {
        self.return_value = None;
        self.state = self.bound_state();
    }

    /// First parameter without a value.
    pub(crate) fn first_unbound(&self) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.value.is_none())
    }

    pub(crate) fn arguments(&self) -> Vec<AnySimple> {
        self.parameters
            .iter()
            .filter_map(|p| p.value.clone())
            .collect()
    }

    pub(crate) fn complete(&mut self, value: AnySimple) {
        self.return_value = Some(value);
        self.state = RequestState::Invoked;
    }
}
