// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # smp-reflect - Reflection and dynamic invocation for simulation components
//!
//! Generic tooling (editors, persistence, scripting, test harnesses) reads
//! and writes typed state inside simulation components, and calls their
//! operations, without compile-time knowledge of each component's types.
//!
//! ## Quick Start
//!
//! ```rust
//! use smp_reflect::{AnySimple, FieldFlags, HashMapTypeRegistry, Publication, Result};
//! use std::cell::Cell;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let temperature = Cell::new(20.0f64);
//!     let samples = [Cell::new(0.0f64), Cell::new(0.0), Cell::new(0.0), Cell::new(0.0)];
//!
//!     // Component initialization: publish fields
//!     let mut publication = Publication::new(Arc::new(HashMapTypeRegistry::new()));
//!     publication.publish_field("Temperature", "Cabin", &temperature, FieldFlags::default())?;
//!     publication.publish_array("Samples", "History", &samples, FieldFlags::default())?;
//!
//!     // Tooling: address values by path
//!     publication.set_field_value("Temperature", 21.5f64)?;
//!     let values: Vec<AnySimple> = [1.0, 2.0, 3.0, 4.0].into_iter().map(AnySimple::from).collect();
//!     publication.set_array_value("Samples", &values, 4)?;
//!
//!     assert_eq!(publication.get_field_value("Samples[3]")?, AnySimple::Float64(4.0));
//!     assert_eq!(temperature.get(), 21.5);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                            Tooling                                  |
//! |   Resolver -> component -> Publication (paths, requests)           |
//! +---------------------------------------------------------------------+
//! |                          Publication                                |
//! |   Field tree | Typed expansion | Properties | Operations | Requests |
//! +---------------------------------------------------------------------+
//! |                          Foundations                                |
//! |   AnySimple | SimpleAddress | Uuid | TypeRegistry | Path grammar    |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`AnySimple`] | Discriminated value exchanged with tooling |
//! | [`Publication`] | Per-component registry of published items |
//! | [`Publisher`] | Publishing handle for a structure or array scope |
//! | [`Request`] | One dynamic operation call |
//! | [`Resolver`] | Finds components by dotted path |
//! | [`TypeRegistry`] | Type lookup injected into each publication |
//!
//! ## Features
//!
//! - `config-loaders`: load [`ReflectionConfig`] from YAML.

pub mod address;
pub mod config;
mod error;
pub mod invocation;
pub mod path;
pub mod publication;
pub mod request;
pub mod resolver;
pub mod time;
pub mod type_uuid;
pub mod types;
pub mod value;

pub use address::{RawAddress, SimpleAddress};
pub use config::ReflectionConfig;
pub use error::{Error, Result};
pub use invocation::{OperationDescriptor, OperationPublisher, ParameterDescriptor, RequestHandle};
pub use publication::{AccessKind, FieldFlags, FieldInfo, Publication, Publisher};
pub use request::{Parameter, Request, RequestState};
pub use resolver::{Component, Composite, Resolver};
pub use time::{DateTime, Duration};
pub use type_uuid::{
    parse_uuid, simple_kind_of, uuid_of, Uuid, UUID_BOOL, UUID_CHAR8, UUID_DATETIME,
    UUID_DURATION, UUID_FLOAT32, UUID_FLOAT64, UUID_INT16, UUID_INT32, UUID_INT64, UUID_INT8,
    UUID_STRING8, UUID_UINT16, UUID_UINT32, UUID_UINT64, UUID_UINT8, UUID_VOID,
};
pub use types::{
    type_size, HashMapTypeRegistry, ResolvedType, StructureField, StructureTypeBuilder,
    TypeDescriptor, TypeLayout, TypeRegistry,
};
pub use value::{AnySimple, SimpleTypeKind};
