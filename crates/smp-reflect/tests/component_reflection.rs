// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end reflection of a component model through the public API.

use smp_reflect::{
    AccessKind, AnySimple, Component, Composite, DateTime, Duration, Error, FieldFlags,
    HashMapTypeRegistry, Publication, RequestState, Resolver, SimpleAddress, SimpleTypeKind,
    StructureTypeBuilder, Uuid, UUID_BOOL, UUID_DATETIME, UUID_FLOAT64, UUID_INT32, UUID_VOID,
};
use std::cell::{Cell, RefCell};
use std::sync::Arc;

const UUID_POWER_STATE: Uuid = Uuid::from_u128(0x5350_0000_0000_0000_0000_0000_0000_0001);
const UUID_TELEMETRY: Uuid = Uuid::from_u128(0x5350_0000_0000_0000_0000_0000_0000_0002);

/// A battery model owning its state.
struct Battery {
    charge: Cell<f64>,
    cells: [Cell<f64>; 4],
    status: Cell<u8>,
    label: RefCell<String>,
    enabled: Cell<bool>,
    last_update: Cell<DateTime>,
    telemetry: Vec<Cell<u8>>,
}

impl Battery {
    fn new() -> Self {
        Self {
            charge: Cell::new(0.5),
            cells: [Cell::new(3.7), Cell::new(3.7), Cell::new(3.6), Cell::new(3.7)],
            status: Cell::new(b'N'),
            label: RefCell::new(String::from("BAT-A")),
            enabled: Cell::new(true),
            last_update: Cell::new(DateTime::from_ticks(0)),
            telemetry: (0..12).map(|_| Cell::new(0)).collect(),
        }
    }

    fn types() -> HashMapTypeRegistry {
        let mut types = HashMapTypeRegistry::new();
        types
            .add_enumeration_type("PowerState", UUID_POWER_STATE, 4)
            .expect("PowerState");
        types
            .register(
                StructureTypeBuilder::new("Telemetry", UUID_TELEMETRY)
                    .description("Downlinked battery telemetry")
                    .field("state", UUID_POWER_STATE, 0)
                    .field("temperature", UUID_FLOAT64, 4)
                    .build(),
            )
            .expect("Telemetry");
        types
    }

    fn publish<'a>(&'a self, publication: &mut Publication<'a>) -> smp_reflect::Result<()> {
        publication.publish_field("Charge", "State of charge", &self.charge, FieldFlags::default())?;
        publication.publish_array("Cells", "Cell voltages", &self.cells, FieldFlags::default())?;
        publication.publish_field(
            "Status",
            "Status letter",
            SimpleAddress::char8(&self.status),
            FieldFlags::default().with_output(true),
        )?;
        publication.publish_field("Label", "Label", &self.label, FieldFlags::default().with_state(false))?;
        publication.publish_typed_field(
            "Telemetry",
            "Telemetry frame",
            &self.telemetry,
            UUID_TELEMETRY,
            FieldFlags::default(),
        )?;

        publication.publish_property("Enabled", "Charger enabled", UUID_BOOL, AccessKind::ReadWrite)?;
        publication.publish_operation("get_Enabled", "", UUID_BOOL, move |_| {
            Ok(AnySimple::from(self.enabled.get()))
        })?;
        publication
            .publish_operation("set_Enabled", "", UUID_VOID, move |args| {
                self.enabled.set(bool::try_from(&args[0])?);
                Ok(AnySimple::None)
            })?
            .publish_parameter("value", "", UUID_BOOL)?;

        publication
            .publish_operation("Drain", "Drain charge", UUID_FLOAT64, move |args| {
                let amount = f64::try_from(&args[0])?;
                let at = DateTime::try_from(&args[1])?;
                let charge = (self.charge.get() - amount).max(0.0);
                self.charge.set(charge);
                self.last_update.set(at);
                Ok(AnySimple::from(charge))
            })?
            .publish_parameter("amount", "Fraction to drain", UUID_FLOAT64)?
            .publish_parameter("at", "Simulation time", UUID_DATETIME)?;
        Ok(())
    }
}

#[test]
fn test_model_tree_listing() {
    let battery = Battery::new();
    let mut publication = Publication::new(Arc::new(Battery::types()));
    battery.publish(&mut publication).expect("publish");

    let listing: Vec<String> = publication
        .fields()
        .iter()
        .map(|f| format!("{}:{}x{}", f.path, f.kind, f.count))
        .collect();
    assert_eq!(
        listing,
        [
            "Charge:Float64x1",
            "Cells:Float64x4",
            "Status:Char8x1",
            "Label:String8x1",
            "Telemetry.state:Int32x1",
            "Telemetry.temperature:Float64x1",
        ]
    );
    assert_eq!(publication.state_fields().len(), 5);
    assert_eq!(
        publication.operations(),
        ["get_Enabled", "set_Enabled", "Drain"]
    );
    assert!(publication.type_registry().lookup(&UUID_TELEMETRY).is_some());
}

#[test]
fn test_tooling_session() {
    let battery = Battery::new();
    let mut publication = Publication::new(Arc::new(Battery::types()));
    battery.publish(&mut publication).expect("publish");

    // Editor writes
    publication.set_field_value("Status", AnySimple::Char8(b'F')).expect("status");
    publication.set_field_value("Label", "BAT-B").expect("label");
    publication.set_field_value("Telemetry.state", 2i32).expect("state");
    publication
        .set_field_value("Telemetry.temperature", -12.5f64)
        .expect("temperature");
    assert_eq!(battery.status.get(), b'F');
    assert_eq!(battery.label.borrow().as_str(), "BAT-B");
    assert_eq!(
        publication.get_field_value("Telemetry.temperature"),
        Ok(AnySimple::Float64(-12.5))
    );

    // Property through accessors
    publication.set_field_value("Enabled", false).expect("enabled");
    assert!(!battery.enabled.get());
    assert_eq!(publication.get_field_value("Enabled"), Ok(AnySimple::Bool(false)));

    // Bulk read
    let mut cells = vec![AnySimple::None; 4];
    publication
        .get_array_value("Cells", &mut cells, 4)
        .expect("cells");
    assert_eq!(cells[2], AnySimple::Float64(3.6));

    // Dynamic call
    let handle = publication.try_create_request("Drain").expect("request");
    {
        let request = publication.request_mut(handle).expect("live");
        assert_eq!(request.parameter_count(), 2);
        assert_eq!(request.return_kind(), SimpleTypeKind::Float64);
        request.set_parameter_by_name("at", DateTime::from_ticks(0) + Duration::from_secs_f64(1.5)).expect("at");
        assert_eq!(request.state(), RequestState::Unbound);
        request.set_parameter_value(0, 0.125f64).expect("amount");
        assert_eq!(request.state(), RequestState::ParametersBound);
    }
    publication.invoke(handle).expect("invoke");
    let returned = publication
        .request_mut(handle)
        .expect("live")
        .return_value()
        .expect("return");
    assert_eq!(returned, AnySimple::Float64(0.375));
    assert_eq!(battery.charge.get(), 0.375);
    assert_eq!(battery.last_update.get().ticks(), 1_500_000_000);
    publication.delete_request(handle).expect("delete");
    assert_eq!(publication.delete_request(handle), Err(Error::UseAfterRelease));
}

#[test]
fn test_errors_surface_to_caller() {
    let battery = Battery::new();
    let mut publication = Publication::new(Arc::new(Battery::types()));
    battery.publish(&mut publication).expect("publish");

    assert!(matches!(
        publication.publish_field("Charge", "", &battery.charge, FieldFlags::default()),
        Err(Error::DuplicateName(_))
    ));
    assert!(matches!(
        publication.get_field_value("Cells[4]"),
        Err(Error::InvalidFieldName(_))
    ));
    assert!(matches!(
        publication.get_field_value("Cells"),
        Err(Error::InvalidFieldName(_))
    ));
    assert!(matches!(
        publication.set_field_value("Charge", 1i32),
        Err(Error::TypeMismatch { .. })
    ));
    assert_eq!(battery.charge.get(), 0.5);
    assert!(matches!(
        publication.set_field_value("Status", AnySimple::UInt8(b'F')),
        Err(Error::TypeMismatch {
            expected: SimpleTypeKind::Char8,
            ..
        })
    ));
    assert!(matches!(
        publication.publish_property("Mode", "", UUID_TELEMETRY, AccessKind::ReadOnly),
        Err(Error::UnsupportedType(_))
    ));
    assert!(publication
        .publish_operation("Bad", "", UUID_INT32, |_| Ok(AnySimple::None))
        .is_ok());
    let handle = publication.create_request("Bad").expect("request");
    assert!(matches!(
        publication.invoke(handle),
        Err(Error::InvalidReturnValue { .. })
    ));
    publication.delete_request(handle).expect("delete");
}

#[test]
fn test_resolve_then_reflect() {
    let sim = Composite::root("Simulator");
    let power = sim.add_child("Power").expect("Power");
    let battery_node = power.add_child("Battery").expect("Battery");
    power.add_child("Pcdu").expect("Pcdu");

    let resolver = Resolver::new(sim.clone());
    let node = resolver.resolve_absolute("Power.Battery").expect("battery");
    assert_eq!(node.name(), "Battery");
    assert_eq!(battery_node.path(), "Power.Battery");
    assert!(resolver.resolve_absolute("Power.Battery.Cell").is_none());
    assert!(resolver.resolve_absolute("Power.Batery").is_none());

    let pcdu = resolver.resolve_relative(".Pcdu", &node).expect("pcdu");
    assert_eq!(pcdu.parent().map(|p| p.name().to_string()).as_deref(), Some("Power"));
    assert!(resolver.resolve_relative("....", &node).is_none());
}

#[cfg(feature = "config-loaders")]
#[test]
fn test_config_from_yaml() {
    use smp_reflect::ReflectionConfig;

    let config = ReflectionConfig::from_yaml_str("max_path_depth: 1\n").expect("yaml");
    let battery = Battery::new();
    let mut publication =
        Publication::with_config(Arc::new(Battery::types()), config).expect("publication");
    battery.publish(&mut publication).expect("publish");
    assert!(publication.get_field_value("Charge").is_ok());
    assert!(matches!(
        publication.get_field_value("Telemetry.state"),
        Err(Error::InvalidFieldName(_))
    ));
}
