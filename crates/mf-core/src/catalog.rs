//! Built-in mock machine catalog.
//!
//! The dashboard has no backend; these records are what the editor's
//! machine toolbar offers for placement.

use crate::model::{Component, Machine, MachineKind, MachineStatus, Position};

fn component(
    id: &str,
    name: &str,
    kind: &str,
    condition: f64,
    thresholds: (f64, f64),
    last_replaced: &str,
    expected_lifetime: f64,
) -> Component {
    Component {
        id: id.to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
        condition,
        warning_threshold: thresholds.0,
        error_threshold: thresholds.1,
        last_replaced: last_replaced.to_string(),
        expected_lifetime,
    }
}

/// The catalog's machine records, in toolbar order.
pub fn mock_machines() -> Vec<Machine> {
    vec![
        Machine {
            id: "machine-001".to_string(),
            name: "Produktionslinie A1".to_string(),
            kind: MachineKind::Production,
            status: MachineStatus::Running,
            location: "Halle 1, Bereich A".to_string(),
            oee: 87.0,
            availability: 92.0,
            performance: 89.0,
            quality: 96.0,
            temperature: 42.5,
            energy_consumption: 145.2,
            last_maintenance: "2025-01-01T08:00:00.000Z".to_string(),
            next_maintenance: "2025-02-05T08:00:00.000Z".to_string(),
            components: vec![
                component(
                    "comp-001",
                    "Hauptmotor",
                    "motor",
                    78.0,
                    (30.0, 15.0),
                    "2024-09-18T08:00:00.000Z",
                    365.0,
                ),
                component(
                    "comp-002",
                    "Förderband",
                    "belt",
                    65.0,
                    (25.0, 10.0),
                    "2024-10-18T08:00:00.000Z",
                    180.0,
                ),
            ],
            position: Some(Position::new(100.0, 50.0)),
        },
        Machine {
            id: "machine-002".to_string(),
            name: "Verpackungsanlage B2".to_string(),
            kind: MachineKind::Packaging,
            status: MachineStatus::Warning,
            location: "Halle 2, Bereich B".to_string(),
            oee: 73.0,
            availability: 88.0,
            performance: 82.0,
            quality: 94.0,
            temperature: 38.1,
            energy_consumption: 98.7,
            last_maintenance: "2025-01-08T08:00:00.000Z".to_string(),
            next_maintenance: "2025-01-21T08:00:00.000Z".to_string(),
            components: vec![component(
                "comp-003",
                "Siegeleinheit",
                "sensor",
                25.0,
                (30.0, 15.0),
                "2024-06-30T08:00:00.000Z",
                240.0,
            )],
            position: Some(Position::new(300.0, 150.0)),
        },
        Machine {
            id: "machine-003".to_string(),
            name: "Qualitätskontrolle C1".to_string(),
            kind: MachineKind::Quality,
            status: MachineStatus::Error,
            location: "Halle 1, Bereich C".to_string(),
            oee: 45.0,
            availability: 65.0,
            performance: 70.0,
            quality: 98.0,
            temperature: 35.8,
            energy_consumption: 67.3,
            last_maintenance: "2025-01-13T08:00:00.000Z".to_string(),
            next_maintenance: "2025-01-16T08:00:00.000Z".to_string(),
            components: vec![component(
                "comp-004",
                "Kamera System",
                "sensor",
                12.0,
                (20.0, 10.0),
                "2024-03-22T08:00:00.000Z",
                365.0,
            )],
            position: Some(Position::new(200.0, 250.0)),
        },
    ]
}

/// Look up a catalog record by machine id.
pub fn find_machine(id: &str) -> Option<Machine> {
    mock_machines().into_iter().find(|m| m.id == id)
}
