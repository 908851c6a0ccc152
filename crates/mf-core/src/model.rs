//! Canvas data model.
//!
//! The canvas holds an ordered list of placed machine nodes (order is the
//! rendering z-order) and the directed connections between them. Each node
//! carries a `Machine` snapshot taken from the catalog at placement time;
//! the snapshot is never live-linked back to the catalog.

use crate::id::{EdgeId, NodeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};

// ─── Geometry ────────────────────────────────────────────────────────────

/// A canvas-space coordinate, serialized as `{ "x": .., "y": .. }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// JSON has no NaN or infinity; only finite positions can be stored.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Position> for Point {
    fn from(p: Position) -> Self {
        Point::new(p.x, p.y)
    }
}

// ─── Machine payload ─────────────────────────────────────────────────────

/// Production category of a machine. The dashboard's catalog uses German
/// spellings, which are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineKind {
    #[serde(alias = "produktion")]
    Production,
    #[serde(alias = "verpackung")]
    Packaging,
    #[serde(alias = "qualität", alias = "qualitaet")]
    Quality,
    #[serde(alias = "montage")]
    Assembly,
}

impl MachineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Packaging => "packaging",
            Self::Quality => "quality",
            Self::Assembly => "assembly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineStatus {
    Running,
    #[serde(alias = "warnung")]
    Warning,
    #[serde(alias = "fehler")]
    Error,
    #[serde(alias = "wartung")]
    Maintenance,
    Offline,
}

impl MachineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Maintenance => "maintenance",
            Self::Offline => "offline",
        }
    }
}

/// A wear part of a machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// 0..=100, 100 = new.
    #[serde(default)]
    pub condition: f64,
    #[serde(default)]
    pub warning_threshold: f64,
    #[serde(default)]
    pub error_threshold: f64,
    #[serde(default)]
    pub last_replaced: String,
    /// Days.
    #[serde(default)]
    pub expected_lifetime: f64,
}

/// A machine record from the catalog, attached to a node as its payload.
///
/// Dates are kept as the ISO-8601 strings the catalog delivers them in.
/// Unknown fields are ignored on decode; missing scalar fields default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MachineKind,
    pub status: MachineStatus,
    #[serde(default)]
    pub location: String,
    /// Overall equipment effectiveness, 0..=100 (`gae` in German data).
    #[serde(default, alias = "gae")]
    pub oee: f64,
    #[serde(default)]
    pub availability: f64,
    #[serde(default)]
    pub performance: f64,
    #[serde(default)]
    pub quality: f64,
    #[serde(default)]
    pub temperature: f64,
    /// kW.
    #[serde(default)]
    pub energy_consumption: f64,
    #[serde(default)]
    pub last_maintenance: String,
    #[serde(default)]
    pub next_maintenance: String,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Machine {
    /// Decode a machine record from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid machine record: {e}"))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// ─── Canvas entities ─────────────────────────────────────────────────────

/// A machine placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    pub id: NodeId,
    pub position: Position,
    pub payload: Machine,
}

/// A directed connection `source → target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

impl CanvasEdge {
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GERMAN_RECORD: &str = r#"{
        "id": "machine-002",
        "name": "Verpackungsanlage B2",
        "type": "verpackung",
        "status": "warnung",
        "location": "Halle 2, Bereich B",
        "gae": 73,
        "availability": 88,
        "performance": 82,
        "quality": 94,
        "temperature": 38.1,
        "energyConsumption": 98.7,
        "lastMaintenance": "2024-05-02T08:00:00.000Z",
        "nextMaintenance": "2024-05-15T08:00:00.000Z",
        "components": [{
            "id": "comp-003",
            "name": "Siegeleinheit",
            "type": "sensor",
            "condition": 25,
            "warningThreshold": 30,
            "errorThreshold": 15,
            "lastReplaced": "2023-10-23T08:00:00.000Z",
            "expectedLifetime": 240
        }],
        "position": { "x": 300, "y": 150 },
        "icon": "mdi:factory"
    }"#;

    #[test]
    fn decodes_german_catalog_record() {
        let m = Machine::from_json(GERMAN_RECORD).unwrap();
        assert_eq!(m.kind, MachineKind::Packaging);
        assert_eq!(m.status, MachineStatus::Warning);
        assert_eq!(m.oee, 73.0);
        assert_eq!(m.components.len(), 1);
        assert_eq!(m.components[0].kind, "sensor");
        assert_eq!(m.position, Some(Position::new(300.0, 150.0)));
    }

    #[test]
    fn missing_scalars_default() {
        let m = Machine::from_json(
            r#"{"id":"m","name":"Press","type":"assembly","status":"offline"}"#,
        )
        .unwrap();
        assert_eq!(m.oee, 0.0);
        assert!(m.components.is_empty());
        assert!(m.position.is_none());
        assert_eq!(m.location, "");
    }

    #[test]
    fn rejects_non_machine_json() {
        assert!(Machine::from_json("[1,2,3]").is_err());
        assert!(Machine::from_json("not json").is_err());
        assert!(Machine::from_json(r#"{"id":"m"}"#).is_err());
    }

    #[test]
    fn edge_touches_either_end() {
        let e = CanvasEdge {
            id: EdgeId::intern("e"),
            source: NodeId::intern("s"),
            target: NodeId::intern("t"),
        };
        assert!(e.touches(NodeId::intern("s")));
        assert!(e.touches(NodeId::intern("t")));
        assert!(!e.touches(NodeId::intern("u")));
    }
}
