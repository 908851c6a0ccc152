//! Detail popup: a read-only field list of a node's machine record.

use crate::config::EditorConfig;
use kurbo::{Point, Size};
use mf_core::geometry::clamp_box;
use mf_core::id::NodeId;
use mf_core::model::{Machine, Position};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupField {
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailPopup {
    pub node: NodeId,
    /// Top-left corner in container space, already clamped.
    pub origin: Position,
    pub fields: Vec<PopupField>,
}

impl DetailPopup {
    /// Open a popup for `node` near the container-space point `anchor`.
    pub fn open(
        node: NodeId,
        machine: &Machine,
        anchor: Point,
        container: Size,
        config: &EditorConfig,
    ) -> Self {
        Self {
            node,
            origin: popup_origin(anchor, container, config).into(),
            fields: popup_fields(machine),
        }
    }
}

/// The record's fields in declaration order, minus `position` and
/// `components`.
pub fn popup_fields(machine: &Machine) -> Vec<PopupField> {
    let Machine {
        id,
        name,
        kind,
        status,
        location,
        oee,
        availability,
        performance,
        quality,
        temperature,
        energy_consumption,
        last_maintenance,
        next_maintenance,
        components: _,
        position: _,
    } = machine;

    let field = |key, value: String| PopupField { key, value };
    vec![
        field("id", id.clone()),
        field("name", name.clone()),
        field("type", kind.as_str().to_string()),
        field("status", status.as_str().to_string()),
        field("location", location.clone()),
        field("oee", oee.to_string()),
        field("availability", availability.to_string()),
        field("performance", performance.to_string()),
        field("quality", quality.to_string()),
        field("temperature", temperature.to_string()),
        field("energyConsumption", energy_consumption.to_string()),
        field("lastMaintenance", last_maintenance.clone()),
        field("nextMaintenance", next_maintenance.clone()),
    ]
}

pub fn popup_origin(anchor: Point, container: Size, config: &EditorConfig) -> Point {
    clamp_box(anchor, config.popup_size(), container, config.popup_margin)
}

/// Context menus hug the container edges without a margin.
pub fn menu_origin(anchor: Point, container: Size, config: &EditorConfig) -> Point {
    clamp_box(anchor, config.menu_size(), container, 0.0)
}
