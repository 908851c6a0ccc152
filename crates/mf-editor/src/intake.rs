//! Drag/drop intake.
//!
//! Two input adapters turn a catalog interaction into a
//! [`PlacementRequest`]: a pointer drop lands where the pointer was released,
//! a touch tap on a small viewport lands at the visual center of the canvas
//! (touch drag-and-drop coordinates are unreliable there). The store never
//! learns which adapter produced the request.

use crate::config::EditorConfig;
use kurbo::{Point, Rect};
use mf_core::geometry::{ViewportTransform, client_to_container};
use mf_core::model::Machine;
use mf_core::store::PlacementRequest;

/// Transfer type the catalog toolbar sets on drag start.
pub const DRAG_MIME: &str = "application/reactflow";

/// Decode transferred drag data. Anything that is not a machine record is
/// ignored.
pub fn parse_drag_payload(data: &str) -> Option<Machine> {
    if data.trim().is_empty() {
        return None;
    }
    match Machine::from_json(data) {
        Ok(machine) => Some(machine),
        Err(e) => {
            log::debug!("ignoring drop: {e}");
            None
        }
    }
}

/// Pointer path: client coordinates → container → canvas space.
pub fn pointer_placement(
    data: &str,
    client: Point,
    container: Rect,
    transform: &ViewportTransform,
) -> Option<PlacementRequest> {
    let machine = parse_drag_payload(data)?;
    let local = client_to_container(client, container);
    placement(machine, transform.container_to_canvas(local))
}

/// Touch path: only on viewports below the touch breakpoint. The node is
/// placed at the canvas point under the container's visual center.
pub fn touch_placement(
    data: &str,
    container: Rect,
    viewport_width: f64,
    transform: &ViewportTransform,
    config: &EditorConfig,
) -> Option<PlacementRequest> {
    if !config.is_small_viewport(viewport_width) {
        return None;
    }
    let machine = parse_drag_payload(data)?;
    let center = Point::new(container.width() / 2.0, container.height() / 2.0);
    placement(machine, transform.container_to_canvas(center))
}

fn placement(machine: Machine, canvas: Point) -> Option<PlacementRequest> {
    if !canvas.is_finite() {
        log::debug!("ignoring drop of {} at non-finite {canvas:?}", machine.id);
        return None;
    }
    Some(PlacementRequest {
        machine,
        position: canvas.into(),
    })
}
