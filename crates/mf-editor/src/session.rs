//! Editor session: the canvas store plus everything around it.
//!
//! The session owns the [`CanvasStore`], the [`Interaction`] state machine,
//! and the host geometry (container rect, viewport width, pan/zoom). Every
//! host event goes through [`EditorSession::handle`], which runs
//! synchronously and reports what needs re-rendering.

use crate::config::EditorConfig;
use crate::input::{InputEvent, Modifiers};
use crate::intake;
use crate::interaction::{Command, Interaction, Overlay, Selection};
use crate::popup::{DetailPopup, menu_origin};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use kurbo::{Point, Rect};
use mf_core::clock::Clock;
use mf_core::geometry::{ViewportTransform, client_to_container};
use mf_core::id::NodeId;
use mf_core::persist::Storage;
use mf_core::state::CanvasState;
use mf_core::store::CanvasStore;

/// What an event changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Nodes or edges were mutated (and persisted).
    pub canvas: bool,
    /// Overlays, popup, or selection changed.
    pub ui: bool,
}

impl Outcome {
    const NONE: Self = Self {
        canvas: false,
        ui: false,
    };

    fn ui(changed: bool) -> Self {
        Self {
            canvas: false,
            ui: changed,
        }
    }

    fn canvas(changed: bool) -> Self {
        Self {
            canvas: changed,
            ui: false,
        }
    }

    pub fn any(&self) -> bool {
        self.canvas || self.ui
    }
}

pub struct EditorSession<S: Storage, C: Clock> {
    store: CanvasStore<S, C>,
    interaction: Interaction,
    config: EditorConfig,
    /// Canvas container in client coordinates.
    container: Rect,
    /// Width of the browser viewport (not the container).
    viewport_width: f64,
    transform: ViewportTransform,
}

impl<S: Storage, C: Clock> EditorSession<S, C> {
    pub fn new(storage: S, clock: C, config: EditorConfig) -> Self {
        Self {
            store: CanvasStore::open(storage, clock),
            interaction: Interaction::new(),
            config,
            container: Rect::new(0.0, 0.0, 800.0, 600.0),
            viewport_width: 1280.0,
            transform: ViewportTransform::IDENTITY,
        }
    }

    // ─── Host geometry ───────────────────────────────────────────────────

    pub fn set_container(&mut self, container: Rect) {
        self.container = container;
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    pub fn set_transform(&mut self, transform: ViewportTransform) {
        self.transform = transform;
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn state(&self) -> &CanvasState {
        self.store.state()
    }

    pub fn store(&self) -> &CanvasStore<S, C> {
        &self.store
    }

    pub fn overlay(&self) -> Overlay {
        self.interaction.overlay()
    }

    pub fn popup(&self) -> Option<&DetailPopup> {
        self.interaction.popup()
    }

    pub fn selection(&self) -> &Selection {
        self.interaction.selection()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ─── Event dispatch ──────────────────────────────────────────────────

    pub fn handle(&mut self, event: InputEvent) -> Outcome {
        match event {
            InputEvent::Drop { data, client } => {
                let request =
                    intake::pointer_placement(&data, client, self.container, &self.transform);
                Outcome::canvas(request.map(|r| self.store.add_node(r)).is_some())
            }
            InputEvent::CatalogTap { data } => {
                let request = intake::touch_placement(
                    &data,
                    self.container,
                    self.viewport_width,
                    &self.transform,
                    &self.config,
                );
                Outcome::canvas(request.map(|r| self.store.add_node(r)).is_some())
            }
            InputEvent::NodeMoved { node, position } => {
                Outcome::canvas(self.store.move_node(node, position))
            }
            InputEvent::Connect { source, target } => {
                Outcome::canvas(self.store.connect(source, target).is_some())
            }
            InputEvent::NodeContextMenu { node, client } => {
                if !self.state().contains_node(node) {
                    return Outcome::NONE;
                }
                let local = client_to_container(client, self.container);
                let origin = menu_origin(local, self.container.size(), &self.config);
                Outcome::ui(self.interaction.open_context_menu(node, origin.into()))
            }
            InputEvent::NodeDoubleClick { node, client } => {
                Outcome::ui(self.open_popup(node, client))
            }
            InputEvent::NodeTap {
                node,
                client,
                time_ms,
            } => {
                if self
                    .interaction
                    .register_tap(node, time_ms, self.config.double_tap_ms)
                {
                    Outcome::ui(self.open_popup(node, client))
                } else {
                    Outcome::NONE
                }
            }
            InputEvent::PaneDoubleClick | InputEvent::ClosePopup => {
                Outcome::ui(self.interaction.close_popup())
            }
            InputEvent::EdgeClick { edge } => {
                if self.state().edge(edge).is_none() {
                    return Outcome::NONE;
                }
                Outcome::ui(self.interaction.edge_clicked(edge))
            }
            InputEvent::SelectionChange { nodes, edges } => {
                self.interaction.selection_changed(&nodes, &edges);
                Outcome::ui(true)
            }
            InputEvent::MenuDelete => Outcome::ui(self.interaction.choose_delete()),
            InputEvent::ClearAllRequested => Outcome::ui(self.interaction.request_clear_all()),
            InputEvent::Confirm => self.confirm(),
            InputEvent::Cancel => Outcome::ui(self.interaction.cancel()),
            InputEvent::DocumentClick { target } => {
                Outcome::ui(self.interaction.document_click(target))
            }
            InputEvent::Key { key, modifiers } => self.handle_key(&key, modifiers),
        }
    }

    fn handle_key(&mut self, key: &str, m: Modifiers) -> Outcome {
        let Some(action) = ShortcutMap::resolve(key, m.ctrl, m.shift, m.alt, m.meta) else {
            return Outcome::NONE;
        };
        log::trace!("shortcut {key:?} -> {action:?}");
        match action {
            ShortcutAction::DeleteSelection => match self.interaction.keyboard_delete() {
                Some(command) => self.apply(command),
                None => Outcome::NONE,
            },
            ShortcutAction::ClearAll => Outcome::ui(self.interaction.request_clear_all()),
            ShortcutAction::Dismiss => Outcome::ui(self.interaction.escape()),
            ShortcutAction::Confirm => self.confirm(),
        }
    }

    fn confirm(&mut self) -> Outcome {
        match self.interaction.confirm() {
            Some(command) => {
                let outcome = self.apply(command);
                Outcome {
                    canvas: outcome.canvas,
                    ui: true,
                }
            }
            None => Outcome::NONE,
        }
    }

    /// Run a command against the store, then drop stale UI references.
    fn apply(&mut self, command: Command) -> Outcome {
        log::debug!("applying {command:?}");
        let changed = match command {
            Command::DeleteNode(id) => self.store.delete_node(id).is_some(),
            Command::DeleteEdge(id) => self.store.delete_edge(id),
            Command::DeleteSelection { nodes, edges } => {
                self.store.delete_selection(&nodes, &edges)
            }
            Command::ClearAll => self.store.clear_all(),
        };
        self.interaction.retain_existing(self.store.state());
        Outcome {
            canvas: changed,
            ui: changed,
        }
    }

    fn open_popup(&mut self, node: NodeId, client: Point) -> bool {
        let Some(target) = self.store.state().node(node) else {
            return false;
        };
        let local = client_to_container(client, self.container);
        let popup = DetailPopup::open(
            node,
            &target.payload,
            local,
            self.container.size(),
            &self.config,
        );
        self.interaction.show_popup(popup);
        true
    }
}
