use crate::config::Config;
use crate::controls;
use crate::export::{export_scene, Artifact, ExportError, ExportFormat, Scene};
use crate::graph::{Dataset, Graph, NodeId};
use crate::history::{History, Snapshot};
use crate::physics::{LayoutEngine, RepulsionLayout};
use crate::selection::SelectionManager;
use crate::theme::Theme;
use std::collections::BTreeMap;
use std::fmt;

/// Non-fatal, user-visible outcome of a command that could not do anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoSelection,
    NothingToUndo,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoSelection => f.write_str("No nodes selected."),
            Notice::NothingToUndo => f.write_str("Nothing to undo."),
        }
    }
}

/// User input, one variant per control on the fixed toolbar plus the node
/// click/unclick callbacks and the recurring layout tick.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    SelectNode { id: NodeId, additive: bool },
    DeselectNode { ids: Vec<NodeId>, additive: bool },
    DeleteSelection,
    Undo,
    SetFontSize(u32),
    ScaleNodeSize(f64),
    TogglePhysics,
    SetPhysicsDistance(f64),
    Export { format: ExportFormat, dpi: Option<u32> },
    Tick,
}

#[derive(Debug)]
pub enum EventOutcome {
    Handled,
    Noticed(Notice),
    Exported(Artifact),
}

/// One editing session: owns the graph, selection, history, and layout engine.
/// All state lives here; commands run to completion under `&mut self`, which
/// stands in for the reference implementation's single-threaded event loop.
pub struct EditorSession {
    graph: Graph,
    selection: SelectionManager,
    history: History,
    layout: Box<dyn LayoutEngine>,
    physics_enabled: bool,
    /// Pre-scale sizes, recorded lazily on the first scale command and used
    /// as the fixed base for every later factor.
    original_sizes: BTreeMap<NodeId, f64>,
    theme: Theme,
    export_margin: f64,
    export_dpi: u32,
    canvas: (Option<f64>, Option<f64>),
}

impl EditorSession {
    pub fn new(dataset: Dataset, config: Config) -> Self {
        let engine = Box::new(RepulsionLayout::new(&config.physics));
        Self::with_engine(dataset, config, engine)
    }

    pub fn with_engine(dataset: Dataset, config: Config, mut layout: Box<dyn LayoutEngine>) -> Self {
        let mut graph = dataset.graph;
        layout.prime(&mut graph);
        Self {
            graph,
            selection: SelectionManager::new(),
            history: History::new(),
            layout,
            physics_enabled: true,
            original_sizes: BTreeMap::new(),
            theme: config.theme,
            export_margin: config.export.margin,
            export_dpi: config.export.dpi,
            canvas: (dataset.canvas_width, dataset.canvas_height),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn physics_enabled(&self) -> bool {
        self.physics_enabled
    }

    pub fn physics_toggle_label(&self) -> &'static str {
        controls::physics_toggle_label(self.physics_enabled)
    }

    pub fn canvas_size(&self) -> (Option<f64>, Option<f64>) {
        self.canvas
    }

    /// Route one input event to its command. Slider payloads are clamped to
    /// the control's range first; the physics distance is deliberately left
    /// raw because the layout engine owns that clamp.
    pub fn dispatch(&mut self, event: EditorEvent) -> Result<EventOutcome, ExportError> {
        let outcome = match event {
            EditorEvent::SelectNode { id, additive } => {
                self.select_node(&id, additive);
                EventOutcome::Handled
            }
            EditorEvent::DeselectNode { ids, additive } => {
                self.deselect_node(&ids, additive);
                EventOutcome::Handled
            }
            EditorEvent::DeleteSelection => match self.delete_selection() {
                Some(notice) => EventOutcome::Noticed(notice),
                None => EventOutcome::Handled,
            },
            EditorEvent::Undo => match self.undo() {
                Some(notice) => EventOutcome::Noticed(notice),
                None => EventOutcome::Handled,
            },
            EditorEvent::SetFontSize(size) => {
                let clamped = controls::FONT_SIZE_SLIDER.clamp(size as f64) as u32;
                self.set_font_size(clamped);
                EventOutcome::Handled
            }
            EditorEvent::ScaleNodeSize(factor) => {
                self.scale_node_size(controls::NODE_SIZE_SLIDER.clamp(factor));
                EventOutcome::Handled
            }
            EditorEvent::TogglePhysics => {
                self.toggle_physics();
                EventOutcome::Handled
            }
            EditorEvent::SetPhysicsDistance(value) => {
                self.set_physics_distance(value);
                EventOutcome::Handled
            }
            EditorEvent::Export { format, dpi } => {
                let artifact = self.export(format, dpi)?;
                EventOutcome::Exported(artifact)
            }
            EditorEvent::Tick => {
                self.tick();
                EventOutcome::Handled
            }
        };
        Ok(outcome)
    }

    /// Advance the layout simulation by one step, unless physics is suspended.
    pub fn tick(&mut self) {
        if self.physics_enabled {
            self.layout.tick(&mut self.graph);
        }
    }

    pub fn select_node(&mut self, id: &NodeId, additive: bool) {
        self.selection
            .select(&mut self.graph, id, additive, &self.theme.highlight);
    }

    pub fn deselect_node(&mut self, ids: &[NodeId], additive: bool) {
        self.selection.deselect(&mut self.graph, ids, additive);
    }

    /// Remove every selected node. Edges are left in place and become
    /// dangling; export skips them. Returns a notice instead of snapshotting
    /// when nothing is selected.
    pub fn delete_selection(&mut self) -> Option<Notice> {
        if self.selection.selected().is_empty() {
            return Some(Notice::NoSelection);
        }
        self.history
            .push(Snapshot::capture(&self.graph, &self.selection));

        let doomed: Vec<NodeId> = self.selection.selected().iter().cloned().collect();
        for id in &doomed {
            self.graph.remove_node(id);
            self.selection.forget(id);
        }
        log::debug!("deleted {} selected node(s)", doomed.len());
        None
    }

    /// Pop the most recent snapshot and restore it wholesale. Selection
    /// empties; style memory becomes the snapshot's map. Physics state and
    /// slider values are intentionally outside the snapshot's scope.
    pub fn undo(&mut self) -> Option<Notice> {
        let Some(snapshot) = self.history.pop() else {
            return Some(Notice::NothingToUndo);
        };
        let styles = snapshot.restore(&mut self.graph);
        self.selection.reset(styles);
        None
    }

    /// Resize every node to `original size x factor`. The base is the size
    /// each node had before the first scale command, so repeated calls do not
    /// compound.
    pub fn scale_node_size(&mut self, factor: f64) {
        if factor <= 0.0 {
            log::warn!("ignoring non-positive scale factor {factor}");
            return;
        }
        for node in self.graph.nodes.values_mut() {
            let original = self
                .original_sizes
                .entry(node.id.clone())
                .or_insert(node.size);
            node.size = *original * factor;
        }
    }

    pub fn set_font_size(&mut self, size: u32) {
        if size == 0 {
            log::warn!("ignoring zero font size");
            return;
        }
        for node in self.graph.nodes.values_mut() {
            node.font.size = size;
        }
    }

    pub fn toggle_physics(&mut self) -> &'static str {
        self.physics_enabled = !self.physics_enabled;
        self.physics_toggle_label()
    }

    pub fn set_physics_distance(&mut self, value: f64) {
        self.layout.set_repulsion_distance(value);
    }

    /// Export the current layout. The scene is frozen up front so layout
    /// ticks cannot tear the bounding box; a raster decode failure aborts the
    /// export and leaves the session untouched.
    pub fn export(&self, format: ExportFormat, dpi: Option<u32>) -> Result<Artifact, ExportError> {
        let scene = Scene::capture(&self.graph);
        export_scene(
            &scene,
            &self.theme,
            self.export_margin,
            format,
            dpi.unwrap_or(self.export_dpi),
        )
    }
}
