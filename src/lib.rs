#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod controls;
pub mod export;
pub mod graph;
pub mod history;
pub mod physics;
pub mod selection;
pub mod session;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, ExportConfig, PhysicsConfig};
pub use export::{Artifact, ExportError, ExportFormat, Frame, Scene, render_svg};
pub use graph::{Dataset, Edge, Font, Graph, Node, NodeId, Position};
pub use history::{History, Snapshot};
pub use physics::{LayoutEngine, RepulsionLayout};
pub use selection::SelectionManager;
pub use session::{EditorEvent, EditorSession, EventOutcome, Notice};
pub use theme::Theme;
