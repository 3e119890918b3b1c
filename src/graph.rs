use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_NODE_SIZE: f64 = 10.0;
pub const DEFAULT_EDGE_WIDTH: f64 = 2.0;
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Node identifier. Datasets may carry ids as JSON strings or numbers; both
/// canonicalize to the same key so edges written either way still resolve.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Float(f64),
            String(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(NodeId(n.to_string())),
            Raw::Float(n) => Ok(NodeId(n.to_string())),
            Raw::String(s) if !s.is_empty() => Ok(NodeId(s)),
            Raw::String(_) => Err(de::Error::custom("node id must not be empty")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub size: u32,
    pub color: Option<String>,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            size: DEFAULT_FONT_SIZE,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: Option<String>,
    pub position: Position,
    pub size: f64,
    pub color: Option<String>,
    pub font: Font,
}

impl Node {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            label: None,
            position: Position::default(),
            size: DEFAULT_NODE_SIZE,
            color: None,
            font: Font::default(),
        }
    }

    /// Text drawn next to the circle: the explicit label, or the id.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub color: Option<String>,
    pub width: f64,
}

impl Edge {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            color: None,
            width: DEFAULT_EDGE_WIDTH,
        }
    }
}

/// In-memory graph: the session's single source of truth. Node order is
/// id-sorted, which keeps exports and snapshots deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub nodes: BTreeMap<NodeId, Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        self.nodes.remove(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Edges whose endpoints both resolve to live nodes. Dangling edges are
    /// tolerated in the edge list and skipped here.
    pub fn resolved_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(|edge| self.nodes.contains_key(&edge.from) && self.nodes.contains_key(&edge.to))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to parse dataset JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct NodeRecord {
    id: NodeId,
    label: Option<String>,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    size: Option<f64>,
    color: Option<String>,
    #[serde(default)]
    font: FontRecord,
}

#[derive(Debug, Default, Deserialize)]
struct FontRecord {
    size: Option<u32>,
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    from: NodeId,
    to: NodeId,
    color: Option<String>,
    width: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CanvasRecord {
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DatasetFile {
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    edges: Vec<EdgeRecord>,
    #[serde(default)]
    canvas: CanvasRecord,
}

/// Initial dataset handed over by the figure-generation side: node and edge
/// records plus an optional target canvas size derived from the screen.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub graph: Graph,
    pub canvas_width: Option<f64>,
    pub canvas_height: Option<f64>,
}

impl Dataset {
    pub fn from_json(input: &str) -> Result<Self, DatasetError> {
        let parsed: DatasetFile = serde_json::from_str(input)?;
        let mut graph = Graph::new();

        for record in parsed.nodes {
            let node = Node {
                id: record.id.clone(),
                label: record.label,
                position: Position::new(record.x, record.y),
                size: record.size.filter(|s| *s > 0.0).unwrap_or(DEFAULT_NODE_SIZE),
                color: record.color,
                font: Font {
                    size: record.font.size.filter(|s| *s > 0).unwrap_or(DEFAULT_FONT_SIZE),
                    color: record.font.color,
                },
            };
            graph.insert_node(node);
        }

        for record in parsed.edges {
            for endpoint in [&record.from, &record.to] {
                if !graph.nodes.contains_key(endpoint) {
                    // Dangling references are tolerated; export skips them.
                    log::warn!("dataset edge references unknown node id {endpoint}");
                }
            }
            graph.edges.push(Edge {
                from: record.from,
                to: record.to,
                color: record.color,
                width: record.width.filter(|w| *w > 0.0).unwrap_or(DEFAULT_EDGE_WIDTH),
            });
        }

        Ok(Self {
            graph,
            canvas_width: parsed.canvas.width,
            canvas_height: parsed.canvas.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_accepts_numeric_and_string_ids() {
        let input = r#"{
            "nodes": [
                { "id": 1, "label": "one", "x": 0, "y": 0 },
                { "id": "b", "x": 10, "y": 5, "size": 4, "color": "red" }
            ],
            "edges": [
                { "from": 1, "to": "b", "width": 3 }
            ]
        }"#;
        let dataset = Dataset::from_json(input).unwrap();
        let graph = dataset.graph;
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.node(&NodeId::from("1")).unwrap().display_label(), "one");
        let b = graph.node(&NodeId::from("b")).unwrap();
        assert_eq!(b.size, 4.0);
        assert_eq!(b.color.as_deref(), Some("red"));
        assert_eq!(graph.edges[0].width, 3.0);
        assert_eq!(graph.resolved_edges().count(), 1);
    }

    #[test]
    fn dataset_applies_defaults() {
        let input = r#"{ "nodes": [ { "id": "a" } ], "edges": [ { "from": "a", "to": "a" } ] }"#;
        let graph = Dataset::from_json(input).unwrap().graph;
        let a = graph.node(&NodeId::from("a")).unwrap();
        assert_eq!(a.size, DEFAULT_NODE_SIZE);
        assert_eq!(a.font.size, DEFAULT_FONT_SIZE);
        assert!(a.color.is_none());
        assert_eq!(graph.edges[0].width, DEFAULT_EDGE_WIDTH);
    }

    #[test]
    fn dataset_keeps_dangling_edges_out_of_resolution() {
        let input = r#"{ "nodes": [ { "id": "a" } ], "edges": [ { "from": "a", "to": "ghost" } ] }"#;
        let graph = Dataset::from_json(input).unwrap().graph;
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.resolved_edges().count(), 0);
    }

    #[test]
    fn resolved_edges_skips_dangling() {
        let mut graph = Graph::new();
        graph.insert_node(Node::new("a"));
        graph.insert_node(Node::new("b"));
        graph.edges.push(Edge::new("a", "b"));
        graph.edges.push(Edge::new("a", "gone"));
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.resolved_edges().count(), 1);
    }
}
