use crate::graph::{Edge, Graph, Node, NodeId};
use crate::selection::SelectionManager;
use std::collections::BTreeMap;

/// Complete restorable state captured before a destructive mutation: deep
/// copies of nodes and edges plus each node's true (pre-highlight) color.
#[derive(Debug, Clone)]
pub struct Snapshot {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    styles: BTreeMap<NodeId, Option<String>>,
}

impl Snapshot {
    pub fn capture(graph: &Graph, selection: &SelectionManager) -> Self {
        let styles = graph
            .nodes
            .values()
            .map(|node| {
                // Selected nodes currently display the highlight; prefer the
                // remembered color over the live one.
                let color = match selection.recorded_color(&node.id) {
                    Some(recorded) => recorded.clone(),
                    None => node.color.clone(),
                };
                (node.id.clone(), color)
            })
            .collect();
        Self {
            nodes: graph.nodes.values().cloned().collect(),
            edges: graph.edges.clone(),
            styles,
        }
    }

    /// Replace the graph's nodes and edges wholesale and reapply each node's
    /// recorded style. Returns the style map so the caller can seed the
    /// selection manager's memory with it.
    pub fn restore(self, graph: &mut Graph) -> BTreeMap<NodeId, Option<String>> {
        graph.nodes = self
            .nodes
            .into_iter()
            .map(|node| (node.id.clone(), node))
            .collect();
        graph.edges = self.edges;
        for (id, color) in &self.styles {
            if let Some(node) = graph.node_mut(id) {
                node.color = color.clone();
            }
        }
        self.styles
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Append-only stack of snapshots. Grows with every destructive edit and
/// shrinks only through undo; memory use over a long session is an accepted
/// trade-off.
#[derive(Debug, Default)]
pub struct History {
    stack: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.stack.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.stack.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> Graph {
        let mut graph = Graph::new();
        let mut a = Node::new("a");
        a.color = Some("red".to_string());
        graph.insert_node(a);
        graph.insert_node(Node::new("b"));
        graph.edges.push(Edge::new("a", "b"));
        graph
    }

    #[test]
    fn capture_does_not_alias_live_state() {
        let mut graph = sample_graph();
        let selection = SelectionManager::new();
        let snapshot = Snapshot::capture(&graph, &selection);

        graph.remove_node(&"a".into());
        graph.edges.clear();

        assert_eq!(snapshot.node_count(), 2);
        let restored_styles = snapshot.restore(&mut graph);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(restored_styles[&"a".into()], Some("red".to_string()));
    }

    #[test]
    fn capture_prefers_remembered_color_over_highlight() {
        let mut graph = sample_graph();
        let mut selection = SelectionManager::new();
        selection.select(&mut graph, &"a".into(), false, "black");

        let snapshot = Snapshot::capture(&graph, &selection);
        let mut target = Graph::new();
        let styles = snapshot.restore(&mut target);

        assert_eq!(styles[&"a".into()], Some("red".to_string()));
        assert_eq!(target.node(&"a".into()).unwrap().color.as_deref(), Some("red"));
        assert_eq!(styles[&"b".into()], None);
    }

    #[test]
    fn stack_pops_most_recent_first() {
        let graph = sample_graph();
        let selection = SelectionManager::new();
        let mut history = History::new();
        history.push(Snapshot::capture(&graph, &selection));

        let mut smaller = graph.clone();
        smaller.remove_node(&"b".into());
        history.push(Snapshot::capture(&smaller, &selection));

        assert_eq!(history.len(), 2);
        assert_eq!(history.pop().unwrap().node_count(), 1);
        assert_eq!(history.pop().unwrap().node_count(), 2);
        assert!(history.pop().is_none());
    }
}
