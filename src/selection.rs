use crate::graph::{Graph, NodeId};
use std::collections::{BTreeMap, BTreeSet};

/// Tracks which nodes are selected and remembers each node's pre-highlight
/// color so deselecting (or undo) can put the true style back.
#[derive(Debug, Default)]
pub struct SelectionManager {
    selected: BTreeSet<NodeId>,
    /// Style memory: id -> color the node had before it was first
    /// highlighted. `None` records "no explicit color". An entry, once set,
    /// is never overwritten while the node stays selected.
    styles: BTreeMap<NodeId, Option<String>>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &BTreeSet<NodeId> {
        &self.selected
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.selected.contains(id)
    }

    pub fn styles(&self) -> &BTreeMap<NodeId, Option<String>> {
        &self.styles
    }

    /// Remembered color for a node, if one was ever recorded.
    pub fn recorded_color(&self, id: &NodeId) -> Option<&Option<String>> {
        self.styles.get(id)
    }

    pub fn select(&mut self, graph: &mut Graph, id: &NodeId, additive: bool, highlight: &str) {
        if graph.node(id).is_none() {
            log::debug!("select ignored for unknown node {id}");
            return;
        }

        if !additive {
            let previous: Vec<NodeId> = self.selected.iter().cloned().collect();
            for prev in previous {
                self.restore(graph, &prev);
            }
            self.selected.clear();
        }
        self.selected.insert(id.clone());

        // Record the true color once, then force the highlight on top.
        self.styles
            .entry(id.clone())
            .or_insert_with(|| graph.node(id).and_then(|node| node.color.clone()));
        if let Some(node) = graph.node_mut(id) {
            node.color = Some(highlight.to_string());
        }
    }

    pub fn deselect(&mut self, graph: &mut Graph, ids: &[NodeId], additive: bool) {
        if !additive {
            self.clear(graph);
            return;
        }
        for id in ids {
            if self.selected.remove(id) {
                self.restore(graph, id);
            }
        }
    }

    /// Restore every selected node's color and empty the selection.
    pub fn clear(&mut self, graph: &mut Graph) {
        let previous: Vec<NodeId> = self.selected.iter().cloned().collect();
        for id in previous {
            self.restore(graph, &id);
        }
        self.selected.clear();
    }

    /// Drop a node from the selection and style memory without touching the
    /// graph; paired with node removal so the subset invariant holds.
    pub fn forget(&mut self, id: &NodeId) {
        self.selected.remove(id);
        self.styles.remove(id);
    }

    /// Wholesale reset after undo: selection empties, style memory becomes the
    /// snapshot's map. No colors are written; the caller already replaced the
    /// nodes.
    pub fn reset(&mut self, styles: BTreeMap<NodeId, Option<String>>) {
        self.selected.clear();
        self.styles = styles;
    }

    fn restore(&mut self, graph: &mut Graph, id: &NodeId) {
        if let Some(recorded) = self.styles.get(id) {
            if let Some(node) = graph.node_mut(id) {
                node.color = recorded.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;

    const HIGHLIGHT: &str = "black";

    fn colored_graph() -> Graph {
        let mut graph = Graph::new();
        let mut a = Node::new("a");
        a.color = Some("red".to_string());
        graph.insert_node(a);
        graph.insert_node(Node::new("b"));
        graph.insert_node(Node::new("c"));
        graph
    }

    #[test]
    fn select_highlights_and_records_original() {
        let mut graph = colored_graph();
        let mut selection = SelectionManager::new();
        selection.select(&mut graph, &"a".into(), false, HIGHLIGHT);

        assert_eq!(graph.node(&"a".into()).unwrap().color.as_deref(), Some("black"));
        assert_eq!(
            selection.recorded_color(&"a".into()),
            Some(&Some("red".to_string()))
        );
    }

    #[test]
    fn replacing_selection_restores_previous() {
        let mut graph = colored_graph();
        let mut selection = SelectionManager::new();
        selection.select(&mut graph, &"a".into(), false, HIGHLIGHT);
        selection.select(&mut graph, &"b".into(), false, HIGHLIGHT);

        assert_eq!(graph.node(&"a".into()).unwrap().color.as_deref(), Some("red"));
        assert_eq!(graph.node(&"b".into()).unwrap().color.as_deref(), Some("black"));
        assert!(!selection.is_selected(&"a".into()));
    }

    #[test]
    fn additive_deselect_restores_only_named_nodes() {
        let mut graph = colored_graph();
        let mut selection = SelectionManager::new();
        selection.select(&mut graph, &"a".into(), false, HIGHLIGHT);
        selection.select(&mut graph, &"b".into(), true, HIGHLIGHT);

        selection.deselect(&mut graph, &["a".into()], true);

        assert_eq!(graph.node(&"a".into()).unwrap().color.as_deref(), Some("red"));
        assert_eq!(graph.node(&"b".into()).unwrap().color.as_deref(), Some("black"));
        assert!(selection.is_selected(&"b".into()));
        assert!(!selection.is_selected(&"a".into()));
    }

    #[test]
    fn style_memory_is_never_overwritten_while_selected() {
        let mut graph = colored_graph();
        let mut selection = SelectionManager::new();
        selection.select(&mut graph, &"a".into(), false, HIGHLIGHT);
        // A second select while highlighted must not replace "red" with the
        // highlight color now living on the node.
        selection.select(&mut graph, &"a".into(), true, HIGHLIGHT);
        selection.deselect(&mut graph, &[], false);

        assert_eq!(graph.node(&"a".into()).unwrap().color.as_deref(), Some("red"));
    }

    #[test]
    fn uncolored_node_round_trips_to_no_color() {
        let mut graph = colored_graph();
        let mut selection = SelectionManager::new();
        selection.select(&mut graph, &"b".into(), false, HIGHLIGHT);
        selection.clear(&mut graph);
        assert!(graph.node(&"b".into()).unwrap().color.is_none());
    }
}
