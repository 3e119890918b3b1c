use crate::config::PhysicsConfig;
use crate::graph::{Graph, NodeId, Position};
use std::collections::BTreeMap;

/// Range of repulsion distances the solver supports. Values outside are
/// clamped here, not by callers.
const MIN_NODE_DISTANCE: f64 = 10.0;
const MAX_NODE_DISTANCE: f64 = 1000.0;

const TIMESTEP: f64 = 0.5;

/// Force-directed layout seen from the editor: something that advances node
/// positions and accepts a repulsion-distance parameter. The session only
/// reads and writes positions through the graph; it never looks inside.
pub trait LayoutEngine {
    /// Place nodes that carry no usable starting position. Called once when
    /// the session is created.
    fn prime(&mut self, graph: &mut Graph);

    /// Advance the simulation by one step, writing positions back into the
    /// graph.
    fn tick(&mut self, graph: &mut Graph);

    /// Feed the repulsion-distance parameter. Out-of-range values are clamped.
    fn set_repulsion_distance(&mut self, value: f64);

    fn repulsion_distance(&self) -> f64;
}

/// Repulsion solver: pairwise linear repulsion inside `node_distance`, edge
/// springs toward `spring_length`, central gravity, velocity damping.
pub struct RepulsionLayout {
    node_distance: f64,
    spring_length: f64,
    spring_constant: f64,
    central_gravity: f64,
    damping: f64,
    velocities: BTreeMap<NodeId, (f64, f64)>,
}

impl RepulsionLayout {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            node_distance: config
                .node_distance
                .clamp(MIN_NODE_DISTANCE, MAX_NODE_DISTANCE),
            spring_length: config.spring_length,
            spring_constant: config.spring_constant,
            central_gravity: config.central_gravity,
            damping: config.damping,
            velocities: BTreeMap::new(),
        }
    }

    fn forces(&self, graph: &Graph) -> BTreeMap<NodeId, (f64, f64)> {
        let mut forces: BTreeMap<NodeId, (f64, f64)> = graph
            .nodes
            .keys()
            .map(|id| (id.clone(), (0.0, 0.0)))
            .collect();

        let nodes: Vec<(&NodeId, Position)> = graph
            .nodes
            .iter()
            .map(|(id, node)| (id, node.position))
            .collect();

        // Pairwise repulsion, linear falloff inside node_distance.
        for (i, (id_a, pos_a)) in nodes.iter().enumerate() {
            for (id_b, pos_b) in nodes.iter().skip(i + 1) {
                let dx = pos_b.x - pos_a.x;
                let dy = pos_b.y - pos_a.y;
                let distance = (dx * dx + dy * dy).sqrt().max(0.01);
                if distance >= 2.0 * self.node_distance {
                    continue;
                }
                let strength = (1.0 - distance / (2.0 * self.node_distance)).max(0.0);
                let force = strength * self.node_distance * 0.05 / distance;
                let (fx, fy) = (dx * force, dy * force);
                if let Some(a) = forces.get_mut(*id_a) {
                    a.0 -= fx;
                    a.1 -= fy;
                }
                if let Some(b) = forces.get_mut(*id_b) {
                    b.0 += fx;
                    b.1 += fy;
                }
            }
        }

        // Edge springs toward spring_length.
        for edge in graph.resolved_edges() {
            let from = graph.nodes[&edge.from].position;
            let to = graph.nodes[&edge.to].position;
            let dx = to.x - from.x;
            let dy = to.y - from.y;
            let distance = (dx * dx + dy * dy).sqrt().max(0.01);
            let force = self.spring_constant * (distance - self.spring_length) / distance;
            let (fx, fy) = (dx * force, dy * force);
            if let Some(a) = forces.get_mut(&edge.from) {
                a.0 += fx;
                a.1 += fy;
            }
            if let Some(b) = forces.get_mut(&edge.to) {
                b.0 -= fx;
                b.1 -= fy;
            }
        }

        // Central gravity keeps disconnected components on canvas.
        for (id, pos) in &nodes {
            if let Some(f) = forces.get_mut(*id) {
                f.0 -= pos.x * self.central_gravity * 0.01;
                f.1 -= pos.y * self.central_gravity * 0.01;
            }
        }

        forces
    }
}

impl LayoutEngine for RepulsionLayout {
    fn prime(&mut self, graph: &mut Graph) {
        // Nodes stacked at the origin would produce degenerate forces; spread
        // them on a deterministic spiral keyed by node order.
        let stacked: Vec<NodeId> = graph
            .nodes
            .values()
            .filter(|node| node.position.x == 0.0 && node.position.y == 0.0)
            .map(|node| node.id.clone())
            .collect();
        if stacked.len() < 2 {
            return;
        }
        for (index, id) in stacked.iter().enumerate() {
            let angle = index as f64 * 2.399_963_229_728_653; // golden angle
            let radius = self.spring_length * 0.25 * (index as f64 + 1.0).sqrt();
            if let Some(node) = graph.node_mut(id) {
                node.position = Position::new(radius * angle.cos(), radius * angle.sin());
            }
        }
    }

    fn tick(&mut self, graph: &mut Graph) {
        // Forget velocities of nodes deleted since the previous tick.
        self.velocities
            .retain(|id, _| graph.nodes.contains_key(id));

        let forces = self.forces(graph);
        for (id, (fx, fy)) in forces {
            let velocity = self.velocities.entry(id.clone()).or_insert((0.0, 0.0));
            velocity.0 = (velocity.0 + fx * TIMESTEP) * (1.0 - self.damping);
            velocity.1 = (velocity.1 + fy * TIMESTEP) * (1.0 - self.damping);
            if let Some(node) = graph.node_mut(&id) {
                node.position.x += velocity.0 * TIMESTEP;
                node.position.y += velocity.1 * TIMESTEP;
            }
        }
    }

    fn set_repulsion_distance(&mut self, value: f64) {
        let clamped = value.clamp(MIN_NODE_DISTANCE, MAX_NODE_DISTANCE);
        if clamped != value {
            log::debug!("repulsion distance {value} clamped to {clamped}");
        }
        self.node_distance = clamped;
    }

    fn repulsion_distance(&self) -> f64 {
        self.node_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    fn two_node_graph() -> Graph {
        let mut graph = Graph::new();
        let mut a = Node::new("a");
        a.position = Position::new(-10.0, 0.0);
        let mut b = Node::new("b");
        b.position = Position::new(10.0, 0.0);
        graph.insert_node(a);
        graph.insert_node(b);
        graph.edges.push(Edge::new("a", "b"));
        graph
    }

    #[test]
    fn close_nodes_repel() {
        let mut graph = two_node_graph();
        graph.edges.clear();
        let mut engine = RepulsionLayout::new(&PhysicsConfig::default());
        for _ in 0..10 {
            engine.tick(&mut graph);
        }
        let a = graph.node(&"a".into()).unwrap().position;
        let b = graph.node(&"b".into()).unwrap().position;
        assert!((b.x - a.x).abs() > 30.0, "nodes should have spread apart");
    }

    #[test]
    fn repulsion_distance_is_clamped() {
        let mut engine = RepulsionLayout::new(&PhysicsConfig::default());
        engine.set_repulsion_distance(-40.0);
        assert_eq!(engine.repulsion_distance(), MIN_NODE_DISTANCE);
        engine.set_repulsion_distance(1e9);
        assert_eq!(engine.repulsion_distance(), MAX_NODE_DISTANCE);
        engine.set_repulsion_distance(200.0);
        assert_eq!(engine.repulsion_distance(), 200.0);
    }

    #[test]
    fn prime_spreads_stacked_nodes() {
        let mut graph = Graph::new();
        for id in ["a", "b", "c"] {
            graph.insert_node(Node::new(id));
        }
        let mut engine = RepulsionLayout::new(&PhysicsConfig::default());
        engine.prime(&mut graph);
        let positions: Vec<Position> = graph.nodes.values().map(|n| n.position).collect();
        for (i, p) in positions.iter().enumerate() {
            for q in positions.iter().skip(i + 1) {
                assert!((p.x - q.x).abs() + (p.y - q.y).abs() > 1.0);
            }
        }
    }

    #[test]
    fn tick_drops_velocities_of_removed_nodes() {
        let mut graph = two_node_graph();
        let mut engine = RepulsionLayout::new(&PhysicsConfig::default());
        engine.tick(&mut graph);
        graph.remove_node(&"b".into());
        engine.tick(&mut graph);
        assert_eq!(engine.velocities.len(), 1);
    }
}
