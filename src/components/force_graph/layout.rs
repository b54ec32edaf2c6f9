use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::model::RenderableGraph;
use super::types::NodePositions;

/// Node payload carried through the simulation.
#[derive(Clone, Debug, Default)]
pub struct LayoutNode {
	pub id: String,
}

/// Force-directed layout of a [`RenderableGraph`], exposing a per-frame
/// snapshot of node positions.
pub struct Layout {
	graph: ForceGraph<LayoutNode, ()>,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	positions: HashMap<String, (f64, f64)>,
	/// Ticks left before the simulation is considered cooled down.
	cooldown: u32,
}

const COOLDOWN_TICKS: u32 = 80;
const SEED_RADIUS: f64 = 100.0;

impl Layout {
	pub fn new(graph: &RenderableGraph) -> Self {
		let mut sim = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let count = graph.nodes.len().max(1) as f64;

		// Seed on a circle around the origin.
		for (i, node) in graph.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count;
			let idx = sim.add_node(NodeData {
				x: (SEED_RADIUS * angle.cos()) as f32,
				y: (SEED_RADIUS * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: LayoutNode {
					id: node.id().to_string(),
				},
			});
			id_to_idx.insert(node.id().to_string(), idx);
		}

		for edge in &graph.edges {
			if let (Some(&src), Some(&tgt)) = (id_to_idx.get(&edge.source), id_to_idx.get(&edge.target)) {
				if src != tgt {
					sim.add_edge(src, tgt, EdgeData::default());
				}
			}
		}

		let mut layout = Self {
			graph: sim,
			id_to_idx,
			positions: HashMap::new(),
			cooldown: COOLDOWN_TICKS,
		};
		layout.snapshot();
		layout
	}

	/// Steps the simulation while it is still warm.
	pub fn tick(&mut self, dt: f32) {
		if self.cooldown == 0 {
			return;
		}
		self.cooldown -= 1;
		self.graph.update(dt);
		self.snapshot();
	}

	/// Restarts the simulation, e.g. after a node was dragged.
	pub fn reheat(&mut self) {
		self.cooldown = COOLDOWN_TICKS;
	}

	/// Moves a node and pins it there.
	pub fn pin(&mut self, id: &str, x: f64, y: f64) {
		let Some(&idx) = self.id_to_idx.get(id) else {
			return;
		};
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = x as f32;
				node.data.y = y as f32;
				node.data.is_anchor = true;
			}
		});
		self.positions.insert(id.to_string(), (x, y));
	}

	/// Graph-space bounding box of all placed nodes.
	pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
		self.positions.values().fold(None, |acc, &(x, y)| {
			Some(match acc {
				None => (x, y, x, y),
				Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
			})
		})
	}

	/// Topmost node within `radius` of a graph-space point.
	pub fn node_near(&self, gx: f64, gy: f64, radius: f64) -> Option<&str> {
		self.positions
			.iter()
			.map(|(id, &(x, y))| (id, (x - gx).hypot(y - gy)))
			.filter(|&(_, d)| d < radius)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(id, _)| id.as_str())
	}

	fn snapshot(&mut self) {
		let positions = &mut self.positions;
		self.graph.visit_nodes(|node| {
			positions.insert(node.data.user_data.id.clone(), (node.x() as f64, node.y() as f64));
		});
	}
}

impl NodePositions for Layout {
	fn position(&self, id: &str) -> Option<(f64, f64)> {
		self.positions.get(id).copied()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{Edge, Node, NodeType};

	fn graph() -> RenderableGraph {
		let nodes: Vec<Node> = ["a", "b", "c"]
			.iter()
			.map(|id| Node {
				id: id.to_string(),
				label: id.to_string(),
				kind: NodeType::Concept,
				chunk_ids: Vec::new(),
			})
			.collect();
		let edges = vec![Edge {
			id: "e1".into(),
			source: "a".into(),
			target: "b".into(),
			relation: "causes".into(),
			weight: 1.0,
			evidence_chunk: String::new(),
		}];
		RenderableGraph::build(&nodes, &edges)
	}

	#[test]
	fn every_node_is_placed() {
		let layout = Layout::new(&graph());
		for id in ["a", "b", "c"] {
			assert!(layout.position(id).is_some());
		}
		assert!(layout.position("zzz").is_none());
	}

	#[test]
	fn pinned_node_reports_new_position() {
		let mut layout = Layout::new(&graph());
		layout.pin("a", 42.0, -7.0);
		assert_eq!(layout.position("a"), Some((42.0, -7.0)));
		assert_eq!(layout.node_near(41.0, -7.0, 12.0), Some("a"));
	}

	#[test]
	fn cools_down() {
		let mut layout = Layout::new(&graph());
		for _ in 0..COOLDOWN_TICKS {
			layout.tick(0.016);
		}
		assert_eq!(layout.cooldown, 0);
		layout.reheat();
		assert_eq!(layout.cooldown, COOLDOWN_TICKS);
	}

	#[test]
	fn bounds_cover_seed_circle() {
		let layout = Layout::new(&graph());
		let (x0, y0, x1, y1) = layout.bounds().unwrap();
		assert!(x0 < x1 && y0 < y1);
		assert!(Layout::new(&RenderableGraph::default()).bounds().is_none());
	}
}
