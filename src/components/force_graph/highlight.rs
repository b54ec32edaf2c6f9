use std::collections::BTreeSet;

use super::adjacency::AdjacencyMap;
use super::interaction::InteractionState;
use super::types::Edge;

/// Node and edge ids to draw with emphasis this frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightSets {
	pub nodes: BTreeSet<String>,
	pub edges: BTreeSet<String>,
}

impl HighlightSets {
	/// Recomputes both sets from scratch.
	///
	/// A hovered edge narrows the edge set to itself, whatever else is
	/// selected. The node set is the active focus plus its neighbors.
	pub fn derive(interaction: &InteractionState, adjacency: &AdjacencyMap, edges: &[Edge]) -> Self {
		let nodes = match interaction.active_focus() {
			Some(focus) => std::iter::once(focus.to_string())
				.chain(adjacency.neighbors(focus).iter().cloned())
				.collect(),
			None => BTreeSet::new(),
		};

		let edges = if let Some(hovered) = interaction.hovered_edge() {
			BTreeSet::from([hovered.id.clone()])
		} else if let Some(focus) = interaction.node_focus() {
			edges
				.iter()
				.filter(|e| e.touches(focus))
				.map(|e| e.id.clone())
				.collect()
		} else {
			BTreeSet::new()
		};

		Self { nodes, edges }
	}

	pub fn has_node(&self, id: &str) -> bool {
		self.nodes.contains(id)
	}

	pub fn has_edge(&self, id: &str) -> bool {
		self.edges.contains(id)
	}
}

/// Keeps the last derived sets and recomputes only when the interaction
/// snapshot or the graph revision changed.
#[derive(Debug, Default)]
pub struct HighlightCache {
	key: Option<(InteractionState, u64)>,
	sets: HighlightSets,
}

impl HighlightCache {
	pub fn get(
		&mut self,
		interaction: &InteractionState,
		revision: u64,
		adjacency: &AdjacencyMap,
		edges: &[Edge],
	) -> &HighlightSets {
		let fresh = matches!(&self.key, Some((i, r)) if i == interaction && *r == revision);
		if !fresh {
			self.sets = HighlightSets::derive(interaction, adjacency, edges);
			self.key = Some((interaction.clone(), revision));
		}
		&self.sets
	}
}
