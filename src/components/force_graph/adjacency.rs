use std::collections::{BTreeSet, HashMap};

use super::types::Edge;

static NO_NEIGHBORS: BTreeSet<String> = BTreeSet::new();

/// Undirected neighbor lookup. Nodes without edges have no entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdjacencyMap {
	neighbors: HashMap<String, BTreeSet<String>>,
}

impl AdjacencyMap {
	pub fn from_edges(edges: &[Edge]) -> Self {
		let mut neighbors: HashMap<String, BTreeSet<String>> = HashMap::new();
		for edge in edges {
			neighbors
				.entry(edge.source.clone())
				.or_default()
				.insert(edge.target.clone());
			neighbors
				.entry(edge.target.clone())
				.or_default()
				.insert(edge.source.clone());
		}
		Self { neighbors }
	}

	/// Neighbors of `id`; empty when the node has no edges or is unknown.
	pub fn neighbors(&self, id: &str) -> &BTreeSet<String> {
		self.neighbors.get(id).unwrap_or(&NO_NEIGHBORS)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn edge(id: &str, source: &str, target: &str) -> Edge {
		Edge {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			relation: "treats".into(),
			weight: 1.0,
			evidence_chunk: String::new(),
		}
	}

	#[test]
	fn symmetric() {
		let edges = vec![edge("e1", "a", "b"), edge("e2", "b", "c"), edge("e3", "d", "a")];
		let adjacency = AdjacencyMap::from_edges(&edges);
		for e in &edges {
			assert!(adjacency.neighbors(&e.source).contains(&e.target));
			assert!(adjacency.neighbors(&e.target).contains(&e.source));
		}
		assert_eq!(
			adjacency.neighbors("a").iter().collect::<Vec<_>>(),
			vec!["b", "d"]
		);
	}

	#[test]
	fn isolated_nodes_are_absent() {
		let adjacency = AdjacencyMap::from_edges(&[edge("e1", "a", "b")]);
		assert!(!adjacency.neighbors.contains_key("z"));
		assert!(adjacency.neighbors("z").is_empty());
		assert_eq!(adjacency.neighbors.len(), 2);
	}

	#[test]
	fn self_loop_is_own_neighbor() {
		let adjacency = AdjacencyMap::from_edges(&[edge("e1", "a", "a")]);
		assert_eq!(adjacency.neighbors.len(), 1);
		assert!(adjacency.neighbors("a").contains("a"));
	}
}
