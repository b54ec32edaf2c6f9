use serde::{Deserialize, Serialize};

/// Category of a knowledge-graph entity. Unknown categories collapse into
/// [`NodeType::Other`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
	/// General concept; also the default when no type is given.
	#[default]
	Concept,
	/// Disease or clinical condition.
	Condition,
	/// Drug, procedure or therapy.
	Treatment,
	/// Body structure.
	Anatomy,
	/// Anything else.
	#[serde(other)]
	Other,
}

impl NodeType {
	/// Every variant, in legend order.
	pub const ALL: [NodeType; 5] = [
		NodeType::Concept,
		NodeType::Condition,
		NodeType::Treatment,
		NodeType::Anatomy,
		NodeType::Other,
	];

	/// Fill colour of the type. `Other` is the fallback entry for anything
	/// the data source could not classify.
	pub fn color(self) -> &'static str {
		match self {
			NodeType::Concept => "#38bdf8",
			NodeType::Condition => "#f97316",
			NodeType::Treatment => "#34d399",
			NodeType::Anatomy => "#a855f7",
			NodeType::Other => "#cbd5f5",
		}
	}

	/// Lowercase name used in the legend.
	pub fn as_str(self) -> &'static str {
		match self {
			NodeType::Concept => "concept",
			NodeType::Condition => "condition",
			NodeType::Treatment => "treatment",
			NodeType::Anatomy => "anatomy",
			NodeType::Other => "other",
		}
	}
}

/// A raw entity as delivered by the data source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Unique id.
	pub id: String,
	/// Display label.
	pub label: String,
	/// Entity category.
	#[serde(rename = "type", default)]
	pub kind: NodeType,
	/// Source chunks, in extraction order.
	#[serde(default)]
	pub chunk_ids: Vec<String>,
}

/// A raw relation between two entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	/// Unique id.
	pub id: String,
	/// Id of the source node.
	pub source: String,
	/// Id of the target node.
	pub target: String,
	/// Relation verb, e.g. `causes`.
	pub relation: String,
	/// Extraction confidence.
	#[serde(default = "default_weight")]
	pub weight: f64,
	/// Chunk the relation was read from.
	#[serde(default)]
	pub evidence_chunk: String,
}

fn default_weight() -> f64 {
	1.0
}

impl Edge {
	/// Whether `node_id` is either endpoint.
	pub fn touches(&self, node_id: &str) -> bool {
		self.source == node_id || self.target == node_id
	}
}

/// A node ready for the render surface: the raw node plus its display name.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderNode {
	pub node: Node,
	pub name: String,
}

impl RenderNode {
	pub fn id(&self) -> &str {
		&self.node.id
	}

	pub fn kind(&self) -> NodeType {
		self.node.kind
	}
}

/// Where a node currently sits in graph space.
pub trait NodePositions {
	/// Graph-space position of `id`, if the layout has placed it.
	fn position(&self, id: &str) -> Option<(f64, f64)>;
}

impl NodePositions for std::collections::HashMap<String, (f64, f64)> {
	fn position(&self, id: &str) -> Option<(f64, f64)> {
		self.get(id).copied()
	}
}
