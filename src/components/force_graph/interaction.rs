use super::types::Edge;

/// Pointer and selection state for one graph view.
///
/// `selected` is owned by the surrounding application and mirrored here;
/// the hover fields follow the pointer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
	selected: Option<String>,
	hovered_node: Option<String>,
	hovered_edge: Option<Edge>,
}

impl InteractionState {
	pub fn set_selected(&mut self, node_id: Option<String>) {
		self.selected = node_id;
	}

	pub fn set_hovered_node(&mut self, node_id: Option<String>) {
		self.hovered_node = node_id;
	}

	pub fn set_hovered_edge(&mut self, edge: Option<Edge>) {
		self.hovered_edge = edge;
	}

	/// Background click.
	pub fn clear_hover_and_selection(&mut self) {
		self.selected = None;
		self.hovered_node = None;
		self.hovered_edge = None;
	}

	/// Pointer left the surface.
	pub fn clear_hover(&mut self) {
		self.hovered_node = None;
		self.hovered_edge = None;
	}

	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	pub fn hovered_node(&self) -> Option<&str> {
		self.hovered_node.as_deref()
	}

	pub fn hovered_edge(&self) -> Option<&Edge> {
		self.hovered_edge.as_ref()
	}

	/// The single node whose neighborhood is emphasized:
	/// selection, then hovered node, then the hovered edge's source, then its target.
	///
	/// Only one endpoint of a hovered edge ever becomes the focus.
	pub fn active_focus(&self) -> Option<&str> {
		self.selected
			.as_deref()
			.or(self.hovered_node.as_deref())
			.or(self.hovered_edge.as_ref().map(|e| e.source.as_str()))
			.or(self.hovered_edge.as_ref().map(|e| e.target.as_str()))
	}

	/// Focus used for node-level edge highlighting, ignoring the hovered edge.
	pub fn node_focus(&self) -> Option<&str> {
		self.selected.as_deref().or(self.hovered_node.as_deref())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn edge(source: &str, target: &str) -> Edge {
		Edge {
			id: format!("{source}-{target}"),
			source: source.into(),
			target: target.into(),
			relation: "causes".into(),
			weight: 1.0,
			evidence_chunk: String::new(),
		}
	}

	#[test]
	fn idle_by_default() {
		let state = InteractionState::default();
		assert!(state.active_focus().is_none());
		assert_eq!(state.active_focus(), None);
	}

	#[test]
	fn selection_beats_hover() {
		let mut state = InteractionState::default();
		state.set_hovered_node(Some("h".into()));
		state.set_selected(Some("s".into()));
		state.set_hovered_edge(Some(edge("a", "b")));
		assert_eq!(state.active_focus(), Some("s"));
	}

	#[test]
	fn hovered_node_beats_hovered_edge() {
		let mut state = InteractionState::default();
		state.set_hovered_edge(Some(edge("a", "b")));
		state.set_hovered_node(Some("h".into()));
		assert_eq!(state.active_focus(), Some("h"));
	}

	#[test]
	fn hovered_edge_focuses_source() {
		let mut state = InteractionState::default();
		state.set_hovered_edge(Some(edge("a", "b")));
		assert_eq!(state.active_focus(), Some("a"));
		assert_eq!(state.node_focus(), None);
	}

	#[test]
	fn resolution_has_no_memory() {
		let mut state = InteractionState::default();
		state.set_selected(Some("s".into()));
		state.set_hovered_node(Some("h".into()));
		state.set_selected(None);
		assert_eq!(state.active_focus(), Some("h"));
		state.set_hovered_node(None);
		assert!(state.active_focus().is_none());
	}

	#[test]
	fn background_click_clears_everything() {
		let mut state = InteractionState::default();
		state.set_selected(Some("s".into()));
		state.set_hovered_node(Some("h".into()));
		state.set_hovered_edge(Some(edge("a", "b")));
		state.clear_hover_and_selection();
		assert_eq!(state, InteractionState::default());
	}

	#[test]
	fn pointer_out_keeps_selection() {
		let mut state = InteractionState::default();
		state.set_selected(Some("s".into()));
		state.set_hovered_edge(Some(edge("a", "b")));
		state.clear_hover();
		assert_eq!(state.active_focus(), Some("s"));
		assert!(state.hovered_edge().is_none());
	}
}
