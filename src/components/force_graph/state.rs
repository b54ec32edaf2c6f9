use std::sync::Arc;

use super::camera::Camera;
use super::canvas::Canvas;
use super::highlight::HighlightCache;
use super::interaction::InteractionState;
use super::layout::Layout;
use super::model::{GraphPipeline, RenderableGraph};
use super::render::{self, Frame, PARTICLE_SPEED};
use super::types::{Edge, Node, NodePositions};
use super::viewport::{Dimensions, RenderSurface, ViewportController};

/// Pointer pick radius around a node, in graph units.
pub const HIT_RADIUS: f64 = 8.0;
/// Pointer distance to an edge that still counts as hovering it, in screen pixels.
pub const LINK_HOVER_PRECISION: f64 = 10.0;
/// Pointer travel below which a press/release is a click, in screen pixels.
const CLICK_TOLERANCE: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<String>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// What a press/release without travel landed on.
#[derive(Clone, Debug, PartialEq)]
pub enum Click {
	Node(String),
	Background,
}

/// Layout engine plus camera: the live surface the viewport commands.
pub struct Scene {
	pub layout: Layout,
	pub camera: Camera,
}

impl RenderSurface for Scene {
	fn node_position(&self, id: &str) -> Option<(f64, f64)> {
		self.layout.position(id)
	}

	fn center_on(&mut self, x: f64, y: f64, duration_ms: f64) {
		self.camera.center_on(x, y, duration_ms);
	}

	fn zoom_to(&mut self, level: f64, duration_ms: f64) {
		self.camera.zoom_to(level, duration_ms);
	}

	fn fit_to_view(&mut self, duration_ms: f64, padding_px: f64) {
		if let Some(bounds) = self.layout.bounds() {
			self.camera.fit_bounds(bounds, duration_ms, padding_px);
		}
	}

	fn set_size(&mut self, width: f64, height: f64) {
		self.camera.resize(width, height);
	}
}

/// Everything one graph canvas owns between frames.
pub struct ForceGraphState {
	pipeline: GraphPipeline,
	pub scene: Scene,
	pub viewport: ViewportController,
	pub interaction: InteractionState,
	highlights: HighlightCache,
	pub drag: DragState,
	pub pan: PanState,
	press: Option<(f64, f64)>,
	particle_phase: f64,
}

impl ForceGraphState {
	pub fn new(nodes: Arc<Vec<Node>>, edges: Arc<Vec<Edge>>, width: f64, height: f64) -> Self {
		let pipeline = GraphPipeline::new(nodes, edges);
		let scene = Scene {
			layout: Layout::new(pipeline.graph()),
			camera: Camera::new(width, height),
		};
		Self {
			pipeline,
			scene,
			viewport: ViewportController::new(Dimensions { width, height }),
			interaction: InteractionState::default(),
			highlights: HighlightCache::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			press: None,
			particle_phase: 0.0,
		}
	}

	/// New raw data. The layout restarts only when the graph was rebuilt.
	pub fn load(&mut self, nodes: &Arc<Vec<Node>>, edges: &Arc<Vec<Edge>>) {
		if !self.pipeline.update(nodes, edges) {
			return;
		}
		self.scene.layout = Layout::new(self.pipeline.graph());
		self.interaction.clear_hover();
		self.drag = DragState::default();
	}

	pub fn graph(&self) -> &RenderableGraph {
		self.pipeline.graph()
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport.resize(width, height, &mut self.scene);
	}

	/// Mirrors the application's selection and lets the viewport react.
	pub fn select(&mut self, node_id: Option<String>) {
		self.viewport.selection_changed(node_id.as_deref(), &mut self.scene);
		self.interaction.set_selected(node_id);
	}

	pub fn clear_hover_and_selection(&mut self) {
		self.viewport.selection_changed(None, &mut self.scene);
		self.interaction.clear_hover_and_selection();
	}

	pub fn reset_view(&mut self) {
		self.viewport.reset_view(&mut self.scene);
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let (gx, gy) = self.scene.camera.screen_to_graph(sx, sy);
		self.scene
			.layout
			.node_near(gx, gy, HIT_RADIUS)
			.map(str::to_string)
	}

	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<Edge> {
		let (gx, gy) = self.scene.camera.screen_to_graph(sx, sy);
		let k = self.scene.camera.transform.k;
		let layout = &self.scene.layout;
		self.graph()
			.edges
			.iter()
			.filter_map(|edge| {
				let a = layout.position(&edge.source)?;
				let b = layout.position(&edge.target)?;
				Some((edge, distance_to_segment((gx, gy), a, b) * k))
			})
			.filter(|&(_, d)| d <= LINK_HOVER_PRECISION)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(edge, _)| edge.clone())
	}

	/// Hover resolution for a pointer position: nodes sit above edges.
	fn update_hover(&mut self, sx: f64, sy: f64) {
		if let Some(id) = self.node_at_position(sx, sy) {
			self.interaction.set_hovered_node(Some(id));
			self.interaction.set_hovered_edge(None);
		} else {
			let edge = self.edge_at_position(sx, sy);
			self.interaction.set_hovered_node(None);
			self.interaction.set_hovered_edge(edge);
		}
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.press = Some((sx, sy));
		if let Some(id) = self.node_at_position(sx, sy) {
			let (nx, ny) = self.scene.layout.position(&id).unwrap_or_default();
			self.drag = DragState {
				active: true,
				node: Some(id),
				start_x: sx,
				start_y: sy,
				node_start_x: nx,
				node_start_y: ny,
			};
		} else {
			let transform = self.scene.camera.transform;
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: transform.x,
				transform_start_y: transform.y,
			};
		}
	}

	pub fn pointer_moved(&mut self, sx: f64, sy: f64) {
		if self.drag.active {
			if let Some(id) = self.drag.node.clone() {
				let k = self.scene.camera.transform.k;
				let (nx, ny) = (
					self.drag.node_start_x + (sx - self.drag.start_x) / k,
					self.drag.node_start_y + (sy - self.drag.start_y) / k,
				);
				self.scene.layout.pin(&id, nx, ny);
				self.scene.layout.reheat();
			}
		} else if self.pan.active {
			self.scene.camera.pan_to(
				self.pan.transform_start_x + (sx - self.pan.start_x),
				self.pan.transform_start_y + (sy - self.pan.start_y),
			);
		} else {
			self.update_hover(sx, sy);
		}
	}

	/// Ends a drag or pan; reports a click when the pointer barely moved.
	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Option<Click> {
		let click = self.press.take().and_then(|(px, py)| {
			if (sx - px).hypot(sy - py) > CLICK_TOLERANCE {
				return None;
			}
			Some(match self.drag.node.clone() {
				Some(id) if self.drag.active => Click::Node(id),
				_ => Click::Background,
			})
		});
		self.drag = DragState::default();
		self.pan.active = false;
		click
	}

	pub fn pointer_left(&mut self) {
		self.press = None;
		self.drag = DragState::default();
		self.pan.active = false;
		self.interaction.clear_hover();
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.scene.camera.zoom_at(sx, sy, factor);
	}

	/// One animation frame: layout step, camera transition, particle motion.
	pub fn tick(&mut self, dt: f32) {
		self.scene.layout.tick(dt);
		self.scene.camera.advance(dt as f64 * 1000.0);
		self.particle_phase = (self.particle_phase + PARTICLE_SPEED).fract();
	}

	pub fn draw(&mut self, canvas: &mut impl Canvas) {
		let graph = self.pipeline.graph();
		let highlights = self.highlights.get(
			&self.interaction,
			self.pipeline.revision(),
			self.pipeline.adjacency(),
			&graph.edges,
		);
		let frame = Frame {
			graph,
			highlights,
			interaction: &self.interaction,
			positions: &self.scene.layout,
			transform: self.scene.camera.transform,
			dimensions: self.viewport.dimensions(),
			particle_phase: self.particle_phase,
		};
		render::render(&frame, canvas);
	}
}

fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len_sq = dx * dx + dy * dy;
	if len_sq < f64::EPSILON {
		return (p.0 - a.0).hypot(p.1 - a.1);
	}
	let t = (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0);
	(p.0 - (a.0 + t * dx)).hypot(p.1 - (a.1 + t * dy))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::NodeType;

	fn data() -> (Arc<Vec<Node>>, Arc<Vec<Edge>>) {
		let nodes = ["a", "b"]
			.iter()
			.map(|id| Node {
				id: id.to_string(),
				label: id.to_uppercase(),
				kind: NodeType::Treatment,
				chunk_ids: Vec::new(),
			})
			.collect();
		let edges = vec![Edge {
			id: "e1".into(),
			source: "a".into(),
			target: "b".into(),
			relation: "treats".into(),
			weight: 1.0,
			evidence_chunk: String::new(),
		}];
		(Arc::new(nodes), Arc::new(edges))
	}

	/// Two nodes seeded at (100, 0) and (-100, 0), camera centred on the origin.
	fn state() -> ForceGraphState {
		let (nodes, edges) = data();
		ForceGraphState::new(nodes, edges, 800.0, 600.0)
	}

	#[test]
	fn segment_distance() {
		assert_eq!(distance_to_segment((0.0, 5.0), (-10.0, 0.0), (10.0, 0.0)), 5.0);
		assert_eq!(distance_to_segment((13.0, 4.0), (-10.0, 0.0), (10.0, 0.0)), 5.0);
		assert_eq!(distance_to_segment((3.0, 4.0), (0.0, 0.0), (0.0, 0.0)), 5.0);
	}

	#[test]
	fn hover_prefers_nodes_then_edges() {
		let mut s = state();
		s.pointer_moved(500.0, 300.0);
		assert_eq!(s.interaction.hovered_node(), Some("a"));
		assert!(s.interaction.hovered_edge().is_none());

		s.pointer_moved(400.0, 305.0);
		assert_eq!(s.interaction.hovered_node(), None);
		assert_eq!(s.interaction.hovered_edge().map(|e| e.id.as_str()), Some("e1"));
		assert_eq!(s.interaction.active_focus(), Some("a"));

		s.pointer_moved(400.0, 350.0);
		assert!(s.interaction.active_focus().is_none());
	}

	#[test]
	fn press_release_on_node_is_click() {
		let mut s = state();
		s.pointer_down(500.0, 300.0);
		assert_eq!(s.pointer_up(501.0, 300.0), Some(Click::Node("a".into())));

		s.pointer_down(400.0, 100.0);
		assert_eq!(s.pointer_up(400.0, 100.0), Some(Click::Background));
	}

	#[test]
	fn background_drag_pans_without_click() {
		let mut s = state();
		s.pointer_down(400.0, 100.0);
		s.pointer_moved(450.0, 120.0);
		assert_eq!(s.pointer_up(450.0, 120.0), None);
		assert_eq!(s.scene.camera.transform.x, 450.0);
		assert_eq!(s.scene.camera.transform.y, 320.0);
	}

	#[test]
	fn node_drag_pins_position() {
		let mut s = state();
		s.pointer_down(500.0, 300.0);
		s.pointer_moved(520.0, 310.0);
		assert_eq!(s.pointer_up(520.0, 310.0), None);
		assert_eq!(s.scene.layout.position("a"), Some((120.0, 10.0)));
	}

	#[test]
	fn selecting_focuses_camera() {
		let mut s = state();
		s.select(Some("a".into()));
		assert_eq!(s.interaction.selected(), Some("a"));
		assert!(s.scene.camera.is_animating());
		for _ in 0..40 {
			s.tick(0.016);
		}
		assert!(!s.scene.camera.is_animating());
		assert!((s.scene.camera.transform.k - 4.0).abs() < 1e-9);
	}

	#[test]
	fn reselecting_after_background_click_refocuses() {
		let mut s = state();
		s.select(Some("a".into()));
		for _ in 0..40 {
			s.tick(0.016);
		}
		s.clear_hover_and_selection();
		assert!(s.interaction.selected().is_none());
		assert!(!s.scene.camera.is_animating());

		s.select(Some("a".into()));
		assert_eq!(s.interaction.selected(), Some("a"));
		assert!(s.scene.camera.is_animating());
	}

	#[test]
	fn selecting_missing_node_keeps_camera() {
		let mut s = state();
		s.select(Some("ghost".into()));
		assert!(!s.scene.camera.is_animating());
	}

	#[test]
	fn reload_with_same_data_keeps_layout() {
		let (nodes, edges) = data();
		let mut s = ForceGraphState::new(nodes.clone(), edges.clone(), 800.0, 600.0);
		s.pointer_moved(500.0, 300.0);
		s.load(&nodes, &edges);
		assert_eq!(s.interaction.hovered_node(), Some("a"));

		let (nodes, edges) = data();
		s.load(&nodes, &edges);
		assert!(s.interaction.hovered_node().is_none());
	}

	#[test]
	fn resize_tracks_dimensions() {
		let mut s = state();
		s.resize(1000.0, 500.0);
		assert_eq!(
			s.viewport.dimensions(),
			Dimensions {
				width: 1000.0,
				height: 500.0
			}
		);
		assert_eq!(s.scene.camera.center_point(), (0.0, 0.0));
	}

	#[test]
	fn reset_view_animates_fit() {
		let mut s = state();
		s.reset_view();
		assert!(s.scene.camera.is_animating());
	}
}
