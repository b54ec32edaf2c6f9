use super::camera::ViewTransform;
use super::canvas::Canvas;
use super::highlight::HighlightSets;
use super::interaction::InteractionState;
use super::model::RenderableGraph;
use super::types::{Edge, NodePositions, RenderNode};
use super::viewport::Dimensions;

pub const BACKGROUND: &str = "#0f172a";
pub const ACCENT: &str = "#facc15";

pub const NODE_RADIUS: f64 = 4.0;
pub const HIGHLIGHT_RADIUS: f64 = 6.0;
pub const SELECTION_RING_RADIUS: f64 = 9.0;
const SELECTION_RING_WIDTH: f64 = 2.0;
/// Hex alpha appended to a type colour for dimmed nodes (~33%).
const DIM_ALPHA: &str = "55";
const LABEL_COLOR: &str = "#e2e8f0";
const LABEL_OFFSET: (f64, f64) = (8.0, 3.0);

const EDGE_COLOR: &str = "rgba(148, 163, 184, 0.25)";
const EDGE_HIGHLIGHT_COLOR: &str = "rgba(250, 204, 21, 0.8)";
pub const EDGE_WIDTH: f64 = 0.8;
pub const EDGE_HIGHLIGHT_WIDTH: f64 = 2.4;
pub const HIGHLIGHT_PARTICLES: usize = 2;
/// Fraction of an edge a particle travels per frame.
pub const PARTICLE_SPEED: f64 = 0.006;
const PARTICLE_RADIUS: f64 = 1.5;

const TOOLTIP_PADDING: f64 = 6.0;
const TOOLTIP_RADIUS: f64 = 6.0;
const TOOLTIP_FILL: &str = "rgba(15, 23, 42, 0.85)";
const TOOLTIP_BORDER: &str = "rgba(250, 204, 21, 0.8)";
const TOOLTIP_BORDER_WIDTH: f64 = 0.5;

/// Everything one frame depends on.
pub struct Frame<'a, P: NodePositions> {
	pub graph: &'a RenderableGraph,
	pub highlights: &'a HighlightSets,
	pub interaction: &'a InteractionState,
	pub positions: &'a P,
	pub transform: ViewTransform,
	pub dimensions: Dimensions,
	/// Particle progress along highlighted edges, in `[0, 1)`.
	pub particle_phase: f64,
}

/// Style of an edge, decided only by whether it is highlighted and whether
/// it is the hovered edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
	pub color: &'static str,
	pub width: f64,
	pub particles: usize,
}

pub fn edge_style(edge: &Edge, highlights: &HighlightSets, hovered: Option<&Edge>) -> EdgeStyle {
	let highlighted = highlights.has_edge(&edge.id);
	let color = if hovered.is_some_and(|h| h.id == edge.id) {
		ACCENT
	} else if highlighted {
		EDGE_HIGHLIGHT_COLOR
	} else {
		EDGE_COLOR
	};
	if highlighted {
		EdgeStyle {
			color,
			width: EDGE_HIGHLIGHT_WIDTH,
			particles: HIGHLIGHT_PARTICLES,
		}
	} else {
		EdgeStyle {
			color,
			width: EDGE_WIDTH,
			particles: 0,
		}
	}
}

pub fn render<P: NodePositions>(frame: &Frame<'_, P>, canvas: &mut impl Canvas) {
	let Dimensions { width, height } = frame.dimensions;
	canvas.fill_background(BACKGROUND, width, height);
	canvas.save();
	canvas.transform(frame.transform.x, frame.transform.y, frame.transform.k);
	draw_edges(frame, canvas);
	draw_nodes(frame, canvas);
	// Second pass: always above nodes and edges.
	draw_edge_tooltip(frame, canvas);
	canvas.restore();
}

fn endpoints<P: NodePositions>(frame: &Frame<'_, P>, edge: &Edge) -> Option<((f64, f64), (f64, f64))> {
	Some((
		frame.positions.position(&edge.source)?,
		frame.positions.position(&edge.target)?,
	))
}

fn draw_edges<P: NodePositions>(frame: &Frame<'_, P>, canvas: &mut impl Canvas) {
	let hovered = frame.interaction.hovered_edge();
	for edge in &frame.graph.edges {
		let Some((from, to)) = endpoints(frame, edge) else {
			continue;
		};
		let style = edge_style(edge, frame.highlights, hovered);
		canvas.stroke_line(from, to, style.color, style.width);

		for i in 0..style.particles {
			let t = (frame.particle_phase + i as f64 / style.particles as f64).fract();
			let (x, y) = (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
			canvas.fill_circle(x, y, PARTICLE_RADIUS, style.color);
		}
	}
}

fn node_label(node: &RenderNode) -> &str {
	if node.name.is_empty() { node.id() } else { &node.name }
}

fn draw_nodes<P: NodePositions>(frame: &Frame<'_, P>, canvas: &mut impl Canvas) {
	let k = frame.transform.k;
	let font_size = (8.0 / k).max(3.0);
	let selected = frame.interaction.selected();

	for node in &frame.graph.nodes {
		let Some((x, y)) = frame.positions.position(node.id()) else {
			continue;
		};
		let color = node.kind().color();
		let highlighted = frame.highlights.has_node(node.id());

		if highlighted {
			canvas.fill_circle(x, y, HIGHLIGHT_RADIUS, color);
		} else {
			canvas.fill_circle(x, y, NODE_RADIUS, &format!("{color}{DIM_ALPHA}"));
		}

		if selected == Some(node.id()) {
			canvas.stroke_circle(x, y, SELECTION_RING_RADIUS, ACCENT, SELECTION_RING_WIDTH);
		}

		if highlighted {
			canvas.set_font(&format!("{font_size}px Inter"));
			canvas.fill_text(node_label(node), x + LABEL_OFFSET.0, y + LABEL_OFFSET.1, LABEL_COLOR);
		}
	}
}

fn draw_edge_tooltip<P: NodePositions>(frame: &Frame<'_, P>, canvas: &mut impl Canvas) {
	let Some(hovered) = frame.interaction.hovered_edge() else {
		return;
	};
	// Only edges that made it into the rendered graph get a tooltip.
	let Some(edge) = frame.graph.edge(&hovered.id) else {
		return;
	};
	let Some((from, to)) = endpoints(frame, edge) else {
		return;
	};
	let (mx, my) = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
	let label = format!("{} {} {}", edge.source, edge.relation, edge.target);
	let font_size = (10.0 / frame.transform.k).max(4.0);

	canvas.save();
	canvas.set_font(&format!("{font_size}px Inter"));
	let text_width = canvas.measure_text(&label);
	canvas.round_rect(
		(
			mx - text_width / 2.0 - TOOLTIP_PADDING,
			my - font_size,
			text_width + TOOLTIP_PADDING * 2.0,
			font_size * 1.8,
		),
		TOOLTIP_RADIUS,
		TOOLTIP_FILL,
		TOOLTIP_BORDER,
		TOOLTIP_BORDER_WIDTH,
	);
	canvas.fill_text(&label, mx - text_width / 2.0, my + font_size * 0.1, ACCENT);
	canvas.restore();
}
