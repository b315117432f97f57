use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{ArgGraphState, NODE_RADIUS};
use crate::replay::{NodeKind, VisualState};

const BACKGROUND: &str = "#1a1a2e";
const NODE_FILL: &str = "#4a78c2";
const TO_MERGE_FILL: &str = "#8c6bb1";
const MERGED_FILL: &str = "#f0a030";
const STOP_RING: &str = "#e04848";
const NEWEST_RING: &str = "#1366eb";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn fill_for(kind: &NodeKind, merge_colored: bool) -> &'static str {
	if merge_colored {
		return MERGED_FILL;
	}
	match kind {
		NodeKind::ToMerge => TO_MERGE_FILL,
		_ => NODE_FILL,
	}
}

pub fn render(state: &ArgGraphState, visual: &VisualState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let positions = state.positions();
	draw_edges(state, visual, &positions, ctx);
	draw_nodes(state, visual, ctx);
	ctx.restore();
	draw_tooltip(state, visual, ctx);
}

fn draw_edges(
	state: &ArgGraphState,
	visual: &VisualState,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
	ctx: &CanvasRenderingContext2d,
) {
	let k = state.transform.k;
	let (line_width, dash, gap, arrow_size) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	for edge in &state.edges {
		if !visual.is_edge_shown(edge.id) {
			continue;
		}
		let (Some(&(x1, y1)), Some(&(x2, y2))) = (positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let is_highlighted = state.is_highlighted(edge.source) && state.is_highlighted(edge.target);

		// t=0: all edges at base (0.6), t=1: highlighted at 0.9, others at 0.15
		let (edge_alpha, arrow_alpha, width) = if is_highlighted {
			(0.6 + 0.3 * t, 0.8 + 0.1 * t, line_width * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, 0.8 - 0.45 * t, line_width * (1.0 - 0.3 * t))
		};

		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", edge_alpha));
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.line_to(
			x2 - ux * (NODE_RADIUS + arrow_size),
			y2 - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&format!("rgba(100, 180, 255, {})", arrow_alpha));
		let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		// Labels are unreadable when zoomed far out.
		if state.show_edge_labels && !edge.label.is_empty() && k > 0.5 {
			ctx.set_fill_style_str(&format!("rgba(200, 220, 255, {})", edge_alpha));
			ctx.set_font(&format!("{}px monospace", 9.0 / k.max(0.5)));
			let _ = ctx.fill_text(&edge.label, (x1 + x2) / 2.0 + 4.0, (y1 + y2) / 2.0);
		}
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &ArgGraphState, visual: &VisualState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	// Dimmed pass first, then highlighted nodes on top.
	for highlighted_pass in [false, true] {
		if highlighted_pass && !has_highlight {
			break;
		}
		state.graph.visit_nodes(|node| {
			let idx = node.index();
			let info = &node.data.user_data;
			if !visual.is_node_shown(info.id) {
				return;
			}
			let highlighted = has_highlight && state.is_highlighted(idx);
			if highlighted != highlighted_pass {
				return;
			}
			let (x, y) = (node.x() as f64, node.y() as f64);
			let fill = fill_for(&info.kind, visual.merge_colored.contains(&info.id));

			let (alpha, radius, glow_radius) = if !highlighted {
				(1.0 - 0.7 * t, NODE_RADIUS * (1.0 - 0.15 * t), 0.0)
			} else if state.is_hovered(idx) {
				(
					1.0,
					NODE_RADIUS * (1.0 + 0.35 * t),
					NODE_RADIUS * (1.8 + 1.2 * t),
				)
			} else {
				(1.0, NODE_RADIUS * (1.0 + 0.2 * t), NODE_RADIUS * (1.4 + 0.6 * t))
			};

			if glow_radius > 0.0 && t > 0.01 {
				if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
					let glow = if state.is_hovered(idx) { 0.35 * t } else { 0.2 * t };
					let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", glow));
					let _ = gradient.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", glow * 0.3));
					let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
					ctx.begin_path();
					let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
					#[allow(deprecated)]
					ctx.set_fill_style(&gradient);
					ctx.fill();
				}
			}

			ctx.set_global_alpha(alpha);
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(fill);
			ctx.fill();

			if visual.analysis_stopped.contains(&info.id) {
				ctx.set_stroke_style_str(STOP_RING);
				ctx.set_line_width(3.0 / k);
				ctx.stroke();
			}
			if state.newest == Some(info.id) {
				ctx.begin_path();
				let _ = ctx.arc(x, y, radius + 3.0 / k, 0.0, 2.0 * PI);
				ctx.set_stroke_style_str(NEWEST_RING);
				ctx.set_line_width(4.0 / k);
				ctx.stroke();
			}
			ctx.set_global_alpha(1.0);

			ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.9));
			ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
			let _ = ctx.fill_text(&info.id.to_string(), x + radius + 3.0, y + 3.0);
		});
	}
}

/// ARG id and label of the hovered node, drawn in screen space.
fn draw_tooltip(state: &ArgGraphState, visual: &VisualState, ctx: &CanvasRenderingContext2d) {
	let Some(info) = state.hover.node.and_then(|idx| state.node_info(idx)) else {
		return;
	};
	if !visual.is_node_shown(info.id) {
		return;
	}
	let lines = [format!("ARG_ID: {}", info.id), format!("Label: {}", info.label)];
	let (px, py) = state.hover.pointer;
	let (x, y) = (px + 20.0, py);

	ctx.set_font("12px sans-serif");
	let width = lines
		.iter()
		.filter_map(|l| ctx.measure_text(l).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max);
	ctx.set_fill_style_str("rgba(20, 20, 35, 0.92)");
	ctx.fill_rect(x, y, width + 16.0, 44.0);
	ctx.set_fill_style_str("white");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x + 8.0, y + 18.0 + 16.0 * i as f64);
	}
}
