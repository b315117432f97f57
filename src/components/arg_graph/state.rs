use std::collections::{HashMap, HashSet, VecDeque};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::replay::{Dataset, EdgeId, NodeId, NodeKind};

pub const NODE_RADIUS: f64 = 9.0;
pub const HIT_RADIUS: f64 = 14.0;
const LAYER_GAP: f64 = 70.0;
const SIBLING_GAP: f64 = 60.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: NodeId,
	pub label: String,
	pub kind: NodeKind,
}

#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub id: EdgeId,
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub label: String,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	/// Screen position of the pointer, for the tooltip.
	pub pointer: (f64, f64),
	delay_t: f64,
}

pub struct ArgGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<EdgeInfo>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	/// Node outlined as the most recent state of the analysis.
	pub newest: Option<NodeId>,
	pub show_edge_labels: bool,
}

/// Depth of every node below the first node in step order, by BFS over edges.
/// Unreachable nodes go one layer below the deepest reachable one.
fn layer_of(dataset: &Dataset) -> HashMap<NodeId, usize> {
	let mut layers = HashMap::new();
	let Some(root) = dataset.node_at_step(0) else {
		return layers;
	};
	let mut queue = VecDeque::from([(root.index, 0usize)]);
	layers.insert(root.index, 0);
	while let Some((id, depth)) = queue.pop_front() {
		for &edge in dataset.outgoing(id) {
			if let Some(edge) = dataset.edge(edge) {
				if !layers.contains_key(&edge.target) {
					layers.insert(edge.target, depth + 1);
					queue.push_back((edge.target, depth + 1));
				}
			}
		}
	}
	let orphan_layer = layers.values().max().map_or(0, |d| d + 1);
	for node in dataset.nodes() {
		layers.entry(node.index).or_insert(orphan_layer);
	}
	layers
}

impl ArgGraphState {
	pub fn new(dataset: &Dataset, width: f64, height: f64, show_edge_labels: bool) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 250.0,
			force_spring: 0.08,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.85,
		});
		let layers = layer_of(dataset);
		let mut per_layer: HashMap<usize, usize> = HashMap::new();
		let mut id_to_idx = HashMap::new();

		for node in dataset.nodes() {
			let layer = layers.get(&node.index).copied().unwrap_or(0);
			let slot = per_layer.entry(layer).or_insert(0);
			// Alternate siblings left and right of the centre line.
			let offset = if *slot % 2 == 0 {
				(*slot / 2) as f64
			} else {
				-(((*slot + 1) / 2) as f64)
			};
			*slot += 1;
			let (x, y) = (
				(offset * SIBLING_GAP) as f32,
				(layer as f64 * LAYER_GAP) as f32,
			);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.index,
					label: node.label.clone(),
					kind: node.kind.clone(),
				},
			});
			id_to_idx.entry(node.index).or_insert(idx);
		}

		let mut edges = Vec::new();
		for (id, edge) in dataset.edges().iter().enumerate() {
			if let (Some(&src), Some(&tgt)) = (id_to_idx.get(&edge.source), id_to_idx.get(&edge.target)) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push(EdgeInfo {
					id,
					source: src,
					target: tgt,
					label: edge.label.clone(),
				});
			}
		}

		Self {
			graph,
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: 60.0,
				k: 0.75,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			newest: dataset.max_node_index(),
			show_edge_labels,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Graph positions of every node, keyed by simulation index.
	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	/// Topmost node under the pointer among those `is_visible` accepts.
	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		is_visible: impl Fn(NodeId) -> bool,
	) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if !is_visible(node.data.user_data.id) {
				return;
			}
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_info(&self, idx: DefaultNodeIdx) -> Option<NodeInfo> {
		let mut info = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				info = Some(node.data.user_data.clone());
			}
		});
		info
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for edge in &self.edges {
				if edge.source == idx {
					self.hover.neighbors.insert(edge.target);
				} else if edge.target == idx {
					self.hover.neighbors.insert(edge.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::replay::{GraphData, GraphEdge, GraphNode};

	fn node(index: u32, start: i64) -> GraphNode {
		GraphNode {
			index: NodeId(index),
			label: format!("N{}", index),
			kind: NodeKind::None,
			interval_start: start,
			interval_stop: None,
			analysis_stop: false,
		}
	}

	fn edge(source: u32, target: u32) -> GraphEdge {
		GraphEdge {
			source: NodeId(source),
			target: NodeId(target),
			label: String::new(),
			line: -1,
		}
	}

	#[test]
	fn layers_follow_bfs_depth_from_first_step() {
		let dataset = Dataset::new(GraphData {
			nodes: vec![node(0, 0), node(1, 1), node(2, 2), node(3, 3), node(9, 4)],
			edges: vec![edge(0, 1), edge(0, 2), edge(2, 3), edge(3, 0)],
		});
		let layers = layer_of(&dataset);
		assert_eq!(layers[&NodeId(0)], 0);
		assert_eq!(layers[&NodeId(1)], 1);
		assert_eq!(layers[&NodeId(2)], 1);
		assert_eq!(layers[&NodeId(3)], 2);
		assert_eq!(layers[&NodeId(9)], 3);
	}

	#[test]
	fn dangling_edges_are_not_simulated() {
		let dataset = Dataset::new(GraphData {
			nodes: vec![node(0, 0), node(1, 1)],
			edges: vec![edge(0, 1), edge(1, 7)],
		});
		let state = ArgGraphState::new(&dataset, 800.0, 600.0, true);
		assert_eq!(state.edges.len(), 1);
		assert_eq!(state.edges[0].id, 0);
		assert_eq!(state.newest, Some(NodeId(1)));
	}
}
