//! Step replay over an ARG.
//!
//! Step `i` means "the first `i + 1` nodes in `intervalStart` order have been
//! reached". The visual state for a step is always recomputed from scratch by
//! walking those nodes in order; later nodes may clear highlights or retract
//! edges set up by earlier ones, so the walk is strictly sequential.

use std::collections::{BTreeSet, HashMap};

use log::debug;

use super::config::FullGraphMode;
use super::dataset::Dataset;
use super::types::{EdgeId, GraphData, NodeId, NodeKind};
use super::view::ReplayView;

/// Liveness of one edge's two endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeLiveness {
	pub source_alive: bool,
	pub target_alive: bool,
}

impl EdgeLiveness {
	/// An edge is drawn once both endpoints are alive.
	pub fn shown(self) -> bool {
		self.source_alive && self.target_alive
	}

	fn retract(&mut self) {
		*self = EdgeLiveness::default();
	}
}

/// What the graph, source panel and slider should display at one step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisualState {
	/// Step this state was computed for, after clamping.
	pub step: usize,
	pub shown_nodes: BTreeSet<NodeId>,
	/// Indexed by `EdgeId`.
	pub edges: Vec<EdgeLiveness>,
	pub merge_colored: BTreeSet<NodeId>,
	pub analysis_stopped: BTreeSet<NodeId>,
	pub marked_line: Option<u32>,
}

impl VisualState {
	fn blank(edge_count: usize) -> Self {
		Self {
			edges: vec![EdgeLiveness::default(); edge_count],
			..Self::default()
		}
	}

	pub fn is_node_shown(&self, id: NodeId) -> bool {
		self.shown_nodes.contains(&id)
	}

	pub fn is_edge_shown(&self, id: EdgeId) -> bool {
		self.edges.get(id).is_some_and(|e| e.shown())
	}

	pub fn shown_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
		self.edges
			.iter()
			.enumerate()
			.filter(|(_, e)| e.shown())
			.map(|(id, _)| id)
	}
}

/// Owns the dataset and the current step; the only mutator of replay state.
#[derive(Clone, Debug)]
pub struct ReplayEngine {
	dataset: Dataset,
	current_step: usize,
	visual: VisualState,
}

impl ReplayEngine {
	pub fn new(data: GraphData) -> Self {
		Self::from_dataset(Dataset::new(data))
	}

	pub fn from_dataset(dataset: Dataset) -> Self {
		let visual = VisualState::blank(dataset.edges().len());
		Self {
			dataset,
			current_step: 0,
			visual,
		}
	}

	pub fn dataset(&self) -> &Dataset {
		&self.dataset
	}

	pub fn current_step(&self) -> usize {
		self.current_step
	}

	/// Highest reachable step; zero for an empty dataset.
	pub fn max_step(&self) -> usize {
		self.dataset.max_step().unwrap_or(0)
	}

	/// State most recently pushed to the view.
	pub fn visual(&self) -> &VisualState {
		&self.visual
	}

	/// Compute the display state at `step` without touching the engine.
	///
	/// Steps past the end yield the final step's state with the last node's
	/// merge highlight dropped.
	pub fn compute_visibility(&self, step: usize) -> VisualState {
		let Some(max_step) = self.dataset.max_step() else {
			return VisualState::blank(self.dataset.edges().len());
		};
		if step > max_step {
			let mut state = self.compute_visibility(max_step);
			if let Some(last) = self.dataset.node_at_step(max_step) {
				state.merge_colored.remove(&last.index);
			}
			return state;
		}

		let dataset = &self.dataset;
		let mut state = VisualState::blank(dataset.edges().len());
		state.step = step;
		// Edges grouped by the node index at which they expire.
		let mut stop_tags: HashMap<i64, Vec<EdgeId>> = HashMap::new();
		let mut last_target_line: Option<u32> = None;

		for node in &dataset.nodes()[..=step] {
			state.marked_line = None;
			if node.analysis_stop {
				state.analysis_stopped.insert(node.index);
			}
			if node.interval_start < 0 {
				continue;
			}
			let stop = dataset.stop_of(node);
			state.shown_nodes.insert(node.index);

			let outgoing = dataset.outgoing(node.index);
			if node.kind == NodeKind::Merged {
				state.merge_colored.insert(node.index);
				if let Some(line) = outgoing
					.first()
					.and_then(|&e| dataset.edge(e))
					.and_then(|e| e.line_number())
				{
					state.marked_line = Some(line);
				}
			}

			for &edge in outgoing {
				state.edges[edge].source_alive = true;
				stop_tags.entry(stop).or_default().push(edge);
			}

			let incoming = dataset.incoming(node.index);
			for &edge in incoming {
				state.edges[edge].target_alive = true;
				stop_tags.entry(stop).or_default().push(edge);
			}
			if let Some(edge) = incoming.first().and_then(|&e| dataset.edge(e)) {
				match edge.line_number() {
					Some(line) => {
						last_target_line = Some(line);
						state.marked_line = Some(line);
					}
					None => {
						if let Some(line) = last_target_line {
							state.marked_line = Some(line);
						}
					}
				}
			}

			if let Some(expired) = stop_tags.get(&node.index.as_interval()) {
				for &edge in expired {
					state.edges[edge].retract();
				}
			}

			if node.kind.clears_merge_highlight() {
				state.merge_colored.clear();
			}
		}

		state
	}

	/// Recompute `step` and push it to `view`.
	pub fn advance_to<V: ReplayView>(&mut self, step: usize, view: &mut V) -> &VisualState {
		let state = self.compute_visibility(step);
		self.current_step = step.min(self.max_step());
		debug!(
			"replay step {} -> {} nodes, {} edges shown",
			self.current_step,
			state.shown_nodes.len(),
			state.shown_edges().count()
		);
		self.present(state, view)
	}

	pub fn reset<V: ReplayView>(&mut self, view: &mut V) -> &VisualState {
		self.advance_to(0, view)
	}

	pub fn step_forward<V: ReplayView>(&mut self, view: &mut V) -> &VisualState {
		let next = (self.current_step + 1).min(self.max_step());
		self.advance_to(next, view)
	}

	pub fn step_back<V: ReplayView>(&mut self, view: &mut V) -> &VisualState {
		self.advance_to(self.current_step.saturating_sub(1), view)
	}

	/// Jump to the final step and display the whole graph.
	pub fn show_full_graph<V: ReplayView>(
		&mut self,
		mode: FullGraphMode,
		view: &mut V,
	) -> &VisualState {
		let max_step = self.max_step();
		let state = match mode {
			FullGraphMode::Replay => {
				let mut state = self.compute_visibility(max_step);
				state.merge_colored.clear();
				state
			}
			FullGraphMode::RevealAll => self.reveal_all(),
		};
		self.current_step = max_step;
		debug!("full graph shown ({:?})", mode);
		self.present(state, view)
	}

	fn reveal_all(&self) -> VisualState {
		let nodes = self.dataset.nodes();
		VisualState {
			step: self.max_step(),
			shown_nodes: nodes.iter().map(|n| n.index).collect(),
			edges: vec![
				EdgeLiveness {
					source_alive: true,
					target_alive: true,
				};
				self.dataset.edges().len()
			],
			merge_colored: nodes
				.iter()
				.filter(|n| n.kind == NodeKind::Merged)
				.map(|n| n.index)
				.collect(),
			analysis_stopped: nodes
				.iter()
				.filter(|n| n.analysis_stop)
				.map(|n| n.index)
				.collect(),
			marked_line: self.visual.marked_line,
		}
	}

	fn present<V: ReplayView>(&mut self, state: VisualState, view: &mut V) -> &VisualState {
		view.apply(&state);
		match state.marked_line {
			Some(line) => view.mark_line(line),
			None => view.clear_mark(),
		}
		view.configure(0, self.max_step(), self.current_step);
		self.visual = state;
		&self.visual
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::replay::types::{GraphEdge, GraphNode};
	use crate::replay::view::{GraphRenderer, SliderControl, SourceView};

	#[derive(Default)]
	struct RecordingView {
		applied: Vec<VisualState>,
		marked: Option<u32>,
		slider: Option<(usize, usize, usize)>,
	}

	impl GraphRenderer for RecordingView {
		fn apply(&mut self, state: &VisualState) {
			self.applied.push(state.clone());
		}
	}

	impl SourceView for RecordingView {
		fn mark_line(&mut self, line: u32) {
			self.marked = Some(line);
		}

		fn clear_mark(&mut self) {
			self.marked = None;
		}
	}

	impl SliderControl for RecordingView {
		fn configure(&mut self, min: usize, max: usize, value: usize) {
			self.slider = Some((min, max, value));
		}
	}

	fn node(index: u32, kind: NodeKind, start: i64, stop: Option<i64>) -> GraphNode {
		GraphNode {
			index: NodeId(index),
			label: format!("N{}", index),
			kind,
			interval_start: start,
			interval_stop: stop,
			analysis_stop: false,
		}
	}

	fn edge(source: u32, target: u32, line: i64) -> GraphEdge {
		GraphEdge {
			source: NodeId(source),
			target: NodeId(target),
			label: format!("{} -> {}", source, target),
			line,
		}
	}

	fn ids(ids: &[u32]) -> BTreeSet<NodeId> {
		ids.iter().copied().map(NodeId).collect()
	}

	fn two_node_engine() -> ReplayEngine {
		ReplayEngine::new(GraphData {
			nodes: vec![
				node(0, NodeKind::None, 0, None),
				node(1, NodeKind::None, 1, Some(1)),
			],
			edges: vec![edge(0, 1, 5)],
		})
	}

	/// 0 -> 1 -> 3(merged) -> 4, 0 -> 2 -> 3, with 2 marked toMerge.
	fn merge_engine() -> ReplayEngine {
		ReplayEngine::new(GraphData {
			nodes: vec![
				node(0, NodeKind::None, 0, None),
				node(1, NodeKind::Other("covered".into()), 1, None),
				node(2, NodeKind::ToMerge, 2, None),
				node(3, NodeKind::Merged, 3, None),
				node(4, NodeKind::Other("covered".into()), 4, None),
			],
			edges: vec![
				edge(0, 1, 10),
				edge(0, 2, 11),
				edge(1, 3, 12),
				edge(2, 3, -1),
				edge(3, 4, 14),
			],
		})
	}

	#[test]
	fn edge_waits_for_target() {
		let engine = two_node_engine();
		let state = engine.compute_visibility(0);
		assert_eq!(state.shown_nodes, ids(&[0]));
		assert!(state.edges[0].source_alive);
		assert!(!state.edges[0].target_alive);
		assert!(!state.is_edge_shown(0));
		assert_eq!(state.marked_line, None);
	}

	#[test]
	fn edge_retracted_when_target_interval_stops() {
		let engine = two_node_engine();
		let state = engine.compute_visibility(1);
		assert_eq!(state.shown_nodes, ids(&[0, 1]));
		assert_eq!(state.edges[0], EdgeLiveness::default());
		assert_eq!(state.marked_line, Some(5));
	}

	#[test]
	fn edge_shown_while_interval_open() {
		let engine = ReplayEngine::new(GraphData {
			nodes: vec![node(0, NodeKind::None, 0, None), node(1, NodeKind::None, 1, None)],
			edges: vec![edge(0, 1, 5)],
		});
		let state = engine.compute_visibility(1);
		assert!(state.is_edge_shown(0));
		assert_eq!(state.shown_edges().collect::<Vec<_>>(), vec![0]);
	}

	#[test]
	fn merged_node_colored_until_plain_node() {
		let engine = merge_engine();

		let state = engine.compute_visibility(3);
		assert_eq!(state.merge_colored, ids(&[3]));
		// Merged node marks its outgoing line, then its first incoming edge wins.
		assert_eq!(state.marked_line, Some(12));

		let state = engine.compute_visibility(4);
		assert_eq!(state.merge_colored, ids(&[3]));
		assert_eq!(state.marked_line, Some(14));
	}

	#[test]
	fn to_merge_node_clears_highlight() {
		let engine = ReplayEngine::new(GraphData {
			nodes: vec![
				node(0, NodeKind::Merged, 0, None),
				node(1, NodeKind::ToMerge, 1, None),
			],
			edges: vec![edge(0, 1, 3)],
		});
		assert_eq!(engine.compute_visibility(0).merge_colored, ids(&[0]));
		assert_eq!(engine.compute_visibility(0).marked_line, Some(3));
		assert!(engine.compute_visibility(1).merge_colored.is_empty());
	}

	#[test]
	fn negative_line_reuses_previous_target_line() {
		let engine = ReplayEngine::new(GraphData {
			nodes: vec![
				node(0, NodeKind::None, 0, None),
				node(1, NodeKind::None, 1, None),
				node(2, NodeKind::None, 2, None),
			],
			edges: vec![edge(0, 1, 8), edge(1, 2, -1)],
		});
		assert_eq!(engine.compute_visibility(2).marked_line, Some(8));
	}

	#[test]
	fn negative_line_without_history_marks_nothing() {
		let engine = ReplayEngine::new(GraphData {
			nodes: vec![node(0, NodeKind::None, 0, None), node(1, NodeKind::None, 1, None)],
			edges: vec![edge(0, 1, -1)],
		});
		assert_eq!(engine.compute_visibility(1).marked_line, None);
	}

	#[test]
	fn negative_interval_start_is_skipped() {
		let engine = ReplayEngine::new(GraphData {
			nodes: vec![
				node(0, NodeKind::None, -1, None),
				node(1, NodeKind::None, 0, Some(9)),
			],
			edges: vec![edge(0, 1, 2)],
		});
		let state = engine.compute_visibility(1);
		assert_eq!(state.shown_nodes, ids(&[1]));
		assert!(state.edges[0].target_alive);
		assert!(!state.edges[0].source_alive);
	}

	#[test]
	fn analysis_stop_is_recorded() {
		let mut stopped = node(1, NodeKind::None, 1, None);
		stopped.analysis_stop = true;
		let engine = ReplayEngine::new(GraphData {
			nodes: vec![node(0, NodeKind::None, 0, None), stopped],
			edges: vec![],
		});
		assert!(engine.compute_visibility(0).analysis_stopped.is_empty());
		assert_eq!(engine.compute_visibility(1).analysis_stopped, ids(&[1]));
	}

	#[test]
	fn dangling_edges_degrade_silently() {
		let engine = ReplayEngine::new(GraphData {
			nodes: vec![node(0, NodeKind::Merged, 0, None)],
			edges: vec![edge(0, 42, 7)],
		});
		assert_eq!(engine.dataset().diagnostics().len(), 1);
		let state = engine.compute_visibility(0);
		assert_eq!(state.shown_nodes, ids(&[0]));
		assert!(!state.is_edge_shown(0));
		assert_eq!(state.marked_line, Some(7));
	}

	#[test]
	fn past_the_end_drops_last_merge_highlight() {
		let engine = ReplayEngine::new(GraphData {
			nodes: vec![node(0, NodeKind::Merged, 0, None), node(1, NodeKind::Merged, 1, None)],
			edges: vec![edge(0, 1, 1)],
		});
		let last = engine.compute_visibility(1);
		assert_eq!(last.merge_colored, ids(&[0, 1]));

		let beyond = engine.compute_visibility(6);
		assert_eq!(beyond.merge_colored, ids(&[0]));
		assert_eq!(beyond.shown_nodes, last.shown_nodes);
		assert_eq!(beyond.edges, last.edges);
		assert_eq!(beyond.step, 1);
	}

	#[test]
	fn empty_dataset_replays_to_nothing() {
		let mut engine = ReplayEngine::new(GraphData::default());
		let mut view = RecordingView::default();
		let state = engine.advance_to(3, &mut view).clone();
		assert_eq!(state, VisualState::default());
		assert_eq!(view.slider, Some((0, 0, 0)));
		assert_eq!(engine.current_step(), 0);
	}

	#[test]
	fn advance_to_pushes_state_to_every_view() {
		let mut engine = merge_engine();
		let mut view = RecordingView::default();
		engine.advance_to(3, &mut view);
		assert_eq!(engine.current_step(), 3);
		assert_eq!(view.marked, Some(12));
		assert_eq!(view.slider, Some((0, 4, 3)));
		assert_eq!(view.applied.last(), Some(&engine.compute_visibility(3)));

		engine.advance_to(0, &mut view);
		assert_eq!(view.marked, None);
	}

	#[test]
	fn advance_to_clamps_slider_value() {
		let mut engine = merge_engine();
		let mut view = RecordingView::default();
		engine.advance_to(99, &mut view);
		assert_eq!(engine.current_step(), 4);
		assert_eq!(view.slider, Some((0, 4, 4)));
	}

	#[test]
	fn advance_to_is_idempotent() {
		let mut engine = merge_engine();
		let mut view = RecordingView::default();
		let once = engine.advance_to(2, &mut view).clone();
		let twice = engine.advance_to(2, &mut view).clone();
		assert_eq!(once, twice);
		assert_eq!(view.applied[0], view.applied[1]);
	}

	#[test]
	fn reset_matches_advance_to_zero() {
		let mut engine = merge_engine();
		let mut view = RecordingView::default();
		engine.advance_to(4, &mut view);
		let reset = engine.reset(&mut view).clone();
		let reset_slider = view.slider;

		let mut other = merge_engine();
		let mut other_view = RecordingView::default();
		let zero = other.advance_to(0, &mut other_view).clone();
		assert_eq!(reset, zero);
		assert_eq!(reset_slider, other_view.slider);
		assert_eq!(engine.current_step(), 0);
	}

	#[test]
	fn stepping_saturates_at_both_ends() {
		let mut engine = two_node_engine();
		let mut view = RecordingView::default();
		engine.step_back(&mut view);
		assert_eq!(engine.current_step(), 0);
		engine.step_forward(&mut view);
		engine.step_forward(&mut view);
		assert_eq!(engine.current_step(), 1);
		engine.step_back(&mut view);
		assert_eq!(engine.current_step(), 0);
	}

	#[test]
	fn full_graph_replay_drops_merge_highlights() {
		let mut engine = merge_engine();
		let mut view = RecordingView::default();
		let state = engine.show_full_graph(FullGraphMode::Replay, &mut view).clone();
		let mut expected = engine.compute_visibility(4);
		expected.merge_colored.clear();
		assert_eq!(state, expected);
		assert_eq!(view.marked, Some(14));
		assert_eq!(view.slider, Some((0, 4, 4)));
		assert_eq!(engine.current_step(), 4);
	}

	#[test]
	fn full_graph_reveal_all_shows_everything() {
		let mut engine = two_node_engine();
		let mut view = RecordingView::default();
		let state = engine.show_full_graph(FullGraphMode::RevealAll, &mut view).clone();
		assert_eq!(state.shown_nodes, ids(&[0, 1]));
		assert!(state.is_edge_shown(0));
		assert!(state.merge_colored.is_empty());
		assert_eq!(view.slider, Some((0, 1, 1)));
	}
}
