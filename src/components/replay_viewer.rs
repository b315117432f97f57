use leptos::prelude::*;
use log::info;

use super::arg_graph::ArgGraphCanvas;
use super::source_panel::SourcePanel;
use super::step_controls::{SliderState, StepControls};
use crate::replay::{GraphRenderer, ReplayEngine, SliderControl, SourceView, VisualState};
use crate::report::Report;

/// Pushes engine output into the signals the child components watch.
#[derive(Clone, Copy)]
struct SignalView {
	visual: RwSignal<VisualState>,
	marked_line: RwSignal<Option<u32>>,
	slider: RwSignal<SliderState>,
}

impl GraphRenderer for SignalView {
	fn apply(&mut self, state: &VisualState) {
		self.visual.set(state.clone());
	}
}

impl SourceView for SignalView {
	fn mark_line(&mut self, line: u32) {
		self.marked_line.set(Some(line));
	}

	fn clear_mark(&mut self) {
		self.marked_line.set(None);
	}
}

impl SliderControl for SignalView {
	fn configure(&mut self, min: usize, max: usize, value: usize) {
		self.slider.set(SliderState { min, max, value });
	}
}

fn drive(
	engine: StoredValue<ReplayEngine>,
	mut view: SignalView,
	f: impl FnOnce(&mut ReplayEngine, &mut SignalView),
) {
	engine.update_value(|e| f(e, &mut view));
}

/// Graph, source listing and step controls over one report.
#[component]
pub fn ReplayViewer(report: Report) -> impl IntoView {
	let Report {
		graph,
		sources,
		config,
	} = report;
	let mut engine = ReplayEngine::new(graph);
	info!(
		"replaying ARG with {} nodes, {} edges, {} source files",
		engine.dataset().nodes().len(),
		engine.dataset().edges().len(),
		sources.len()
	);

	let mut signals = SignalView {
		visual: RwSignal::new(VisualState::default()),
		marked_line: RwSignal::new(None),
		slider: RwSignal::new(SliderState::default()),
	};
	engine.advance_to(config.initial_step, &mut signals);
	let dataset = engine.dataset().clone();
	let engine = StoredValue::new(engine);

	let full_graph_mode = config.full_graph_mode;

	view! {
		<div class="replay-viewer">
			<aside class="sidebar-left">
				<SourcePanel sources=sources marked_line=signals.marked_line />
			</aside>
			<div class="splitter"></div>
			<main class="graph-pane">
				<StepControls
					slider=signals.slider
					on_step=move |step: usize| drive(engine, signals, |e, v| {
						e.advance_to(step, v);
					})
					on_reset=move |_: ()| drive(engine, signals, |e, v| {
						e.reset(v);
					})
					on_back=move |_: ()| drive(engine, signals, |e, v| {
						e.step_back(v);
					})
					on_forward=move |_: ()| drive(engine, signals, |e, v| {
						e.step_forward(v);
					})
					on_full_graph=move |_: ()| drive(engine, signals, |e, v| {
						e.show_full_graph(full_graph_mode, v);
					})
				/>
				<div class="graph-container">
					<ArgGraphCanvas
						dataset=dataset
						visual=signals.visual
						show_edge_labels=config.show_edge_labels
					/>
				</div>
			</main>
		</div>
	}
}
