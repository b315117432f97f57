//! Presentation seams the replay engine drives.

use super::engine::VisualState;

/// Draws the graph and toggles node/edge visibility.
pub trait GraphRenderer {
	/// Replace whatever is currently displayed with `state`.
	fn apply(&mut self, state: &VisualState);
}

/// Source listing with a single marked line.
pub trait SourceView {
	fn mark_line(&mut self, line: u32);
	fn clear_mark(&mut self);
}

/// The step slider and its numeric readout.
pub trait SliderControl {
	fn configure(&mut self, min: usize, max: usize, value: usize);
}

/// Everything `ReplayEngine::advance_to` pushes state into.
pub trait ReplayView: GraphRenderer + SourceView + SliderControl {}

impl<T: GraphRenderer + SourceView + SliderControl> ReplayView for T {}
