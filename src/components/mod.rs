pub mod arg_graph;
pub mod replay_viewer;
pub mod source_panel;
pub mod step_controls;
