use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// How the "show full graph" action ends up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FullGraphMode {
	/// Replay through the final step, then drop every merge highlight.
	#[default]
	Replay,
	/// Show every node and edge and merge-color every merged node.
	RevealAll,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Error,
	Warn,
	Info,
	#[default]
	Debug,
	Trace,
}

impl LogLevel {
	pub fn to_level(self) -> log::Level {
		match self {
			LogLevel::Error => log::Level::Error,
			LogLevel::Warn => log::Level::Warn,
			LogLevel::Info => log::Level::Info,
			LogLevel::Debug => log::Level::Debug,
			LogLevel::Trace => log::Level::Trace,
		}
	}

	pub fn to_filter(self) -> LevelFilter {
		self.to_level().to_level_filter()
	}
}

/// Viewer settings, optionally embedded next to the report data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplayConfig {
	/// Step applied when the viewer mounts.
	pub initial_step: usize,
	pub full_graph_mode: FullGraphMode,
	pub log_level: LogLevel,
	pub show_edge_labels: bool,
}

impl Default for ReplayConfig {
	fn default() -> Self {
		Self {
			initial_step: 0,
			full_graph_mode: FullGraphMode::Replay,
			log_level: LogLevel::Debug,
			show_edge_labels: true,
		}
	}
}
