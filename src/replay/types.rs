use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an ARG node as it appears in the report data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
	/// The id as a signed value, for comparison against interval bounds.
	pub fn as_interval(self) -> i64 {
		i64::from(self.0)
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Position of an edge in the dataset's edge list.
pub type EdgeId = usize;

/// Merge classification of a node, carried in the report as its `type` tag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
	/// State produced by a merge; highlighted when reached.
	Merged,
	/// Plain state; clears any active merge highlight.
	#[default]
	None,
	/// State that will be merged later; clears any active merge highlight.
	ToMerge,
	/// Any other tag, kept verbatim.
	Other(String),
}

impl NodeKind {
	/// Whether reaching a node of this kind removes every merge highlight.
	pub fn clears_merge_highlight(&self) -> bool {
		matches!(self, NodeKind::None | NodeKind::ToMerge)
	}

	pub fn as_str(&self) -> &str {
		match self {
			NodeKind::Merged => "merged",
			NodeKind::None => "none",
			NodeKind::ToMerge => "toMerge",
			NodeKind::Other(tag) => tag,
		}
	}
}

impl From<String> for NodeKind {
	fn from(tag: String) -> Self {
		match tag.as_str() {
			"merged" => NodeKind::Merged,
			"none" => NodeKind::None,
			"toMerge" => NodeKind::ToMerge,
			_ => NodeKind::Other(tag),
		}
	}
}

impl From<NodeKind> for String {
	fn from(kind: NodeKind) -> Self {
		kind.as_str().to_owned()
	}
}

/// A program state of the analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	pub index: NodeId,
	#[serde(default)]
	pub label: String,
	#[serde(rename = "type", default)]
	pub kind: NodeKind,
	pub interval_start: i64,
	#[serde(default)]
	pub interval_stop: Option<i64>,
	#[serde(default)]
	pub analysis_stop: bool,
}

/// A transition between two program states.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	pub source: NodeId,
	pub target: NodeId,
	#[serde(default)]
	pub label: String,
	/// Source line of the transition; negative when the transition has none.
	#[serde(default = "no_line")]
	pub line: i64,
}

fn no_line() -> i64 {
	-1
}

impl GraphEdge {
	/// The source line to mark, if the edge carries one.
	pub fn line_number(&self) -> Option<u32> {
		u32::try_from(self.line).ok()
	}
}

/// Raw `{ nodes, edges }` payload embedded in the report page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}
