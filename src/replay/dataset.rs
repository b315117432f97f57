use std::collections::{HashMap, HashSet};
use std::fmt;

use log::warn;

use super::types::{EdgeId, GraphData, GraphEdge, GraphNode, NodeId};

/// Referential-integrity problem found while indexing report data.
///
/// None of these stop a replay; the affected lookups come back empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
	/// Two nodes share an index. Lookups resolve to the first one in step order.
	DuplicateNode(NodeId),
	/// An edge endpoint names a node that does not exist.
	DanglingEdge { edge: EdgeId, missing: NodeId },
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::DuplicateNode(id) => write!(f, "duplicate node index {}", id),
			Self::DanglingEdge { edge, missing } => {
				write!(f, "edge #{} references missing node {}", edge, missing)
			}
		}
	}
}

/// Immutable, indexed view of one ARG: nodes in step order plus adjacency.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
	outgoing: HashMap<NodeId, Vec<EdgeId>>,
	incoming: HashMap<NodeId, Vec<EdgeId>>,
	max_interval_index: i64,
	diagnostics: Vec<Diagnostic>,
}

impl Dataset {
	/// Sort nodes by `intervalStart` (stable) and build the edge indexes.
	pub fn new(data: GraphData) -> Self {
		let GraphData { mut nodes, edges } = data;
		nodes.sort_by_key(|n| n.interval_start);

		let mut diagnostics = Vec::new();
		let mut known = HashSet::with_capacity(nodes.len());
		for node in &nodes {
			if !known.insert(node.index) {
				diagnostics.push(Diagnostic::DuplicateNode(node.index));
			}
		}

		let mut outgoing: HashMap<NodeId, Vec<EdgeId>> = HashMap::new();
		let mut incoming: HashMap<NodeId, Vec<EdgeId>> = HashMap::new();
		for (id, edge) in edges.iter().enumerate() {
			for endpoint in [edge.source, edge.target] {
				if !known.contains(&endpoint) {
					diagnostics.push(Diagnostic::DanglingEdge {
						edge: id,
						missing: endpoint,
					});
				}
			}
			outgoing.entry(edge.source).or_default().push(id);
			incoming.entry(edge.target).or_default().push(id);
		}

		for diagnostic in &diagnostics {
			warn!("malformed ARG data: {}", diagnostic);
		}

		let max_interval_index = nodes.iter().map(|n| n.interval_start).max().unwrap_or(0);

		Self {
			nodes,
			edges,
			outgoing,
			incoming,
			max_interval_index,
			diagnostics,
		}
	}

	/// Nodes in step order: step `i` is `nodes()[i]`.
	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	pub fn edge(&self, id: EdgeId) -> Option<&GraphEdge> {
		self.edges.get(id)
	}

	pub fn node_at_step(&self, step: usize) -> Option<&GraphNode> {
		self.nodes.get(step)
	}

	/// Lookup by node index rather than step position.
	pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.index == id)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Last valid step, or `None` for an empty dataset.
	pub fn max_step(&self) -> Option<usize> {
		self.nodes.len().checked_sub(1)
	}

	pub fn max_interval_index(&self) -> i64 {
		self.max_interval_index
	}

	/// Largest node index present, which the renderer outlines.
	pub fn max_node_index(&self) -> Option<NodeId> {
		self.nodes.iter().map(|n| n.index).max()
	}

	pub fn outgoing(&self, id: NodeId) -> &[EdgeId] {
		self.outgoing.get(&id).map_or(&[], Vec::as_slice)
	}

	pub fn incoming(&self, id: NodeId) -> &[EdgeId] {
		self.incoming.get(&id).map_or(&[], Vec::as_slice)
	}

	/// Step at which edges touching `node` expire.
	///
	/// A zero `intervalStop` counts as absent, same as a missing one.
	pub fn stop_of(&self, node: &GraphNode) -> i64 {
		match node.interval_stop {
			Some(stop) if stop != 0 => stop,
			_ => self.max_interval_index + 1,
		}
	}

	pub fn diagnostics(&self) -> &[Diagnostic] {
		&self.diagnostics
	}
}
