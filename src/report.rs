//! Report data embedded in the page as JSON `<script>` blocks.

use serde::Deserialize;

use crate::replay::{GraphData, ReplayConfig};

pub const DATA_ELEMENT: &str = "collector-data";
pub const SOURCES_ELEMENT: &str = "collector-sources";
pub const CONFIG_ELEMENT: &str = "collector-config";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
	#[error("report element #{0} not found in the page")]
	MissingElement(&'static str),
	#[error("malformed JSON in #{element}: {reason}")]
	Malformed {
		element: &'static str,
		reason: String,
	},
}

/// One analysed source file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SourceFile {
	pub name: String,
	pub content: String,
}

impl SourceFile {
	/// Lines paired with their 1-based line numbers.
	pub fn numbered_lines(&self) -> impl Iterator<Item = (u32, &str)> {
		(1u32..).zip(self.content.lines())
	}
}

/// Everything the viewer needs, parsed from the page.
#[derive(Clone, Debug, Default)]
pub struct Report {
	pub graph: GraphData,
	pub sources: Vec<SourceFile>,
	pub config: ReplayConfig,
}

impl Report {
	/// Parse the three JSON blobs. Only the graph data is required.
	pub fn parse(data: &str, sources: Option<&str>, config: Option<&str>) -> Result<Self, ReportError> {
		let graph: GraphData = parse_json(DATA_ELEMENT, data)?;
		let sources = match sources {
			Some(json) => parse_json(SOURCES_ELEMENT, json)?,
			None => Vec::new(),
		};
		let config = match config {
			Some(json) => parse_json(CONFIG_ELEMENT, json)?,
			None => ReplayConfig::default(),
		};
		Ok(Self {
			graph,
			sources,
			config,
		})
	}

	/// Read the report out of the current document.
	pub fn from_document() -> Result<Self, ReportError> {
		let data = element_text(DATA_ELEMENT).ok_or(ReportError::MissingElement(DATA_ELEMENT))?;
		Self::parse(
			&data,
			element_text(SOURCES_ELEMENT).as_deref(),
			element_text(CONFIG_ELEMENT).as_deref(),
		)
	}
}

fn parse_json<T: serde::de::DeserializeOwned>(element: &'static str, json: &str) -> Result<T, ReportError> {
	serde_json::from_str(json).map_err(|e| ReportError::Malformed {
		element,
		reason: e.to_string(),
	})
}

fn element_text(id: &str) -> Option<String> {
	web_sys::window()?
		.document()?
		.get_element_by_id(id)?
		.text_content()
		.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::replay::FullGraphMode;

	const DATA: &str = r#"{
		"nodes": [
			{"index": 1, "label": "N1", "type": "none", "intervalStart": 1},
			{"index": 0, "label": "N0", "type": "none", "intervalStart": 0}
		],
		"edges": [{"source": 0, "target": 1, "label": "int x = 0;", "line": 3}]
	}"#;

	#[test]
	fn graph_only() {
		let report = Report::parse(DATA, None, None).unwrap();
		assert_eq!(report.graph.nodes.len(), 2);
		assert_eq!(report.graph.edges[0].line, 3);
		assert!(report.sources.is_empty());
		assert_eq!(report.config, ReplayConfig::default());
	}

	#[test]
	fn with_sources_and_config() {
		let report = Report::parse(
			DATA,
			Some(r#"[{"name": "main.c", "content": "int main() {\n  return 0;\n}"}]"#),
			Some(r#"{"fullGraphMode": "revealAll"}"#),
		)
		.unwrap();
		assert_eq!(report.config.full_graph_mode, FullGraphMode::RevealAll);
		let lines: Vec<_> = report.sources[0].numbered_lines().collect();
		assert_eq!(lines[0], (1, "int main() {"));
		assert_eq!(lines[2], (3, "}"));
	}

	#[test]
	fn malformed_data_names_the_element() {
		let err = Report::parse(r#"{"nodes": [{"index": "x"}]}"#, None, None).unwrap_err();
		assert!(matches!(err, ReportError::Malformed { element: DATA_ELEMENT, .. }));

		let err = Report::parse(DATA, Some("{}"), None).unwrap_err();
		assert!(matches!(err, ReportError::Malformed { element: SOURCES_ELEMENT, .. }));
	}
}
