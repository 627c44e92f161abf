use csv::{ReaderBuilder, Trim};
use log::warn;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::LoadError;
use crate::components::force_graph::{GraphLink, GraphNode, NodeKind, ReferenceIndex};

#[derive(Debug, Deserialize)]
struct NodeRecord {
	id: String,
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	category: Option<String>,
	#[serde(default)]
	market_cap: Option<String>,
	#[serde(default)]
	logo: Option<String>,
	#[serde(default, rename = "type")]
	kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LinkRecord {
	source: String,
	target: String,
	#[serde(default, rename = "type")]
	kind: Option<String>,
	#[serde(default)]
	details: Option<String>,
	#[serde(default, alias = "references")]
	reference_id: Option<String>,
}

/// Empty → 0. Unparseable or negative values are logged and become 0.
fn market_cap(id: &str, raw: Option<&str>) -> f64 {
	let Some(raw) = raw.filter(|r| !r.is_empty()) else {
		return 0.0;
	};
	match raw.parse::<f64>() {
		Ok(value) if value.is_finite() && value >= 0.0 => value,
		Ok(value) => {
			warn!("node {id:?}: market_cap {value} out of range, using 0");
			0.0
		}
		Err(err) => {
			warn!("node {id:?}: market_cap {raw:?} is not a number ({err}), using 0");
			0.0
		}
	}
}

fn read_csv<T: DeserializeOwned>(file: &str, text: &str) -> Result<Vec<T>, LoadError> {
	ReaderBuilder::new()
		.trim(Trim::All)
		.from_reader(text.as_bytes())
		.deserialize()
		.map(|row| row.map_err(|err| LoadError::parse(file, err)))
		.collect()
}

pub fn parse_nodes(text: &str) -> Result<Vec<GraphNode>, LoadError> {
	let records: Vec<NodeRecord> = read_csv("nodes", text)?;
	Ok(records
		.into_iter()
		.map(|record| GraphNode {
			market_cap: market_cap(&record.id, record.market_cap.as_deref()),
			name: record.name.unwrap_or_else(|| record.id.clone()),
			category: record.category.unwrap_or_default(),
			logo: record.logo,
			kind: NodeKind::parse(record.kind.as_deref()),
			id: record.id,
		})
		.collect())
}

/// Rows that cannot be read (too short, missing an endpoint) are logged and
/// skipped like dangling links. A broken header still fails the load.
pub fn parse_links(text: &str) -> Result<Vec<GraphLink>, LoadError> {
	let mut reader = ReaderBuilder::new()
		.trim(Trim::All)
		.flexible(true)
		.from_reader(text.as_bytes());
	let headers = reader
		.headers()
		.map_err(|err| LoadError::parse("links", err))?
		.clone();
	if !["source", "target"].iter().all(|col| headers.iter().any(|h| h == *col)) {
		return Err(LoadError::parse("links", "header needs source and target columns"));
	}

	let records: Vec<LinkRecord> = reader
		.deserialize()
		.filter_map(|row| match row {
			Ok(record) => Some(record),
			Err(err) => {
				warn!("skipping unreadable link row: {err}");
				None
			}
		})
		.collect();
	Ok(records
		.into_iter()
		.map(|record| GraphLink {
			source: record.source,
			target: record.target,
			kind: record.kind.unwrap_or_default(),
			details: record.details,
			reference_id: record.reference_id,
		})
		.collect())
}

pub fn parse_references(text: &str) -> Result<ReferenceIndex, LoadError> {
	serde_json::from_str(text).map_err(|err| LoadError::parse("references", err))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_node_table() {
		let text = "\
id,name,category,market_cap,logo,type
nvda,NVIDIA,Semiconductors,3000,https://example.com/nvda.png,
oai, OpenAI ,AI Lab,,,
stargate,Stargate,Infrastructure,12.5,,project
";
		let nodes = parse_nodes(text).unwrap();
		assert_eq!(nodes.len(), 3);
		assert_eq!(nodes[0].market_cap, 3000.0);
		assert_eq!(nodes[0].logo.as_deref(), Some("https://example.com/nvda.png"));
		assert_eq!(nodes[0].kind, NodeKind::Company);
		assert_eq!(nodes[1].name, "OpenAI");
		assert_eq!(nodes[1].market_cap, 0.0);
		assert_eq!(nodes[1].logo, None);
		assert_eq!(nodes[2].kind, NodeKind::Project);
		assert_eq!(nodes[2].market_cap, 12.5);
	}

	#[test]
	fn optional_node_columns_may_be_absent() {
		let nodes = parse_nodes("id,name,category,market_cap\na,Alpha,X,10\n").unwrap();
		assert_eq!(nodes[0].logo, None);
		assert_eq!(nodes[0].kind, NodeKind::Company);
	}

	#[test]
	fn bad_market_cap_becomes_zero() {
		let nodes = parse_nodes("id,name,category,market_cap\na,A,X,lots\nb,B,X,-5\n").unwrap();
		assert_eq!(nodes[0].market_cap, 0.0);
		assert_eq!(nodes[1].market_cap, 0.0);
	}

	#[test]
	fn missing_id_column_is_a_parse_error() {
		let err = parse_nodes("name,category\nA,X\n").unwrap_err();
		assert!(matches!(err, LoadError::Parse { ref file, .. } if file == "nodes"));
	}

	#[test]
	fn parses_link_table() {
		let text = "\
source,target,type,details,references
nvda,oai,investment,Invested $100B,r1
oai,nvda,supplier,,
";
		let links = parse_links(text).unwrap();
		assert_eq!(links.len(), 2);
		assert_eq!(links[0].kind, "investment");
		assert_eq!(links[0].details.as_deref(), Some("Invested $100B"));
		assert_eq!(links[0].reference_id.as_deref(), Some("r1"));
		assert_eq!(links[1].details, None);
		assert_eq!(links[1].reference_id, None);
	}

	#[test]
	fn short_link_rows_are_skipped() {
		let text = "source,target,type,details,reference_id\na,b,x,,\nc\nb,a,y\n";
		let links = parse_links(text).unwrap();
		assert_eq!(links.len(), 2);
		assert_eq!((links[0].source.as_str(), links[0].target.as_str()), ("a", "b"));
		assert_eq!(links[1].kind, "y");
		assert_eq!(links[1].details, None);
	}

	#[test]
	fn link_table_without_endpoints_is_a_parse_error() {
		let err = parse_links("from,to\na,b\n").unwrap_err();
		assert!(matches!(err, LoadError::Parse { ref file, .. } if file == "links"));
	}

	#[test]
	fn parses_reference_index() {
		let text = r#"{
			"r1": [
				{"title": "Deal announced", "url": "https://example.com/a", "publication_date": "2025-09-22"},
				{"title": "Follow-up", "url": "https://example.com/b"}
			]
		}"#;
		let index = parse_references(text).unwrap();
		let entries = &index["r1"];
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0].publication_date.as_deref(), Some("2025-09-22"));
		assert_eq!(entries[1].publication_date, None);
	}

	#[test]
	fn malformed_references_are_an_error() {
		assert!(matches!(
			parse_references("[1, 2]"),
			Err(LoadError::Parse { .. })
		));
	}
}
