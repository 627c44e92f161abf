use std::collections::HashMap;

use serde::Deserialize;

/// Shape and sizing policy of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeKind {
	/// Circle scaled by market capitalization.
	#[default]
	Company,
	/// Fixed-size square.
	Project,
}

impl NodeKind {
	pub fn parse(raw: Option<&str>) -> Self {
		match raw.map(str::trim) {
			Some(kind) if kind.eq_ignore_ascii_case("project") => NodeKind::Project,
			_ => NodeKind::Company,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub name: String,
	pub category: String,
	pub market_cap: f64,
	pub logo: Option<String>,
	pub kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	pub kind: String,
	pub details: Option<String>,
	pub reference_id: Option<String>,
}

/// One citation backing a relationship.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ReferenceEntry {
	pub title: String,
	pub url: String,
	#[serde(default)]
	pub publication_date: Option<String>,
}

pub type ReferenceIndex = HashMap<String, Vec<ReferenceEntry>>;

#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
	pub references: ReferenceIndex,
}

/// Everything the metadata popup shows for a clicked link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkSelection {
	pub kind: String,
	pub color: &'static str,
	pub source: String,
	pub target: String,
	pub details: Option<String>,
	pub references: Vec<ReferenceEntry>,
	/// Screen position of the click, used to anchor the popup.
	pub anchor: (f64, f64),
}
