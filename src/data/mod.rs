//! Loading the graph inputs: node and link tables plus the optional
//! reference index.

mod fetch;
mod records;

use log::{error, info};
use thiserror::Error;

use crate::components::force_graph::{GraphData, ReferenceIndex};
pub use fetch::fetch_text;
pub use records::{parse_links, parse_nodes, parse_references};

/// Why the graph could not be loaded.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LoadError {
	#[error("no browser window available")]
	NoWindow,
	#[error("request for {url} failed: {message}")]
	Fetch { url: String, message: String },
	#[error("{url} answered with HTTP {status}")]
	Status { url: String, status: u16 },
	#[error("could not parse {file}: {message}")]
	Parse { file: String, message: String },
}

impl LoadError {
	pub(crate) fn parse(file: &str, message: impl ToString) -> Self {
		LoadError::Parse {
			file: file.to_string(),
			message: message.to_string(),
		}
	}
}

/// Where the inputs are fetched from, relative to the page.
#[derive(Clone, Debug, PartialEq)]
pub struct DataSources {
	pub nodes: String,
	pub links: String,
	/// `None` skips the reference index entirely.
	pub references: Option<String>,
}

impl Default for DataSources {
	fn default() -> Self {
		Self {
			nodes: "nodes.csv".into(),
			links: "links.csv".into(),
			references: Some("references.json".into()),
		}
	}
}

/// Fetches and parses everything. A missing reference file (HTTP 404) yields
/// an empty index; any other failure aborts the load.
pub async fn load_graph(sources: &DataSources) -> Result<GraphData, LoadError> {
	let result = load(sources).await;
	if let Err(err) = &result {
		error!("Error loading or processing the data: {err}");
	}
	result
}

async fn load(sources: &DataSources) -> Result<GraphData, LoadError> {
	let nodes = parse_nodes(&fetch_text(&sources.nodes).await?)?;
	let links = parse_links(&fetch_text(&sources.links).await?)?;

	let references = match &sources.references {
		Some(url) => match fetch_text(url).await {
			Ok(text) => parse_references(&text)?,
			Err(LoadError::Status { status: 404, .. }) => {
				info!("{url} not found, links will show no references");
				ReferenceIndex::new()
			}
			Err(err) => return Err(err),
		},
		None => ReferenceIndex::new(),
	};

	info!(
		"loaded {} nodes, {} links, {} reference sets",
		nodes.len(),
		links.len(),
		references.len()
	);
	Ok(GraphData {
		nodes,
		links,
		references,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn error_messages_name_the_input() {
		let err = LoadError::Status {
			url: "nodes.csv".into(),
			status: 500,
		};
		assert_eq!(err.to_string(), "nodes.csv answered with HTTP 500");
		assert_eq!(
			LoadError::parse("links.csv", "bad row").to_string(),
			"could not parse links.csv: bad row"
		);
	}

	#[test]
	fn bundled_sample_data_is_consistent() {
		let nodes = parse_nodes(include_str!("../../public/nodes.csv")).unwrap();
		let links = parse_links(include_str!("../../public/links.csv")).unwrap();
		let references = parse_references(include_str!("../../public/references.json")).unwrap();

		for link in &links {
			assert!(nodes.iter().any(|n| n.id == link.source), "{}", link.source);
			assert!(nodes.iter().any(|n| n.id == link.target), "{}", link.target);
			if let Some(id) = &link.reference_id {
				assert!(references.contains_key(id), "{id}");
			}
		}
	}

	#[test]
	fn default_sources() {
		let sources = DataSources::default();
		assert_eq!(sources.nodes, "nodes.csv");
		assert_eq!(sources.references.as_deref(), Some("references.json"));
	}
}
