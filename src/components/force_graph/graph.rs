//! Link resolution: raw id pairs → node indices, grouped into parallel sets.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::types::{GraphLink, GraphNode};

/// A link whose endpoints are known to exist in the node table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
	pub source: usize,
	pub target: usize,
	/// Index of the originating record in `GraphData::links`.
	pub link: usize,
	/// Position within its parallel group, dense from 0.
	pub link_num: usize,
	pub group_size: usize,
}

/// Drops records whose id was already seen. The first occurrence wins.
pub fn unique_nodes(nodes: &[GraphNode]) -> Vec<GraphNode> {
	let mut seen = HashSet::with_capacity(nodes.len());
	nodes
		.iter()
		.filter(|node| {
			let fresh = seen.insert(node.id.as_str());
			if !fresh {
				warn!("duplicate node id {:?}, keeping the first record", node.id);
			}
			fresh
		})
		.cloned()
		.collect()
}

/// Maps node ids to indices. The first occurrence of an id wins.
pub fn index_nodes(nodes: &[GraphNode]) -> HashMap<&str, usize> {
	let mut index = HashMap::with_capacity(nodes.len());
	for (i, node) in nodes.iter().enumerate() {
		index.entry(node.id.as_str()).or_insert(i);
	}
	index
}

/// Drops links with a missing endpoint and assigns parallel-group positions.
pub fn resolve_edges(nodes: &[GraphNode], links: &[GraphLink]) -> Vec<Edge> {
	let index = index_nodes(nodes);
	let mut edges: Vec<Edge> = links
		.iter()
		.enumerate()
		.filter_map(|(i, link)| {
			let source = *index.get(link.source.as_str())?;
			let target = *index.get(link.target.as_str())?;
			Some(Edge {
				source,
				target,
				link: i,
				link_num: 0,
				group_size: 1,
			})
		})
		.collect();

	let dropped = links.len() - edges.len();
	if dropped > 0 {
		debug!("dropped {dropped} link(s) referencing unknown nodes");
	}

	assign_parallel_groups(&mut edges);
	edges
}

/// Recomputes `link_num` and `group_size` from scratch for every edge.
pub fn assign_parallel_groups(edges: &mut [Edge]) {
	let mut groups: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
	for (i, edge) in edges.iter().enumerate() {
		groups.entry((edge.source, edge.target)).or_default().push(i);
	}
	for members in groups.values() {
		for (num, &i) in members.iter().enumerate() {
			edges[i].link_num = num;
			edges[i].group_size = members.len();
		}
	}
}

/// Number of edges touching each node, self-loops counted twice.
pub fn degrees(node_count: usize, edges: &[Edge]) -> Vec<usize> {
	let mut count = vec![0; node_count];
	for edge in edges {
		count[edge.source] += 1;
		count[edge.target] += 1;
	}
	count
}
