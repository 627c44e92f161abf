pub mod force_graph;
pub mod link_popup;
