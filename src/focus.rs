//! Focus-mode visibility. Two renditions share one visibility computation:
//! [`apply_focus_mode`] flags elements as dimmed, [`filter_focus`] drops them.
//! Neither touches the graph.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::highlight::HighlightedSets;
use crate::ir::{Edge, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum FocusMode {
    #[default]
    #[serde(alias = "all")]
    All,
    #[serde(alias = "path_only")]
    PathOnly,
    #[serde(alias = "path_plus_neighbours", alias = "PATH_PLUS_NEIGHBORS")]
    PathPlusNeighbours,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusedNode {
    pub node_id: String,
    pub dimmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusedEdge {
    pub edge_id: String,
    pub dimmed: bool,
}

/// Per-element dimming in input order, with the dimmed ids indexed for
/// constant-time lookup while painting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FocusView {
    pub nodes: Vec<FocusedNode>,
    pub edges: Vec<FocusedEdge>,
    #[serde(skip)]
    dimmed_nodes: HashSet<String>,
    #[serde(skip)]
    dimmed_edges: HashSet<String>,
}

impl FocusView {
    pub fn new(nodes: Vec<FocusedNode>, edges: Vec<FocusedEdge>) -> Self {
        let dimmed_nodes = nodes
            .iter()
            .filter(|entry| entry.dimmed)
            .map(|entry| entry.node_id.clone())
            .collect();
        let dimmed_edges = edges
            .iter()
            .filter(|entry| entry.dimmed)
            .map(|entry| entry.edge_id.clone())
            .collect();
        Self {
            nodes,
            edges,
            dimmed_nodes,
            dimmed_edges,
        }
    }

    pub fn is_node_dimmed(&self, id: &str) -> bool {
        self.dimmed_nodes.contains(id)
    }

    pub fn is_edge_dimmed(&self, id: &str) -> bool {
        self.dimmed_edges.contains(id)
    }

    pub fn dimmed_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.dimmed).count() + self.edges.iter().filter(|e| e.dimmed).count()
    }
}

/// Graph with non-visible elements removed. Borrowed, order preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredGraph<'a> {
    pub nodes: Vec<&'a Node>,
    pub edges: Vec<&'a Edge>,
}

struct Visibility<'a> {
    nodes: HashSet<&'a str>,
    edges: HashSet<&'a str>,
}

/// Visible node and edge ids; `None` when nothing is filtered.
fn visibility<'a>(
    edges: &'a [Edge],
    mode: FocusMode,
    sets: &'a HighlightedSets,
) -> Option<Visibility<'a>> {
    match mode {
        FocusMode::All => None,
        FocusMode::PathOnly => Some(Visibility {
            nodes: sets.node_ids.iter().map(String::as_str).collect(),
            edges: sets.edge_ids.iter().map(String::as_str).collect(),
        }),
        FocusMode::PathPlusNeighbours => {
            let mut nodes: HashSet<&str> = sets.node_ids.iter().map(String::as_str).collect();
            for edge in edges {
                if sets.contains_node(&edge.from_node_id) {
                    nodes.insert(edge.to_node_id.as_str());
                }
                if sets.contains_node(&edge.to_node_id) {
                    nodes.insert(edge.from_node_id.as_str());
                }
            }
            let visible_edges = edges
                .iter()
                .filter(|edge| {
                    nodes.contains(edge.from_node_id.as_str())
                        && nodes.contains(edge.to_node_id.as_str())
                })
                .map(|edge| edge.id.as_str())
                .collect();
            Some(Visibility {
                nodes,
                edges: visible_edges,
            })
        }
    }
}

/// Dimming rendition: every element is returned, flagged when outside the
/// focus.
pub fn apply_focus_mode(
    nodes: &[Node],
    edges: &[Edge],
    mode: FocusMode,
    sets: &HighlightedSets,
) -> FocusView {
    let visible = visibility(edges, mode, sets);
    let node_dimmed = |id: &str| visible.as_ref().is_some_and(|v| !v.nodes.contains(id));
    let edge_dimmed = |id: &str| visible.as_ref().is_some_and(|v| !v.edges.contains(id));
    FocusView::new(
        nodes
            .iter()
            .map(|node| FocusedNode {
                node_id: node.id.clone(),
                dimmed: node_dimmed(&node.id),
            })
            .collect(),
        edges
            .iter()
            .map(|edge| FocusedEdge {
                edge_id: edge.id.clone(),
                dimmed: edge_dimmed(&edge.id),
            })
            .collect(),
    )
}

/// Filtering rendition for large graphs. Keeps exactly the elements
/// [`apply_focus_mode`] leaves undimmed.
pub fn filter_focus<'a>(
    nodes: &'a [Node],
    edges: &'a [Edge],
    mode: FocusMode,
    sets: &HighlightedSets,
) -> FilteredGraph<'a> {
    let Some(visible) = visibility(edges, mode, sets) else {
        return FilteredGraph {
            nodes: nodes.iter().collect(),
            edges: edges.iter().collect(),
        };
    };
    FilteredGraph {
        nodes: nodes
            .iter()
            .filter(|node| visible.nodes.contains(node.id.as_str()))
            .collect(),
        edges: edges
            .iter()
            .filter(|edge| visible.edges.contains(edge.id.as_str()))
            .collect(),
    }
}
