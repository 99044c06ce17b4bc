//! Highlight decorations derived from the highlighted path.
//!
//! Decorations are computed fresh from the graph and the path on every call
//! and returned alongside element ids; inputs are only borrowed, never
//! modified, and positions are not touched.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::ir::{Edge, HighlightedStep, Node, RiskReason};
use crate::theme::Theme;

pub const DIMMED_OPACITY: f32 = 0.25;
const HIGH_RISK: f32 = 0.66;
const MEDIUM_RISK: f32 = 0.33;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightedSets {
    pub node_ids: BTreeSet<String>,
    pub edge_ids: BTreeSet<String>,
}

impl HighlightedSets {
    pub fn is_empty(&self) -> bool {
        self.edge_ids.is_empty()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_ids.contains(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edge_ids.contains(id)
    }
}

/// Edge ids of the path that resolve to a known edge, plus both endpoints of
/// each. Steps naming an edge absent from `edges` contribute nothing, so
/// every node id is an endpoint of some edge in the edge set.
pub fn derive_highlighted_sets(edges: &[Edge], path: &[HighlightedStep]) -> HighlightedSets {
    let mut sets = HighlightedSets::default();
    if path.is_empty() {
        return sets;
    }
    let wanted: BTreeSet<&str> = path.iter().map(|step| step.edge_id.as_str()).collect();
    for edge in edges {
        if wanted.contains(edge.id.as_str()) {
            sets.edge_ids.insert(edge.id.clone());
            sets.node_ids.insert(edge.from_node_id.clone());
            sets.node_ids.insert(edge.to_node_id.clone());
        }
    }
    sets
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub is_highlighted: bool,
    pub opacity: f32,
    pub stroke_width: f32,
    pub color: Option<String>,
    pub reason: Option<RiskReason>,
    pub risk_contribution: Option<f32>,
    pub order: Option<u32>,
}

impl Highlight {
    pub fn neutral() -> Self {
        Self {
            is_highlighted: false,
            opacity: 1.0,
            stroke_width: 1.0,
            color: None,
            reason: None,
            risk_contribution: None,
            order: None,
        }
    }

    fn dimmed() -> Self {
        Self {
            opacity: DIMMED_OPACITY,
            ..Self::neutral()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeHighlight {
    pub node_id: String,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeHighlight {
    pub edge_id: String,
    pub highlight: Highlight,
}

/// Decorations in input order, indexed by id. The first entry wins for a
/// repeated id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HighlightedGraph {
    pub nodes: Vec<NodeHighlight>,
    pub edges: Vec<EdgeHighlight>,
    #[serde(skip)]
    node_index: HashMap<String, usize>,
    #[serde(skip)]
    edge_index: HashMap<String, usize>,
}

impl HighlightedGraph {
    pub fn new(nodes: Vec<NodeHighlight>, edges: Vec<EdgeHighlight>) -> Self {
        let mut node_index = HashMap::with_capacity(nodes.len());
        for (index, entry) in nodes.iter().enumerate() {
            node_index.entry(entry.node_id.clone()).or_insert(index);
        }
        let mut edge_index = HashMap::with_capacity(edges.len());
        for (index, entry) in edges.iter().enumerate() {
            edge_index.entry(entry.edge_id.clone()).or_insert(index);
        }
        Self {
            nodes,
            edges,
            node_index,
            edge_index,
        }
    }

    pub fn node(&self, id: &str) -> Option<&Highlight> {
        let index = *self.node_index.get(id)?;
        self.nodes.get(index).map(|entry| &entry.highlight)
    }

    pub fn edge(&self, id: &str) -> Option<&Highlight> {
        let index = *self.edge_index.get(id)?;
        self.edges.get(index).map(|entry| &entry.highlight)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HighlightInput<'a> {
    pub nodes: &'a [Node],
    pub edges: &'a [Edge],
    pub highlighted_path: &'a [HighlightedStep],
    pub enabled: bool,
}

/// One decoration per input element, in input order. Disabled or empty-path
/// input yields neutral decorations for everything.
pub fn apply_highlighting(input: &HighlightInput<'_>, theme: &Theme) -> HighlightedGraph {
    if !input.enabled || input.highlighted_path.is_empty() {
        return HighlightedGraph::new(
            input
                .nodes
                .iter()
                .map(|node| NodeHighlight {
                    node_id: node.id.clone(),
                    highlight: Highlight::neutral(),
                })
                .collect(),
            input
                .edges
                .iter()
                .map(|edge| EdgeHighlight {
                    edge_id: edge.id.clone(),
                    highlight: Highlight::neutral(),
                })
                .collect(),
        );
    }

    let sets = derive_highlighted_sets(input.edges, input.highlighted_path);
    let mut steps: HashMap<&str, &HighlightedStep> = HashMap::new();
    for step in input.highlighted_path {
        steps.entry(step.edge_id.as_str()).or_insert(step);
    }

    let nodes = input
        .nodes
        .iter()
        .map(|node| {
            let highlight = if sets.contains_node(&node.id) {
                Highlight {
                    is_highlighted: true,
                    opacity: 1.0,
                    stroke_width: 2.5,
                    color: Some(theme.highlight_color.clone()),
                    ..Highlight::neutral()
                }
            } else {
                Highlight::dimmed()
            };
            NodeHighlight {
                node_id: node.id.clone(),
                highlight,
            }
        })
        .collect();

    let edges = input
        .edges
        .iter()
        .map(|edge| {
            let highlight = match steps.get(edge.id.as_str()) {
                Some(step) => {
                    let risk = step.risk_contribution.clamp(0.0, 1.0);
                    Highlight {
                        is_highlighted: true,
                        opacity: 1.0,
                        stroke_width: 2.0 + 2.0 * risk,
                        color: Some(risk_color(risk, theme).to_string()),
                        reason: Some(step.reason),
                        risk_contribution: Some(risk),
                        order: Some(step.order),
                    }
                }
                None => Highlight::dimmed(),
            };
            EdgeHighlight {
                edge_id: edge.id.clone(),
                highlight,
            }
        })
        .collect();

    HighlightedGraph::new(nodes, edges)
}

pub fn risk_color(risk: f32, theme: &Theme) -> &str {
    if risk >= HIGH_RISK {
        &theme.high_risk_color
    } else if risk >= MEDIUM_RISK {
        &theme.medium_risk_color
    } else {
        &theme.highlight_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeCategory;

    fn chain() -> (Vec<Node>, Vec<Edge>, Vec<HighlightedStep>) {
        let nodes = ["n1", "n2", "n3", "n4", "n5"]
            .iter()
            .map(|id| Node::new(*id, NodeCategory::Wallet))
            .collect();
        let edges = vec![
            Edge::new("e1", "n1", "n2"),
            Edge::new("e2", "n2", "n3"),
            Edge::new("e3", "n3", "n4"),
            Edge::new("e4", "n4", "n5"),
        ];
        let path = vec![
            HighlightedStep::new("e1", 1),
            HighlightedStep::new("e2", 2),
            HighlightedStep::new("e3", 3),
        ];
        (nodes, edges, path)
    }

    #[test]
    fn derives_sets_for_a_chain() {
        let (_, edges, path) = chain();
        let sets = derive_highlighted_sets(&edges, &path);
        let nodes: Vec<&str> = sets.node_ids.iter().map(String::as_str).collect();
        let edges: Vec<&str> = sets.edge_ids.iter().map(String::as_str).collect();
        assert_eq!(nodes, vec!["n1", "n2", "n3", "n4"]);
        assert_eq!(edges, vec!["e1", "e2", "e3"]);
    }

    #[test]
    fn unknown_step_edges_are_ignored() {
        let (_, edges, mut path) = chain();
        path.push(HighlightedStep::new("missing", 4));
        let sets = derive_highlighted_sets(&edges, &path);
        assert!(!sets.contains_edge("missing"));
        assert_eq!(sets.edge_ids.len(), 3);
    }

    #[test]
    fn disabled_highlighting_is_neutral() {
        let (nodes, edges, path) = chain();
        let input = HighlightInput {
            nodes: &nodes,
            edges: &edges,
            highlighted_path: &path,
            enabled: false,
        };
        let out = apply_highlighting(&input, &Theme::dark());
        assert_eq!(out.nodes.len(), 5);
        assert!(out.nodes.iter().all(|n| n.highlight == Highlight::neutral()));
        assert!(out.edges.iter().all(|e| e.highlight == Highlight::neutral()));
    }

    #[test]
    fn path_elements_are_highlighted_and_others_dimmed() {
        let (nodes, edges, mut path) = chain();
        path[1].risk_contribution = 0.9;
        path[1].reason = RiskReason::MixerInteraction;
        let input = HighlightInput {
            nodes: &nodes,
            edges: &edges,
            highlighted_path: &path,
            enabled: true,
        };
        let theme = Theme::dark();
        let out = apply_highlighting(&input, &theme);
        let e2 = out.edge("e2").unwrap();
        assert!(e2.is_highlighted);
        assert_eq!(e2.order, Some(2));
        assert_eq!(e2.reason, Some(RiskReason::MixerInteraction));
        assert_eq!(e2.color.as_deref(), Some(theme.high_risk_color.as_str()));
        let e4 = out.edge("e4").unwrap();
        assert!(!e4.is_highlighted);
        assert_eq!(e4.opacity, DIMMED_OPACITY);
        assert!(out.node("n4").unwrap().is_highlighted);
        assert!(!out.node("n5").unwrap().is_highlighted);
    }

    #[test]
    fn highlighting_is_idempotent_and_leaves_inputs_alone() {
        let (nodes, edges, path) = chain();
        let before = (nodes.clone(), edges.clone(), path.clone());
        let input = HighlightInput {
            nodes: &nodes,
            edges: &edges,
            highlighted_path: &path,
            enabled: true,
        };
        let first = apply_highlighting(&input, &Theme::dark());
        let second = apply_highlighting(&input, &Theme::dark());
        assert_eq!(first, second);
        assert_eq!(before, (nodes, edges, path));
    }

    #[test]
    fn lookups_resolve_every_element_by_id() {
        let (nodes, edges, path) = chain();
        let input = HighlightInput {
            nodes: &nodes,
            edges: &edges,
            highlighted_path: &path,
            enabled: true,
        };
        let out = apply_highlighting(&input, &Theme::dark());
        for entry in &out.nodes {
            assert_eq!(out.node(&entry.node_id), Some(&entry.highlight));
        }
        for entry in &out.edges {
            assert_eq!(out.edge(&entry.edge_id), Some(&entry.highlight));
        }
        assert!(out.edge("unknown").is_none());
    }

    #[test]
    fn empty_inputs_give_empty_output() {
        let input = HighlightInput {
            nodes: &[],
            edges: &[],
            highlighted_path: &[],
            enabled: true,
        };
        assert_eq!(apply_highlighting(&input, &Theme::dark()), HighlightedGraph::default());
    }
}
