use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid graph payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    #[default]
    Wallet,
    #[serde(alias = "cex")]
    Exchange,
    Bridge,
    #[serde(alias = "exit")]
    CrossChainExit,
    Contract,
    Protocol,
    Infra,
    #[serde(other)]
    Unknown,
}

impl NodeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wallet => "wallet",
            Self::Exchange => "exchange",
            Self::Bridge => "bridge",
            Self::CrossChainExit => "cross_chain_exit",
            Self::Contract => "contract",
            Self::Protocol => "protocol",
            Self::Infra => "infra",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeState {
    #[default]
    #[serde(alias = "neutral")]
    Neutral,
    #[serde(alias = "accumulation")]
    Accumulation,
    #[serde(alias = "distribution")]
    Distribution,
    #[serde(alias = "router")]
    Router,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    #[default]
    Transfer,
    Swap,
    Bridge,
    #[serde(alias = "exit")]
    CrossChainExit,
    Deposit,
    Withdrawal,
    ContractCall,
    #[serde(other)]
    Other,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Swap => "swap",
            Self::Bridge => "bridge",
            Self::CrossChainExit => "cross_chain_exit",
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::ContractCall => "contract_call",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory flow direction. Colour is decided by the sign of net flow; this
/// is only consulted when net flow is exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowDirection {
    #[serde(alias = "in")]
    In,
    #[serde(alias = "out")]
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeState {
    #[default]
    #[serde(alias = "normal")]
    Normal,
    #[serde(alias = "pressure")]
    Pressure,
    #[serde(alias = "dominant")]
    Dominant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiskReason {
    MixerInteraction,
    SanctionedCounterparty,
    CrossChainBridge,
    ExchangeDeposit,
    LargeTransfer,
    RapidHops,
    PeelChain,
    FreshWallet,
    #[default]
    #[serde(other)]
    Other,
}

impl RiskReason {
    pub fn label(self) -> &'static str {
        match self {
            Self::MixerInteraction => "Mixer interaction",
            Self::SanctionedCounterparty => "Sanctioned counterparty",
            Self::CrossChainBridge => "Cross-chain bridge",
            Self::ExchangeDeposit => "Exchange deposit",
            Self::LargeTransfer => "Large transfer",
            Self::RapidHops => "Rapid hops",
            Self::PeelChain => "Peel chain",
            Self::FreshWallet => "Fresh wallet",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub category: NodeCategory,
    pub display_name: String,
    pub chain: Option<String>,
    pub address: Option<String>,
    pub size_weight: f32,
    pub state: NodeState,
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl Node {
    pub fn new(id: impl Into<String>, category: NodeCategory) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            category,
            chain: None,
            address: None,
            size_weight: 0.0,
            state: NodeState::Neutral,
            x: None,
            y: None,
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Finite position, or `None` when the layout provider has not placed it.
    pub fn position(&self) -> Option<(f32, f32)> {
        match (self.x, self.y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub from_node_id: String,
    pub to_node_id: String,
    pub kind: EdgeKind,
    pub direction: Option<FlowDirection>,
    pub weight: f32,
    pub net_flow_usd: f64,
    pub state: EdgeState,
    pub tx_hash: Option<String>,
}

impl Edge {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from_node_id: from.into(),
            to_node_id: to.into(),
            kind: EdgeKind::Transfer,
            direction: None,
            weight: 0.0,
            net_flow_usd: 0.0,
            state: EdgeState::Normal,
            tx_hash: None,
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.from_node_id == node_id || self.to_node_id == node_id
    }

}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightedStep {
    pub edge_id: String,
    #[serde(default)]
    pub reason: RiskReason,
    #[serde(default)]
    pub risk_contribution: f32,
    #[serde(default)]
    pub order: u32,
}

impl HighlightedStep {
    pub fn new(edge_id: impl Into<String>, order: u32) -> Self {
        Self {
            edge_id: edge_id.into(),
            reason: RiskReason::Other,
            risk_contribution: 0.0,
            order,
        }
    }
}

/// Wire shape delivered by the resolver. Everything is optional so partially
/// populated responses still ingest.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphPayload {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
    #[serde(default)]
    pub highlighted_path: Vec<HighlightedStep>,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default)]
    pub risk_summary: Option<serde_json::Value>,
    #[serde(default)]
    pub explain: Option<serde_json::Value>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    pub id: Option<String>,
    #[serde(default, alias = "type")]
    pub category: NodeCategory,
    pub display_name: Option<String>,
    pub chain: Option<String>,
    pub address: Option<String>,
    pub size_weight: Option<f32>,
    #[serde(default)]
    pub state: NodeState,
    pub x: Option<f32>,
    pub y: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEdge {
    pub id: Option<String>,
    #[serde(alias = "from")]
    pub from_node_id: String,
    #[serde(alias = "to")]
    pub to_node_id: String,
    #[serde(default, alias = "type")]
    pub kind: EdgeKind,
    pub direction: Option<FlowDirection>,
    pub weight: Option<f32>,
    pub net_flow_usd: Option<f64>,
    #[serde(default)]
    pub state: EdgeState,
    #[serde(alias = "tx")]
    pub tx_hash: Option<String>,
}

pub fn node_id(category: NodeCategory, chain: &str, address: &str) -> String {
    format!("{}:{}:{}", category, chain, address.to_ascii_lowercase())
}

pub fn edge_id(kind: EdgeKind, from: &str, to: &str, tx: &str) -> String {
    format!("{}:{}:{}:{}", kind, from, to, tx)
}

pub fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// An ingested, internally consistent graph. Built once per fetch and
/// replaced wholesale; nothing downstream mutates it.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub highlighted_path: Vec<HighlightedStep>,
    pub truncated: bool,
    pub risk_summary: Option<serde_json::Value>,
    pub explain: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
    pub dropped_edges: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(input: &str) -> Result<Self, PayloadError> {
        let payload: GraphPayload = serde_json::from_str(input)?;
        Ok(Self::from_payload(payload))
    }

    pub fn from_payload(payload: GraphPayload) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut nodes = Vec::with_capacity(payload.nodes.len());
        for raw in payload.nodes {
            let Some(node) = ingest_node(raw) else {
                tracing::debug!("dropping node without id or address");
                continue;
            };
            if !seen.insert(node.id.clone()) {
                tracing::warn!(node_id = %node.id, "duplicate node id, keeping first occurrence");
                continue;
            }
            nodes.push(node);
        }

        let mut edges = Vec::with_capacity(payload.edges.len());
        let mut edge_ids: HashSet<String> = HashSet::new();
        let mut dropped_edges = 0;
        for raw in payload.edges {
            let edge = ingest_edge(raw);
            if !seen.contains(&edge.from_node_id) || !seen.contains(&edge.to_node_id) {
                tracing::debug!(
                    edge_id = %edge.id,
                    from = %edge.from_node_id,
                    to = %edge.to_node_id,
                    "dropping edge with unknown endpoint"
                );
                dropped_edges += 1;
                continue;
            }
            if !edge_ids.insert(edge.id.clone()) {
                tracing::warn!(edge_id = %edge.id, "duplicate edge id, keeping first occurrence");
                dropped_edges += 1;
                continue;
            }
            edges.push(edge);
        }

        let mut highlighted_path = payload.highlighted_path;
        for step in &mut highlighted_path {
            step.risk_contribution = clamp_unit(step.risk_contribution);
        }
        sort_steps(&mut highlighted_path);

        Self {
            nodes,
            edges,
            highlighted_path,
            truncated: payload.truncated,
            risk_summary: payload.risk_summary,
            explain: payload.explain,
            metadata: payload.metadata,
            dropped_edges,
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id == id)
    }
}

/// Stable sort by 1-based `order` among the ordered steps only. They are
/// redistributed over the slots they already occupy; a step with order 0
/// keeps its array position.
fn sort_steps(steps: &mut [HighlightedStep]) {
    let slots: Vec<usize> = steps
        .iter()
        .enumerate()
        .filter(|(_, step)| step.order != 0)
        .map(|(index, _)| index)
        .collect();
    let mut ordered: Vec<HighlightedStep> = slots.iter().map(|&index| steps[index].clone()).collect();
    ordered.sort_by_key(|step| step.order);
    for (index, step) in slots.into_iter().zip(ordered) {
        steps[index] = step;
    }
}

fn ingest_node(raw: RawNode) -> Option<Node> {
    let id = match (raw.id, raw.address.as_deref()) {
        (Some(id), _) if !id.is_empty() => id,
        (_, Some(address)) if !address.is_empty() => node_id(
            raw.category,
            raw.chain.as_deref().unwrap_or("unknown"),
            address,
        ),
        _ => return None,
    };
    let display_name = raw
        .display_name
        .filter(|name| !name.trim().is_empty())
        .or_else(|| raw.address.clone())
        .unwrap_or_else(|| id.clone());
    Some(Node {
        id,
        category: raw.category,
        display_name,
        chain: raw.chain,
        address: raw.address,
        size_weight: clamp_unit(raw.size_weight.unwrap_or(0.0)),
        state: raw.state,
        x: raw.x,
        y: raw.y,
    })
}

fn ingest_edge(raw: RawEdge) -> Edge {
    let id = match raw.id {
        Some(id) if !id.is_empty() => id,
        _ => edge_id(
            raw.kind,
            &raw.from_node_id,
            &raw.to_node_id,
            raw.tx_hash.as_deref().unwrap_or(""),
        ),
    };
    let net_flow_usd = raw.net_flow_usd.filter(|v| v.is_finite()).unwrap_or(0.0);
    Edge {
        id,
        from_node_id: raw.from_node_id,
        to_node_id: raw.to_node_id,
        kind: raw.kind,
        direction: raw.direction,
        weight: clamp_unit(raw.weight.unwrap_or(0.0)),
        net_flow_usd,
        state: raw.state,
        tx_hash: raw.tx_hash,
    }
}
