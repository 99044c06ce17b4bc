use serde::{Deserialize, Serialize};

use crate::ir::NodeCategory;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub node_text_color: String,
    pub node_stroke: String,
    pub wallet_fill: String,
    pub exchange_fill: String,
    pub bridge_fill: String,
    pub contract_fill: String,
    pub protocol_fill: String,
    pub inflow_color: String,
    pub outflow_color: String,
    pub exit_color: String,
    pub accumulation_halo: String,
    pub distribution_halo: String,
    pub router_halo: String,
    pub selection_color: String,
    pub hover_color: String,
    pub highlight_color: String,
    pub high_risk_color: String,
    pub medium_risk_color: String,
    pub badge_fill: String,
    pub badge_text: String,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#0B0F17".to_string(),
            node_text_color: "#E6EAF2".to_string(),
            node_stroke: "#3A4557".to_string(),
            wallet_fill: "#1B2433".to_string(),
            exchange_fill: "#1E2A44".to_string(),
            bridge_fill: "#2A2238".to_string(),
            contract_fill: "#1F2B2B".to_string(),
            protocol_fill: "#26263A".to_string(),
            inflow_color: "#22C55E".to_string(),
            outflow_color: "#EF4444".to_string(),
            exit_color: "#F59E0B".to_string(),
            accumulation_halo: "#22C55E".to_string(),
            distribution_halo: "#EF4444".to_string(),
            router_halo: "#94A3B8".to_string(),
            selection_color: "#38BDF8".to_string(),
            hover_color: "#CBD5E1".to_string(),
            highlight_color: "#FACC15".to_string(),
            high_risk_color: "#F43F5E".to_string(),
            medium_risk_color: "#FB923C".to_string(),
            badge_fill: "#FACC15".to_string(),
            badge_text: "#0B0F17".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            node_text_color: "#1C2430".to_string(),
            node_stroke: "#C7D2E5".to_string(),
            wallet_fill: "#F8FAFF".to_string(),
            exchange_fill: "#EEF2FF".to_string(),
            bridge_fill: "#F5F0FF".to_string(),
            contract_fill: "#EFFAF7".to_string(),
            protocol_fill: "#F3F4F6".to_string(),
            inflow_color: "#16A34A".to_string(),
            outflow_color: "#DC2626".to_string(),
            exit_color: "#D97706".to_string(),
            accumulation_halo: "#16A34A".to_string(),
            distribution_halo: "#DC2626".to_string(),
            router_halo: "#64748B".to_string(),
            selection_color: "#0284C7".to_string(),
            hover_color: "#475569".to_string(),
            highlight_color: "#CA8A04".to_string(),
            high_risk_color: "#E11D48".to_string(),
            medium_risk_color: "#EA580C".to_string(),
            badge_fill: "#CA8A04".to_string(),
            badge_text: "#FFFFFF".to_string(),
        }
    }

    pub fn node_fill(&self, category: NodeCategory) -> &str {
        match category {
            NodeCategory::Wallet | NodeCategory::Unknown => &self.wallet_fill,
            NodeCategory::Exchange => &self.exchange_fill,
            NodeCategory::Bridge | NodeCategory::CrossChainExit => &self.bridge_fill,
            NodeCategory::Contract => &self.contract_fill,
            NodeCategory::Protocol | NodeCategory::Infra => &self.protocol_fill,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
