use std::collections::BTreeMap;

use serde::Serialize;

use crate::ir::{EdgeKind, EdgeState, FlowDirection, NodeCategory, NodeState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelBlock {
    pub text: String,
    pub width: f32,
    pub font_size: f32,
}

/// Node outline. Every category maps to exactly one shape; see
/// [`NodeShape::for_category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeShape {
    Circle,
    DoubleCircle,
    Diamond,
    RoundedSquare,
    Hexagon,
}

impl NodeShape {
    pub fn for_category(category: NodeCategory) -> Self {
        match category {
            NodeCategory::Wallet | NodeCategory::Unknown => Self::Circle,
            NodeCategory::Exchange => Self::DoubleCircle,
            NodeCategory::Bridge | NodeCategory::CrossChainExit => Self::Diamond,
            NodeCategory::Contract => Self::RoundedSquare,
            NodeCategory::Protocol | NodeCategory::Infra => Self::Hexagon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub label: LabelBlock,
    pub shape: NodeShape,
    pub category: NodeCategory,
    pub state: NodeState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLayout {
    pub id: String,
    pub from: String,
    pub to: String,
    pub start: (f32, f32),
    pub control: (f32, f32),
    pub end: (f32, f32),
    pub corridor_index: usize,
    pub corridor_total: usize,
    pub offset: f32,
    pub kind: EdgeKind,
    pub direction: Option<FlowDirection>,
    pub weight: f32,
    pub net_flow_usd: f64,
    pub state: EdgeState,
}

impl EdgeLayout {
    pub fn is_straight(&self) -> bool {
        self.offset == 0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub nodes: BTreeMap<String, NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeLayout> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    /// Grows the canvas to at least `min_width` x `min_height`, keeping the
    /// content centred. Never shrinks.
    pub fn expand_canvas(&mut self, min_width: f32, min_height: f32) {
        if min_width.is_finite() && min_width > self.width {
            self.min_x -= (min_width - self.width) / 2.0;
            self.width = min_width;
        }
        if min_height.is_finite() && min_height > self.height {
            self.min_y -= (min_height - self.height) / 2.0;
            self.height = min_height;
        }
    }
}
