//! One-shot still-image export. The caller supplies already-placed nodes with
//! explicit radii; the request goes through the same layout assembly and
//! renderer as the interactive view.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::config::{LayoutConfig, RenderConfig};
use crate::ir::{Edge, EdgeKind, EdgeState, FlowDirection, NodeCategory, NodeState, clamp_unit};
use crate::layout::{Layout, NodeLayout, NodeShape, assemble_layout, node_label};
use crate::render::{RenderDecorations, render_svg};
use crate::theme::Theme;

const MIN_EXPORT_FONT: f32 = 10.0;
const MAX_EXPORT_FONT: f32 = 14.0;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export size must be positive and finite, got {width}x{height}")]
    InvalidSize { width: f32, height: f32 },
    #[error("export scale must be positive and finite, got {0}")]
    InvalidScale(f32),
    #[error("invalid export request: {0}")]
    Json(#[from] serde_json::Error),
    #[error("rasterization failed: {0}")]
    Raster(String),
    #[error("PNG export requires the `png` feature")]
    PngUnavailable,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    #[serde(default)]
    pub category: Option<NodeCategory>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub state: Option<NodeState>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEdge {
    #[serde(default)]
    pub id: Option<String>,
    pub from_node_id: String,
    pub to_node_id: String,
    #[serde(default)]
    pub weight: f32,
    #[serde(default)]
    pub direction: Option<FlowDirection>,
    #[serde(default)]
    pub net_flow_usd: Option<f64>,
    #[serde(default)]
    pub kind: Option<EdgeKind>,
    #[serde(default)]
    pub state: Option<EdgeState>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub nodes: Vec<ExportNode>,
    #[serde(default)]
    pub edges: Vec<ExportEdge>,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub background: Option<String>,
}

fn default_scale() -> f32 {
    1.0
}

impl ExportRequest {
    pub fn from_json(input: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(input)?)
    }

    fn validate(&self) -> Result<(), ExportError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.width) || !positive(self.height) {
            return Err(ExportError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if !positive(self.scale) {
            return Err(ExportError::InvalidScale(self.scale));
        }
        Ok(())
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            width: Some(self.width),
            height: Some(self.height),
            scale: self.scale,
        }
    }

    /// Places the supplied nodes as given and routes edges between them.
    /// Nodes with a non-finite position or radius are skipped.
    pub fn build_layout(&self, theme: &Theme, config: &LayoutConfig) -> Layout {
        let mut nodes = BTreeMap::new();
        for node in &self.nodes {
            if !(node.x.is_finite() && node.y.is_finite() && node.radius.is_finite() && node.radius > 0.0) {
                continue;
            }
            let category = node.category.unwrap_or_default();
            let font_size = (node.radius * 0.5).clamp(MIN_EXPORT_FONT, MAX_EXPORT_FONT);
            let text = node.label.as_deref().unwrap_or(&node.id);
            nodes.entry(node.id.clone()).or_insert_with(|| NodeLayout {
                id: node.id.clone(),
                x: node.x,
                y: node.y,
                radius: node.radius,
                label: node_label(text, node.radius, font_size, theme, config),
                shape: NodeShape::for_category(category),
                category,
                state: node.state.unwrap_or_default(),
            });
        }

        let edges: Vec<Edge> = self
            .edges
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                let id = raw
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("export-{idx}:{}:{}", raw.from_node_id, raw.to_node_id));
                let mut edge = Edge::new(id, raw.from_node_id.as_str(), raw.to_node_id.as_str());
                edge.weight = clamp_unit(raw.weight);
                edge.direction = raw.direction;
                edge.net_flow_usd = raw.net_flow_usd.filter(|v| v.is_finite()).unwrap_or(0.0);
                edge.kind = raw.kind.unwrap_or_default();
                edge.state = raw.state.unwrap_or_default();
                edge
            })
            .collect();

        let mut layout = assemble_layout(nodes, &edges, config);
        layout.expand_canvas(self.width, self.height);
        layout
    }
}

pub fn export_svg(request: &ExportRequest, theme: &Theme, config: &LayoutConfig) -> Result<String, ExportError> {
    request.validate()?;
    let mut theme = theme.clone();
    if let Some(background) = &request.background {
        theme.background = background.clone();
    }
    let layout = request.build_layout(&theme, config);
    tracing::debug!(
        nodes = layout.nodes.len(),
        edges = layout.edges.len(),
        "exporting still image"
    );
    Ok(render_svg(&layout, &RenderDecorations::default(), &theme, config))
}

/// Encoded PNG bytes for `request`, rasterized at `request.scale`.
pub fn export_png(request: &ExportRequest, theme: &Theme, config: &LayoutConfig) -> Result<Vec<u8>, ExportError> {
    let svg = export_svg(request, theme, config)?;
    rasterize(&svg, &request.render_config(), theme)
}

#[cfg(feature = "png")]
fn rasterize(svg: &str, render_cfg: &RenderConfig, theme: &Theme) -> Result<Vec<u8>, ExportError> {
    crate::render::render_png_bytes(svg, render_cfg, theme).map_err(|err| ExportError::Raster(err.to_string()))
}

#[cfg(not(feature = "png"))]
fn rasterize(_svg: &str, _render_cfg: &RenderConfig, _theme: &Theme) -> Result<Vec<u8>, ExportError> {
    Err(ExportError::PngUnavailable)
}
