use crate::config::LayoutConfig;
use crate::ir::Graph;
use crate::layout::Layout;
use crate::render::{EdgeHue, edge_hue, edge_width};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
    pub truncated: bool,
    pub dropped_edges: usize,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub shape: String,
    pub category: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub label: String,
    pub label_width: f32,
    pub font_size: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub id: String,
    pub from: String,
    pub to: String,
    pub corridor_index: usize,
    pub corridor_total: usize,
    pub offset: f32,
    pub hue: String,
    pub stroke_width: f32,
    pub points: [[f32; 2]; 3],
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout, graph: &Graph, config: &LayoutConfig) -> Self {
        let nodes = layout
            .nodes
            .values()
            .map(|node| NodeDump {
                id: node.id.clone(),
                shape: format!("{:?}", node.shape),
                category: node.category.to_string(),
                x: node.x,
                y: node.y,
                radius: node.radius,
                label: node.label.text.clone(),
                label_width: node.label.width,
                font_size: node.label.font_size,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| {
                let hue = match edge_hue(edge.net_flow_usd, edge.direction, edge.kind) {
                    EdgeHue::Inflow => "inflow",
                    EdgeHue::Outflow => "outflow",
                    EdgeHue::Exit => "exit",
                };
                EdgeDump {
                    id: edge.id.clone(),
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    corridor_index: edge.corridor_index,
                    corridor_total: edge.corridor_total,
                    offset: edge.offset,
                    hue: hue.to_string(),
                    stroke_width: edge_width(edge.weight, edge.state, config),
                    points: [
                        [edge.start.0, edge.start.1],
                        [edge.control.0, edge.control.1],
                        [edge.end.0, edge.end.1],
                    ],
                }
            })
            .collect();

        LayoutDump {
            min_x: layout.min_x,
            min_y: layout.min_y,
            width: layout.width,
            height: layout.height,
            truncated: graph.truncated,
            dropped_edges: graph.dropped_edges,
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout, graph: &Graph, config: &LayoutConfig) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, graph, config);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
