//! Turns an ingested [`Graph`] into drawable geometry: bucketed node sizes,
//! fitted labels, corridor bundling and boundary-snapped curved edges.
//!
//! Node positions come from the external layout provider; nodes without a
//! finite position are left out, together with every edge touching them.

mod bucket;
mod corridor;
mod text;
mod types;

use std::collections::BTreeMap;

pub use bucket::{NODE_BUCKETS, NodeBucket, node_bucket};
pub use corridor::{
    BundledEdge, CURVE_BASE, CURVE_MAX, Corridor, build_corridors, bundle_edges, corridor_key,
    curve_offset, curve_offset_with, flatten_corridors,
};
pub use text::{
    DEFAULT_ADDRESS_CHARS, ELLIPSIS, fit_label, is_address_like, node_label, shorten_address,
    shorten_middle,
};
pub use types::{EdgeLayout, LabelBlock, Layout, NodeLayout, NodeShape};

use crate::config::{CurveStrategy, LayoutConfig};
use crate::geometry::{clip_to_circle, corridor_control_point, corridor_offset_with_step, snap_line_to_circles};
use crate::ir::{Edge, Graph};
use crate::theme::Theme;

pub fn compute_layout(graph: &Graph, theme: &Theme, config: &LayoutConfig) -> Layout {
    let mut nodes = BTreeMap::new();
    for node in &graph.nodes {
        let Some((x, y)) = node.position() else {
            continue;
        };
        let bucket = node_bucket(node.size_weight);
        let label = node_label(&node.display_name, bucket.radius, bucket.font_size, theme, config);
        nodes.insert(
            node.id.clone(),
            NodeLayout {
                id: node.id.clone(),
                x,
                y,
                radius: bucket.radius,
                label,
                shape: NodeShape::for_category(node.category),
                category: node.category,
                state: node.state,
            },
        );
    }

    assemble_layout(nodes, &graph.edges, config)
}

/// Bundles and routes `edges` between already-placed nodes. Edges whose
/// endpoints are missing from `nodes` are skipped.
pub fn assemble_layout(nodes: BTreeMap<String, NodeLayout>, edges: &[Edge], config: &LayoutConfig) -> Layout {
    let bundled_edges = bundle_edges(edges);
    let mut edges = Vec::with_capacity(bundled_edges.len());
    for bundled in bundled_edges {
        if let Some(edge) = layout_edge(&bundled, &nodes, config) {
            edges.push(edge);
        }
    }

    let (min_x, min_y, width, height) = bounds(&nodes, config.padding);
    Layout {
        nodes,
        edges,
        min_x,
        min_y,
        width,
        height,
    }
}

pub fn strand_offset(index: usize, total: usize, config: &LayoutConfig) -> f32 {
    match config.curve_strategy {
        CurveStrategy::Fanned => curve_offset_with(index, total, config.curve_base, config.curve_max),
        CurveStrategy::Alternating => corridor_offset_with_step(index, total, config.corridor_step),
    }
}

fn layout_edge(
    bundled: &BundledEdge<'_>,
    nodes: &BTreeMap<String, NodeLayout>,
    config: &LayoutConfig,
) -> Option<EdgeLayout> {
    let edge = bundled.edge;
    let from = nodes.get(&edge.from_node_id)?;
    let to = nodes.get(&edge.to_node_id)?;
    let offset = strand_offset(bundled.corridor_index, bundled.corridor_total, config);

    // The normal is taken in the corridor's canonical orientation so strands
    // running A->B and B->A bend to their assigned sides consistently.
    let (low, high) = if edge.from_node_id.as_str() == bundled.corridor_key.0 {
        (from, to)
    } else {
        (to, from)
    };
    let control = corridor_control_point(low.x, low.y, high.x, high.y, offset);

    // Straight strands snap along the centre line; curved ones leave each
    // circle heading toward the control point.
    let (start, end) = if offset == 0.0 {
        let segment = snap_line_to_circles(from.x, from.y, from.radius, to.x, to.y, to.radius, config.snap_pad);
        (segment.start, segment.end)
    } else {
        (
            clip_to_circle(from.x, from.y, from.radius, control, config.snap_pad),
            clip_to_circle(to.x, to.y, to.radius, control, config.snap_pad),
        )
    };
    Some(EdgeLayout {
        id: edge.id.clone(),
        from: edge.from_node_id.clone(),
        to: edge.to_node_id.clone(),
        start,
        control,
        end,
        corridor_index: bundled.corridor_index,
        corridor_total: bundled.corridor_total,
        offset,
        kind: edge.kind,
        direction: edge.direction,
        weight: edge.weight,
        net_flow_usd: edge.net_flow_usd,
        state: edge.state,
    })
}

fn bounds(nodes: &BTreeMap<String, NodeLayout>, padding: f32) -> (f32, f32, f32, f32) {
    if nodes.is_empty() {
        return (0.0, 0.0, 2.0 * padding, 2.0 * padding);
    }
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for node in nodes.values() {
        min_x = min_x.min(node.x - node.radius);
        min_y = min_y.min(node.y - node.radius);
        max_x = max_x.max(node.x + node.radius);
        max_y = max_y.max(node.y + node.radius);
    }
    (
        min_x - padding,
        min_y - padding,
        max_x - min_x + 2.0 * padding,
        max_y - min_y + 2.0 * padding,
    )
}
