use std::collections::HashMap;

use crate::ir::Edge;

/// Arc offset used for bundles of two or three strands.
pub const CURVE_BASE: f32 = 18.0;
/// Outermost arc offset for bundles of four or more strands.
pub const CURVE_MAX: f32 = 36.0;

/// All edges joining one unordered node pair. `members` are indices into the
/// edge slice the corridor was built from, in array order.
#[derive(Debug, Clone, PartialEq)]
pub struct Corridor<'a> {
    pub key: (&'a str, &'a str),
    pub members: Vec<usize>,
}

impl Corridor<'_> {
    pub fn total(&self) -> usize {
        self.members.len()
    }
}

/// An edge together with its position inside its corridor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BundledEdge<'a> {
    pub edge: &'a Edge,
    pub corridor_key: (&'a str, &'a str),
    pub corridor_index: usize,
    pub corridor_total: usize,
}

/// Sorted endpoint pair; A->B and B->A share a key.
pub fn corridor_key<'a>(from: &'a str, to: &'a str) -> (&'a str, &'a str) {
    if from <= to { (from, to) } else { (to, from) }
}

/// Groups edges by unordered endpoint pair. Corridors come out in the order
/// their first edge appears.
pub fn build_corridors(edges: &[Edge]) -> Vec<Corridor<'_>> {
    let mut slots: HashMap<(&str, &str), usize> = HashMap::new();
    let mut corridors: Vec<Corridor<'_>> = Vec::new();
    for (idx, edge) in edges.iter().enumerate() {
        let key = corridor_key(&edge.from_node_id, &edge.to_node_id);
        match slots.get(&key) {
            Some(&slot) => corridors[slot].members.push(idx),
            None => {
                slots.insert(key, corridors.len());
                corridors.push(Corridor {
                    key,
                    members: vec![idx],
                });
            }
        }
    }
    corridors
}

/// Back to one entry per edge, in the original edge order.
pub fn flatten_corridors<'a>(edges: &'a [Edge], corridors: &[Corridor<'a>]) -> Vec<BundledEdge<'a>> {
    let mut flat: Vec<Option<BundledEdge<'a>>> = vec![None; edges.len()];
    for corridor in corridors {
        let total = corridor.total();
        for (position, &edge_idx) in corridor.members.iter().enumerate() {
            let Some(edge) = edges.get(edge_idx) else {
                continue;
            };
            flat[edge_idx] = Some(BundledEdge {
                edge,
                corridor_key: corridor.key,
                corridor_index: position,
                corridor_total: total,
            });
        }
    }
    flat.into_iter().flatten().collect()
}

pub fn bundle_edges(edges: &[Edge]) -> Vec<BundledEdge<'_>> {
    let corridors = build_corridors(edges);
    flatten_corridors(edges, &corridors)
}

/// Offset for the fanned presentation: one strand is straight, two and three
/// are symmetric arcs at `CURVE_BASE`, four or more spread evenly across
/// `[-CURVE_MAX, +CURVE_MAX]`.
pub fn curve_offset(index: usize, total: usize) -> f32 {
    curve_offset_with(index, total, CURVE_BASE, CURVE_MAX)
}

pub fn curve_offset_with(index: usize, total: usize, base: f32, max: f32) -> f32 {
    match total {
        0 | 1 => 0.0,
        2 => {
            if index == 0 {
                -base
            } else {
                base
            }
        }
        3 => match index {
            0 => -base,
            1 => 0.0,
            _ => base,
        },
        _ => {
            let i = index.min(total - 1) as f32;
            let t = i / (total - 1) as f32;
            -max + 2.0 * max * t
        }
    }
}
