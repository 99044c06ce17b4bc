use serde::Serialize;

use crate::ir::clamp_unit;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeBucket {
    pub threshold: f32,
    pub radius: f32,
    pub font_size: f32,
}

/// Rank buckets, smallest first. Node size is a step function of rank so
/// nodes of similar influence render at identical sizes across fetches.
pub const NODE_BUCKETS: [NodeBucket; 5] = [
    NodeBucket {
        threshold: 0.2,
        radius: 14.0,
        font_size: 10.0,
    },
    NodeBucket {
        threshold: 0.4,
        radius: 18.0,
        font_size: 11.0,
    },
    NodeBucket {
        threshold: 0.6,
        radius: 23.0,
        font_size: 12.0,
    },
    NodeBucket {
        threshold: 0.8,
        radius: 28.0,
        font_size: 13.0,
    },
    NodeBucket {
        threshold: 1.0,
        radius: 34.0,
        font_size: 14.0,
    },
];

pub fn node_bucket(size_weight: f32) -> NodeBucket {
    let weight = clamp_unit(size_weight);
    NODE_BUCKETS
        .iter()
        .copied()
        .find(|bucket| weight <= bucket.threshold)
        .unwrap_or(NODE_BUCKETS[NODE_BUCKETS.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(node_bucket(0.0).radius, 14.0);
        assert_eq!(node_bucket(0.2).radius, 14.0);
        assert_eq!(node_bucket(0.21).radius, 18.0);
        assert_eq!(node_bucket(0.8).radius, 28.0);
        assert_eq!(node_bucket(1.0).radius, 34.0);
    }

    #[test]
    fn out_of_range_weights_are_clamped() {
        assert_eq!(node_bucket(-4.0), NODE_BUCKETS[0]);
        assert_eq!(node_bucket(7.0), NODE_BUCKETS[4]);
        assert_eq!(node_bucket(f32::NAN), NODE_BUCKETS[0]);
    }

    #[test]
    fn nearby_weights_share_a_size() {
        assert_eq!(node_bucket(0.41), node_bucket(0.59));
    }
}
