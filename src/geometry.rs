//! Circle clipping and corridor offset math. Stateless; every function is a
//! pure function of its arguments.

/// Gap left between an edge end and the node circle it touches.
pub const DEFAULT_SNAP_PAD: f32 = 2.0;

/// Perpendicular distance between neighbouring strands of one corridor.
pub const CORRIDOR_STEP: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: (f32, f32),
    pub end: (f32, f32),
}

impl Segment {
    pub fn length(&self) -> f32 {
        let dx = self.end.0 - self.start.0;
        let dy = self.end.1 - self.start.1;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Clips the centre-to-centre line of two circles so it starts `pad` outside
/// circle A and ends `pad` outside circle B.
///
/// When the circles (plus padding) overlap there is no visible gap to draw in;
/// the segment collapses to a single point on the centre line, split in
/// proportion to the radii. Coincident centres collapse onto A's centre.
pub fn snap_line_to_circles(
    ax: f32,
    ay: f32,
    ar: f32,
    bx: f32,
    by: f32,
    br: f32,
    pad: f32,
) -> Segment {
    let dx = bx - ax;
    let dy = by - ay;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist <= f32::EPSILON {
        return Segment {
            start: (ax, ay),
            end: (ax, ay),
        };
    }
    let ux = dx / dist;
    let uy = dy / dist;
    let ar = ar.max(0.0);
    let br = br.max(0.0);
    let inset_a = ar + pad;
    let inset_b = br + pad;
    if inset_a + inset_b >= dist {
        let total = ar + br;
        let t = if total > 0.0 { ar / total } else { 0.5 };
        let point = (ax + dx * t, ay + dy * t);
        return Segment {
            start: point,
            end: point,
        };
    }
    Segment {
        start: (ax + ux * inset_a, ay + uy * inset_a),
        end: (bx - ux * inset_b, by - uy * inset_b),
    }
}

/// Point on the boundary of a circle (plus `pad`) facing `toward`.
pub fn clip_to_circle(cx: f32, cy: f32, r: f32, toward: (f32, f32), pad: f32) -> (f32, f32) {
    let dx = toward.0 - cx;
    let dy = toward.1 - cy;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist <= f32::EPSILON {
        return (cx, cy);
    }
    let reach = (r.max(0.0) + pad).min(dist);
    (cx + dx / dist * reach, cy + dy / dist * reach)
}

/// Alternating perpendicular displacement for the `index`-th of `total`
/// parallel strands: `+1, -1, +2, -2, ...` steps of [`CORRIDOR_STEP`].
pub fn corridor_offset(index: usize, total: usize) -> f32 {
    corridor_offset_with_step(index, total, CORRIDOR_STEP)
}

pub fn corridor_offset_with_step(index: usize, total: usize, step: f32) -> f32 {
    if total <= 1 {
        return 0.0;
    }
    let level = (index / 2 + 1) as f32;
    let sign = if index % 2 == 0 { 1.0 } else { -1.0 };
    sign * level * step
}

/// Quadratic-curve control point for a strand from `(sx, sy)` to `(ex, ey)`.
/// Zero offset yields the midpoint, i.e. a straight line.
pub fn corridor_control_point(sx: f32, sy: f32, ex: f32, ey: f32, offset: f32) -> (f32, f32) {
    let mx = (sx + ex) / 2.0;
    let my = (sy + ey) / 2.0;
    if offset == 0.0 {
        return (mx, my);
    }
    let dx = ex - sx;
    let dy = ey - sy;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return (mx, my);
    }
    let nx = -dy / len;
    let ny = dx / len;
    (mx + nx * offset, my + ny * offset)
}

/// Point at parameter `t` on the quadratic Bezier `p0 -> ctrl -> p1`.
pub fn quad_point(p0: (f32, f32), ctrl: (f32, f32), p1: (f32, f32), t: f32) -> (f32, f32) {
    let u = 1.0 - t;
    (
        u * u * p0.0 + 2.0 * u * t * ctrl.0 + t * t * p1.0,
        u * u * p0.1 + 2.0 * u * t * ctrl.1 + t * t * p1.1,
    )
}
