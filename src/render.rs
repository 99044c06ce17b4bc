use crate::config::{LayoutConfig, RenderConfig};
use crate::focus::FocusView;
use crate::geometry::quad_point;
use crate::highlight::{Highlight, HighlightedGraph};
use crate::ir::{EdgeKind, EdgeState, FlowDirection, NodeState};
use crate::layout::{EdgeLayout, Layout, NodeLayout, NodeShape};
use crate::text_metrics;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const GLOW_FILTER_ID: &str = "edge-glow";
const GLOW_WIDTH_FACTOR: f32 = 2.6;
const GLOW_OPACITY: f32 = 0.35;
const EXIT_DASH: &str = "6 4";
const ROUTER_DASH: &str = "3 3";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeRenderState {
    pub is_selected: bool,
    pub is_hovered: bool,
    pub is_dimmed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeRenderState {
    pub is_selected: bool,
    pub is_dimmed: bool,
    pub is_hidden: bool,
}

/// The three edge hues. There is deliberately no neutral member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeHue {
    Inflow,
    Outflow,
    Exit,
}

impl EdgeHue {
    fn marker_id(self) -> &'static str {
        match self {
            Self::Inflow => "arrow-inflow",
            Self::Outflow => "arrow-outflow",
            Self::Exit => "arrow-exit",
        }
    }

    pub fn color(self, theme: &Theme) -> &str {
        match self {
            Self::Inflow => &theme.inflow_color,
            Self::Outflow => &theme.outflow_color,
            Self::Exit => &theme.exit_color,
        }
    }
}

/// Cross-chain exits are amber. Otherwise the sign of net flow decides;
/// zero defers to the advisory direction, and with no direction either the
/// edge is drawn as inflow.
pub fn edge_hue(net_flow_usd: f64, direction: Option<FlowDirection>, kind: EdgeKind) -> EdgeHue {
    if kind == EdgeKind::CrossChainExit {
        return EdgeHue::Exit;
    }
    if net_flow_usd > 0.0 {
        EdgeHue::Outflow
    } else if net_flow_usd < 0.0 {
        EdgeHue::Inflow
    } else {
        match direction {
            Some(FlowDirection::Out) => EdgeHue::Outflow,
            Some(FlowDirection::In) | None => EdgeHue::Inflow,
        }
    }
}

/// `min + sqrt(weight) * (max - min)`, scaled by the edge state.
pub fn edge_width(weight: f32, state: EdgeState, config: &LayoutConfig) -> f32 {
    let weight = crate::ir::clamp_unit(weight);
    let base = config.edge_width_min + weight.sqrt() * (config.edge_width_max - config.edge_width_min);
    let factor = match state {
        EdgeState::Normal => 1.0,
        EdgeState::Pressure => config.pressure_width_factor,
        EdgeState::Dominant => config.dominant_width_factor,
    };
    base * factor
}

/// Largest size reachable from `nominal` in `step` decrements at which
/// `text` fits `max_width`, never below `min`.
pub fn fit_font_size<F>(text: &str, nominal: f32, max_width: f32, min: f32, step: f32, measure: F) -> f32
where
    F: Fn(&str, f32) -> f32,
{
    let step = if step > 0.0 { step } else { 0.5 };
    let mut size = nominal.max(min);
    while size > min && measure(text, size) > max_width {
        size = (size - step).max(min);
    }
    size
}

/// Per-element state for one paint pass, assembled from highlight, focus and
/// the current selection.
#[derive(Debug, Clone, Default)]
pub struct RenderDecorations {
    pub highlight: Option<HighlightedGraph>,
    pub focus: Option<FocusView>,
    pub selected_edge: Option<String>,
    pub selected_node: Option<String>,
    pub hovered_node: Option<String>,
    /// Skip focus-dimmed elements instead of fading them.
    pub hide_dimmed: bool,
}

impl RenderDecorations {
    pub fn node_state(&self, id: &str) -> NodeRenderState {
        NodeRenderState {
            is_selected: self.selected_node.as_deref() == Some(id),
            is_hovered: self.hovered_node.as_deref() == Some(id),
            is_dimmed: self.focus.as_ref().is_some_and(|f| f.is_node_dimmed(id)),
        }
    }

    pub fn edge_state(&self, id: &str) -> EdgeRenderState {
        let dimmed = self.focus.as_ref().is_some_and(|f| f.is_edge_dimmed(id));
        EdgeRenderState {
            is_selected: self.selected_edge.as_deref() == Some(id),
            is_dimmed: dimmed,
            is_hidden: dimmed && self.hide_dimmed,
        }
    }

    fn node_highlight(&self, id: &str) -> Option<&Highlight> {
        self.highlight.as_ref().and_then(|h| h.node(id))
    }

    fn edge_highlight(&self, id: &str) -> Option<&Highlight> {
        self.highlight.as_ref().and_then(|h| h.edge(id))
    }
}

pub fn render_svg(layout: &Layout, decorations: &RenderDecorations, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = layout.width.max(1.0);
    let height = layout.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"{:.2} {:.2} {width:.2} {height:.2}\">",
        layout.min_x, layout.min_y
    ));
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" fill=\"{}\"/>",
        layout.min_x, layout.min_y, theme.background
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!("<filter id=\"{GLOW_FILTER_ID}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\"><feGaussianBlur stdDeviation=\"3\"/></filter>"));
    for hue in [EdgeHue::Inflow, EdgeHue::Outflow, EdgeHue::Exit] {
        svg.push_str(&format!(
            "<marker id=\"{}\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"5\" markerHeight=\"5\" orient=\"auto\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
            hue.marker_id(),
            hue.color(theme)
        ));
    }
    svg.push_str("</defs>");

    svg.push_str("<g class=\"edges\">");
    for edge in &layout.edges {
        if layout.node(&edge.from).is_none() || layout.node(&edge.to).is_none() {
            continue;
        }
        let state = decorations.edge_state(&edge.id);
        draw_edge(edge, &mut svg, state, decorations.edge_highlight(&edge.id), theme, config);
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"nodes\">");
    for node in layout.nodes.values() {
        let state = decorations.node_state(&node.id);
        if state.is_dimmed && decorations.hide_dimmed {
            continue;
        }
        draw_node(node, &mut svg, state, decorations.node_highlight(&node.id), theme, config);
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}

pub fn draw_edge(
    edge: &EdgeLayout,
    svg: &mut String,
    state: EdgeRenderState,
    highlight: Option<&Highlight>,
    theme: &Theme,
    config: &LayoutConfig,
) {
    if state.is_hidden || !edge_is_finite(edge) {
        return;
    }
    let hue = edge_hue(edge.net_flow_usd, edge.direction, edge.kind);
    let color = hue.color(theme);
    let width = edge_width(edge.weight, edge.state, config);
    let opacity = element_opacity(state.is_dimmed, highlight, config);
    let d = edge_path(edge);

    svg.push_str(&format!(
        "<g class=\"edge\" data-edge-id=\"{}\" opacity=\"{opacity:.2}\">",
        escape_xml(&edge.id)
    ));
    if state.is_selected {
        svg.push_str(&format!(
            "<path d=\"{d}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\" stroke-opacity=\"0.6\" stroke-linecap=\"round\"/>",
            theme.selection_color,
            width + 6.0
        ));
    }
    if let Some(h) = highlight.filter(|h| h.is_highlighted) {
        let outline = h.color.as_deref().unwrap_or(&theme.highlight_color);
        svg.push_str(&format!(
            "<path d=\"{d}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\" stroke-opacity=\"0.45\" stroke-linecap=\"round\"/>",
            outline,
            width + 2.0 * h.stroke_width
        ));
    }
    if edge.state == EdgeState::Dominant {
        svg.push_str(&format!(
            "<path d=\"{d}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{:.2}\" stroke-opacity=\"{GLOW_OPACITY}\" filter=\"url(#{GLOW_FILTER_ID})\"/>",
            width * GLOW_WIDTH_FACTOR
        ));
    }
    let dash = if hue == EdgeHue::Exit {
        format!(" stroke-dasharray=\"{EXIT_DASH}\"")
    } else {
        String::new()
    };
    svg.push_str(&format!(
        "<path d=\"{d}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{width:.2}\"{dash} marker-end=\"url(#{})\"/>",
        hue.marker_id()
    ));
    if let Some(order) = highlight.and_then(|h| h.order).filter(|order| *order > 0) {
        let (bx, by) = quad_point(edge.start, edge.control, edge.end, 0.5);
        svg.push_str(&format!(
            "<circle cx=\"{bx:.2}\" cy=\"{by:.2}\" r=\"7\" fill=\"{}\"/><text x=\"{bx:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"9\" fill=\"{}\">{order}</text>",
            theme.badge_fill,
            by + 3.0,
            escape_xml(&theme.font_family),
            theme.badge_text
        ));
    }
    svg.push_str("</g>");
}

pub fn draw_node(
    node: &NodeLayout,
    svg: &mut String,
    state: NodeRenderState,
    highlight: Option<&Highlight>,
    theme: &Theme,
    config: &LayoutConfig,
) {
    if !(node.x.is_finite() && node.y.is_finite() && node.radius.is_finite()) {
        return;
    }
    let (x, y, r) = (node.x, node.y, node.radius);
    let opacity = element_opacity(state.is_dimmed, highlight, config);
    let fill = theme.node_fill(node.category);
    let (stroke, stroke_width) = match highlight.filter(|h| h.is_highlighted) {
        Some(h) => (
            h.color.clone().unwrap_or_else(|| theme.highlight_color.clone()),
            h.stroke_width,
        ),
        None => (theme.node_stroke.clone(), 1.4),
    };

    svg.push_str(&format!(
        "<g class=\"node\" data-node-id=\"{}\" opacity=\"{opacity:.2}\">",
        escape_xml(&node.id)
    ));

    if state.is_selected {
        ring(svg, x, y, r + 8.0, &theme.selection_color, 2.5, None);
    } else if state.is_hovered {
        ring(svg, x, y, r + 6.0, &theme.hover_color, 1.5, None);
    }

    let style = format!("fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width:.2}\"");
    match node.shape {
        NodeShape::Circle => {
            svg.push_str(&format!("<circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{r:.2}\" {style}/>"));
        }
        NodeShape::DoubleCircle => {
            svg.push_str(&format!("<circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{r:.2}\" {style}/>"));
            ring(svg, x, y, (r - 4.0).max(1.0), &stroke, 1.0, None);
        }
        NodeShape::Diamond => {
            let points = polygon_points(&[(x, y - r), (x + r, y), (x, y + r), (x - r, y)]);
            svg.push_str(&format!("<polygon points=\"{points}\" {style}/>"));
        }
        NodeShape::RoundedSquare => {
            let half = r * 0.85;
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{:.2}\" ry=\"{:.2}\" {style}/>",
                x - half,
                y - half,
                2.0 * half,
                2.0 * half,
                r * 0.25,
                r * 0.25
            ));
        }
        NodeShape::Hexagon => {
            let corners: Vec<(f32, f32)> = (0..6)
                .map(|i| {
                    let angle = std::f32::consts::PI / 3.0 * i as f32;
                    (x + r * angle.cos(), y + r * angle.sin())
                })
                .collect();
            svg.push_str(&format!("<polygon points=\"{}\" {style}/>", polygon_points(&corners)));
        }
    }

    match node.state {
        NodeState::Neutral => {}
        NodeState::Accumulation => ring(svg, x, y, r + 4.0, &theme.accumulation_halo, 2.0, None),
        NodeState::Distribution => ring(svg, x, y, r + 4.0, &theme.distribution_halo, 2.0, None),
        NodeState::Router => ring(svg, x, y, r + 6.0, &theme.router_halo, 1.5, Some(ROUTER_DASH)),
    }

    let family = theme.font_family.as_str();
    let fast = config.fast_text_metrics;
    let font_size = fit_font_size(
        &node.label.text,
        node.label.font_size,
        r * config.label_width_ratio,
        config.label_min_font_size,
        config.label_font_step,
        |text, size| text_metrics::text_width(text, size, family, fast),
    );
    svg.push_str(&format!(
        "<text x=\"{x:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{font_size:.1}\" fill=\"{}\">{}</text>",
        y + font_size * 0.35,
        escape_xml(family),
        theme.node_text_color,
        escape_xml(&node.label.text)
    ));
    svg.push_str("</g>");
}

fn ring(svg: &mut String, x: f32, y: f32, r: f32, color: &str, width: f32, dash: Option<&str>) {
    let dash = dash
        .map(|d| format!(" stroke-dasharray=\"{d}\""))
        .unwrap_or_default();
    svg.push_str(&format!("<circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{r:.2}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{width:.2}\"{dash}/>"));
}

fn polygon_points(points: &[(f32, f32)]) -> String {
    points
        .iter()
        .map(|(px, py)| format!("{px:.2},{py:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn element_opacity(dimmed: bool, highlight: Option<&Highlight>, config: &LayoutConfig) -> f32 {
    let focus = if dimmed { config.dim_opacity } else { 1.0 };
    let highlight = highlight.map(|h| h.opacity).unwrap_or(1.0);
    focus.min(highlight)
}

fn edge_is_finite(edge: &EdgeLayout) -> bool {
    [edge.start, edge.control, edge.end]
        .iter()
        .all(|(x, y)| x.is_finite() && y.is_finite())
}

fn edge_path(edge: &EdgeLayout) -> String {
    if edge.is_straight() {
        format!(
            "M {:.2} {:.2} L {:.2} {:.2}",
            edge.start.0, edge.start.1, edge.end.0, edge.end.1
        )
    } else {
        format!(
            "M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}",
            edge.start.0, edge.start.1, edge.control.0, edge.control.1, edge.end.0, edge.end.1
        )
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

/// Rasterizes rendered SVG at `render_cfg.scale`. Canvas size is already
/// baked into the SVG's own width and height.
#[cfg(feature = "png")]
pub fn render_png_bytes(svg: &str, render_cfg: &RenderConfig, theme: &Theme) -> Result<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|family| family.trim().to_string())
        .unwrap_or_else(|| "Inter".to_string());
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let scale = if render_cfg.scale.is_finite() && render_cfg.scale > 0.0 {
        render_cfg.scale
    } else {
        1.0
    };
    let size = tree.size().to_int_size();
    let width = ((size.width() as f32) * scale).ceil().max(1.0) as u32;
    let height = ((size.height() as f32) * scale).ceil().max(1.0) as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    Ok(pixmap.encode_png()?)
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let bytes = render_png_bytes(svg, render_cfg, theme)?;
    std::fs::write(output, bytes)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig, _theme: &Theme) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::{FocusMode, apply_focus_mode};
    use crate::highlight::{HighlightInput, apply_highlighting, derive_highlighted_sets};
    use crate::ir::{Edge, Graph, HighlightedStep, Node, NodeCategory};
    use crate::layout::compute_layout;

    fn config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        }
    }

    fn graph() -> Graph {
        let mut graph = Graph::new();
        let mut a = Node::new("a", NodeCategory::Wallet).at(0.0, 0.0);
        a.state = NodeState::Accumulation;
        let mut b = Node::new("b", NodeCategory::Bridge).at(150.0, 0.0);
        b.state = NodeState::Router;
        let c = Node::new("c", NodeCategory::Protocol).at(150.0, 150.0);
        graph.nodes.extend([a, b, c]);
        let mut ab = Edge::new("ab", "a", "b");
        ab.net_flow_usd = 1200.0;
        ab.state = EdgeState::Dominant;
        let mut bc = Edge::new("bc", "b", "c");
        bc.kind = EdgeKind::CrossChainExit;
        graph.edges.extend([ab, bc]);
        graph.highlighted_path = vec![HighlightedStep::new("ab", 1)];
        graph
    }

    #[test]
    fn hue_follows_net_flow_sign() {
        assert_eq!(edge_hue(10.0, Some(FlowDirection::In), EdgeKind::Transfer), EdgeHue::Outflow);
        assert_eq!(edge_hue(-10.0, Some(FlowDirection::Out), EdgeKind::Transfer), EdgeHue::Inflow);
        assert_eq!(edge_hue(0.0, Some(FlowDirection::Out), EdgeKind::Transfer), EdgeHue::Outflow);
        assert_eq!(edge_hue(0.0, None, EdgeKind::Transfer), EdgeHue::Inflow);
        assert_eq!(edge_hue(-5.0, None, EdgeKind::CrossChainExit), EdgeHue::Exit);
    }

    #[test]
    fn width_uses_square_root_easing() {
        let cfg = config();
        assert_eq!(edge_width(0.0, EdgeState::Normal, &cfg), cfg.edge_width_min);
        assert_eq!(edge_width(1.0, EdgeState::Normal, &cfg), cfg.edge_width_max);
        let quarter = edge_width(0.25, EdgeState::Normal, &cfg);
        assert!((quarter - (cfg.edge_width_min + 0.5 * (cfg.edge_width_max - cfg.edge_width_min))).abs() < 1e-5);
        assert!(edge_width(0.25, EdgeState::Dominant, &cfg) > quarter);
    }

    #[test]
    fn font_shrinks_in_half_steps_to_floor() {
        let measure = |text: &str, size: f32| text.len() as f32 * size;
        assert_eq!(fit_font_size("abcd", 12.0, 100.0, 6.0, 0.5, measure), 12.0);
        assert_eq!(fit_font_size("abcd", 12.0, 40.0, 6.0, 0.5, measure), 10.0);
        assert_eq!(fit_font_size("abcdefghij", 12.0, 10.0, 6.0, 0.5, measure), 6.0);
    }

    #[test]
    fn renders_shapes_halos_and_glow() {
        let graph = graph();
        let cfg = config();
        let layout = compute_layout(&graph, &Theme::dark(), &cfg);
        let svg = render_svg(&layout, &RenderDecorations::default(), &Theme::dark(), &cfg);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("<polygon"));
        assert!(svg.contains(&format!("filter=\"url(#{GLOW_FILTER_ID})\"")));
        assert!(svg.contains(&format!("stroke-dasharray=\"{EXIT_DASH}\"")));
        assert!(svg.contains(&format!("stroke-dasharray=\"{ROUTER_DASH}\"")));
        assert!(svg.contains(&Theme::dark().accumulation_halo));
    }

    #[test]
    fn dimmed_elements_keep_geometry() {
        let graph = graph();
        let cfg = config();
        let theme = Theme::dark();
        let layout = compute_layout(&graph, &theme, &cfg);
        let sets = derive_highlighted_sets(&graph.edges, &graph.highlighted_path);
        let decorations = RenderDecorations {
            focus: Some(apply_focus_mode(&graph.nodes, &graph.edges, FocusMode::PathOnly, &sets)),
            ..RenderDecorations::default()
        };
        let plain = render_svg(&layout, &RenderDecorations::default(), &theme, &cfg);
        let dimmed = render_svg(&layout, &decorations, &theme, &cfg);
        assert!(dimmed.contains(&format!("opacity=\"{:.2}\"", cfg.dim_opacity)));
        assert_eq!(plain.matches("<path").count(), dimmed.matches("<path").count());
    }

    #[test]
    fn hidden_elements_are_skipped() {
        let graph = graph();
        let cfg = config();
        let theme = Theme::dark();
        let layout = compute_layout(&graph, &theme, &cfg);
        let sets = derive_highlighted_sets(&graph.edges, &graph.highlighted_path);
        let decorations = RenderDecorations {
            focus: Some(apply_focus_mode(&graph.nodes, &graph.edges, FocusMode::PathOnly, &sets)),
            hide_dimmed: true,
            ..RenderDecorations::default()
        };
        let svg = render_svg(&layout, &decorations, &theme, &cfg);
        assert!(svg.contains("data-edge-id=\"ab\""));
        assert!(!svg.contains("data-edge-id=\"bc\""));
        assert!(!svg.contains("data-node-id=\"c\""));
    }

    #[test]
    fn highlighted_steps_get_order_badges() {
        let graph = graph();
        let cfg = config();
        let theme = Theme::dark();
        let layout = compute_layout(&graph, &theme, &cfg);
        let highlight = apply_highlighting(
            &HighlightInput {
                nodes: &graph.nodes,
                edges: &graph.edges,
                highlighted_path: &graph.highlighted_path,
                enabled: true,
            },
            &theme,
        );
        let decorations = RenderDecorations {
            highlight: Some(highlight),
            selected_edge: Some("ab".to_string()),
            ..RenderDecorations::default()
        };
        let svg = render_svg(&layout, &decorations, &theme, &cfg);
        assert!(svg.contains(">1</text>"));
        assert!(svg.contains(&theme.selection_color));
    }

    #[test]
    fn escapes_labels() {
        let mut graph = Graph::new();
        let mut node = Node::new("x", NodeCategory::Contract).at(0.0, 0.0);
        node.display_name = "<A&B>".to_string();
        graph.nodes.push(node);
        let cfg = config();
        let layout = compute_layout(&graph, &Theme::dark(), &cfg);
        let svg = render_svg(&layout, &RenderDecorations::default(), &Theme::dark(), &cfg);
        assert!(svg.contains("&lt;A&amp;B&gt;"));
    }
}
