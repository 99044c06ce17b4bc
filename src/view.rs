//! Host-facing wiring for one graph view paired with one timeline.
//!
//! A [`GraphView`] owns the current payload, its layout, the focus mode and a
//! private [`SyncController`]. Host callbacks are turned into typed
//! [`SyncEvent`]s; the controller decides, and only accepted outcomes touch
//! selection state.

use crate::config::Config;
use crate::focus::{FilteredGraph, FocusMode, FocusView, apply_focus_mode, filter_focus};
use crate::highlight::{HighlightInput, HighlightedSets, apply_highlighting, derive_highlighted_sets};
use crate::ir::Graph;
use crate::layout::{Layout, compute_layout};
use crate::render::{self, RenderDecorations};
use crate::sync::{EventSource, SyncContext, SyncController, SyncEvent, SyncEventKind, SyncOutcome};

#[derive(Debug, Clone)]
pub struct GraphView {
    graph: Graph,
    layout: Layout,
    sets: HighlightedSets,
    config: Config,
    controller: SyncController,
    focus_mode: FocusMode,
    highlight_enabled: bool,
    hide_dimmed: bool,
    selected_node: Option<String>,
    hovered_node: Option<String>,
}

impl GraphView {
    pub fn new(graph: Graph, config: Config) -> Self {
        let layout = layout_on_canvas(&graph, &config);
        let sets = derive_highlighted_sets(&graph.edges, &graph.highlighted_path);
        let controller = SyncController::with_debounce(config.sync.debounce_ms);
        Self {
            graph,
            layout,
            sets,
            config,
            controller,
            focus_mode: FocusMode::All,
            highlight_enabled: true,
            hide_dimmed: false,
            selected_node: None,
            hovered_node: None,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn focus_mode(&self) -> FocusMode {
        self.focus_mode
    }

    pub fn selected_edge_id(&self) -> Option<&str> {
        self.controller.selected_edge_id()
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.selected_node.as_deref()
    }

    pub fn on_node_click(&mut self, node_id: &str, timestamp_ms: u64) -> SyncOutcome {
        self.dispatch(&SyncEvent::node_click(node_id, timestamp_ms))
    }

    pub fn on_edge_click(&mut self, edge_id: &str, timestamp_ms: u64) -> SyncOutcome {
        self.dispatch(&SyncEvent::edge_click(edge_id, timestamp_ms))
    }

    pub fn on_background_click(&mut self, timestamp_ms: u64) -> SyncOutcome {
        self.dispatch(&SyncEvent::clear(EventSource::Graph, timestamp_ms))
    }

    pub fn on_step_click(&mut self, edge_id: &str, timestamp_ms: u64) -> SyncOutcome {
        self.dispatch(&SyncEvent::step_click(edge_id, timestamp_ms))
    }

    pub fn on_step_hover(&mut self, edge_id: &str, timestamp_ms: u64) -> SyncOutcome {
        self.dispatch(&SyncEvent::step_hover(edge_id, timestamp_ms))
    }

    /// Pointer hover is local to the graph and never reaches the timeline.
    pub fn on_node_hover(&mut self, node_id: Option<&str>) {
        self.hovered_node = node_id
            .filter(|id| self.layout.node(id).is_some())
            .map(str::to_string);
    }

    pub fn dispatch(&mut self, event: &SyncEvent) -> SyncOutcome {
        let ctx = SyncContext::new(&self.graph, self.focus_mode);
        let outcome = self.controller.handle(event, &ctx);
        if outcome.synced {
            self.selected_node = match &event.kind {
                SyncEventKind::NodeClick { node_id } => Some(node_id.clone()),
                _ => None,
            };
        }
        outcome
    }

    pub fn set_focus_mode(&mut self, mode: FocusMode) {
        if mode != self.focus_mode {
            tracing::debug!(from = ?self.focus_mode, to = ?mode, "focus mode changed");
            self.focus_mode = mode;
        }
    }

    pub fn set_highlight_enabled(&mut self, enabled: bool) {
        self.highlight_enabled = enabled;
    }

    /// Switches between fading and dropping elements outside the focus.
    pub fn set_hide_dimmed(&mut self, hide: bool) {
        self.hide_dimmed = hide;
    }

    /// Swaps in a freshly fetched payload. Selection and the debounce window
    /// start over; focus mode is a view preference and survives.
    pub fn replace_payload(&mut self, graph: Graph) {
        self.layout = layout_on_canvas(&graph, &self.config);
        self.sets = derive_highlighted_sets(&graph.edges, &graph.highlighted_path);
        self.graph = graph;
        self.controller.reset();
        self.selected_node = None;
        self.hovered_node = None;
        tracing::debug!(
            nodes = self.layout.nodes.len(),
            edges = self.layout.edges.len(),
            "payload replaced"
        );
    }

    pub fn focus_view(&self) -> FocusView {
        apply_focus_mode(&self.graph.nodes, &self.graph.edges, self.focus_mode, &self.sets)
    }

    /// Elements that survive the current focus mode.
    pub fn visible_elements(&self) -> FilteredGraph<'_> {
        filter_focus(&self.graph.nodes, &self.graph.edges, self.focus_mode, &self.sets)
    }

    pub fn decorations(&self) -> RenderDecorations {
        let highlight = apply_highlighting(
            &HighlightInput {
                nodes: &self.graph.nodes,
                edges: &self.graph.edges,
                highlighted_path: &self.graph.highlighted_path,
                enabled: self.highlight_enabled,
            },
            &self.config.theme,
        );
        RenderDecorations {
            highlight: Some(highlight),
            focus: Some(self.focus_view()),
            selected_edge: self.controller.selected_edge_id().map(str::to_string),
            selected_node: self.selected_node.clone(),
            hovered_node: self.hovered_node.clone(),
            hide_dimmed: self.hide_dimmed,
        }
    }

    pub fn render_svg(&self) -> String {
        render::render_svg(
            &self.layout,
            &self.decorations(),
            &self.config.theme,
            &self.config.layout,
        )
    }
}

fn layout_on_canvas(graph: &Graph, config: &Config) -> Layout {
    let mut layout = compute_layout(graph, &config.theme, &config.layout);
    layout.expand_canvas(
        config.render.width.unwrap_or(0.0),
        config.render.height.unwrap_or(0.0),
    );
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{Edge, HighlightedStep, Node, NodeCategory};
    use crate::sync::SyncReason;

    fn graph() -> Graph {
        let mut graph = Graph::new();
        for (i, id) in ["n1", "n2", "n3", "n4"].iter().enumerate() {
            graph
                .nodes
                .push(Node::new(*id, NodeCategory::Wallet).at(i as f32 * 120.0, 0.0));
        }
        graph.edges = vec![
            Edge::new("e1", "n1", "n2"),
            Edge::new("e2", "n2", "n3"),
            Edge::new("e3", "n3", "n4"),
        ];
        graph.highlighted_path = vec![HighlightedStep::new("e1", 1), HighlightedStep::new("e2", 2)];
        graph
    }

    fn view() -> GraphView {
        let config = Config {
            layout: LayoutConfig {
                fast_text_metrics: true,
                ..LayoutConfig::default()
            },
            ..Config::default()
        };
        GraphView::new(graph(), config)
    }

    #[test]
    fn node_click_selects_first_path_edge() {
        let mut view = view();
        let outcome = view.on_node_click("n2", 0);
        assert!(outcome.synced);
        assert_eq!(view.selected_edge_id(), Some("e1"));
        assert_eq!(view.selected_node_id(), Some("n2"));
    }

    #[test]
    fn rejected_events_keep_selection() {
        let mut view = view();
        view.on_step_click("e2", 0);
        let outcome = view.on_node_click("n4", 100);
        assert_eq!(outcome.reason, Some(SyncReason::NodeNotInPath));
        assert_eq!(view.selected_edge_id(), Some("e2"));
    }

    #[test]
    fn background_click_clears() {
        let mut view = view();
        view.on_edge_click("e1", 0);
        let outcome = view.on_background_click(10);
        assert!(outcome.synced);
        assert_eq!(view.selected_edge_id(), None);
        assert_eq!(view.selected_node_id(), None);
    }

    #[test]
    fn replacing_payload_resets_selection_but_keeps_focus() {
        let mut view = view();
        view.set_focus_mode(FocusMode::PathOnly);
        view.on_step_click("e1", 0);
        view.replace_payload(graph());
        assert_eq!(view.selected_edge_id(), None);
        assert_eq!(view.focus_mode(), FocusMode::PathOnly);
        // Debounce history is gone, so an immediate same-source event passes.
        assert!(view.on_step_click("e2", 1).synced);
    }

    #[test]
    fn hidden_rendering_matches_visible_elements() {
        let mut view = view();
        view.set_focus_mode(FocusMode::PathOnly);
        view.set_hide_dimmed(true);
        let svg = view.render_svg();
        let visible = view.visible_elements();
        assert_eq!(svg.matches("data-node-id=").count(), visible.nodes.len());
        assert_eq!(svg.matches("data-edge-id=").count(), visible.edges.len());
        assert!(!svg.contains("data-edge-id=\"e3\""));
    }

    #[test]
    fn canvas_size_centres_content() {
        let natural = view();
        let mut config = Config {
            layout: LayoutConfig {
                fast_text_metrics: true,
                ..LayoutConfig::default()
            },
            ..Config::default()
        };
        config.render.width = Some(natural.layout().width + 400.0);
        let mut view = GraphView::new(graph(), config);
        assert_eq!(view.layout().width, natural.layout().width + 400.0);
        assert!((view.layout().min_x - (natural.layout().min_x - 200.0)).abs() < 1e-3);
        assert_eq!(view.layout().height, natural.layout().height);
        view.replace_payload(graph());
        assert_eq!(view.layout().width, natural.layout().width + 400.0);
        assert!(view.render_svg().contains(&format!("width=\"{:.2}\"", natural.layout().width + 400.0)));
    }

    #[test]
    fn hover_ignores_unknown_nodes() {
        let mut view = view();
        view.on_node_hover(Some("ghost"));
        assert!(view.decorations().hovered_node.is_none());
        view.on_node_hover(Some("n1"));
        assert_eq!(view.decorations().hovered_node.as_deref(), Some("n1"));
    }
}
