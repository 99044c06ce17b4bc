#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod export;
pub mod focus;
pub mod geometry;
pub mod highlight;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod request;
pub mod sync;
pub mod text_metrics;
pub mod theme;
pub mod view;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, CurveStrategy, LayoutConfig, RenderConfig, SyncConfig, load_config, parse_config};
pub use export::{ExportError, ExportRequest, export_png, export_svg};
pub use focus::{FocusMode, FocusView, apply_focus_mode, filter_focus};
pub use highlight::{HighlightInput, HighlightedGraph, HighlightedSets, apply_highlighting, derive_highlighted_sets};
pub use ir::{Edge, Graph, GraphPayload, HighlightedStep, Node, PayloadError};
pub use layout::{Layout, compute_layout};
pub use render::{RenderDecorations, render_svg};
pub use request::{RequestKey, RequestTicket, RequestTracker, StaleResponse};
pub use sync::{EventSource, SyncController, SyncEvent, SyncOutcome, SyncReason};
pub use theme::Theme;
pub use view::GraphView;

/// Knobs for the one-call [`render_with_options`] entry point.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub focus: FocusMode,
    pub highlight: bool,
    pub hide_dimmed: bool,
    pub selected_edge: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::dark()
    }
}

impl RenderOptions {
    pub fn dark() -> Self {
        Self::with_theme(Theme::dark())
    }

    pub fn light() -> Self {
        Self::with_theme(Theme::light())
    }

    fn with_theme(theme: Theme) -> Self {
        Self {
            theme,
            layout: LayoutConfig::default(),
            focus: FocusMode::All,
            highlight: true,
            hide_dimmed: false,
            selected_edge: None,
        }
    }
}

/// Ingests a JSON graph payload and renders it to SVG in one call.
///
/// A `selected_edge` is applied as a timeline step click, so it is subject to
/// the same truncation and focus guards as an interactive selection.
pub fn render_with_options(payload_json: &str, options: RenderOptions) -> Result<String, PayloadError> {
    let graph = Graph::from_json(payload_json)?;
    let config = Config {
        theme: options.theme,
        layout: options.layout,
        ..Config::default()
    };
    let mut view = GraphView::new(graph, config);
    view.set_focus_mode(options.focus);
    view.set_highlight_enabled(options.highlight);
    view.set_hide_dimmed(options.hide_dimmed);
    if let Some(edge_id) = options.selected_edge.as_deref() {
        let outcome = view.on_step_click(edge_id, 0);
        if !outcome.synced {
            tracing::warn!(edge_id, reason = ?outcome.reason, "initial selection rejected");
        }
    }
    Ok(view.render_svg())
}
