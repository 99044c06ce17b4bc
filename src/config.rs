use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How offsets are assigned to strands of one corridor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum CurveStrategy {
    /// Symmetric arcs for small bundles, even fan for four or more.
    #[default]
    Fanned,
    /// `+1, -1, +2, -2, ...` fixed steps.
    Alternating,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub snap_pad: f32,
    pub corridor_step: f32,
    pub curve_base: f32,
    pub curve_max: f32,
    pub curve_strategy: CurveStrategy,
    pub edge_width_min: f32,
    pub edge_width_max: f32,
    pub pressure_width_factor: f32,
    pub dominant_width_factor: f32,
    pub label_width_ratio: f32,
    pub label_min_font_size: f32,
    pub label_font_step: f32,
    pub address_max_chars: usize,
    pub padding: f32,
    pub dim_opacity: f32,
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            snap_pad: crate::geometry::DEFAULT_SNAP_PAD,
            corridor_step: crate::geometry::CORRIDOR_STEP,
            curve_base: crate::layout::CURVE_BASE,
            curve_max: crate::layout::CURVE_MAX,
            curve_strategy: CurveStrategy::Fanned,
            edge_width_min: 1.0,
            edge_width_max: 6.0,
            pressure_width_factor: 1.35,
            dominant_width_factor: 1.7,
            label_width_ratio: 1.7,
            label_min_font_size: 6.0,
            label_font_step: 0.5,
            address_max_chars: crate::layout::DEFAULT_ADDRESS_CHARS,
            padding: 40.0,
            dim_opacity: 0.18,
            fast_text_metrics: false,
        }
    }
}

/// Output canvas. `width` and `height` are minimums: smaller content is
/// centred on the larger canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub debounce_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: crate::sync::DEFAULT_DEBOUNCE_MS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background: Option<String>,
    node_text_color: Option<String>,
    node_stroke: Option<String>,
    inflow_color: Option<String>,
    outflow_color: Option<String>,
    exit_color: Option<String>,
    selection_color: Option<String>,
    highlight_color: Option<String>,
    high_risk_color: Option<String>,
    medium_risk_color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    snap_pad: Option<f32>,
    corridor_step: Option<f32>,
    curve_base: Option<f32>,
    curve_max: Option<f32>,
    curve_strategy: Option<CurveStrategy>,
    edge_width_min: Option<f32>,
    edge_width_max: Option<f32>,
    label_width_ratio: Option<f32>,
    label_min_font_size: Option<f32>,
    address_max_chars: Option<usize>,
    padding: Option<f32>,
    dim_opacity: Option<f32>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    width: Option<f32>,
    height: Option<f32>,
    scale: Option<f32>,
    debounce_ms: Option<u64>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a JSON5 config document and overlays it on the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    match parsed.theme.as_deref() {
        Some("light") => config.theme = Theme::light(),
        Some("dark") | None => {}
        Some(other) => tracing::warn!(theme = other, "unknown theme name, using dark"),
    }

    if let Some(vars) = parsed.theme_variables {
        let theme = &mut config.theme;
        overlay(&mut theme.font_family, vars.font_family);
        overlay(&mut theme.background, vars.background);
        overlay(&mut theme.node_text_color, vars.node_text_color);
        overlay(&mut theme.node_stroke, vars.node_stroke);
        overlay(&mut theme.inflow_color, vars.inflow_color);
        overlay(&mut theme.outflow_color, vars.outflow_color);
        overlay(&mut theme.exit_color, vars.exit_color);
        overlay(&mut theme.selection_color, vars.selection_color);
        overlay(&mut theme.highlight_color, vars.highlight_color);
        overlay(&mut theme.high_risk_color, vars.high_risk_color);
        overlay(&mut theme.medium_risk_color, vars.medium_risk_color);
    }

    if let Some(layout) = parsed.layout {
        let cfg = &mut config.layout;
        overlay(&mut cfg.snap_pad, layout.snap_pad);
        overlay(&mut cfg.corridor_step, layout.corridor_step);
        overlay(&mut cfg.curve_base, layout.curve_base);
        overlay(&mut cfg.curve_max, layout.curve_max);
        overlay(&mut cfg.curve_strategy, layout.curve_strategy);
        overlay(&mut cfg.edge_width_min, layout.edge_width_min);
        overlay(&mut cfg.edge_width_max, layout.edge_width_max);
        overlay(&mut cfg.label_width_ratio, layout.label_width_ratio);
        overlay(&mut cfg.label_min_font_size, layout.label_min_font_size);
        overlay(&mut cfg.address_max_chars, layout.address_max_chars);
        overlay(&mut cfg.padding, layout.padding);
        overlay(&mut cfg.dim_opacity, layout.dim_opacity);
        overlay(&mut cfg.fast_text_metrics, layout.fast_text_metrics);
        if cfg.edge_width_max < cfg.edge_width_min {
            tracing::warn!("edgeWidthMax below edgeWidthMin, swapping");
            std::mem::swap(&mut cfg.edge_width_min, &mut cfg.edge_width_max);
        }
    }

    config.render.width = parsed.width.or(config.render.width);
    config.render.height = parsed.height.or(config.render.height);
    overlay(&mut config.render.scale, parsed.scale);
    overlay(&mut config.sync.debounce_ms, parsed.debounce_ms);

    Ok(config)
}

fn overlay<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
