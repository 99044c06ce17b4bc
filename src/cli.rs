use crate::config::{Config, load_config};
use crate::focus::FocusMode;
use crate::ir::Graph;
use crate::layout_dump::write_layout_dump;
use crate::render::{write_output_png, write_output_svg};
use crate::view::GraphView;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "ffgr", version, about = "Fund-flow route graph renderer")]
pub struct Args {
    /// Input graph payload (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format; inferred from the output extension when omitted
    #[arg(short = 'e', long = "outputFormat", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Config file (JSON5, camelCase keys)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Focus mode applied before rendering
    #[arg(long = "focus", value_enum, default_value = "all")]
    pub focus: FocusMode,

    /// Drop elements outside the focus instead of fading them
    #[arg(long = "hide-dimmed")]
    pub hide_dimmed: bool,

    /// Edge to select, as if its timeline step had been clicked
    #[arg(long = "select-edge")]
    pub select_edge: Option<String>,

    /// Write the computed layout as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Minimum canvas width; content is centred
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Minimum canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())
        .with_context(|| format!("failed to load config {:?}", args.config))?;
    apply_overrides(&mut config, &args);

    let input = read_input(args.input.as_deref())?;
    let graph = Graph::from_json(&input)?;
    tracing::info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        steps = graph.highlighted_path.len(),
        dropped_edges = graph.dropped_edges,
        "payload loaded"
    );

    let render_cfg = config.render.clone();
    let theme = config.theme.clone();
    let layout_cfg = config.layout.clone();
    let mut view = GraphView::new(graph, config);
    view.set_focus_mode(args.focus);
    view.set_hide_dimmed(args.hide_dimmed);
    if let Some(edge_id) = args.select_edge.as_deref() {
        let outcome = view.on_step_click(edge_id, 0);
        if !outcome.synced {
            tracing::warn!(edge_id, reason = ?outcome.reason, "selection rejected");
        }
    }

    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, view.layout(), view.graph(), &layout_cfg)?;
    }

    let svg = view.render_svg();
    match resolve_format(args.output_format, args.output.as_deref()) {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&svg, &output, &render_cfg, &theme)?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "fundflow_graph=debug",
        _ => "fundflow_graph=trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if args.width.is_some() {
        config.render.width = args.width;
    }
    if args.height.is_some() {
        config.render.height = args.height;
    }
}

fn resolve_format(explicit: Option<OutputFormat>, output: Option<&Path>) -> OutputFormat {
    if let Some(format) = explicit {
        return format;
    }
    let is_png = output
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png { OutputFormat::Png } else { OutputFormat::Svg }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension_unless_explicit() {
        assert_eq!(resolve_format(None, Some(Path::new("out.PNG"))), OutputFormat::Png);
        assert_eq!(resolve_format(None, Some(Path::new("out.svg"))), OutputFormat::Svg);
        assert_eq!(resolve_format(None, None), OutputFormat::Svg);
        assert_eq!(
            resolve_format(Some(OutputFormat::Svg), Some(Path::new("out.png"))),
            OutputFormat::Svg
        );
    }

    #[test]
    fn parses_focus_and_selection_flags() {
        let args = Args::try_parse_from([
            "ffgr",
            "-i",
            "payload.json",
            "--focus",
            "path-plus-neighbours",
            "--select-edge",
            "e1",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.focus, FocusMode::PathPlusNeighbours);
        assert_eq!(args.select_edge.as_deref(), Some("e1"));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn size_flags_override_config() {
        let args = Args::try_parse_from(["ffgr", "-w", "640", "-H", "480"]).unwrap();
        let mut config = Config::default();
        apply_overrides(&mut config, &args);
        assert_eq!(config.render.width, Some(640.0));
        assert_eq!(config.render.height, Some(480.0));
    }

    #[test]
    fn png_requires_output_path() {
        assert!(ensure_output(&None, "png").is_err());
    }
}
