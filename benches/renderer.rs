use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fundflow_graph::config::LayoutConfig;
use fundflow_graph::ir::Graph;
use fundflow_graph::layout::compute_layout;
use fundflow_graph::render::{RenderDecorations, render_svg};
use fundflow_graph::sync::{SyncContext, SyncController, SyncEvent};
use fundflow_graph::theme::Theme;
use fundflow_graph::{Config, FocusMode, GraphView};
use serde_json::json;
use std::hint::black_box;

/// Ring of wallets with chords and `parallel` extra strands per pair, plus a
/// highlighted path along the first half of the ring.
fn dense_payload(nodes: usize, chords: usize, parallel: usize) -> String {
    let mut node_list = Vec::with_capacity(nodes);
    for i in 0..nodes {
        let angle = i as f32 / nodes.max(1) as f32 * std::f32::consts::TAU;
        let category = if i % 7 == 0 { "cex" } else { "wallet" };
        node_list.push(json!({
            "id": format!("n{i}"),
            "type": category,
            "displayName": format!("0x{:040x}", i * 7919),
            "sizeWeight": (i % 10) as f32 / 10.0,
            "x": 600.0 * angle.cos(),
            "y": 600.0 * angle.sin(),
        }));
    }
    let mut edges = Vec::new();
    let mut push = |from: usize, to: usize, k: usize| {
        let id = format!("e{}", edges.len());
        let net_flow = if k % 2 == 0 { 1000.0 } else { -1000.0 };
        edges.push(json!({
            "id": id,
            "from": format!("n{from}"),
            "to": format!("n{to}"),
            "weight": ((from + to + k) % 10) as f32 / 10.0,
            "netFlowUsd": net_flow,
        }));
    };
    for i in 0..nodes {
        for k in 0..=parallel {
            push(i, (i + 1) % nodes, k);
        }
    }
    for c in 0..chords {
        push(c % nodes, (c * 13 + 5) % nodes, 0);
    }
    let path: Vec<_> = (0..nodes / 2)
        .map(|i| json!({"edgeId": format!("e{}", i * (parallel + 1)), "order": i + 1, "riskContribution": 0.5}))
        .collect();
    json!({"nodes": node_list, "edges": edges, "highlightedPath": path}).to_string()
}

fn cases() -> Vec<(&'static str, String)> {
    vec![
        ("peel_chain", include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/peel_chain.json")).to_string()),
        ("ring_50", dense_payload(50, 20, 0)),
        ("ring_200_bundled", dense_payload(200, 100, 3)),
        ("ring_1000", dense_payload(1000, 500, 1)),
    ]
}

fn layout_config() -> LayoutConfig {
    LayoutConfig {
        fast_text_metrics: true,
        ..LayoutConfig::default()
    }
}

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");
    for (name, payload) in cases() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &payload, |b, data| {
            b.iter(|| {
                let graph = Graph::from_json(black_box(data)).expect("payload parse failed");
                black_box(graph.edges.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let theme = Theme::dark();
    let config = layout_config();
    for (name, payload) in cases() {
        let graph = Graph::from_json(&payload).expect("payload parse failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &graph, |b, data| {
            b.iter(|| {
                let layout = compute_layout(black_box(data), &theme, &config);
                black_box(layout.edges.len());
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let theme = Theme::dark();
    let config = layout_config();
    for (name, payload) in cases() {
        let graph = Graph::from_json(&payload).expect("payload parse failed");
        let layout = compute_layout(&graph, &theme, &config);
        group.bench_with_input(BenchmarkId::from_parameter(name), &layout, |b, data| {
            b.iter(|| {
                let svg = render_svg(black_box(data), &RenderDecorations::default(), &theme, &config);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

fn bench_focused_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("focused_view");
    for (name, payload) in cases() {
        let graph = Graph::from_json(&payload).expect("payload parse failed");
        let config = Config {
            layout: layout_config(),
            ..Config::default()
        };
        let mut view = GraphView::new(graph, config);
        view.set_focus_mode(FocusMode::PathPlusNeighbours);
        group.bench_with_input(BenchmarkId::from_parameter(name), &view, |b, data| {
            b.iter(|| {
                let svg = black_box(data).render_svg();
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

fn bench_sync(c: &mut Criterion) {
    let payload = dense_payload(1000, 500, 1);
    let graph = Graph::from_json(&payload).expect("payload parse failed");
    let ctx = SyncContext::new(&graph, FocusMode::PathOnly);
    let events: Vec<SyncEvent> = (0..200u64)
        .map(|i| SyncEvent::node_click(format!("n{}", i * 3), i * 60))
        .collect();
    c.bench_function("sync/node_clicks", |b| {
        b.iter(|| {
            let mut controller = SyncController::new();
            for event in &events {
                black_box(controller.handle(event, &ctx));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_ingest,
    bench_layout,
    bench_render,
    bench_focused_view,
    bench_sync
);
criterion_main!(benches);
