use fundflow_graph::focus::FocusMode;
use fundflow_graph::highlight::derive_highlighted_sets;
use fundflow_graph::ir::{Edge, Graph, HighlightedStep, Node, NodeCategory};
use fundflow_graph::sync::{SyncContext, SyncEffect};
use fundflow_graph::{
    Config, EventSource, GraphView, RequestKey, RequestTracker, SyncController, SyncEvent,
    SyncReason,
};

fn chain(truncated: bool, steps: &[&str]) -> Graph {
    let mut graph = Graph::new();
    for (i, id) in ["n1", "n2", "n3", "n4", "n5"].iter().enumerate() {
        graph
            .nodes
            .push(Node::new(*id, NodeCategory::Wallet).at(i as f32 * 100.0, 0.0));
    }
    graph.edges = vec![
        Edge::new("e1", "n1", "n2"),
        Edge::new("e2", "n2", "n3"),
        Edge::new("e3", "n3", "n4"),
        Edge::new("e4", "n4", "n5"),
    ];
    graph.highlighted_path = steps
        .iter()
        .enumerate()
        .map(|(i, id)| HighlightedStep::new(*id, i as u32 + 1))
        .collect();
    graph.truncated = truncated;
    graph
}

#[test]
fn three_step_chain_derives_four_nodes() {
    let graph = chain(false, &["e1", "e2", "e3"]);
    let sets = derive_highlighted_sets(&graph.edges, &graph.highlighted_path);
    let nodes: Vec<&str> = sets.node_ids.iter().map(String::as_str).collect();
    let edges: Vec<&str> = sets.edge_ids.iter().map(String::as_str).collect();
    assert_eq!(nodes, ["n1", "n2", "n3", "n4"]);
    assert_eq!(edges, ["e1", "e2", "e3"]);
}

#[test]
fn rapid_timeline_clicks_hit_the_source_guard() {
    let graph = chain(false, &["e1", "e2", "e3"]);
    let ctx = SyncContext::new(&graph, FocusMode::All);
    let mut controller = SyncController::new();
    let first = controller.handle(&SyncEvent::step_click("e1", 10_000), &ctx);
    let second = controller.handle(&SyncEvent::step_click("e2", 10_010), &ctx);
    assert!(first.synced);
    assert_eq!(first.target.unwrap().effect, SyncEffect::HighlightGraphEdge);
    assert!(!second.synced);
    assert_eq!(second.reason, Some(SyncReason::SourceGuard));
}

#[test]
fn truncated_graph_rejects_edge_outside_path() {
    let graph = chain(true, &["e1", "e2"]);
    let ctx = SyncContext::new(&graph, FocusMode::All);
    let mut controller = SyncController::new();
    let out = controller.handle(&SyncEvent::edge_click("e4", 0), &ctx);
    assert!(!out.synced);
    assert_eq!(out.reason, Some(SyncReason::TruncatedGuard));
}

#[test]
fn node_touching_only_plain_edges_is_inert() {
    let graph = chain(false, &["e1", "e2"]);
    let ctx = SyncContext::new(&graph, FocusMode::All);
    let mut controller = SyncController::new();
    let out = controller.handle(&SyncEvent::node_click("n5", 0), &ctx);
    assert!(!out.synced);
    assert_eq!(out.reason, Some(SyncReason::NodeNotInPath));
    assert!(out.target.is_none());
}

#[test]
fn wire_event_stream_through_a_view() {
    let mut view = GraphView::new(chain(false, &["e1", "e2", "e3"]), Config::default());
    let stream = [
        r#"{"type": "STEP_CLICK", "edgeId": "e2", "source": "timeline", "timestampMs": 0}"#,
        r#"{"type": "NODE_CLICK", "nodeId": "n4", "source": "graph", "timestampMs": 5}"#,
        r#"{"type": "STEP_HOVER", "edgeId": "e3", "source": "timeline", "timestampMs": 20}"#,
        r#"{"type": "STEP_CLICK", "edgeId": "e1", "source": "timeline", "timestampMs": 40}"#,
        r#"{"type": "ZOOM", "source": "graph", "timestampMs": 500}"#,
        r#"{"type": "CLEAR", "source": "external", "timestampMs": 501}"#,
    ];
    let reasons: Vec<Option<SyncReason>> = stream
        .iter()
        .map(|raw| {
            let event: SyncEvent = serde_json::from_str(raw).unwrap();
            view.dispatch(&event).reason
        })
        .collect();
    assert_eq!(
        reasons,
        vec![
            None,
            None,
            Some(SyncReason::NoAction),
            Some(SyncReason::SourceGuard),
            Some(SyncReason::UnknownEvent),
            None,
        ]
    );
    assert_eq!(view.selected_edge_id(), None);
}

#[test]
fn node_click_scrolls_timeline_to_first_matching_step() {
    let mut view = GraphView::new(chain(false, &["e1", "e2", "e3"]), Config::default());
    let out = view.on_node_click("n3", 0);
    let target = out.target.unwrap();
    assert_eq!(target.edge_id.as_deref(), Some("e2"));
    assert_eq!(target.step_index, Some(1));
    assert_eq!(target.effect, SyncEffect::ScrollTimelineTo);
}

#[test]
fn focus_guard_follows_view_mode() {
    let mut view = GraphView::new(chain(false, &["e1"]), Config::default());
    view.set_focus_mode(FocusMode::PathOnly);
    let out = view.on_step_click("e3", 0);
    assert_eq!(out.reason, Some(SyncReason::FocusModeGuard));
    view.set_focus_mode(FocusMode::All);
    let out = view.on_step_click("e3", 1_000);
    assert!(out.synced);
}

#[test]
fn clear_wins_immediately_after_any_event() {
    let mut view = GraphView::new(chain(false, &["e1", "e2"]), Config::default());
    assert!(view.on_edge_click("e2", 100).synced);
    let out = view.dispatch(&SyncEvent::clear(EventSource::Graph, 101));
    assert!(out.synced);
    assert_eq!(out.target.unwrap().effect, SyncEffect::ClearSelection);
    assert_eq!(view.selected_edge_id(), None);
}

#[test]
fn stale_payload_never_replaces_newer_one() {
    let mut tracker = RequestTracker::new();
    let mut view = GraphView::new(chain(false, &["e1"]), Config::default());

    let slow = tracker.begin(RequestKey::new("0xabc", "ethereum"));
    let fast = tracker.begin(RequestKey::new("0xabc", "base"));
    assert!(slow.abort.is_aborted());

    let fresh = chain(false, &["e1", "e2", "e3"]);
    view.replace_payload(tracker.accept(&fast, fresh).unwrap());
    assert!(tracker.accept(&slow, chain(true, &[])).is_err());
    assert_eq!(view.graph().highlighted_path.len(), 3);
    assert!(!view.graph().truncated);
}
