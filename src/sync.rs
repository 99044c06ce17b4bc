//! Graph <-> timeline selection sync.
//!
//! [`SyncController`] is a decision function over typed events: it owns the
//! debounce window and the selected edge for one graph/timeline pair and
//! returns a [`SyncOutcome`] describing what the opposite view should do.
//! Applying that outcome (scrolling, highlighting) is the caller's job.
//!
//! Processing order for every event except `CLEAR`:
//!
//! 1. source debounce (`source_guard`)
//! 2. truncated-graph guard (`truncated_guard`)
//! 3. focus-mode guard (`focus_mode_guard`)
//! 4. event resolution (`node_not_in_path`, `step_not_found`, `no_action`)
//!
//! `CLEAR` skips all of them and always returns to idle.

use serde::{Deserialize, Serialize};

use crate::focus::FocusMode;
use crate::ir::{Edge, Graph, HighlightedStep};

pub const DEFAULT_DEBOUNCE_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Timeline,
    Graph,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SyncEventKind {
    StepClick { edge_id: String },
    StepHover { edge_id: String },
    NodeClick { node_id: String },
    EdgeClick { edge_id: String },
    Clear,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSyncEvent")]
pub struct SyncEvent {
    pub kind: SyncEventKind,
    pub source: EventSource,
    pub timestamp_ms: u64,
}

impl SyncEvent {
    pub fn new(kind: SyncEventKind, source: EventSource, timestamp_ms: u64) -> Self {
        Self {
            kind,
            source,
            timestamp_ms,
        }
    }

    pub fn step_click(edge_id: impl Into<String>, timestamp_ms: u64) -> Self {
        Self::new(
            SyncEventKind::StepClick {
                edge_id: edge_id.into(),
            },
            EventSource::Timeline,
            timestamp_ms,
        )
    }

    pub fn step_hover(edge_id: impl Into<String>, timestamp_ms: u64) -> Self {
        Self::new(
            SyncEventKind::StepHover {
                edge_id: edge_id.into(),
            },
            EventSource::Timeline,
            timestamp_ms,
        )
    }

    pub fn node_click(node_id: impl Into<String>, timestamp_ms: u64) -> Self {
        Self::new(
            SyncEventKind::NodeClick {
                node_id: node_id.into(),
            },
            EventSource::Graph,
            timestamp_ms,
        )
    }

    pub fn edge_click(edge_id: impl Into<String>, timestamp_ms: u64) -> Self {
        Self::new(
            SyncEventKind::EdgeClick {
                edge_id: edge_id.into(),
            },
            EventSource::Graph,
            timestamp_ms,
        )
    }

    pub fn clear(source: EventSource, timestamp_ms: u64) -> Self {
        Self::new(SyncEventKind::Clear, source, timestamp_ms)
    }
}

/// Wire form: `{"type": "STEP_CLICK", "edgeId": "e1", "source": "timeline", "timestampMs": 0}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSyncEvent {
    #[serde(rename = "type")]
    kind: String,
    edge_id: Option<String>,
    node_id: Option<String>,
    source: EventSource,
    #[serde(default)]
    timestamp_ms: u64,
}

impl From<RawSyncEvent> for SyncEvent {
    fn from(raw: RawSyncEvent) -> Self {
        let kind = match (raw.kind.as_str(), raw.edge_id, raw.node_id) {
            ("STEP_CLICK", Some(edge_id), _) => SyncEventKind::StepClick { edge_id },
            ("STEP_HOVER", Some(edge_id), _) => SyncEventKind::StepHover { edge_id },
            ("EDGE_CLICK", Some(edge_id), _) => SyncEventKind::EdgeClick { edge_id },
            ("NODE_CLICK", _, Some(node_id)) => SyncEventKind::NodeClick { node_id },
            ("CLEAR", _, _) => SyncEventKind::Clear,
            _ => SyncEventKind::Unknown,
        };
        Self {
            kind,
            source: raw.source,
            timestamp_ms: raw.timestamp_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncReason {
    SourceGuard,
    TruncatedGuard,
    FocusModeGuard,
    NodeNotInPath,
    StepNotFound,
    NoAction,
    UnknownEvent,
}

impl SyncReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceGuard => "source_guard",
            Self::TruncatedGuard => "truncated_guard",
            Self::FocusModeGuard => "focus_mode_guard",
            Self::NodeNotInPath => "node_not_in_path",
            Self::StepNotFound => "step_not_found",
            Self::NoAction => "no_action",
            Self::UnknownEvent => "unknown_event",
        }
    }
}

/// What the view opposite the event's origin should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncEffect {
    HighlightGraphEdge,
    ScrollTimelineTo,
    ClearSelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncTarget {
    pub edge_id: Option<String>,
    pub step_index: Option<usize>,
    pub node_ids: Option<(String, String)>,
    pub effect: SyncEffect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub synced: bool,
    pub reason: Option<SyncReason>,
    pub target: Option<SyncTarget>,
}

impl SyncOutcome {
    fn accepted(target: SyncTarget) -> Self {
        Self {
            synced: true,
            reason: None,
            target: Some(target),
        }
    }

    fn rejected(reason: SyncReason) -> Self {
        Self {
            synced: false,
            reason: Some(reason),
            target: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState<'a> {
    Idle,
    Active { edge_id: &'a str },
}

/// Graph facts the controller consults. Borrowed per call so the controller
/// never holds onto a payload that has since been replaced.
#[derive(Debug, Clone, Copy)]
pub struct SyncContext<'a> {
    pub edges: &'a [Edge],
    pub path: &'a [HighlightedStep],
    pub truncated: bool,
    pub focus_mode: FocusMode,
}

impl<'a> SyncContext<'a> {
    pub fn new(graph: &'a Graph, focus_mode: FocusMode) -> Self {
        Self {
            edges: &graph.edges,
            path: &graph.highlighted_path,
            truncated: graph.truncated,
            focus_mode,
        }
    }
}

/// One per graph/timeline pair; the debounce window is never shared between
/// instances.
#[derive(Debug, Clone)]
pub struct SyncController {
    debounce_ms: u64,
    last_event: Option<(EventSource, u64)>,
    selected_edge_id: Option<String>,
}

impl Default for SyncController {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncController {
    pub fn new() -> Self {
        Self::with_debounce(DEFAULT_DEBOUNCE_MS)
    }

    pub fn with_debounce(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            last_event: None,
            selected_edge_id: None,
        }
    }

    pub fn selected_edge_id(&self) -> Option<&str> {
        self.selected_edge_id.as_deref()
    }

    pub fn state(&self) -> SyncState<'_> {
        match self.selected_edge_id.as_deref() {
            Some(edge_id) => SyncState::Active { edge_id },
            None => SyncState::Idle,
        }
    }

    /// Forget selection and debounce history, e.g. after a new payload.
    pub fn reset(&mut self) {
        self.last_event = None;
        self.selected_edge_id = None;
    }

    pub fn handle(&mut self, event: &SyncEvent, ctx: &SyncContext<'_>) -> SyncOutcome {
        let outcome = self.decide(event, ctx);
        match outcome.reason {
            Some(reason) => tracing::debug!(
                source = ?event.source,
                reason = reason.as_str(),
                "sync event rejected"
            ),
            None => tracing::trace!(
                source = ?event.source,
                selected = ?self.selected_edge_id,
                "sync event applied"
            ),
        }
        outcome
    }

    fn decide(&mut self, event: &SyncEvent, ctx: &SyncContext<'_>) -> SyncOutcome {
        match &event.kind {
            SyncEventKind::Clear => {
                self.reset();
                return SyncOutcome::accepted(SyncTarget {
                    edge_id: None,
                    step_index: None,
                    node_ids: None,
                    effect: SyncEffect::ClearSelection,
                });
            }
            SyncEventKind::Unknown => return SyncOutcome::rejected(SyncReason::UnknownEvent),
            _ => {}
        }

        if let Some((source, at)) = self.last_event
            && source == event.source
            && event.timestamp_ms.saturating_sub(at) < self.debounce_ms
        {
            return SyncOutcome::rejected(SyncReason::SourceGuard);
        }
        self.last_event = Some((event.source, event.timestamp_ms));

        match &event.kind {
            SyncEventKind::StepClick { edge_id } => self.select_from_timeline(edge_id, ctx, false),
            SyncEventKind::StepHover { edge_id } => self.select_from_timeline(edge_id, ctx, true),
            SyncEventKind::EdgeClick { edge_id } => {
                if let Some(reason) = guard_edge(edge_id, ctx) {
                    return SyncOutcome::rejected(reason);
                }
                let Some(step_index) = map_edge_to_step_index(edge_id, ctx.path) else {
                    return SyncOutcome::rejected(SyncReason::StepNotFound);
                };
                self.select_for_timeline(edge_id, step_index, ctx)
            }
            SyncEventKind::NodeClick { node_id } => {
                let Some(edge_id) = map_node_to_edge_id(node_id, ctx.edges, ctx.path) else {
                    return SyncOutcome::rejected(SyncReason::NodeNotInPath);
                };
                if let Some(reason) = guard_edge(edge_id, ctx) {
                    return SyncOutcome::rejected(reason);
                }
                let Some(step_index) = map_edge_to_step_index(edge_id, ctx.path) else {
                    return SyncOutcome::rejected(SyncReason::StepNotFound);
                };
                self.select_for_timeline(edge_id, step_index, ctx)
            }
            SyncEventKind::Clear | SyncEventKind::Unknown => {
                SyncOutcome::rejected(SyncReason::NoAction)
            }
        }
    }

    fn select_from_timeline(&mut self, edge_id: &str, ctx: &SyncContext<'_>, hover: bool) -> SyncOutcome {
        if let Some(reason) = guard_edge(edge_id, ctx) {
            return SyncOutcome::rejected(reason);
        }
        if hover && self.selected_edge_id.as_deref() == Some(edge_id) {
            return SyncOutcome::rejected(SyncReason::NoAction);
        }
        self.selected_edge_id = Some(edge_id.to_string());
        SyncOutcome::accepted(SyncTarget {
            edge_id: Some(edge_id.to_string()),
            step_index: map_edge_to_step_index(edge_id, ctx.path),
            node_ids: owned_pair(map_edge_to_node_ids(edge_id, ctx.edges)),
            effect: SyncEffect::HighlightGraphEdge,
        })
    }

    fn select_for_timeline(&mut self, edge_id: &str, step_index: usize, ctx: &SyncContext<'_>) -> SyncOutcome {
        self.selected_edge_id = Some(edge_id.to_string());
        SyncOutcome::accepted(SyncTarget {
            edge_id: Some(edge_id.to_string()),
            step_index: Some(step_index),
            node_ids: owned_pair(map_edge_to_node_ids(edge_id, ctx.edges)),
            effect: SyncEffect::ScrollTimelineTo,
        })
    }
}

fn guard_edge(edge_id: &str, ctx: &SyncContext<'_>) -> Option<SyncReason> {
    if !can_sync_in_truncated_graph(ctx.truncated, edge_id, ctx.path) {
        return Some(SyncReason::TruncatedGuard);
    }
    if !can_sync_in_focus_mode(ctx.focus_mode, edge_id, ctx.path) {
        return Some(SyncReason::FocusModeGuard);
    }
    None
}

fn owned_pair(pair: Option<(&str, &str)>) -> Option<(String, String)> {
    pair.map(|(from, to)| (from.to_string(), to.to_string()))
}

fn in_path(edge_id: &str, path: &[HighlightedStep]) -> bool {
    path.iter().any(|step| step.edge_id == edge_id)
}

/// Position of the first step naming `edge_id`.
pub fn map_edge_to_step_index(edge_id: &str, path: &[HighlightedStep]) -> Option<usize> {
    path.iter().position(|step| step.edge_id == edge_id)
}

/// First edge in declared edge order that touches `node_id` and is on the
/// path. The tie-break is array order, not path order or risk.
pub fn map_node_to_edge_id<'a>(
    node_id: &str,
    edges: &'a [Edge],
    path: &[HighlightedStep],
) -> Option<&'a str> {
    edges
        .iter()
        .find(|edge| edge.touches(node_id) && in_path(&edge.id, path))
        .map(|edge| edge.id.as_str())
}

pub fn map_edge_to_node_ids<'a>(edge_id: &str, edges: &'a [Edge]) -> Option<(&'a str, &'a str)> {
    edges
        .iter()
        .find(|edge| edge.id == edge_id)
        .map(|edge| (edge.from_node_id.as_str(), edge.to_node_id.as_str()))
}

pub fn can_sync_in_focus_mode(mode: FocusMode, edge_id: &str, path: &[HighlightedStep]) -> bool {
    mode != FocusMode::PathOnly || in_path(edge_id, path)
}

pub fn can_sync_in_truncated_graph(truncated: bool, edge_id: &str, path: &[HighlightedStep]) -> bool {
    !truncated || in_path(edge_id, path)
}
