use fundflow_graph::{FocusMode, RenderOptions, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FundflowRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    focus_mode: Option<FocusMode>,
    highlight: Option<bool>,
    hide_dimmed: Option<bool>,
    selected_edge_id: Option<String>,
}

fn build_render_options(options: FundflowRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("light") {
        RenderOptions::light()
    } else {
        RenderOptions::dark()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(mode) = options.focus_mode {
        render_options.focus = mode;
    }
    if let Some(highlight) = options.highlight {
        render_options.highlight = highlight;
    }
    if let Some(hide) = options.hide_dimmed {
        render_options.hide_dimmed = hide;
    }
    render_options.selected_edge = options.selected_edge_id;
    // No system fonts inside the browser sandbox.
    render_options.layout.fast_text_metrics = true;

    render_options
}

#[wasm_bindgen]
pub fn render_fundflow_svg(payload_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<FundflowRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        FundflowRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(payload_json, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use fundflow_graph::render_with_options;

    use crate::{FundflowRenderOptions, build_render_options};

    #[test]
    fn renders_highlighted_route_with_focus() {
        let payload = r#"{
            "nodes": [
                {"id": "a", "x": 0, "y": 0, "sizeWeight": 0.9},
                {"id": "b", "x": 150, "y": 0, "type": "bridge"},
                {"id": "c", "x": 300, "y": 0, "type": "cex"}
            ],
            "edges": [
                {"id": "ab", "from": "a", "to": "b", "weight": 0.6, "netFlowUsd": 10},
                {"id": "bc", "from": "b", "to": "c", "weight": 0.3, "netFlowUsd": -10}
            ],
            "highlightedPath": [{"edgeId": "ab", "order": 1, "riskContribution": 0.8}]
        }"#;
        let options: FundflowRenderOptions = serde_json::from_str(
            r#"{"theme": "light", "focusMode": "PATH_ONLY", "hideDimmed": true, "selectedEdgeId": "ab"}"#,
        )
        .unwrap();

        let svg = render_with_options(payload, build_render_options(options))
            .expect("payload should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("data-edge-id=\"ab\""));
        assert!(!svg.contains("data-edge-id=\"bc\""));
    }
}
