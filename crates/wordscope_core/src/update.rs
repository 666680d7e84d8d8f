use wordscope_logging::ws_info;

use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlSubmitted(raw) => {
            let url = raw.trim();
            if url.is_empty() {
                state.clear_document();
                return (state, Vec::new());
            }
            let request_id = state.begin_request(url.to_string());
            ws_info!("UrlSubmitted request_id={} url={}", request_id, url);
            vec![Effect::FetchDocument {
                request_id,
                url: url.to_string(),
            }]
        }
        Msg::MinFrequencyChanged(requested) => {
            state.set_min_frequency(requested);
            Vec::new()
        }
        Msg::ChartSelected(kind) => {
            state.set_chart(kind);
            Vec::new()
        }
        Msg::DocumentLoaded { request_id, result } => {
            state.apply_loaded(request_id, result);
            Vec::new()
        }
    };

    (state, effects)
}
