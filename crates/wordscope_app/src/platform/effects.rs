use wordscope_core::{Effect, LoadedDocument, Msg};
use wordscope_engine::{EngineEvent, EngineHandle, Pipeline};
use wordscope_logging::{ws_info, ws_trace};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            engine: EngineHandle::new(pipeline),
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchDocument { request_id, url } => {
                    ws_info!(
                        "FetchDocument request_id={} url_len={} url={}",
                        request_id,
                        url.len(),
                        url
                    );
                    self.engine.load(request_id, url);
                }
            }
        }
    }

    /// Drains engine events without blocking.
    pub fn poll(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .filter_map(map_event)
            .collect()
    }
}

fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::Progress(progress) => {
            ws_trace!(
                "request_id={} stage={:?} bytes={:?}",
                progress.request_id,
                progress.stage,
                progress.bytes
            );
            None
        }
        EngineEvent::DocumentLoaded { request_id, result } => Some(Msg::DocumentLoaded {
            request_id,
            result: result
                .map(|doc| LoadedDocument::from(doc.as_ref()))
                .map_err(|err| err.to_string()),
        }),
    }
}
