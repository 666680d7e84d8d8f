use std::sync::{mpsc, Arc};
use std::thread;

use wordscope_core::RequestId;
use wordscope_logging::{ws_error, ws_warn};

use crate::fetch::ChannelProgressSink;
use crate::pipeline::Pipeline;
use crate::EngineEvent;

enum EngineCommand {
    Load { request_id: RequestId, url: String },
}

/// Runs the pipeline off the UI thread; results come back as `EngineEvent`s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(pipeline: Pipeline) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let pipeline = Arc::new(pipeline);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    ws_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let pipeline = pipeline.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(pipeline.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn load(&self, request_id: RequestId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Load {
            request_id,
            url: url.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next event; `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

async fn handle_command(
    pipeline: &Pipeline,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Load { request_id, url } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = pipeline.load(request_id, &url, &sink).await;
            if let Err(err) = &result {
                ws_warn!("Load failed request_id={} url={}: {}", request_id, url, err);
            }
            let _ = event_tx.send(EngineEvent::DocumentLoaded { request_id, result });
        }
    }
}
