use std::sync::{mpsc, Arc};
use std::thread;

use dashboard_logging::{dashboard_debug, dashboard_warn};

use crate::fetch::{ApiSettings, ChannelProgressSink, ProgressSink, ReqwestScrapeApi, ScrapeApi};
use crate::poll::{run_refresh, PollSettings};
use crate::{EngineError, EngineEvent, RequestId, RunId};

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub api: ApiSettings,
    pub poll: PollSettings,
}

enum EngineCommand {
    FetchLastRefresh { request: RequestId },
    TriggerRefresh { run: RunId },
}

/// Runs scrape API calls on a background tokio runtime.
///
/// Dropping the handle stops the worker thread and cancels in-flight calls;
/// their results are never delivered.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let api = ReqwestScrapeApi::new(&config.api)?;
        Self::with_api(Arc::new(api), config.poll)
    }

    pub fn with_api(api: Arc<dyn ScrapeApi>, poll: PollSettings) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let poll = Arc::new(poll);

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let poll = poll.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(api.as_ref(), poll.as_ref(), command, event_tx).await;
                });
            }
            dashboard_debug!("Engine command channel closed; shutting down");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn fetch_last_refresh(&self, request: RequestId) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::FetchLastRefresh { request });
    }

    pub fn trigger_refresh(&self, run: RunId) {
        let _ = self.cmd_tx.send(EngineCommand::TriggerRefresh { run });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    api: &dyn ScrapeApi,
    poll: &PollSettings,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let sink = ChannelProgressSink::new(event_tx);
    match command {
        EngineCommand::FetchLastRefresh { request } => {
            let result = api.last_scrape_time().await;
            if let Err(err) = &result {
                dashboard_warn!("Last refresh fetch {} failed: {}", request, err);
            }
            sink.emit(EngineEvent::LastRefreshFetched { request, result });
        }
        EngineCommand::TriggerRefresh { run } => {
            run_refresh(api, poll, run, &sink).await;
        }
    }
}
