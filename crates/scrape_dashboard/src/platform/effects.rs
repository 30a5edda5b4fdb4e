use chrono::Utc;
use dashboard_logging::dashboard_info;
use scrape_core::{Effect, EpochMillis, Msg, ProgressUpdate, ScrapingStatus};
use scrape_engine::{EngineEvent, EngineHandle, RunId};

pub struct EffectRunner {
    engine: EngineHandle,
    runs_started: RunId,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            runs_started: 0,
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchLastRefresh { request } => {
                    self.engine.fetch_last_refresh(request);
                }
                Effect::TriggerRefresh => {
                    self.runs_started += 1;
                    dashboard_info!("Starting scrape run #{}", self.runs_started);
                    self.engine.trigger_refresh(self.runs_started);
                }
            }
        }
    }

    /// Collects every engine event that arrived since the last call.
    pub fn drain(&self) -> Vec<Msg> {
        let received_at = Utc::now().timestamp_millis() as EpochMillis;
        std::iter::from_fn(|| self.engine.try_recv())
            .map(|event| map_event(event, received_at))
            .collect()
    }
}

/// Progress events without their own timestamp are stamped with `received_at`.
fn map_event(event: EngineEvent, received_at: EpochMillis) -> Msg {
    match event {
        EngineEvent::LastRefreshFetched { request, result } => Msg::LastRefreshLoaded {
            request,
            result: result
                .map(|at| at.map(|ms| ms as f64))
                .map_err(|err| err.to_string()),
        },
        EngineEvent::Progress(event) => Msg::ProgressReceived(ProgressUpdate {
            account_name: event.account_name,
            account_number: event.account_number,
            status: ScrapingStatus::parse(&event.status),
            message: event.message,
            timestamp: event
                .timestamp
                .map_or(received_at, |ms| ms as EpochMillis),
        }),
        EngineEvent::RefreshCompleted => Msg::RefreshSucceeded,
        EngineEvent::RefreshFailed { reason } => Msg::RefreshFailed { reason },
    }
}
