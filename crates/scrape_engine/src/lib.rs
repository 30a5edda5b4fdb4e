//! Scrape engine: async access to the scrape backend and effect execution.
mod engine;
mod fetch;
mod poll;
mod types;

pub use engine::{EngineConfig, EngineHandle};
pub use fetch::{ApiSettings, ChannelProgressSink, ProgressSink, ReqwestScrapeApi, ScrapeApi};
pub use poll::{run_refresh, PollSettings};
pub use types::{ApiError, EngineError, EngineEvent, ProgressEvent, ProgressPage, RequestId,
    RunId,
};
