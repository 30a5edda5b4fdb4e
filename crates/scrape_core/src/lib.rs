//! Scrape dashboard core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod progress;
mod relative_time;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use progress::{ProgressBoard, ProgressUpdate, ScrapingEvent, ScrapingProgress};
pub use relative_time::{relative_time, EpochMillis, INVALID_DATE, JUST_NOW, NO_HISTORY};
pub use state::{AppState, FetchResult, RefreshState, RequestId, RunState};
pub use status::{classify, ScrapingStatus, StatusClass};
pub use update::update;
pub use view_model::{
    present_progress, refresh_label, AppViewModel, HistoryRowView, ProgressItemView,
    LOADING_REFRESH_LABEL, NOT_AVAILABLE, REFRESH_PROMPT_LABEL,
};
