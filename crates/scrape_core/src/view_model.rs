use crate::relative_time::relative_time;
use crate::{EpochMillis, RefreshState, RunState, ScrapingProgress, StatusClass};

pub const LOADING_REFRESH_LABEL: &str = "Loading refresh status...";
pub const REFRESH_PROMPT_LABEL: &str = "Refresh Accounts";
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub refresh_label: String,
    pub is_loading: bool,
    pub last_refresh_time: Option<EpochMillis>,
    pub run: RunState,
    pub accounts: Vec<ProgressItemView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressItemView {
    pub account_name: String,
    pub account_number: String,
    pub account_suffix: String,
    pub badge: String,
    pub icon: StatusClass,
    pub last_updated: String,
    /// False when there is no history to disclose.
    pub expandable: bool,
    pub expanded: bool,
    /// Shown above the history, only for accounts in an error stage.
    pub error_message: Option<String>,
    /// Most recent first; empty unless expanded.
    pub history: Vec<HistoryRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub label: String,
    pub age: String,
    pub message: Option<String>,
}

pub fn refresh_label(refresh: &RefreshState, now: EpochMillis) -> String {
    if refresh.is_loading() {
        return LOADING_REFRESH_LABEL.to_string();
    }
    match refresh.last_refresh_time() {
        Some(at) => format!("Last refresh: {}", relative_time(Some(at), now, false)),
        None => REFRESH_PROMPT_LABEL.to_string(),
    }
}

/// Derives the display of one account. Reads `progress` only.
pub fn present_progress(
    progress: &ScrapingProgress,
    expanded: bool,
    now: EpochMillis,
) -> ProgressItemView {
    let expandable = !progress.history().is_empty();
    let expanded = expanded && expandable;

    let last_updated = match progress.last_update_time() {
        Some(at) => relative_time(Some(at), now, true),
        None => NOT_AVAILABLE.to_string(),
    };

    // The latest history row already shows the same text when expanded.
    let latest_message = progress
        .latest_event()
        .and_then(|event| event.message.as_deref());
    let error_message = progress
        .error_message()
        .filter(|message| !(expanded && latest_message == Some(*message)))
        .map(str::to_string);

    let history = if expanded {
        progress
            .history()
            .iter()
            .rev()
            .map(|event| HistoryRowView {
                label: event.status.label().to_string(),
                age: relative_time(Some(event.timestamp), now, true),
                message: event.message.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    ProgressItemView {
        account_name: progress.account_name().to_string(),
        account_number: progress.account_number().to_string(),
        account_suffix: progress.account_suffix().to_string(),
        badge: progress.status().label().to_string(),
        icon: progress.status().class(),
        last_updated,
        expandable,
        expanded,
        error_message,
        history,
    }
}
