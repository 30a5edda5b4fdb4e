#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The dashboard became visible; triggers the initial last-refresh fetch.
    Mounted,
    /// The dashboard is closing; outstanding fetch results are dropped.
    Unmounted,
    /// A last-refresh fetch resolved.
    LastRefreshLoaded {
        request: crate::RequestId,
        result: crate::FetchResult,
    },
    /// User asked for a new scrape run.
    RefreshClicked,
    /// The scrape run finished successfully.
    RefreshSucceeded,
    /// The scrape run could not be started or followed to completion.
    RefreshFailed { reason: String },
    /// One progress event from the feed.
    ProgressReceived(crate::ProgressUpdate),
    /// User toggled the history of an account.
    ToggleExpanded { account_number: String },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
