use std::collections::BTreeSet;

use dashboard_logging::dashboard_debug;

use crate::progress::{ProgressBoard, ProgressUpdate};
use crate::view_model::{present_progress, refresh_label, AppViewModel};
use crate::EpochMillis;

/// Identifies one last-refresh fetch. Issued in increasing order.
pub type RequestId = u64;

/// Outcome of one last-refresh fetch; the error carries a description for logging.
pub type FetchResult = Result<Option<EpochMillis>, String>;

/// Lifecycle of the user-triggered scrape run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Last known refresh time and whether a fetch for it is outstanding.
///
/// Only the most recently issued request may change the displayed value, so a
/// slow initial fetch can never overwrite the result of a later re-fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshState {
    last_refresh_time: Option<EpochMillis>,
    is_loading: bool,
    latest_request: RequestId,
    mounted: bool,
}

impl Default for RefreshState {
    fn default() -> Self {
        Self {
            last_refresh_time: None,
            is_loading: true,
            latest_request: 0,
            mounted: false,
        }
    }
}

impl RefreshState {
    pub fn last_refresh_time(&self) -> Option<EpochMillis> {
        self.last_refresh_time
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn latest_request(&self) -> RequestId {
        self.latest_request
    }

    pub(crate) fn mount(&mut self) {
        self.mounted = true;
    }

    pub(crate) fn unmount(&mut self) {
        self.mounted = false;
    }

    pub(crate) fn begin_fetch(&mut self) -> RequestId {
        self.latest_request += 1;
        self.is_loading = true;
        self.latest_request
    }

    /// Applies a fetch outcome. Returns false when the outcome is discarded.
    pub(crate) fn resolve(&mut self, request: RequestId, result: FetchResult) -> bool {
        if !self.mounted {
            dashboard_debug!("Discarding refresh fetch {} after unmount", request);
            return false;
        }
        if request != self.latest_request {
            dashboard_debug!(
                "Discarding stale refresh fetch {} (latest is {})",
                request,
                self.latest_request
            );
            return false;
        }
        self.last_refresh_time = result.unwrap_or(None);
        self.is_loading = false;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    refresh: RefreshState,
    run: RunState,
    board: ProgressBoard,
    expanded: BTreeSet<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the view model for rendering at wall-clock time `now`.
    pub fn view(&self, now: EpochMillis) -> AppViewModel {
        AppViewModel {
            refresh_label: refresh_label(&self.refresh, now),
            is_loading: self.refresh.is_loading(),
            last_refresh_time: self.refresh.last_refresh_time(),
            run: self.run,
            accounts: self
                .board
                .iter()
                .map(|progress| {
                    present_progress(
                        progress,
                        self.expanded.contains(progress.account_number()),
                        now,
                    )
                })
                .collect(),
            dirty: self.dirty,
        }
    }

    pub fn refresh(&self) -> &RefreshState {
        &self.refresh
    }

    pub fn run(&self) -> RunState {
        self.run
    }

    pub fn board(&self) -> &ProgressBoard {
        &self.board
    }

    pub fn is_expanded(&self, account_number: &str) -> bool {
        self.expanded.contains(account_number)
    }

    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn refresh_mut(&mut self) -> &mut RefreshState {
        &mut self.refresh
    }

    pub(crate) fn set_run(&mut self, run: RunState) {
        if self.run != run {
            self.run = run;
            self.mark_dirty();
        }
    }

    pub(crate) fn start_run(&mut self) {
        self.board.reset();
        self.expanded.clear();
        self.run = RunState::Running;
        self.mark_dirty();
    }

    pub(crate) fn apply_progress(&mut self, update: ProgressUpdate) {
        self.board.apply(update);
        self.mark_dirty();
    }

    /// Flips the expanded flag. Accounts without history cannot be expanded.
    pub(crate) fn toggle_expanded(&mut self, account_number: &str) -> bool {
        let has_history = self
            .board
            .get(account_number)
            .is_some_and(|progress| !progress.history().is_empty());
        if !has_history {
            return false;
        }
        if !self.expanded.remove(account_number) {
            self.expanded.insert(account_number.to_string());
        }
        self.mark_dirty();
        true
    }
}
