use crate::{EpochMillis, ScrapingStatus};

/// One observed transition for an account.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapingEvent {
    pub status: ScrapingStatus,
    pub timestamp: EpochMillis,
    pub message: Option<String>,
}

/// A progress update as delivered by the feed, before it is attached to an account.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub account_name: String,
    pub account_number: String,
    pub status: ScrapingStatus,
    pub message: Option<String>,
    pub timestamp: EpochMillis,
}

/// Per-account progress for the current scrape run.
///
/// `history` is append-only and `status` is a cache of its last entry; both are
/// only ever written by [`ScrapingProgress::record`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapingProgress {
    account_name: String,
    account_number: String,
    status: ScrapingStatus,
    history: Vec<ScrapingEvent>,
    error_message: Option<String>,
    last_update_time: Option<EpochMillis>,
}

impl ScrapingProgress {
    pub fn new(account_name: impl Into<String>, account_number: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            account_number: account_number.into(),
            status: ScrapingStatus::Pending,
            history: Vec::new(),
            error_message: None,
            last_update_time: None,
        }
    }

    pub fn record(&mut self, event: ScrapingEvent) {
        // Consecutive error stages keep the last message that was given.
        if !event.status.is_error() {
            self.error_message = None;
        } else if let Some(message) = &event.message {
            self.error_message = Some(message.clone());
        }

        if event.timestamp.is_finite() {
            self.last_update_time = Some(match self.last_update_time {
                Some(previous) => previous.max(event.timestamp),
                None => event.timestamp,
            });
        }

        self.status = event.status.clone();
        self.history.push(event);
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    /// Last four characters of the account number, for display.
    pub fn account_suffix(&self) -> &str {
        let count = self.account_number.chars().count();
        match self.account_number.char_indices().nth(count.saturating_sub(4)) {
            Some((idx, _)) => &self.account_number[idx..],
            None => &self.account_number,
        }
    }

    pub fn status(&self) -> &ScrapingStatus {
        &self.status
    }

    /// Events in the order they were observed.
    pub fn history(&self) -> &[ScrapingEvent] {
        &self.history
    }

    pub fn latest_event(&self) -> Option<&ScrapingEvent> {
        self.history.last()
    }

    /// The failure message, present only while the account is in an error stage.
    pub fn error_message(&self) -> Option<&str> {
        if self.status.is_error() {
            self.error_message.as_deref()
        } else {
            None
        }
    }

    pub fn last_update_time(&self) -> Option<EpochMillis> {
        self.last_update_time
    }
}

/// All progress records of the current run, in first-seen order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressBoard {
    accounts: Vec<ScrapingProgress>,
}

impl ProgressBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the update to its account, creating the record on first sight.
    pub fn apply(&mut self, update: ProgressUpdate) -> &ScrapingProgress {
        let ProgressUpdate {
            account_name,
            account_number,
            status,
            message,
            timestamp,
        } = update;

        let idx = match self
            .accounts
            .iter()
            .position(|p| p.account_number == account_number)
        {
            Some(idx) => idx,
            None => {
                self.accounts
                    .push(ScrapingProgress::new(account_name, account_number));
                self.accounts.len() - 1
            }
        };

        let progress = &mut self.accounts[idx];
        progress.record(ScrapingEvent {
            status,
            timestamp,
            message,
        });
        progress
    }

    /// Drops every record; a new run starts with fresh histories.
    pub fn reset(&mut self) {
        self.accounts.clear();
    }

    pub fn get(&self, account_number: &str) -> Option<&ScrapingProgress> {
        self.accounts
            .iter()
            .find(|p| p.account_number == account_number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScrapingProgress> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
