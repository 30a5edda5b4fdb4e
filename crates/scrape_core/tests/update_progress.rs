use std::sync::Once;

use scrape_core::{
    present_progress, update, AppState, Effect, Msg, ProgressUpdate, ScrapingProgress,
    ScrapingStatus, StatusClass, NOT_AVAILABLE,
};

const NOW: f64 = 1_700_000_000_000.0;
const MINUTE: f64 = 60_000.0;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dashboard_logging::initialize_for_tests);
}

fn mounted() -> AppState {
    update(AppState::new(), Msg::Mounted).0
}

fn progress(
    number: &str,
    status: ScrapingStatus,
    minutes_ago: f64,
    message: Option<&str>,
) -> Msg {
    Msg::ProgressReceived(ProgressUpdate {
        account_name: "Everyday Checking".to_string(),
        account_number: number.to_string(),
        status,
        message: message.map(str::to_string),
        timestamp: NOW - minutes_ago * MINUTE,
    })
}

fn apply(state: AppState, msgs: Vec<Msg>) -> AppState {
    msgs.into_iter().fold(state, |state, msg| update(state, msg).0)
}

#[test]
fn first_event_creates_account_record() {
    init_logging();
    let mut state = apply(
        mounted(),
        vec![progress("9876543210", ScrapingStatus::Pending, 3.0, None)],
    );
    assert!(state.consume_dirty());

    let view = state.view(NOW);
    assert_eq!(view.accounts.len(), 1);
    let item = &view.accounts[0];
    assert_eq!(item.account_suffix, "3210");
    assert_eq!(item.badge, "Pending");
    assert_eq!(item.icon, StatusClass::Loading);
    assert_eq!(item.last_updated, "3 minutes ago");
    assert!(item.expandable);
    assert!(!item.expanded);
    assert!(item.history.is_empty());
}

#[test]
fn icon_follows_latest_stage() {
    init_logging();
    let state = apply(
        mounted(),
        vec![
            progress("1111", ScrapingStatus::LoginStarted, 5.0, None),
            progress("1111", ScrapingStatus::LoginSuccess, 4.0, None),
            progress("1111", ScrapingStatus::Completed, 1.0, None),
            progress("2222", ScrapingStatus::LoginStarted, 5.0, None),
            progress("2222", ScrapingStatus::LoginFailed, 2.0, Some("Invalid credentials")),
        ],
    );
    let view = state.view(NOW);

    assert_eq!(view.accounts[0].icon, StatusClass::Success);
    assert_eq!(view.accounts[0].badge, "Completed");
    assert_eq!(view.accounts[0].error_message, None);
    assert_eq!(view.accounts[1].icon, StatusClass::Error);
    assert_eq!(view.accounts[1].badge, "Login failed");
    assert_eq!(
        view.accounts[1].error_message.as_deref(),
        Some("Invalid credentials")
    );
}

#[test]
fn expanded_history_is_most_recent_first_without_reordering_storage() {
    init_logging();
    let state = apply(
        mounted(),
        vec![
            progress("1111", ScrapingStatus::Pending, 10.0, None),
            progress("1111", ScrapingStatus::LoginStarted, 9.0, None),
            progress("1111", ScrapingStatus::ScrapingBankStarted, 2.0, Some("page 1")),
            Msg::ToggleExpanded {
                account_number: "1111".to_string(),
            },
        ],
    );

    let stored_before: Vec<_> = state
        .board()
        .get("1111")
        .unwrap()
        .history()
        .iter()
        .map(|e| e.status.clone())
        .collect();

    let first = state.view(NOW);
    let second = state.view(NOW);
    assert_eq!(first, second);

    let labels: Vec<_> = first.accounts[0]
        .history
        .iter()
        .map(|row| row.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec!["Scraping bank transactions", "Logging in", "Pending"]
    );
    assert_eq!(first.accounts[0].history[0].age, "2 minutes ago");
    assert_eq!(first.accounts[0].history[0].message.as_deref(), Some("page 1"));

    let stored_after: Vec<_> = state
        .board()
        .get("1111")
        .unwrap()
        .history()
        .iter()
        .map(|e| e.status.clone())
        .collect();
    assert_eq!(stored_before, stored_after);
    assert_eq!(
        stored_after,
        vec![
            ScrapingStatus::Pending,
            ScrapingStatus::LoginStarted,
            ScrapingStatus::ScrapingBankStarted
        ]
    );
}

#[test]
fn toggling_never_touches_history() {
    init_logging();
    let state = apply(
        mounted(),
        vec![
            progress("1111", ScrapingStatus::Pending, 1.0, None),
            progress("1111", ScrapingStatus::LoginStarted, 0.5, None),
        ],
    );
    let board_before = state.board().clone();

    let toggle = || Msg::ToggleExpanded {
        account_number: "1111".to_string(),
    };
    let (state, effects) = update(state, toggle());
    assert!(effects.is_empty());
    assert!(state.is_expanded("1111"));
    assert_eq!(state.board(), &board_before);

    let (state, _) = update(state, toggle());
    assert!(!state.is_expanded("1111"));
    assert_eq!(state.board(), &board_before);
}

#[test]
fn toggling_unknown_account_is_ignored() {
    init_logging();
    let (mut state, effects) = update(
        mounted(),
        Msg::ToggleExpanded {
            account_number: "0000".to_string(),
        },
    );
    state.consume_dirty();
    assert!(effects.is_empty());
    assert!(!state.is_expanded("0000"));
}

#[test]
fn error_banner_not_duplicated_by_latest_history_row() {
    init_logging();
    let collapsed = apply(
        mounted(),
        vec![
            progress("1111", ScrapingStatus::ScrapingStarted, 3.0, None),
            progress("1111", ScrapingStatus::ScrapingFailed, 1.0, Some("Timeout")),
        ],
    );
    assert_eq!(
        collapsed.view(NOW).accounts[0].error_message.as_deref(),
        Some("Timeout")
    );

    let expanded = apply(
        collapsed,
        vec![Msg::ToggleExpanded {
            account_number: "1111".to_string(),
        }],
    );
    let item = &expanded.view(NOW).accounts[0];
    assert_eq!(item.error_message, None);
    assert_eq!(item.history[0].message.as_deref(), Some("Timeout"));
}

#[test]
fn error_banner_shown_when_latest_row_differs() {
    init_logging();
    let state = apply(
        mounted(),
        vec![
            progress("1111", ScrapingStatus::LoginFailed, 3.0, Some("Locked out")),
            progress("1111", ScrapingStatus::Error, 1.0, None),
            Msg::ToggleExpanded {
                account_number: "1111".to_string(),
            },
        ],
    );
    let item = &state.view(NOW).accounts[0];
    assert_eq!(item.icon, StatusClass::Error);
    assert_eq!(item.error_message.as_deref(), Some("Locked out"));
    assert_eq!(item.history[0].message, None);
    assert_eq!(item.history[1].message.as_deref(), Some("Locked out"));

    let state = apply(
        state,
        vec![progress("1111", ScrapingStatus::LogoutFailed, 0.2, Some("Session expired"))],
    );
    let item = &state.view(NOW).accounts[0];
    assert_eq!(item.error_message, None);
    assert_eq!(item.history[0].message.as_deref(), Some("Session expired"));
}

#[test]
fn completion_after_retry_suppresses_old_error() {
    init_logging();
    let state = apply(
        mounted(),
        vec![
            progress("1111", ScrapingStatus::LoginFailed, 5.0, Some("Try again")),
            progress("1111", ScrapingStatus::LoginStarted, 4.0, None),
            progress("1111", ScrapingStatus::Completed, 1.0, None),
        ],
    );
    let item = &state.view(NOW).accounts[0];
    assert_eq!(item.icon, StatusClass::Success);
    assert_eq!(item.error_message, None);
}

#[test]
fn unknown_stage_is_labelled_with_raw_value() {
    init_logging();
    let state = apply(
        mounted(),
        vec![progress(
            "1111",
            ScrapingStatus::parse("OTP_REQUIRED"),
            1.0,
            None,
        )],
    );
    let item = &state.view(NOW).accounts[0];
    assert_eq!(item.badge, "OTP_REQUIRED");
    assert_eq!(item.icon, StatusClass::Loading);
}

#[test]
fn failures_stay_on_their_own_account() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::Mounted);
    let request = match effects[0] {
        Effect::FetchLastRefresh { request } => request,
        other => panic!("unexpected effect {other:?}"),
    };
    let state = apply(
        state,
        vec![
            Msg::LastRefreshLoaded {
                request,
                result: Ok(Some(NOW - 10.0 * MINUTE)),
            },
            progress("1111", ScrapingStatus::ScrapingFailed, 1.0, Some("boom")),
            progress("2222", ScrapingStatus::ScrapingBankStarted, 1.0, None),
        ],
    );
    let view = state.view(NOW);
    assert_eq!(view.refresh_label, "Last refresh: 10 minutes");
    assert_eq!(view.accounts[1].icon, StatusClass::Loading);
    assert_eq!(view.accounts[1].error_message, None);
}

#[test]
fn new_run_starts_fresh_histories() {
    init_logging();
    let state = apply(
        mounted(),
        vec![
            progress("1111", ScrapingStatus::Completed, 30.0, None),
            Msg::ToggleExpanded {
                account_number: "1111".to_string(),
            },
        ],
    );
    assert_eq!(state.view(NOW).accounts.len(), 1);

    let (state, effects) = update(state, Msg::RefreshClicked);
    assert_eq!(effects, vec![Effect::TriggerRefresh]);
    assert!(state.view(NOW).accounts.is_empty());
    assert!(!state.is_expanded("1111"));

    let state = apply(
        state,
        vec![progress("1111", ScrapingStatus::Pending, 0.0, None)],
    );
    assert_eq!(state.board().get("1111").unwrap().history().len(), 1);
}

#[test]
fn progress_after_unmount_is_dropped() {
    init_logging();
    let state = apply(
        mounted(),
        vec![
            Msg::Unmounted,
            progress("1111", ScrapingStatus::Pending, 0.0, None),
        ],
    );
    assert!(state.board().is_empty());
}

#[test]
fn empty_history_is_not_expandable_and_shows_na() {
    init_logging();
    let record = ScrapingProgress::new("Brokerage", "55550000");
    let item = present_progress(&record, true, NOW);

    assert!(!item.expandable);
    assert!(!item.expanded);
    assert!(item.history.is_empty());
    assert_eq!(item.last_updated, NOT_AVAILABLE);
    assert_eq!(item.badge, "Pending");
    assert_eq!(item.icon, StatusClass::Loading);
}
