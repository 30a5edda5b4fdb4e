use dashboard_logging::{dashboard_info, dashboard_warn};

use crate::{AppState, Effect, Msg, RunState, StatusClass};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => {
            state.refresh_mut().mount();
            vec![fetch_last_refresh(&mut state)]
        }
        Msg::Unmounted => {
            state.refresh_mut().unmount();
            Vec::new()
        }
        Msg::LastRefreshLoaded { request, result } => {
            if let Err(reason) = &result {
                dashboard_warn!("Fetching last refresh time failed: {}", reason);
            }
            if state.refresh_mut().resolve(request, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RefreshClicked => {
            if !state.refresh().is_mounted() || state.run() == RunState::Running {
                return (state, Vec::new());
            }
            state.start_run();
            vec![Effect::TriggerRefresh]
        }
        Msg::RefreshSucceeded => {
            if !state.refresh().is_mounted() {
                return (state, Vec::new());
            }
            state.set_run(RunState::Succeeded);
            vec![fetch_last_refresh(&mut state)]
        }
        Msg::RefreshFailed { reason } => {
            dashboard_warn!("Refresh run failed: {}", reason);
            if state.refresh().is_mounted() {
                state.set_run(RunState::Failed);
            }
            Vec::new()
        }
        Msg::ProgressReceived(progress) => {
            if !state.refresh().is_mounted() {
                return (state, Vec::new());
            }
            if progress.status.class() == StatusClass::Error {
                dashboard_info!(
                    "Account {} reported {}: {}",
                    progress.account_name,
                    progress.status,
                    progress.message.as_deref().unwrap_or("no details")
                );
            }
            state.apply_progress(progress);
            Vec::new()
        }
        Msg::ToggleExpanded { account_number } => {
            state.toggle_expanded(&account_number);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn fetch_last_refresh(state: &mut AppState) -> Effect {
    let request = state.refresh_mut().begin_fetch();
    state.mark_dirty();
    Effect::FetchLastRefresh { request }
}
