use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use dashboard_logging::{dashboard_debug, dashboard_info};
use scrape_core::{update, AppState, EpochMillis, Msg, RunState};
use scrape_engine::EngineHandle;

use super::config::load_config;
use super::effects::EffectRunner;
use super::logging;
use super::ui;
use crate::Cli;

const TICK_INTERVAL: Duration = Duration::from_millis(75);
/// Relative ages change without any new events; re-print at least this often.
const RERENDER_INTERVAL: Duration = Duration::from_secs(60);

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    logging::initialize(cli.verbose, cli.log_file.as_deref());

    let config = load_config(&cli.config);
    let engine_config = config.engine_config(cli.base_url.as_deref());
    dashboard_info!("Using scrape backend at {}", engine_config.api.base_url);

    let engine = EngineHandle::new(engine_config)?;
    let mut app = Dashboard::new(EffectRunner::new(engine), cli.expand, !cli.once);

    app.dispatch(Msg::Mounted);
    if cli.refresh {
        app.dispatch(Msg::RefreshClicked);
    }

    loop {
        app.pump();
        if cli.once && app.is_settled() {
            break;
        }
        thread::sleep(TICK_INTERVAL);
    }

    app.dispatch(Msg::Unmounted);
    if cli.once {
        app.print(now_ms());
    }
    Ok(())
}

struct Dashboard {
    state: AppState,
    runner: EffectRunner,
    expand_all: bool,
    live_output: bool,
    last_render: Option<Instant>,
}

impl Dashboard {
    fn new(runner: EffectRunner, expand_all: bool, live_output: bool) -> Self {
        Self {
            state: AppState::new(),
            runner,
            expand_all,
            live_output,
            last_render: None,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Applies pending engine events and re-renders when something changed.
    fn pump(&mut self) {
        for msg in self.runner.drain() {
            self.dispatch(msg);
        }
        if self.expand_all {
            self.expand_new_accounts();
        }
        self.dispatch(Msg::Tick);

        let dirty = self.state.consume_dirty();
        let since_render = self.last_render.map(|at| at.elapsed());
        if self.live_output && should_render(dirty, since_render) {
            self.print(now_ms());
            self.last_render = Some(Instant::now());
        }
    }

    fn expand_new_accounts(&mut self) {
        let pending: Vec<String> = self
            .state
            .board()
            .iter()
            .filter(|p| !p.history().is_empty() && !self.state.is_expanded(p.account_number()))
            .map(|p| p.account_number().to_string())
            .collect();
        for account_number in pending {
            dashboard_debug!("Expanding history of account {}", account_number);
            self.dispatch(Msg::ToggleExpanded { account_number });
        }
    }

    /// Nothing in flight: no fetch outstanding and no run being followed.
    fn is_settled(&self) -> bool {
        !self.state.refresh().is_loading() && self.state.run() != RunState::Running
    }

    fn print(&self, now: EpochMillis) {
        for line in ui::render::render(&self.state.view(now)) {
            println!("{line}");
        }
        println!();
    }
}

fn now_ms() -> EpochMillis {
    Utc::now().timestamp_millis() as f64
}

fn should_render(dirty: bool, since_render: Option<Duration>) -> bool {
    match since_render {
        None => true,
        Some(elapsed) => dirty || elapsed >= RERENDER_INTERVAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_always_renders() {
        assert!(should_render(false, None));
    }

    #[test]
    fn dirty_state_renders_immediately() {
        assert!(should_render(true, Some(Duration::from_millis(75))));
        assert!(!should_render(false, Some(Duration::from_millis(75))));
    }

    #[test]
    fn clean_state_rerenders_once_ages_may_have_changed() {
        assert!(!should_render(false, Some(RERENDER_INTERVAL - Duration::from_secs(1))));
        assert!(should_render(false, Some(RERENDER_INTERVAL)));
    }
}
