use std::time::Duration;

use dashboard_logging::{dashboard_debug, dashboard_info, dashboard_warn};

use crate::fetch::{ProgressSink, ScrapeApi};
use crate::{EngineEvent, RunId};

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    /// Consecutive failed polls tolerated before the run is reported as failed.
    pub max_consecutive_failures: u32,
    /// A run whose feed is not done after this long is reported as failed.
    pub max_run_duration: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_consecutive_failures: 3,
            max_run_duration: Duration::from_secs(15 * 60),
        }
    }
}

/// Starts a scrape run and follows its progress feed until it finishes.
///
/// Ends with exactly one `RefreshCompleted` or `RefreshFailed` event. Progress
/// events are emitted in the order the feed returned them.
pub async fn run_refresh(
    api: &dyn ScrapeApi,
    settings: &PollSettings,
    run: RunId,
    sink: &dyn ProgressSink,
) {
    if let Err(err) = api.trigger_refresh().await {
        dashboard_warn!("Run #{}: triggering refresh failed: {}", run, err);
        sink.emit(EngineEvent::RefreshFailed {
            reason: err.to_string(),
        });
        return;
    }
    dashboard_info!("Run #{}: refresh triggered; polling progress", run);

    let deadline = tokio::time::Instant::now() + settings.max_run_duration;
    let mut cursor = 0;
    let mut failures = 0u32;
    loop {
        match api.progress_since(cursor).await {
            Ok(page) => {
                failures = 0;
                dashboard_debug!(
                    "Run #{}: poll at cursor {} returned {} events",
                    run,
                    cursor,
                    page.events.len()
                );
                for event in page.events {
                    sink.emit(EngineEvent::Progress(event));
                }
                cursor = page.cursor;
                if page.done {
                    dashboard_info!("Run #{}: finished", run);
                    sink.emit(EngineEvent::RefreshCompleted);
                    return;
                }
            }
            Err(err) => {
                failures += 1;
                dashboard_warn!(
                    "Run #{}: progress poll failed ({}/{}): {}",
                    run,
                    failures,
                    settings.max_consecutive_failures,
                    err
                );
                if failures >= settings.max_consecutive_failures {
                    sink.emit(EngineEvent::RefreshFailed {
                        reason: format!("progress polling failed: {err}"),
                    });
                    return;
                }
            }
        }

        if tokio::time::Instant::now() + settings.interval >= deadline {
            dashboard_warn!(
                "Run #{}: not finished after {:?}; giving up",
                run,
                settings.max_run_duration
            );
            sink.emit(EngineEvent::RefreshFailed {
                reason: format!(
                    "refresh run did not finish within {:?}",
                    settings.max_run_duration
                ),
            });
            return;
        }
        tokio::time::sleep(settings.interval).await;
    }
}
