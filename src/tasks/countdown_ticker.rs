//! Countdown tick background task

use std::sync::Arc;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error};

use crate::state::{AppState, TickOutcome};

/// Background task that advances the countdown once per tick period.
///
/// The task serves a single schedule. It exits when the countdown finishes,
/// when the timer no longer accepts its ticks, or when it is aborted by a
/// transition out of the running phase.
pub async fn countdown_ticker_task(state: Arc<AppState>, schedule: u64, first_tick: Instant) {
    let mut interval = interval_at(first_tick, state.tick_period);

    loop {
        interval.tick().await;

        match state.tick(schedule) {
            Ok(TickOutcome::Counted(_)) => {}
            Ok(TickOutcome::Finished) => {
                state.on_finished().await;
                break;
            }
            Ok(TickOutcome::Stale) => {
                debug!("Schedule {} is no longer active, stopping", schedule);
                break;
            }
            Err(e) => {
                error!("Failed to advance countdown: {}", e);
                break;
            }
        }
    }
}
