//! Idle-tick scheduler.
//!
//! Wakes on a fixed interval until the shutdown channel is closed. Ticks do
//! not mutate anything; with `max_idle_time` configured they report how many
//! entries have been idle longer than that.

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use crossbeam_channel::{Receiver, select, tick};
use tracing::{debug, trace};

use crate::metadata::MetadataMap;

pub(crate) fn run_worker(
    shutdown: Receiver<()>,
    interval: Duration,
    max_idle_time: Option<Duration>,
    metadata: MetadataMap,
) {
    debug!(?interval, "scheduler started");
    let max_idle = max_idle_time.and_then(|idle| TimeDelta::from_std(idle).ok());
    let ticker = tick(interval);

    loop {
        select! {
            recv(shutdown) -> _ => break,
            recv(ticker) -> _ => on_tick(&metadata, max_idle),
        }
    }
    debug!("scheduler terminated");
}

fn on_tick(metadata: &MetadataMap, max_idle: Option<TimeDelta>) {
    let Some(max_idle) = max_idle else {
        trace!("idle tick");
        return;
    };
    let deadline = Utc::now() - max_idle;
    let idle = metadata
        .read()
        .values()
        .filter(|item| item.last_used() < deadline)
        .count();
    trace!(idle, "idle tick");
}
