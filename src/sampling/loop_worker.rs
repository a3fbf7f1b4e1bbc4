use std::sync::{Arc, Mutex};

use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use super::scheduler::{apply, IntervalProvider, SampleSink, Sampler};

// Set to true to enable per-tick logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Sample, apply, sleep, repeat until cancelled.
///
/// The interval is asked for again on every pass. The token is checked before each
/// sample and again under the sink lock, and raced against the sleep, so a stop never
/// waits out the remaining interval.
pub(super) async fn sampling_loop(
    name: &'static str,
    sampler: Sampler,
    interval: IntervalProvider,
    sink: Arc<Mutex<SampleSink>>,
    cancel_token: CancellationToken,
) {
    let mut ticks: u64 = 0;
    loop {
        if cancel_token.is_cancelled() {
            break;
        }

        let value = sampler();
        if !apply(&sink, &cancel_token, value) {
            break;
        }
        ticks = ticks.wrapping_add(1);

        let delay = Duration::from_millis(interval());
        log_debug!("[{name}] tick {ticks}: {value:?}, next in {}ms", delay.as_millis());

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = cancel_token.cancelled() => break,
        }
    }
    log_info!("[{name}] sampling loop shutting down after {ticks} ticks");
}
