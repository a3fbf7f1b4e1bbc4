use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::temperature::SampleValue;

use super::loop_worker::sampling_loop;

pub type Sampler = Arc<dyn Fn() -> SampleValue + Send + Sync>;
pub type IntervalProvider = Arc<dyn Fn() -> u64 + Send + Sync>;
pub type SampleSink = Box<dyn FnMut(SampleValue) + Send>;

/// Restartable periodic sampler.
///
/// One instance drives one loop: sample, hand the value to the sink, sleep for
/// whatever the interval provider says, repeat. The sink is serialised behind a lock
/// so ticks and [`resample_now`](Self::resample_now) never apply concurrently.
pub struct SamplingScheduler {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    sampler: Option<Sampler>,
    sink: Option<Arc<Mutex<SampleSink>>>,
}

impl SamplingScheduler {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handle: None,
            cancel_token: None,
            sampler: None,
            sink: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Spawns the loop on the current tokio runtime. The first sample is taken immediately.
    pub fn start<S, I, O>(&mut self, sampler: S, interval_ms: I, on_sample: O) -> Result<()>
    where
        S: Fn() -> SampleValue + Send + Sync + 'static,
        I: Fn() -> u64 + Send + Sync + 'static,
        O: FnMut(SampleValue) + Send + 'static,
    {
        if self.handle.is_some() {
            bail!("{} scheduler already running", self.name);
        }

        let sampler: Sampler = Arc::new(sampler);
        let interval: IntervalProvider = Arc::new(interval_ms);
        let sink: Arc<Mutex<SampleSink>> = Arc::new(Mutex::new(Box::new(on_sample)));
        let cancel_token = CancellationToken::new();

        let handle = tokio::spawn(sampling_loop(
            self.name,
            sampler.clone(),
            interval,
            sink.clone(),
            cancel_token.clone(),
        ));

        info!("[{}] sampling started", self.name);
        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        self.sampler = Some(sampler);
        self.sink = Some(sink);
        Ok(())
    }

    /// Samples and applies once, outside the loop's cadence, on the caller's thread.
    /// Returns false when the scheduler is not running.
    pub fn resample_now(&self) -> bool {
        let (Some(sampler), Some(sink), Some(token)) =
            (&self.sampler, &self.sink, &self.cancel_token)
        else {
            return false;
        };
        apply(sink, token, sampler())
    }

    /// Cancels the loop and waits for the task to finish. Once this returns the sink
    /// will not be called again. Stopping an idle scheduler is a no-op.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.sampler = None;
        self.sink = None;

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .with_context(|| format!("{} sampling task failed to join", self.name))?;
            info!("[{}] sampling stopped", self.name);
        }
        Ok(())
    }
}

impl Drop for SamplingScheduler {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}

/// Applies `value` unless the token has been cancelled. The cancellation check happens
/// under the sink lock so a concurrent `stop` cannot slip an apply in after it.
pub(super) fn apply(
    sink: &Mutex<SampleSink>,
    cancel_token: &CancellationToken,
    value: SampleValue,
) -> bool {
    let mut on_sample = sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if cancel_token.is_cancelled() {
        return false;
    }
    (*on_sample)(value);
    true
}
