mod loop_worker;
pub mod scheduler;

pub use scheduler::{IntervalProvider, SampleSink, Sampler, SamplingScheduler};
