use thiserror::Error;

/// Input failures for schedule operations.
///
/// These are non-fatal: the offending call logs the error and either
/// aborts (returning no handle) or falls back to a default. Nothing is
/// propagated as a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// A bounded repeat was asked to run zero times.
    #[error("invalid iteration count, must be greater than 0")]
    ZeroIterations,

    /// An absolute deadline was supplied where only a period is
    /// meaningful. The caller substitutes the default 1000ms period.
    #[error("absolute deadlines are not supported for repeating timers; using the default period")]
    DeadlineForInterval,
}
