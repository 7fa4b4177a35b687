/// Typed failures the core surfaces to callers (spec §7).
///
/// Missing congestion entries, missing transfers, and facility-update rows
/// referencing unknown stations are *not* represented here — they are
/// handled by falling back to defaults or being silently skipped.
#[derive(thiserror::Error, Debug)]
pub enum RouterError {
    #[error("unknown station code: {0}")]
    UnknownStation(String),
    #[error("invalid profile tag: {0}")]
    InvalidProfile(String),
    #[error("inconsistent network data: {0}")]
    InconsistentNetwork(String),
}

pub type RouterResult<T> = Result<T, RouterError>;
