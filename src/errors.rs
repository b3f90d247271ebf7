use std::time::Duration;

/// Errors that can occur during a race-and-select or fan-out round.
#[derive(thiserror::Error, Debug)]
pub enum DutyError {
    /// No upstream providers were registered.
    #[error("no providers configured")]
    NoProviders,

    /// No provider returned a usable candidate before the hard deadline.
    ///
    /// Individual provider failures are visible via logs and the operation
    /// monitor, never through this value.
    #[error("no candidates received")]
    NoCandidates,

    /// The payload to submit was empty.
    #[error("no payload supplied")]
    EmptyPayload,

    /// No provider accepted the submission within the configured timeout.
    #[error("no successful submissions before timeout ({0:?})")]
    SubmitTimeout(Duration),
}
