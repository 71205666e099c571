//! Keeping the local ticket view in step with the server
//!
//! - [`Fingerprint`] detects whether two snapshots differ
//! - [`Cadence`] decides how long to wait between polls
//! - [`Poller`] drives fetches on a self-tuning timer

mod cadence;
mod fingerprint;
mod poller;

pub use cadence::{Activity, Cadence};
pub use fingerprint::{Fingerprint, snapshots_equal};
pub use poller::{FetchFuture, Poller, PollerBuilder};
