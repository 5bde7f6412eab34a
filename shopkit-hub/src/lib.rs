//! Client for the licensing Hub.
//!
//! The Hub is the remote authority that issues and renews signed license
//! tokens. This crate speaks its activation API: one `POST
//! /licenses/activate` call used identically for first activation and for
//! renewal. Calls carry an explicit timeout and are never retried here;
//! the renewal scheduler's next tick is the retry mechanism.

mod client;
mod error;
mod protocol;

pub use client::{HubClient, HubConfig};
pub use error::{HubError, HubResult};
pub use protocol::{ActivateRequest, ActivateResponse};
