//! Core library for the irregular-flight-operations notifier.

pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod policy;
pub mod source;
pub mod storage;

pub use config::Config;
pub use error::{FetchError, NotifyError, ParseError, StateSaveError};
pub use model::{AirportEntry, FlightInfo, Snapshot};
pub use policy::{Action, Decision, decide, has_changed, normalize};
pub use source::{AirlineSource, Parsed};
pub use storage::StateStore;
