//! Multi-step student enrollment form: field schema, validation, step
//! navigation, derived fields and lookup prefill.
//!
//! Everything here is synchronous. Network work leaves the controller as
//! [`shared::protocol::BackendCommand`]s and comes back as
//! [`shared::protocol::BackendReply`] events.

pub mod config;
pub mod controller;
pub mod derived;
pub mod form;
pub mod navigation;
pub mod prefill;
pub mod schema;
pub mod validator;

pub use config::{load_settings, Settings, SettingsError};
pub use controller::{ControllerError, Dialog, FormController, FormEvent, FormView};

#[cfg(test)]
#[path = "tests/validator_tests.rs"]
mod validator_tests;

#[cfg(test)]
#[path = "tests/navigation_tests.rs"]
mod navigation_tests;

#[cfg(test)]
#[path = "tests/derived_tests.rs"]
mod derived_tests;

#[cfg(test)]
#[path = "tests/prefill_tests.rs"]
mod prefill_tests;
