//! Abstraction of the device's buttons.

pub mod button;
pub mod snapshot;
pub mod store;

pub use button::{Button, Press};
pub use snapshot::Snapshot;
pub use store::{Events, Store};
