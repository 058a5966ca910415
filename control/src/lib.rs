//! Session sequencing for the tuner, turning button input and pitch
//! detections into actuator moves and display requests.
//!
//! The crate is hardware-agnostic. The firmware binding runs a single
//! cooperative loop and talks to it through plain data:
//!
//! ```text
//!              [ Binding loop ]
//!      (Snapshot) |        A (DesiredOutput)
//!                 V        |
//!             [ Store {State machine} ]
//!                 A        |
//!     (Detection) |        | (cents)
//!                 |        V
//!         [ pluck-dsp ]  [ Controller ]
//! ```
//!
//! Each tick the binding polls the buttons into a [`input::Snapshot`]
//! and applies it. Only when [`store::Store::wants_detection`] says so it
//! acquires one sample window, runs the pitch detector and feeds the
//! [`pluck_dsp::detector::Detection`] back. Finally [`store::Store::tick`]
//! yields the screen to draw and the actuator commands to execute.

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod config;
pub mod controller;
pub mod input;
mod log;
pub mod note;
pub mod output;
pub mod profile;
pub mod resolver;
pub mod sequence;
pub mod statistics;
pub mod store;
