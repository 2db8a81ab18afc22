//! UI Module
//!
//! This module exports the terminal front end of the gym console:
//!
//! - `app`: Application state, key handling and event loop
//! - `forms`: Per-entity form fields and table columns
//! - `views`: Rendering functions for all UI views
//!
//! All backend state lives in [`crate::screens`]; this module only maps
//! keys onto screen operations and draws their state.

mod app;
mod forms;
mod views;

pub use app::{run_app, App};
