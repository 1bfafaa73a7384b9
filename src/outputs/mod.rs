//! Output writers for the discovery run.
//!
//! The filtered report registry is handed downstream as a JSON snapshot;
//! see [`json`] for the layout.

pub mod json;
