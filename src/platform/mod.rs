//! Platform abstraction layer
//!
//! Turns browser events into simulation input. Kept free of `web_sys` types so
//! it can be driven (and tested) natively.

pub mod input;

pub use input::KeyboardState;
