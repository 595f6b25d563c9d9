//! Trigon engine crate.
//!
//! Platform + GPU runtime for the trigon bootstrap: window/event loop,
//! device and surface management, keyboard input tracking, frame timing,
//! shader source loading, and the triangle renderer.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod shader;
