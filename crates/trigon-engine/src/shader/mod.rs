//! Shader source loading and checked compilation.
//!
//! Sources are plain WGSL text files read from disk at load time. Module
//! creation runs inside a wgpu validation error scope so compile errors are
//! reported instead of panicking through the uncaptured-error handler.

mod source;

pub use source::{create_module, load_source};
