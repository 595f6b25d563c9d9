//! Platform event translation.

mod winit;

pub(crate) use winit::translate_window_event;
