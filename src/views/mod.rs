//! Rendering: `screen` picks what to show, `html` draws it.

pub mod html;
pub mod screen;
