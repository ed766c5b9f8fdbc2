#![forbid(unsafe_code)]

//! Style primitives for Twiddle.
//!
//! This crate provides:
//! - [`ClassName`] for BEM-style CSS class names under the `tp` prefix
//! - [`Color`] with parsing and formatting for the notations color inputs
//!   accept (`#rgb`, `#rrggbbaa`, `rgb()`, `rgba()`, packed numbers)

pub mod class_name;
pub mod color;

pub use class_name::{CSS_PREFIX, ClassName};
pub use color::{Color, ColorNotation};
