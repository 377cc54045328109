//! Pure color core for the tinct widget kit.
//!
//! Holds the dual HSV/RGB color model, color-string parsing, channel-wise
//! mixing and the gradient-stop model the widgets are built on. This crate
//! has no Bevy dependency so the math can be exercised headless.

mod color;
mod gradient;
mod parse;

pub use color::{Hsva, Rgba, clamp01};
pub use gradient::{ColorStop, GradientKind, color_at, css_string, default_stops, find_range, sorted_by_position};
pub use parse::{ParseColorError, parse};
