//! GUI module
//!
//! This module provides a native Rust GUI using egui/eframe.

mod app;
mod board_view;
mod theme;

pub use app::KinrowApp;
pub use board_view::notation;
