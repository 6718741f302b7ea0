//! US traffic accident dashboard.
//!
//! The core is UI-free: [`data`] loads the table, [`aggregate`] derives the
//! per-filter summaries, [`chart`] turns them into declarative specs and
//! [`view::Dashboard`] ties them to the Time_of_Day selection. The egui
//! front end lives in the binary.

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod view;
