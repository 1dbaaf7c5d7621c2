//! WellSight - Interactive viewer core for reservoir simulation summaries.
//!
//! This library exposes the viewer state without any rendering, so it can be
//! driven by a GUI, the bundled CLI, or tests.

pub mod app;
pub mod args;
pub mod data_manager;
pub mod demo;
pub mod filtered;
pub mod message;
pub mod mock;
pub mod text_filter;
pub mod view;

// Re-export commonly used types
pub use app::WellSight;
pub use data_manager::{DataManager, ItemHandle, ItemRow};
pub use filtered::FilteredView;
pub use message::Message;
pub use view::chart::{ChartFrame, ChartState, YAxis};
pub use view::readout::{Readout, locate, nearest_sample};
