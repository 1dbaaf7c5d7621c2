use std::path::PathBuf;

use crate::data_manager::ItemHandle;
use crate::view::chart::YAxis;

/// Messages for the WellSight application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// User opened a summary file.
    AddFromPath(PathBuf),

    /// User connected to a running simulation.
    AddFromNetwork { host: String, port: u16 },

    /// User closed a source.
    RemoveSource(usize),

    /// Periodic pull of new samples from every source.
    Refresh,

    // Item table filters
    SetNameFilter(String),
    SetSecondaryFilter(String),
    SetIndexFilter(String),
    ClearFilters,

    /// An item table row was dropped on an axis. `handle` is the row's
    /// handle carried by the drag; it is refused once the catalog changes.
    DropItem {
        handle: ItemHandle,
        axis: YAxis,
        append: bool,
    },

    /// User asked to delete a legend entry.
    DeleteSlot { axis: YAxis, slot: usize },

    /// User cleared the chart.
    ResetChart,
}
