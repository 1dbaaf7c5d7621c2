//! WellSight application state.

use wellsight_common::{Result, SourceEngine, SourceSpec, SummarySource, ViewerConfig};

use crate::data_manager::{DataManager, ItemHandle, ItemRow};
use crate::message::Message;
use crate::view::chart::{ChartFrame, ChartState, YAxis};
use crate::view::readout::{Readout, locate};

/// The main WellSight application.
pub struct WellSight {
    /// Loaded sources and the item catalog.
    data: DataManager,
    /// Axis assignments.
    chart: ChartState,
    /// Opens files and network streams.
    engine: Box<dyn SourceEngine>,
    /// Most recent failure, shown in the status bar.
    last_error: Option<String>,
}

impl WellSight {
    pub fn new(engine: Box<dyn SourceEngine>, config: &ViewerConfig) -> Self {
        Self {
            data: DataManager::new(),
            chart: ChartState::new(&config.chart),
            engine,
            last_error: None,
        }
    }

    /// Open every configured source, in order.
    pub fn open_sources(&mut self, specs: &[SourceSpec]) {
        for spec in specs {
            let message = match spec {
                SourceSpec::Path { path } => Message::AddFromPath(path.clone()),
                SourceSpec::Network { host, port } => Message::AddFromNetwork {
                    host: host.clone(),
                    port: *port,
                },
            };
            self.update(message);
        }
    }

    /// Add an already opened source.
    pub fn add_source(&mut self, source: Box<dyn SummarySource>) {
        self.data.add_source(source);
        self.sources_changed();
    }

    /// Get the window title.
    pub fn title(&self) -> String {
        match self.data.source_count() {
            0 => "WellSight".to_string(),
            1 => "WellSight - 1 source".to_string(),
            n => format!("WellSight - {} sources", n),
        }
    }

    /// Handle incoming messages.
    pub fn update(&mut self, message: Message) {
        let result = match message {
            Message::AddFromPath(path) => self
                .data
                .add_from_path(self.engine.as_ref(), &path)
                .map(|()| self.sources_changed()),

            Message::AddFromNetwork { host, port } => self
                .data
                .add_from_network(self.engine.as_ref(), &host, port)
                .map(|()| self.sources_changed()),

            Message::RemoveSource(position) => self
                .data
                .remove_source(position)
                .map(|_| self.sources_changed()),

            Message::Refresh => {
                self.data.refresh();
                Ok(())
            }

            Message::SetNameFilter(pattern) => {
                self.data.set_name_filter(pattern);
                Ok(())
            }

            Message::SetSecondaryFilter(pattern) => {
                self.data.set_secondary_filter(pattern);
                Ok(())
            }

            Message::SetIndexFilter(pattern) => {
                self.data.set_index_filter(pattern);
                Ok(())
            }

            Message::ClearFilters => {
                self.data.clear_filters();
                Ok(())
            }

            Message::DropItem {
                handle,
                axis,
                append,
            } => self.drop_item(handle, axis, append),

            Message::DeleteSlot { axis, slot } => {
                self.chart.request_delete(axis, slot);
                Ok(())
            }

            Message::ResetChart => {
                self.chart.reset();
                Ok(())
            }
        };

        match result {
            Ok(()) => self.last_error = None,
            Err(e) => {
                tracing::warn!(error = %e, "Action failed");
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// A stale handle is a failure; an incompatible drop is a quiet no-op.
    fn drop_item(&mut self, handle: ItemHandle, axis: YAxis, append: bool) -> Result<()> {
        self.data.item(handle)?;
        self.chart.assign(&self.data, handle, axis, append);
        Ok(())
    }

    /// Rebuild the catalog and re-resolve the chart before anything reads
    /// a catalog position again.
    fn sources_changed(&mut self) {
        self.data.rebuild_catalog();
        self.chart.sync(&self.data);
    }

    pub fn data(&self) -> &DataManager {
        &self.data
    }

    pub fn chart(&self) -> &ChartState {
        &self.chart
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Filtered item table.
    pub fn rows(&self) -> Result<Vec<ItemRow>> {
        self.data.rows()
    }

    /// Render input for the chart.
    pub fn frame(&mut self) -> Result<ChartFrame> {
        self.chart.frame(&self.data)
    }

    /// Values under a cursor placed at `cursor` (Unix milliseconds).
    pub fn readout(&self, cursor: i64) -> Result<Vec<Readout>> {
        let series = self.chart.series(&self.data)?;
        Ok(locate(cursor, &series))
    }
}
