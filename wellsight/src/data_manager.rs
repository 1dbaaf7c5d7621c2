//! Loaded sources and the item catalog derived from them.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use wellsight_common::{
    Error, ItemId, PlotData, Result, SourceEngine, SummarySource, fetch,
};

use crate::filtered::FilteredView;
use crate::text_filter::TextFilter;

/// A catalog position bound to the catalog generation it was issued for.
///
/// Every source-list change followed by a rebuild bumps the generation, so a
/// handle kept across that change is rejected instead of aliasing whatever
/// item now sits at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ItemHandle {
    generation: u64,
    position: usize,
}

impl ItemHandle {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// One row of the item table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRow {
    /// Catalog position; stable drag payload until the next rebuild.
    pub position: usize,
    pub handle: ItemHandle,
    pub name: String,
    pub secondary_name: String,
    pub index: Option<i32>,
}

/// Owns every loaded source and the ordered catalog of their items.
#[derive(Default)]
pub struct DataManager {
    sources: Vec<Box<dyn SummarySource>>,
    catalog: Vec<ItemId>,
    generation: u64,
    /// Set by source-list changes until the next rebuild.
    stale: bool,
    name_filter: TextFilter,
    secondary_filter: TextFilter,
    index_filter: TextFilter,
}

impl DataManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source. The catalog is stale until [`Self::rebuild_catalog`].
    pub fn add_source(&mut self, source: Box<dyn SummarySource>) {
        tracing::info!(source = source.name(), position = self.sources.len(), "Source added");
        self.sources.push(source);
        self.stale = true;
    }

    /// Open a file-based source through the engine and append it.
    pub fn add_from_path(&mut self, engine: &dyn SourceEngine, path: &Path) -> Result<()> {
        let source = engine.open_path(path)?;
        self.add_source(source);
        Ok(())
    }

    /// Connect to a network stream through the engine and append it.
    pub fn add_from_network(&mut self, engine: &dyn SourceEngine, host: &str, port: u16) -> Result<()> {
        let source = engine.connect(host, port)?;
        self.add_source(source);
        Ok(())
    }

    /// Remove a source. Every handle issued so far becomes invalid.
    pub fn remove_source(&mut self, position: usize) -> Result<Box<dyn SummarySource>> {
        if position >= self.sources.len() {
            return Err(Error::SourceOutOfRange {
                position,
                count: self.sources.len(),
            });
        }

        let source = self.sources.remove(position);
        tracing::info!(source = source.name(), position, "Source removed");
        self.stale = true;
        Ok(source)
    }

    /// Recompute the sorted, de-duplicated catalog from all sources.
    pub fn rebuild_catalog(&mut self) {
        let mut items = BTreeSet::new();

        for source in &self.sources {
            for header in source.item_headers() {
                match ItemId::classify(&header) {
                    Ok(item) => {
                        items.insert(item);
                    }
                    Err(e) => {
                        tracing::debug!(source = source.name(), error = %e, "Skipping summary item");
                    }
                }
            }
        }

        self.catalog = items.into_iter().collect();
        self.generation += 1;
        self.stale = false;

        tracing::info!(
            sources = self.sources.len(),
            items = self.catalog.len(),
            generation = self.generation,
            "Catalog rebuilt"
        );
    }

    /// Ask every source for new samples. Returns `true` if any arrived.
    ///
    /// A failing source is logged and skipped so the others still update.
    pub fn refresh(&mut self) -> bool {
        let mut updated = false;
        for source in &mut self.sources {
            match source.refresh() {
                Ok(true) => updated = true,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "Failed to refresh source");
                }
            }
        }
        updated
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn source(&self, position: usize) -> Result<&dyn SummarySource> {
        self.sources
            .get(position)
            .map(|s| &**s)
            .ok_or(Error::SourceOutOfRange {
                position,
                count: self.sources.len(),
            })
    }

    pub fn source_name(&self, position: usize) -> Result<&str> {
        Ok(self.source(position)?.name())
    }

    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.name())
    }

    /// Current catalog generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the source list changed since the last rebuild.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// The full catalog, in order.
    pub fn catalog(&self) -> Result<&[ItemId]> {
        if self.stale {
            return Err(Error::StaleCatalogIndex {
                position: 0,
                generation: self.generation,
            });
        }
        Ok(&self.catalog)
    }

    /// Issue a handle for a catalog position.
    pub fn handle(&self, position: usize) -> Result<ItemHandle> {
        if self.stale || position >= self.catalog.len() {
            return Err(Error::StaleCatalogIndex {
                position,
                generation: self.generation,
            });
        }
        Ok(ItemHandle {
            generation: self.generation,
            position,
        })
    }

    /// Look up the current handle of an item, if it is still in the catalog.
    pub fn find(&self, item: &ItemId) -> Option<ItemHandle> {
        if self.stale {
            return None;
        }
        self.catalog
            .binary_search(item)
            .ok()
            .map(|position| ItemHandle {
                generation: self.generation,
                position,
            })
    }

    pub fn item(&self, handle: ItemHandle) -> Result<&ItemId> {
        if self.stale || handle.generation != self.generation {
            tracing::warn!(
                position = handle.position,
                generation = handle.generation,
                current = self.generation,
                "Stale catalog handle"
            );
            return Err(Error::StaleCatalogIndex {
                position: handle.position,
                generation: handle.generation,
            });
        }
        self.catalog
            .get(handle.position)
            .ok_or(Error::StaleCatalogIndex {
                position: handle.position,
                generation: handle.generation,
            })
    }

    /// Samples of one item in one source.
    pub fn plot_data(&self, source_position: usize, handle: ItemHandle) -> Result<PlotData> {
        let source = self.source(source_position)?;
        let item = self.item(handle)?;
        Ok(fetch(source, item))
    }

    pub fn item_display_name(&self, handle: ItemHandle) -> Result<&str> {
        Ok(self.item(handle)?.display_name())
    }

    pub fn item_qualified_location(&self, handle: ItemHandle) -> Result<String> {
        Ok(self.item(handle)?.qualified_location())
    }

    pub fn item_full_name(&self, source_position: usize, handle: ItemHandle) -> Result<String> {
        let source_name = self.source_name(source_position)?;
        Ok(self.item(handle)?.full_name(source_name))
    }

    pub fn name_equal(&self, a: ItemHandle, b: ItemHandle) -> Result<bool> {
        Ok(self.item(a)?.name_equal(self.item(b)?))
    }

    pub fn set_name_filter(&mut self, pattern: impl Into<String>) {
        self.name_filter.set(pattern);
    }

    pub fn set_secondary_filter(&mut self, pattern: impl Into<String>) {
        self.secondary_filter.set(pattern);
    }

    pub fn set_index_filter(&mut self, pattern: impl Into<String>) {
        self.index_filter.set(pattern);
    }

    pub fn clear_filters(&mut self) {
        self.name_filter.clear();
        self.secondary_filter.clear();
        self.index_filter.clear();
    }

    /// Name, secondary-name and index filters combined.
    pub fn passes_filters(&self, item: &ItemId) -> bool {
        let index = item.index().map(|i| i.to_string()).unwrap_or_default();

        self.name_filter.passes(item.display_name())
            && self
                .secondary_filter
                .passes(item.secondary_name().unwrap_or_default())
            && self.index_filter.passes(&index)
    }

    /// The catalog narrowed by the current filters.
    pub fn filtered(&self) -> Result<FilteredView<'_, ItemId>> {
        let catalog = self.catalog()?;
        Ok(FilteredView::new(catalog, |item| self.passes_filters(item)))
    }

    /// Filtered rows for the item table.
    pub fn rows(&self) -> Result<Vec<ItemRow>> {
        let view = self.filtered()?;
        Ok(view
            .iter()
            .map(|(position, item)| ItemRow {
                position,
                handle: ItemHandle {
                    generation: self.generation,
                    position,
                },
                name: item.display_name().to_string(),
                secondary_name: item.secondary_name().unwrap_or_default().to_string(),
                index: item.index(),
            })
            .collect())
    }
}
