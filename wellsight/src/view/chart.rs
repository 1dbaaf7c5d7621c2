//! Chart axis assignment.
//!
//! The chart has two Y axes with four slots each. Items dropped on an axis
//! either replace everything on it or, when appending, join the items
//! already there provided they share the same keyword.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use wellsight_common::{ChartConfig, Error, ItemId, PlotData, Result};

use crate::data_manager::{DataManager, ItemHandle};

/// Number of Y axes.
pub const AXIS_COUNT: usize = 2;

/// Item slots on each axis.
pub const SLOTS_PER_AXIS: usize = 4;

/// A Y axis of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YAxis {
    Left,
    Right,
}

impl YAxis {
    pub fn index(&self) -> usize {
        match self {
            YAxis::Left => 0,
            YAxis::Right => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(YAxis::Left),
            1 => Some(YAxis::Right),
            _ => None,
        }
    }

    /// Get all axes, left first.
    pub fn all() -> &'static [YAxis] {
        &[YAxis::Left, YAxis::Right]
    }
}

impl fmt::Display for YAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YAxis::Left => write!(f, "left"),
            YAxis::Right => write!(f, "right"),
        }
    }
}

/// An occupied slot: the item identity plus its handle in the current catalog.
#[derive(Debug, Clone)]
struct AxisItem {
    handle: ItemHandle,
    id: ItemId,
}

/// What the chart shows.
#[derive(Debug)]
pub struct ChartState {
    axes: [[Option<AxisItem>; SLOTS_PER_AXIS]; AXIS_COUNT],
    /// Axis limits must be recomputed on the next frame.
    needs_refit: bool,
    /// Catalog generation the stored handles belong to.
    generation: u64,
    /// Timestamp (ms) of the last accepted slot deletion.
    last_deletion: Option<i64>,
    delete_debounce_ms: i64,
    /// Monotonic origin for [`Self::request_delete`].
    started: Instant,
}

impl Default for ChartState {
    fn default() -> Self {
        Self::new(&ChartConfig::default())
    }
}

impl ChartState {
    /// Create an empty chart.
    pub fn new(config: &ChartConfig) -> Self {
        Self {
            axes: Default::default(),
            needs_refit: true,
            generation: 0,
            last_deletion: None,
            delete_debounce_ms: config.delete_debounce_ms,
            started: Instant::now(),
        }
    }

    /// Put an item on an axis.
    ///
    /// Without `append`, or on an empty axis, the item replaces everything
    /// on the axis. With `append`, it must share its keyword with the items
    /// already there and a slot must be free. A rejected assignment leaves
    /// the chart untouched.
    pub fn try_assign(
        &mut self,
        data: &DataManager,
        handle: ItemHandle,
        axis: YAxis,
        append: bool,
    ) -> Result<()> {
        self.sync(data);
        let id = data.item(handle)?.clone();

        let slots = &mut self.axes[axis.index()];
        let first = slots.iter().flatten().next().map(|slot| slot.id.clone());

        match first {
            Some(first) if append => {
                if !first.name_equal(&id) {
                    return Err(Error::rejected(
                        axis,
                        format!(
                            "{} does not match {} already on the axis",
                            id.display_name(),
                            first.display_name()
                        ),
                    ));
                }

                let free = slots.iter().position(Option::is_none).ok_or_else(|| {
                    Error::rejected(axis, format!("all {} slots are in use", SLOTS_PER_AXIS))
                })?;

                tracing::debug!(%axis, slot = free, item = %id, "Appending item");
                slots[free] = Some(AxisItem { handle, id });
            }
            _ => {
                tracing::debug!(%axis, item = %id, "Replacing axis items");
                *slots = Default::default();
                slots[0] = Some(AxisItem { handle, id });
            }
        }

        self.needs_refit = true;
        Ok(())
    }

    /// [`Self::try_assign`], reporting only whether the item was placed.
    pub fn assign(
        &mut self,
        data: &DataManager,
        handle: ItemHandle,
        axis: YAxis,
        append: bool,
    ) -> bool {
        match self.try_assign(data, handle, axis, append) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(%axis, append, error = %e, "Assignment rejected");
                false
            }
        }
    }

    /// Clear one slot at time `now_ms`.
    ///
    /// Accepted only if the slot is occupied and at least the debounce
    /// interval has passed since the last accepted deletion. A `now_ms`
    /// earlier than the last deletion restarts the window. Remaining items
    /// keep their slots.
    pub fn delete_slot(&mut self, axis: YAxis, slot: usize, now_ms: i64) -> bool {
        let Some(entry) = self.axes[axis.index()].get_mut(slot) else {
            tracing::warn!(%axis, slot, "No such chart slot");
            return false;
        };
        if entry.is_none() {
            return false;
        }

        if let Some(last) = self.last_deletion
            && (last..last + self.delete_debounce_ms).contains(&now_ms)
        {
            tracing::warn!(%axis, slot, elapsed_ms = now_ms - last, "Deletion ignored");
            return false;
        }

        *entry = None;
        self.last_deletion = Some(now_ms);
        self.needs_refit = true;
        true
    }

    /// Clear one slot now, timed on the chart's monotonic clock.
    pub fn request_delete(&mut self, axis: YAxis, slot: usize) -> bool {
        let now_ms = self.started.elapsed().as_millis() as i64;
        self.delete_slot(axis, slot, now_ms)
    }

    /// Empty both axes.
    pub fn reset(&mut self) {
        self.axes = Default::default();
        self.needs_refit = true;
    }

    pub fn is_empty(&self) -> bool {
        self.axes.iter().flatten().all(Option::is_none)
    }

    /// Number of occupied slots on an axis.
    pub fn item_count(&self, axis: YAxis) -> usize {
        self.axes[axis.index()].iter().flatten().count()
    }

    pub fn slot(&self, axis: YAxis, slot: usize) -> Option<&ItemId> {
        self.axes[axis.index()]
            .get(slot)?
            .as_ref()
            .map(|item| &item.id)
    }

    /// Occupied slots of an axis as `(slot, item)`.
    pub fn items(&self, axis: YAxis) -> impl Iterator<Item = (usize, &ItemId)> {
        self.axes[axis.index()]
            .iter()
            .enumerate()
            .filter_map(|(slot, item)| item.as_ref().map(|item| (slot, &item.id)))
    }

    pub fn needs_refit(&self) -> bool {
        self.needs_refit
    }

    /// Axis label: the qualified location of a lone item, the shared
    /// keyword of several, nothing for an empty axis.
    pub fn label(&self, axis: YAxis) -> Option<String> {
        let mut items = self.axes[axis.index()].iter().flatten();
        let first = items.next()?;
        match items.next() {
            None => Some(first.id.qualified_location()),
            Some(_) => Some(first.id.display_name().to_string()),
        }
    }

    /// Bring the chart in line with the data manager.
    ///
    /// Clears the chart once every source is gone. After a catalog rebuild,
    /// re-resolves each slot by identity and drops items that vanished.
    pub fn sync(&mut self, data: &DataManager) {
        if data.is_empty() && !self.is_empty() {
            tracing::info!("No sources left, resetting chart");
            self.reset();
        }

        if data.is_stale() || data.generation() == self.generation {
            return;
        }

        let mut removed = 0;
        for slot in self.axes.iter_mut().flatten() {
            let Some(item) = slot.as_mut() else {
                continue;
            };
            match data.find(&item.id) {
                Some(handle) => item.handle = handle,
                None => {
                    tracing::debug!(item = %item.id, "Item left the catalog");
                    *slot = None;
                    removed += 1;
                }
            }
        }

        if removed > 0 {
            self.needs_refit = true;
        }
        self.generation = data.generation();
    }

    /// One series per occupied slot per source, left axis first.
    pub fn series(&self, data: &DataManager) -> Result<Vec<SeriesFrame>> {
        let mut series = Vec::new();
        for &axis in YAxis::all() {
            for (slot, item) in self.axes[axis.index()].iter().enumerate() {
                let Some(item) = item else {
                    continue;
                };
                for source in 0..data.source_count() {
                    series.push(SeriesFrame {
                        axis,
                        slot,
                        source,
                        name: data.item_full_name(source, item.handle)?,
                        data: data.plot_data(source, item.handle)?,
                    });
                }
            }
        }
        Ok(series)
    }

    /// Produce everything needed to draw the chart, clearing the refit flag.
    pub fn frame(&mut self, data: &DataManager) -> Result<ChartFrame> {
        self.sync(data);
        let series = self.series(data)?;

        let axes = [YAxis::Left, YAxis::Right].map(|axis| AxisFrame {
            label: self.label(axis),
            is_empty: self.item_count(axis) == 0,
        });

        Ok(ChartFrame {
            axes,
            series,
            refit: std::mem::take(&mut self.needs_refit),
        })
    }
}

/// Axis decoration for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisFrame {
    pub label: Option<String>,
    /// Empty axes are drawn without ticks.
    pub is_empty: bool,
}

/// One plotted line: an item from one slot in one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesFrame {
    pub axis: YAxis,
    pub slot: usize,
    pub source: usize,
    /// Legend entry, e.g. `"BASE: WOPR @ P1"`.
    pub name: String,
    pub data: PlotData,
}

/// Render input for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFrame {
    pub axes: [AxisFrame; AXIS_COUNT],
    pub series: Vec<SeriesFrame>,
    /// Fit axis limits to the data this frame.
    pub refit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{self, MemorySource};

    fn manager(sources: Vec<MemorySource>) -> DataManager {
        let mut data = DataManager::new();
        for source in sources {
            data.add_source(Box::new(source));
        }
        data.rebuild_catalog();
        data
    }

    /// Five producers so an axis can be filled with one keyword.
    fn five_wells() -> MemorySource {
        let mut source = MemorySource::new("FIVE", vec![0, 10]);
        for well in ["P1", "P2", "P3", "P4", "P5"] {
            source = source.with_item("WOPR", well, 0, vec![1.0, 2.0]);
        }
        source.with_item("WWCT", "P1", 0, vec![0.0, 0.1])
    }

    fn handle(data: &DataManager, item: ItemId) -> ItemHandle {
        data.find(&item).unwrap()
    }

    #[test]
    fn test_axis_index_roundtrip() {
        for &axis in YAxis::all() {
            assert_eq!(YAxis::from_index(axis.index()), Some(axis));
        }
        assert_eq!(YAxis::from_index(2), None);
        assert_eq!(YAxis::Right.to_string(), "right");
    }

    #[test]
    fn test_new_chart_is_empty() {
        let chart = ChartState::default();
        assert!(chart.is_empty());
        assert!(chart.needs_refit());
        assert_eq!(chart.label(YAxis::Left), None);
    }

    #[test]
    fn test_replace_clears_other_slots() {
        let data = manager(vec![five_wells()]);
        let mut chart = ChartState::default();

        for well in ["P1", "P2", "P3"] {
            assert!(chart.assign(&data, handle(&data, ItemId::well("WOPR", well)), YAxis::Left, true));
        }
        assert_eq!(chart.item_count(YAxis::Left), 3);

        chart.frame(&data).unwrap();
        assert!(!chart.needs_refit());

        let wwct = handle(&data, ItemId::well("WWCT", "P1"));
        assert!(chart.assign(&data, wwct, YAxis::Left, false));
        assert_eq!(chart.item_count(YAxis::Left), 1);
        assert_eq!(chart.slot(YAxis::Left, 0), Some(&ItemId::well("WWCT", "P1")));
        assert!(chart.needs_refit());
    }

    #[test]
    fn test_append_on_empty_axis_replaces() {
        let data = manager(vec![five_wells()]);
        let mut chart = ChartState::default();

        let p3 = handle(&data, ItemId::well("WOPR", "P3"));
        assert!(chart.assign(&data, p3, YAxis::Right, true));
        assert_eq!(chart.slot(YAxis::Right, 0), Some(&ItemId::well("WOPR", "P3")));
        assert_eq!(chart.item_count(YAxis::Left), 0);
    }

    #[test]
    fn test_append_name_mismatch_rejected() {
        let data = manager(vec![five_wells()]);
        let mut chart = ChartState::default();

        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P1")), YAxis::Left, false);
        chart.frame(&data).unwrap();

        let wwct = handle(&data, ItemId::well("WWCT", "P1"));
        let result = chart.try_assign(&data, wwct, YAxis::Left, true);
        assert!(matches!(result, Err(Error::AxisAssignRejected { ref axis, .. }) if axis == "left"));

        assert_eq!(chart.item_count(YAxis::Left), 1);
        assert_eq!(chart.slot(YAxis::Left, 0), Some(&ItemId::well("WOPR", "P1")));
        assert!(!chart.needs_refit());
    }

    #[test]
    fn test_append_fills_first_free_slot() {
        let data = manager(vec![five_wells()]);
        let mut chart = ChartState::default();

        for well in ["P1", "P2", "P3"] {
            chart.assign(&data, handle(&data, ItemId::well("WOPR", well)), YAxis::Left, true);
        }
        assert!(chart.delete_slot(YAxis::Left, 1, 1_000));

        let p4 = handle(&data, ItemId::well("WOPR", "P4"));
        assert!(chart.assign(&data, p4, YAxis::Left, true));
        assert_eq!(chart.slot(YAxis::Left, 1), Some(&ItemId::well("WOPR", "P4")));
        assert_eq!(chart.slot(YAxis::Left, 2), Some(&ItemId::well("WOPR", "P3")));
    }

    #[test]
    fn test_append_into_full_axis_rejected() {
        let data = manager(vec![five_wells()]);
        let mut chart = ChartState::default();

        for well in ["P1", "P2", "P3", "P4"] {
            assert!(chart.assign(&data, handle(&data, ItemId::well("WOPR", well)), YAxis::Left, true));
        }

        let p5 = handle(&data, ItemId::well("WOPR", "P5"));
        let result = chart.try_assign(&data, p5, YAxis::Left, true);
        assert!(matches!(result, Err(Error::AxisAssignRejected { .. })));
        assert_eq!(chart.item_count(YAxis::Left), SLOTS_PER_AXIS);
        assert!(chart.items(YAxis::Left).all(|(_, id)| id.secondary_name() != Some("P5")));
    }

    #[test]
    fn test_append_compares_with_first_occupied_slot() {
        let data = manager(vec![five_wells()]);
        let mut chart = ChartState::default();

        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P1")), YAxis::Left, false);
        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P2")), YAxis::Left, true);
        assert!(chart.delete_slot(YAxis::Left, 0, 0));

        let wwct = handle(&data, ItemId::well("WWCT", "P1"));
        assert!(!chart.assign(&data, wwct, YAxis::Left, true));
        let p3 = handle(&data, ItemId::well("WOPR", "P3"));
        assert!(chart.assign(&data, p3, YAxis::Left, true));
        assert_eq!(chart.slot(YAxis::Left, 0), Some(&ItemId::well("WOPR", "P3")));
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut data = manager(vec![five_wells()]);
        let mut chart = ChartState::default();
        let p1 = handle(&data, ItemId::well("WOPR", "P1"));

        data.add_source(Box::new(mock::reservoir::two_wells("BASE")));
        data.rebuild_catalog();

        let result = chart.try_assign(&data, p1, YAxis::Left, false);
        assert!(matches!(result, Err(Error::StaleCatalogIndex { .. })));
        assert!(chart.is_empty());
    }

    #[test]
    fn test_delete_debounce() {
        let data = manager(vec![five_wells()]);
        let mut chart = ChartState::default();
        for well in ["P1", "P2", "P3"] {
            chart.assign(&data, handle(&data, ItemId::well("WOPR", well)), YAxis::Left, true);
        }

        assert!(chart.delete_slot(YAxis::Left, 0, 5_000));
        // Too soon after the previous deletion.
        assert!(!chart.delete_slot(YAxis::Left, 1, 5_050));
        assert_eq!(chart.item_count(YAxis::Left), 2);
        assert!(chart.delete_slot(YAxis::Left, 1, 5_100));
        assert_eq!(chart.item_count(YAxis::Left), 1);
    }

    #[test]
    fn test_delete_after_clock_went_back() {
        let data = manager(vec![five_wells()]);
        let mut chart = ChartState::default();
        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P1")), YAxis::Left, true);
        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P2")), YAxis::Left, true);

        assert!(chart.delete_slot(YAxis::Left, 0, 1_000));
        assert!(chart.delete_slot(YAxis::Left, 1, 0));
        assert!(chart.is_empty());
    }

    #[test]
    fn test_delete_empty_or_missing_slot() {
        let data = manager(vec![five_wells()]);
        let mut chart = ChartState::default();
        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P1")), YAxis::Left, false);

        assert!(!chart.delete_slot(YAxis::Left, 3, 0));
        assert!(!chart.delete_slot(YAxis::Left, SLOTS_PER_AXIS, 0));
        // Rejected attempts do not start the debounce window.
        assert!(chart.delete_slot(YAxis::Left, 0, 10));
        assert!(chart.is_empty());
    }

    #[test]
    fn test_configured_debounce() {
        let data = manager(vec![five_wells()]);
        let mut chart = ChartState::new(&ChartConfig {
            delete_debounce_ms: 0,
        });
        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P1")), YAxis::Left, true);
        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P2")), YAxis::Left, true);

        assert!(chart.delete_slot(YAxis::Left, 0, 7));
        assert!(chart.delete_slot(YAxis::Left, 1, 7));
    }

    #[test]
    fn test_request_delete_uses_clock() {
        let data = manager(vec![five_wells()]);
        let mut chart = ChartState::default();
        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P1")), YAxis::Right, false);
        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P2")), YAxis::Right, true);
        assert!(chart.request_delete(YAxis::Right, 0));
        // Straight after, still inside the window.
        assert!(!chart.request_delete(YAxis::Right, 1));
        assert_eq!(chart.item_count(YAxis::Right), 1);
    }

    #[test]
    fn test_labels_follow_slots() {
        let data = manager(vec![five_wells()]);
        let mut chart = ChartState::default();

        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P1")), YAxis::Left, false);
        assert_eq!(chart.label(YAxis::Left).as_deref(), Some("WOPR @ P1"));

        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P2")), YAxis::Left, true);
        assert_eq!(chart.label(YAxis::Left).as_deref(), Some("WOPR"));

        chart.delete_slot(YAxis::Left, 0, 0);
        assert_eq!(chart.label(YAxis::Left).as_deref(), Some("WOPR @ P2"));
        assert_eq!(chart.slot(YAxis::Left, 0), None);

        chart.reset();
        assert_eq!(chart.label(YAxis::Left), None);
    }

    #[test]
    fn test_reset_when_sources_removed() {
        let mut data = manager(vec![five_wells()]);
        let mut chart = ChartState::default();
        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P1")), YAxis::Left, false);
        chart.frame(&data).unwrap();

        data.remove_source(0).unwrap();
        data.rebuild_catalog();
        chart.sync(&data);

        assert!(chart.is_empty());
        assert!(chart.needs_refit());
    }

    #[test]
    fn test_sync_remaps_after_rebuild() {
        let mut data = manager(vec![five_wells()]);
        let mut chart = ChartState::default();
        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P2")), YAxis::Left, false);
        chart.assign(&data, handle(&data, ItemId::well("WWCT", "P1")), YAxis::Right, false);

        // Adds items sorting before WOPR, shifting catalog positions.
        data.add_source(Box::new(mock::reservoir::two_wells("BASE")));
        data.rebuild_catalog();

        let frame = chart.frame(&data).unwrap();
        assert_eq!(chart.slot(YAxis::Left, 0), Some(&ItemId::well("WOPR", "P2")));
        assert_eq!(frame.series.len(), 4);
        assert_eq!(frame.series[0].name, "FIVE: WOPR @ P2");
        assert_eq!(frame.series[1].name, "BASE: WOPR @ P2");

        // FIVE still carries both items.
        data.remove_source(1).unwrap();
        data.rebuild_catalog();
        chart.sync(&data);
        assert_eq!(chart.item_count(YAxis::Left), 1);
        assert_eq!(chart.item_count(YAxis::Right), 1);
    }

    #[test]
    fn test_sync_drops_vanished_items() {
        let mut data = manager(vec![five_wells(), mock::reservoir::two_wells("BASE")]);
        let mut chart = ChartState::default();
        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P5")), YAxis::Left, false);
        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P1")), YAxis::Left, true);
        chart.frame(&data).unwrap();

        data.remove_source(0).unwrap();
        data.rebuild_catalog();
        chart.sync(&data);

        assert_eq!(chart.slot(YAxis::Left, 0), None);
        assert_eq!(chart.slot(YAxis::Left, 1), Some(&ItemId::well("WOPR", "P1")));
        assert!(chart.needs_refit());
    }

    #[test]
    fn test_frame_series_and_refit() {
        let data = manager(vec![mock::reservoir::two_wells("BASE"), mock::reservoir::water_flood("WF")]);
        let mut chart = ChartState::default();

        chart.assign(&data, handle(&data, ItemId::well("WOPR", "P1")), YAxis::Left, false);
        chart.assign(&data, handle(&data, ItemId::well("WBHP", "I1")), YAxis::Right, false);

        let frame = chart.frame(&data).unwrap();
        assert!(frame.refit);
        assert_eq!(frame.series.len(), 4);
        assert_eq!(frame.axes[0].label.as_deref(), Some("WOPR @ P1"));
        assert_eq!(frame.axes[1].label.as_deref(), Some("WBHP @ I1"));
        assert!(!frame.axes[0].is_empty);

        let wopr_base = &frame.series[0];
        assert_eq!((wopr_base.axis, wopr_base.slot, wopr_base.source), (YAxis::Left, 0, 0));
        assert_eq!(wopr_base.data.len(), 4);
        // WF has no P1.
        assert!(frame.series[1].data.is_empty());

        let frame = chart.frame(&data).unwrap();
        assert!(!frame.refit);
    }
}
