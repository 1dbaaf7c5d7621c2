//! Boundary to the simulation-data engine.
//!
//! The engine owns file parsing, network streaming and units. The viewer only
//! needs the operations below: list the headers a source carries, pull new
//! samples, and query one series by its qualifier-specific fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::item::{ItemId, Qualifier, RawItemHeader};

/// One loaded dataset with its own time base.
///
/// Query operations return `None` when the source has no such series.
pub trait SummarySource {
    /// Display name (file stem or `host:port`).
    fn name(&self) -> &str;

    /// Pull newly available samples. Returns `true` if any arrived.
    fn refresh(&mut self) -> Result<bool>;

    /// Every header this source carries, unclassified.
    fn item_headers(&self) -> Vec<RawItemHeader>;

    /// Report timestamps in Unix epoch milliseconds, ascending.
    fn timestamps(&self) -> &[i64];

    fn time_item(&self, name: &str) -> Option<&[f64]>;

    fn performance_item(&self, name: &str) -> Option<&[f64]>;

    fn field_item(&self, name: &str) -> Option<&[f64]>;

    fn aquifer_item(&self, name: &str, index: i32) -> Option<&[f64]>;

    fn region_item(&self, name: &str, index: i32) -> Option<&[f64]>;

    fn cross_region_item(&self, name: &str, index: i32) -> Option<&[f64]>;

    fn well_item(&self, name: &str, well: &str) -> Option<&[f64]>;

    fn completion_item(&self, name: &str, well: &str, index: i32) -> Option<&[f64]>;

    fn group_item(&self, name: &str, group: &str) -> Option<&[f64]>;

    fn block_item(&self, name: &str, index: i32) -> Option<&[f64]>;
}

/// Opens sources. Implemented by whatever engine backs the viewer.
pub trait SourceEngine {
    fn open_path(&self, path: &Path) -> Result<Box<dyn SummarySource>>;

    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn SummarySource>>;
}

/// Samples of one item in one source, ready for drawing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    /// Unix epoch milliseconds, ascending.
    pub timestamps: Vec<i64>,
    /// One value per timestamp.
    pub values: Vec<f64>,
}

impl PlotData {
    /// Pair timestamps with values, truncating to the shorter of the two.
    pub fn new(timestamps: &[i64], values: &[f64]) -> Self {
        let len = timestamps.len().min(values.len());
        Self {
            timestamps: timestamps[..len].to_vec(),
            values: values[..len].to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Iterate over `(timestamp, value)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.timestamps.iter().copied().zip(self.values.iter().copied())
    }
}

/// Query a source for one item, passing exactly the fields its qualifier needs.
///
/// A source that does not carry the item yields an empty series.
pub fn fetch(source: &dyn SummarySource, item: &ItemId) -> PlotData {
    let name = item.name.as_str();
    let values = match &item.qualifier {
        Qualifier::Time => source.time_item(name),
        Qualifier::Performance => source.performance_item(name),
        Qualifier::Field => source.field_item(name),
        Qualifier::Aquifer { index } => source.aquifer_item(name, *index),
        Qualifier::Region { index, .. } => source.region_item(name, *index),
        Qualifier::CrossRegionFlow { index } => source.cross_region_item(name, *index),
        Qualifier::Well { well } => source.well_item(name, well),
        Qualifier::Completion { well, index } => source.completion_item(name, well, *index),
        Qualifier::Group { group } => source.group_item(name, group),
        Qualifier::Block { index } => source.block_item(name, *index),
    };

    match values {
        Some(values) => PlotData::new(source.timestamps(), values),
        None => {
            tracing::trace!(source = source.name(), item = %item, "Item not present in source");
            PlotData::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records which query was dispatched and with which arguments.
    struct Recorder {
        calls: RefCell<Vec<String>>,
        timestamps: Vec<i64>,
        values: Vec<f64>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                timestamps: vec![0, 10, 20],
                values: vec![1.0, 2.0, 3.0],
            }
        }

        fn record(&self, call: String) -> Option<&[f64]> {
            self.calls.borrow_mut().push(call);
            Some(self.values.as_slice())
        }

        fn last_call(&self) -> String {
            self.calls.borrow().last().cloned().unwrap_or_default()
        }
    }

    impl SummarySource for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }
        fn refresh(&mut self) -> Result<bool> {
            Ok(false)
        }
        fn item_headers(&self) -> Vec<RawItemHeader> {
            Vec::new()
        }
        fn timestamps(&self) -> &[i64] {
            &self.timestamps
        }
        fn time_item(&self, name: &str) -> Option<&[f64]> {
            self.record(format!("time {name}"))
        }
        fn performance_item(&self, name: &str) -> Option<&[f64]> {
            self.record(format!("performance {name}"))
        }
        fn field_item(&self, name: &str) -> Option<&[f64]> {
            self.record(format!("field {name}"))
        }
        fn aquifer_item(&self, name: &str, index: i32) -> Option<&[f64]> {
            self.record(format!("aquifer {name} {index}"))
        }
        fn region_item(&self, name: &str, index: i32) -> Option<&[f64]> {
            self.record(format!("region {name} {index}"))
        }
        fn cross_region_item(&self, name: &str, index: i32) -> Option<&[f64]> {
            self.record(format!("cross_region {name} {index}"))
        }
        fn well_item(&self, name: &str, well: &str) -> Option<&[f64]> {
            self.record(format!("well {name} {well}"))
        }
        fn completion_item(&self, name: &str, well: &str, index: i32) -> Option<&[f64]> {
            self.record(format!("completion {name} {well} {index}"))
        }
        fn group_item(&self, name: &str, group: &str) -> Option<&[f64]> {
            self.record(format!("group {name} {group}"))
        }
        fn block_item(&self, name: &str, _index: i32) -> Option<&[f64]> {
            self.calls.borrow_mut().push(format!("block {name}"));
            None
        }
    }

    #[test]
    fn test_fetch_dispatches_by_qualifier() {
        let source = Recorder::new();
        let cases = [
            (ItemId::time("TIME"), "time TIME"),
            (ItemId::performance("TCPU"), "performance TCPU"),
            (ItemId::field("FOPR"), "field FOPR"),
            (ItemId::aquifer("AAQR", 2), "aquifer AAQR 2"),
            (ItemId::named_region("RPR", "NORTH", 4), "region RPR 4"),
            (ItemId::cross_region("RGFT", 393_217), "cross_region RGFT 393217"),
            (ItemId::well("WOPR", "P1"), "well WOPR P1"),
            (ItemId::completion("COPR", "P1", 3), "completion COPR P1 3"),
            (ItemId::group("GOPR", "G1"), "group GOPR G1"),
        ];

        for (item, expected) in cases {
            let data = fetch(&source, &item);
            assert_eq!(source.last_call(), expected);
            assert_eq!(data.timestamps, vec![0, 10, 20]);
            assert_eq!(data.values, vec![1.0, 2.0, 3.0]);
        }
    }

    #[test]
    fn test_fetch_missing_item_is_empty() {
        let source = Recorder::new();
        let data = fetch(&source, &ItemId::block("BPR", 7));
        assert_eq!(source.last_call(), "block BPR");
        assert!(data.is_empty());
    }

    #[test]
    fn test_plot_data_truncates_to_shorter() {
        let data = PlotData::new(&[0, 10, 20], &[1.0, 2.0]);
        assert_eq!(data.len(), 2);
        assert_eq!(data.points().collect::<Vec<_>>(), vec![(0, 1.0), (10, 2.0)]);
    }
}
