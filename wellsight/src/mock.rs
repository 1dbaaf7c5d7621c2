//! In-memory summary sources for testing.
//!
//! Provides sources built programmatically or loaded from JSON5 fixtures,
//! so the viewer can run without a simulation-data engine.

use std::collections::VecDeque;
use std::path::Path;

use serde::{Deserialize, Serialize};

use wellsight_common::{
    Error, ItemId, Qualifier, RawItemHeader, Result, SourceEngine, SummarySource,
};

/// One series of a [`MemorySource`], keyed by its raw header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryItem {
    pub header: RawItemHeader,
    pub values: Vec<f64>,
}

/// A summary source held entirely in memory.
///
/// Fixture layout:
///
/// ```json5
/// {
///     name: "BASE",
///     timestamps: [0, 86400000],
///     items: [
///         { header: { keyword: "WOPR", wg_name: "P1" }, values: [100, 95] },
///     ],
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySource {
    #[serde(default)]
    name: String,
    timestamps: Vec<i64>,
    #[serde(default)]
    items: Vec<MemoryItem>,
    /// Report steps handed out by the next `refresh`.
    #[serde(skip)]
    pending: VecDeque<(i64, Vec<f64>)>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, timestamps: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            timestamps,
            ..Self::default()
        }
    }

    /// Add a series under a raw header.
    pub fn with_item(
        mut self,
        keyword: &str,
        wg_name: &str,
        num: i32,
        values: Vec<f64>,
    ) -> Self {
        self.items.push(MemoryItem {
            header: RawItemHeader::new(keyword, wg_name, num),
            values,
        });
        self
    }

    /// Number of series, recognized or not.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Queue one report step: a timestamp and one value per series, in order.
    pub fn queue_step(&mut self, timestamp: i64, values: Vec<f64>) {
        self.pending.push_back((timestamp, values));
    }

    fn series(&self, name: &str, matches: impl Fn(&Qualifier) -> bool) -> Option<&[f64]> {
        self.items
            .iter()
            .find(|item| {
                ItemId::classify(&item.header)
                    .map(|id| id.name == name && matches(&id.qualifier))
                    .unwrap_or(false)
            })
            .map(|item| item.values.as_slice())
    }
}

impl SummarySource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn refresh(&mut self) -> Result<bool> {
        if self.pending.is_empty() {
            return Ok(false);
        }

        // Steps are applied all together or not at all.
        if let Some((_, values)) = self
            .pending
            .iter()
            .find(|(_, values)| values.len() != self.items.len())
        {
            let error = Error::engine(format!(
                "{}: report step has {} values for {} series",
                self.name,
                values.len(),
                self.items.len()
            ));
            self.pending.clear();
            return Err(error);
        }

        while let Some((timestamp, values)) = self.pending.pop_front() {
            self.timestamps.push(timestamp);
            for (item, value) in self.items.iter_mut().zip(values) {
                item.values.push(value);
            }
        }

        Ok(true)
    }

    fn item_headers(&self) -> Vec<RawItemHeader> {
        self.items.iter().map(|item| item.header.clone()).collect()
    }

    fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    fn time_item(&self, name: &str) -> Option<&[f64]> {
        self.series(name, |q| matches!(q, Qualifier::Time))
    }

    fn performance_item(&self, name: &str) -> Option<&[f64]> {
        self.series(name, |q| matches!(q, Qualifier::Performance))
    }

    fn field_item(&self, name: &str) -> Option<&[f64]> {
        self.series(name, |q| matches!(q, Qualifier::Field))
    }

    fn aquifer_item(&self, name: &str, index: i32) -> Option<&[f64]> {
        self.series(name, |q| matches!(q, Qualifier::Aquifer { index: i } if *i == index))
    }

    fn region_item(&self, name: &str, index: i32) -> Option<&[f64]> {
        self.series(name, |q| matches!(q, Qualifier::Region { index: i, .. } if *i == index))
    }

    fn cross_region_item(&self, name: &str, index: i32) -> Option<&[f64]> {
        self.series(name, |q| {
            matches!(q, Qualifier::CrossRegionFlow { index: i } if *i == index)
        })
    }

    fn well_item(&self, name: &str, well: &str) -> Option<&[f64]> {
        self.series(name, |q| matches!(q, Qualifier::Well { well: w } if w == well))
    }

    fn completion_item(&self, name: &str, well: &str, index: i32) -> Option<&[f64]> {
        self.series(name, |q| {
            matches!(q, Qualifier::Completion { well: w, index: i } if w == well && *i == index)
        })
    }

    fn group_item(&self, name: &str, group: &str) -> Option<&[f64]> {
        self.series(name, |q| matches!(q, Qualifier::Group { group: g } if g == group))
    }

    fn block_item(&self, name: &str, index: i32) -> Option<&[f64]> {
        self.series(name, |q| matches!(q, Qualifier::Block { index: i } if *i == index))
    }
}

/// Opens JSON5 fixture files as [`MemorySource`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureEngine;

impl SourceEngine for FixtureEngine {
    fn open_path(&self, path: &Path) -> Result<Box<dyn SummarySource>> {
        let content = std::fs::read_to_string(path)?;
        let mut source: MemorySource = json5::from_str(&content)?;

        if source.name.is_empty() {
            source.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
        }

        tracing::debug!(
            path = %path.display(),
            series = source.items.len(),
            steps = source.timestamps.len(),
            "Loaded fixture"
        );
        Ok(Box::new(source))
    }

    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn SummarySource>> {
        Err(Error::engine(format!(
            "Fixture engine cannot connect to {}:{}",
            host, port
        )))
    }
}

/// Ready-made reservoir runs.
pub mod reservoir {
    use super::*;

    /// 2024-01-01T00:00:00Z.
    pub const START_MS: i64 = 1_704_067_200_000;

    /// Thirty days between reports.
    pub const REPORT_STEP_MS: i64 = 30 * 86_400_000;

    /// Timestamps of the four monthly reports every preset carries.
    pub fn report_times() -> Vec<i64> {
        (0..4).map(|i| START_MS + i * REPORT_STEP_MS).collect()
    }

    /// Two producers in one group, with field totals and a few region and
    /// block vectors.
    pub fn two_wells(name: &str) -> MemorySource {
        MemorySource::new(name, report_times())
            .with_item("TIME", "", 0, vec![0.0, 30.0, 60.0, 90.0])
            .with_item("TCPU", "", 0, vec![1.2, 2.9, 4.1, 5.6])
            .with_item("FOPR", "", 0, vec![2000.0, 1850.0, 1710.0, 1590.0])
            .with_item("WOPR", "P1", 0, vec![1200.0, 1100.0, 1010.0, 930.0])
            .with_item("WOPR", "P2", 0, vec![800.0, 750.0, 700.0, 660.0])
            .with_item("WWCT", "P1", 0, vec![0.0, 0.05, 0.12, 0.2])
            .with_item("WWCT", "P2", 0, vec![0.0, 0.0, 0.03, 0.08])
            .with_item("WBHP", "P1", 0, vec![250.0, 241.0, 233.0, 226.0])
            .with_item("GOPR", "G1", 0, vec![2000.0, 1850.0, 1710.0, 1590.0])
            .with_item("COPR", "P1", 7, vec![400.0, 380.0, 350.0, 330.0])
            .with_item("RPR", "", 1, vec![280.0, 276.0, 272.0, 269.0])
            .with_item("BPR", "", 1234, vec![281.0, 277.0, 273.0, 270.0])
            .with_item("XYZ", "", 0, vec![0.0, 0.0, 0.0, 0.0])
    }

    /// One injector supporting pressure in region 2.
    pub fn water_flood(name: &str) -> MemorySource {
        MemorySource::new(name, report_times())
            .with_item("TIME", "", 0, vec![0.0, 30.0, 60.0, 90.0])
            .with_item("FWIR", "", 0, vec![0.0, 1500.0, 1500.0, 1500.0])
            .with_item("WWIR", "I1", 0, vec![0.0, 1500.0, 1500.0, 1500.0])
            .with_item("WBHP", "I1", 0, vec![300.0, 320.0, 318.0, 317.0])
            .with_item("RPR", "", 2, vec![280.0, 282.0, 283.0, 283.0])
            .with_item("AAQR", "", 1, vec![0.0, 12.0, 15.0, 16.0])
            .with_item("ROFT", "", 1 + 32768 * (2 + 10), vec![0.0, 5.0, 9.0, 12.0])
    }
}
