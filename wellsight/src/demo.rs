//! Demo mode simulation engine.
//!
//! Provides a synthetic, growing reservoir run for demonstrating WellSight
//! without a simulation-data engine. Every `refresh` appends one report
//! step, the way a network stream delivers new samples.

use std::path::Path;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use wellsight_common::{RawItemHeader, Result, SourceEngine, SummarySource};

use crate::mock::{FixtureEngine, MemorySource};

/// 2024-01-01T00:00:00Z.
const DEMO_START_MS: i64 = 1_704_067_200_000;

/// One simulated day per report step.
const DEMO_STEP_MS: i64 = 86_400_000;

/// Report steps generated when a demo source is created.
const INITIAL_STEPS: usize = 30;

const PRODUCERS: &[&str] = &["P1", "P2", "P3"];

/// How a series evolves over simulated time.
#[derive(Debug, Clone)]
enum Profile {
    /// Elapsed days.
    Days,
    /// Monotonically growing counter with a random increment.
    Cumulative { per_step: f64 },
    /// Exponential rate decline.
    Decline { initial: f64, per_year: f64 },
    /// S-curve rising from 0 to `plateau` around `breakthrough` days.
    WaterCut { breakthrough: f64, plateau: f64 },
    /// Pressure relaxing from `initial` towards `initial - drop`.
    Pressure { initial: f64, drop: f64 },
    /// Injection ramping up to `target` over the first weeks.
    Injection { target: f64 },
}

/// A synthetic live source.
pub struct DemoSource {
    rng: SmallRng,
    step: usize,
    profiles: Vec<Profile>,
    /// Most recent value of each series.
    last: Vec<f64>,
    data: MemorySource,
}

impl DemoSource {
    /// Create a source with some history already generated.
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut data = MemorySource::new(name, Vec::new());
        let mut profiles = Vec::new();

        let mut add = |data: MemorySource, header: RawItemHeader, profile: Profile| {
            profiles.push(profile);
            data.with_item(&header.keyword, &header.wg_name, header.num, Vec::new())
        };

        data = add(data, RawItemHeader::new("TIME", "", 0), Profile::Days);
        data = add(
            data,
            RawItemHeader::new("TCPU", "", 0),
            Profile::Cumulative {
                per_step: rng.random_range(0.5..2.0),
            },
        );
        data = add(
            data,
            RawItemHeader::new("FOPR", "", 0),
            Profile::Decline {
                initial: rng.random_range(3000.0..5000.0),
                per_year: 0.3,
            },
        );
        data = add(
            data,
            RawItemHeader::new("GOPR", "G1", 0),
            Profile::Decline {
                initial: rng.random_range(2000.0..3000.0),
                per_year: 0.3,
            },
        );

        for well in PRODUCERS {
            let initial = rng.random_range(600.0..1500.0);
            let per_year = rng.random_range(0.2..0.6);
            data = add(
                data,
                RawItemHeader::new("WOPR", *well, 0),
                Profile::Decline { initial, per_year },
            );
            data = add(
                data,
                RawItemHeader::new("COPR", *well, 1),
                Profile::Decline {
                    initial: initial * 0.4,
                    per_year,
                },
            );
            data = add(
                data,
                RawItemHeader::new("WWCT", *well, 0),
                Profile::WaterCut {
                    breakthrough: rng.random_range(10.0..60.0),
                    plateau: rng.random_range(0.5..0.9),
                },
            );
            data = add(
                data,
                RawItemHeader::new("WBHP", *well, 0),
                Profile::Pressure {
                    initial: rng.random_range(220.0..260.0),
                    drop: rng.random_range(20.0..60.0),
                },
            );
        }

        data = add(
            data,
            RawItemHeader::new("WWIR", "I1", 0),
            Profile::Injection {
                target: rng.random_range(1000.0..2000.0),
            },
        );
        data = add(
            data,
            RawItemHeader::new("WBHP", "I1", 0),
            Profile::Pressure {
                initial: 300.0,
                drop: -25.0,
            },
        );
        for region in 1..=2 {
            data = add(
                data,
                RawItemHeader::new("RPR", "", region),
                Profile::Pressure {
                    initial: 280.0,
                    drop: rng.random_range(5.0..20.0),
                },
            );
        }
        data = add(
            data,
            RawItemHeader::new("BPR", "", 1234),
            Profile::Pressure {
                initial: 282.0,
                drop: 15.0,
            },
        );
        data = add(
            data,
            RawItemHeader::new("AAQR", "", 1),
            Profile::Injection { target: 150.0 },
        );
        data = add(
            data,
            RawItemHeader::new("ROFT", "", 1 + 32768 * (2 + 10)),
            Profile::Cumulative { per_step: 3.0 },
        );

        let mut source = Self {
            rng,
            step: 0,
            last: vec![0.0; profiles.len()],
            profiles,
            data,
        };
        for _ in 0..INITIAL_STEPS {
            source.advance();
        }
        source
    }

    /// Number of report steps generated so far.
    pub fn steps(&self) -> usize {
        self.step
    }

    /// Generate the next report step and queue it on the backing source.
    fn advance(&mut self) {
        let days = self.step as f64;

        let mut values = Vec::with_capacity(self.profiles.len());
        for (profile, last) in self.profiles.iter().zip(self.last.iter_mut()) {
            let noise = 1.0 + self.rng.random_range(-0.02..0.02);
            let value = match *profile {
                Profile::Days => days,
                Profile::Cumulative { per_step } => {
                    *last + per_step * self.rng.random_range(0.5..1.5)
                }
                Profile::Decline { initial, per_year } => {
                    initial * (-per_year * days / 365.0).exp() * noise
                }
                Profile::WaterCut {
                    breakthrough,
                    plateau,
                } => {
                    let wct = plateau / (1.0 + (-(days - breakthrough) / 8.0).exp());
                    (wct * noise).clamp(0.0, 1.0)
                }
                Profile::Pressure { initial, drop } => {
                    (initial - drop * (1.0 - (-days / 90.0).exp())) * noise
                }
                Profile::Injection { target } => target * (days / 14.0).min(1.0) * noise,
            };
            *last = value;
            values.push(value);
        }

        let timestamp = DEMO_START_MS + self.step as i64 * DEMO_STEP_MS;
        self.data.queue_step(timestamp, values);
        self.step += 1;

        if let Err(e) = self.data.refresh() {
            tracing::warn!(source = self.data.name(), error = %e, "Demo step rejected");
        }
    }
}

impl SummarySource for DemoSource {
    fn name(&self) -> &str {
        self.data.name()
    }

    fn refresh(&mut self) -> Result<bool> {
        self.advance();
        tracing::trace!(source = self.data.name(), step = self.step, "Demo step");
        Ok(true)
    }

    fn item_headers(&self) -> Vec<RawItemHeader> {
        self.data.item_headers()
    }

    fn timestamps(&self) -> &[i64] {
        self.data.timestamps()
    }

    fn time_item(&self, name: &str) -> Option<&[f64]> {
        self.data.time_item(name)
    }

    fn performance_item(&self, name: &str) -> Option<&[f64]> {
        self.data.performance_item(name)
    }

    fn field_item(&self, name: &str) -> Option<&[f64]> {
        self.data.field_item(name)
    }

    fn aquifer_item(&self, name: &str, index: i32) -> Option<&[f64]> {
        self.data.aquifer_item(name, index)
    }

    fn region_item(&self, name: &str, index: i32) -> Option<&[f64]> {
        self.data.region_item(name, index)
    }

    fn cross_region_item(&self, name: &str, index: i32) -> Option<&[f64]> {
        self.data.cross_region_item(name, index)
    }

    fn well_item(&self, name: &str, well: &str) -> Option<&[f64]> {
        self.data.well_item(name, well)
    }

    fn completion_item(&self, name: &str, well: &str, index: i32) -> Option<&[f64]> {
        self.data.completion_item(name, well, index)
    }

    fn group_item(&self, name: &str, group: &str) -> Option<&[f64]> {
        self.data.group_item(name, group)
    }

    fn block_item(&self, name: &str, index: i32) -> Option<&[f64]> {
        self.data.block_item(name, index)
    }
}

/// Engine for demo mode: network connections become synthetic live
/// sources, paths are opened as JSON5 fixtures.
#[derive(Debug, Clone, Copy)]
pub struct DemoEngine {
    seed: u64,
}

impl DemoEngine {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for DemoEngine {
    fn default() -> Self {
        Self::new(42)
    }
}

impl SourceEngine for DemoEngine {
    fn open_path(&self, path: &Path) -> Result<Box<dyn SummarySource>> {
        FixtureEngine.open_path(path)
    }

    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn SummarySource>> {
        let name = format!("{}:{}", host, port);
        tracing::info!(source = %name, "Starting demo stream");
        Ok(Box::new(DemoSource::new(name, self.seed ^ u64::from(port))))
    }
}

/// Named demo sources `DEMO-1`, `DEMO-2`, ... with distinct seeds.
pub fn demo_sources(count: usize, seed: u64) -> Vec<DemoSource> {
    (1..=count)
        .map(|i| DemoSource::new(format!("DEMO-{}", i), seed.wrapping_add(i as u64)))
        .collect()
}
