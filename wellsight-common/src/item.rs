//! Summary item addressing.
//!
//! Every series a simulation reports is identified by a keyword (the physical
//! quantity, e.g. `WBHP` for well bottom hole pressure) and a qualifier that
//! places it: a well, a group, a region, a grid block, and so on.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Placeholder the engine writes when a header carries no well/group name.
pub const UNKNOWN_WG_NAME: &str = ":+:+:+:+";

/// Offset used to pack two region numbers into one cross-region index.
const CROSS_REGION_BASE: i32 = 32768;

const TIMING_KEYWORDS: &[&str] = &["TIME", "YEARS", "DAY", "MONTH", "YEAR"];

const PERFORMANCE_KEYWORDS: &[&str] = &[
    "ELAPSED", "MLINEARS", "MSUMLINS", "MSUMNEWT", "NEWTON", "NLINEARS", "TCPU", "TCPUDAY",
    "TCPUTS", "TIMESTEP", "MEMGB", "MAXMEMGB", "NAIMFRAC",
];

/// A header exactly as the simulation-data engine reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItemHeader {
    /// Summary keyword (e.g. "WOPR").
    pub keyword: String,
    /// Well or group name, possibly blank or the unknown placeholder.
    #[serde(default)]
    pub wg_name: String,
    /// Numeric location (region, block, completion...); non-positive when absent.
    #[serde(default)]
    pub num: i32,
}

impl RawItemHeader {
    pub fn new(keyword: impl Into<String>, wg_name: impl Into<String>, num: i32) -> Self {
        Self {
            keyword: keyword.into(),
            wg_name: wg_name.into(),
            num,
        }
    }
}

/// Where a summary item lives. Each variant carries only the fields it needs.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Qualifier {
    Time,
    Performance,
    Field,
    Aquifer {
        index: i32,
    },
    Region {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        region: Option<String>,
        index: i32,
    },
    CrossRegionFlow {
        index: i32,
    },
    Well {
        well: String,
    },
    Completion {
        well: String,
        index: i32,
    },
    Group {
        group: String,
    },
    Block {
        index: i32,
    },
}

impl Qualifier {
    /// Short category name.
    pub fn kind(&self) -> &'static str {
        match self {
            Qualifier::Time => "Time",
            Qualifier::Performance => "Performance",
            Qualifier::Field => "Field",
            Qualifier::Aquifer { .. } => "Aquifer",
            Qualifier::Region { .. } => "Region",
            Qualifier::CrossRegionFlow { .. } => "CrossRegionFlow",
            Qualifier::Well { .. } => "Well",
            Qualifier::Completion { .. } => "Completion",
            Qualifier::Group { .. } => "Group",
            Qualifier::Block { .. } => "Block",
        }
    }

    /// Decode the `(from, to)` region pair of a cross-region flow.
    pub fn regions(&self) -> Option<(i32, i32)> {
        match self {
            Qualifier::CrossRegionFlow { index } => {
                let to = index / CROSS_REGION_BASE - 10;
                let from = index - CROSS_REGION_BASE * (to + 10);
                Some((from, to))
            }
            _ => None,
        }
    }
}

/// Uniform identity of one series across all sources.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ItemId {
    pub name: String,
    pub qualifier: Qualifier,
}

impl ItemId {
    pub fn new(name: impl Into<String>, qualifier: Qualifier) -> Self {
        Self {
            name: name.into(),
            qualifier,
        }
    }

    pub fn time(name: impl Into<String>) -> Self {
        Self::new(name, Qualifier::Time)
    }

    pub fn performance(name: impl Into<String>) -> Self {
        Self::new(name, Qualifier::Performance)
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self::new(name, Qualifier::Field)
    }

    pub fn aquifer(name: impl Into<String>, index: i32) -> Self {
        Self::new(name, Qualifier::Aquifer { index })
    }

    pub fn region(name: impl Into<String>, index: i32) -> Self {
        Self::new(
            name,
            Qualifier::Region {
                region: None,
                index,
            },
        )
    }

    pub fn named_region(name: impl Into<String>, region: impl Into<String>, index: i32) -> Self {
        Self::new(
            name,
            Qualifier::Region {
                region: Some(region.into()),
                index,
            },
        )
    }

    pub fn cross_region(name: impl Into<String>, index: i32) -> Self {
        Self::new(name, Qualifier::CrossRegionFlow { index })
    }

    pub fn well(name: impl Into<String>, well: impl Into<String>) -> Self {
        Self::new(name, Qualifier::Well { well: well.into() })
    }

    pub fn completion(name: impl Into<String>, well: impl Into<String>, index: i32) -> Self {
        Self::new(
            name,
            Qualifier::Completion {
                well: well.into(),
                index,
            },
        )
    }

    pub fn group(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self::new(
            name,
            Qualifier::Group {
                group: group.into(),
            },
        )
    }

    pub fn block(name: impl Into<String>, index: i32) -> Self {
        Self::new(name, Qualifier::Block { index })
    }

    /// Classify a raw engine header.
    ///
    /// Keyword sets are checked first, then the keyword's leading letters
    /// decide the category, provided the location fields it needs are valid.
    /// Anything else is [`Error::UnsupportedItem`].
    pub fn classify(header: &RawItemHeader) -> Result<Self> {
        let keyword = header.keyword.trim();
        let wg_name = header.wg_name.trim();
        let index = header.num;

        let wg_valid = !wg_name.is_empty() && wg_name != UNKNOWN_WG_NAME;
        let num_valid = index > 0;

        let qualifier = if TIMING_KEYWORDS.contains(&keyword) {
            Qualifier::Time
        } else if PERFORMANCE_KEYWORDS.contains(&keyword) {
            Qualifier::Performance
        } else {
            match keyword.as_bytes() {
                [b'F', ..] => Qualifier::Field,
                [b'A', ..] if num_valid => Qualifier::Aquifer { index },
                [b'R', b'N', b'L', b'F', ..] | [b'R', _, b'F', ..] if num_valid => {
                    Qualifier::CrossRegionFlow { index }
                }
                [b'R', ..] if num_valid => Qualifier::Region {
                    region: wg_valid.then(|| wg_name.to_string()),
                    index,
                },
                [b'W', ..] if wg_valid => Qualifier::Well {
                    well: wg_name.to_string(),
                },
                [b'C', ..] if wg_valid && num_valid => Qualifier::Completion {
                    well: wg_name.to_string(),
                    index,
                },
                [b'G', ..] if wg_valid => Qualifier::Group {
                    group: wg_name.to_string(),
                },
                [b'B', ..] if num_valid => Qualifier::Block { index },
                _ => {
                    return Err(Error::UnsupportedItem {
                        keyword: keyword.to_string(),
                        wg_name: wg_name.to_string(),
                        num: index,
                    });
                }
            }
        };

        Ok(Self::new(keyword, qualifier))
    }

    /// Bare keyword, without location.
    pub fn display_name(&self) -> &str {
        &self.name
    }

    /// Keyword followed by its location suffix, e.g. `"WOPR @ P1"`.
    pub fn qualified_location(&self) -> String {
        self.to_string()
    }

    /// Source-prefixed label used for legend entries.
    pub fn full_name(&self, source_name: &str) -> String {
        format!("{}: {}", source_name, self)
    }

    /// Well, group or region name, when the qualifier has one.
    pub fn secondary_name(&self) -> Option<&str> {
        match &self.qualifier {
            Qualifier::Well { well } | Qualifier::Completion { well, .. } => Some(well),
            Qualifier::Group { group } => Some(group),
            Qualifier::Region { region, .. } => region.as_deref(),
            _ => None,
        }
    }

    /// Numeric location, when the qualifier has one.
    pub fn index(&self) -> Option<i32> {
        match &self.qualifier {
            Qualifier::Aquifer { index }
            | Qualifier::Region { index, .. }
            | Qualifier::CrossRegionFlow { index }
            | Qualifier::Completion { index, .. }
            | Qualifier::Block { index } => Some(*index),
            _ => None,
        }
    }

    /// Name equality: the only criterion for sharing an axis.
    pub fn name_equal(&self, other: &ItemId) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Qualifier::Time | Qualifier::Performance | Qualifier::Field => {
                write!(f, "{}", self.name)
            }
            Qualifier::Aquifer { index }
            | Qualifier::CrossRegionFlow { index }
            | Qualifier::Block { index } => write!(f, "{} @ {}", self.name, index),
            Qualifier::Region { region, index } => match region {
                Some(region) => write!(f, "{} @ {}", self.name, region),
                None => write!(f, "{} @ {}", self.name, index),
            },
            Qualifier::Well { well } => write!(f, "{} @ {}", self.name, well),
            Qualifier::Completion { well, index } => {
                write!(f, "{} @ {}[{}]", self.name, well, index)
            }
            Qualifier::Group { group } => write!(f, "{} @ {}", self.name, group),
        }
    }
}
