use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inclusive, non-empty span of centuries. Negative values are centuries BC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[i32; 2]", into = "[i32; 2]")]
pub struct CenturyRange {
    low: i32,
    high: i32,
}

impl CenturyRange {
    pub fn new(low: i32, high: i32) -> AppResult<Self> {
        if low > high {
            return Err(AppError::InvalidRange { low, high });
        }
        Ok(Self { low, high })
    }

    /// Compile-time constructor for fixed ranges; use in `const` items only.
    pub const fn ordered(low: i32, high: i32) -> Self {
        assert!(low <= high, "century range must have low <= high");
        Self { low, high }
    }

    pub fn low(self) -> i32 {
        self.low
    }

    pub fn high(self) -> i32 {
        self.high
    }

    pub fn len(self) -> usize {
        (i64::from(self.high) - i64::from(self.low) + 1) as usize
    }

    pub fn contains(self, century: i32) -> bool {
        (self.low..=self.high).contains(&century)
    }

    pub fn centuries(self) -> impl Iterator<Item = i32> {
        self.low..=self.high
    }

    /// Position of `century` on the dense axis, if it lies inside the range.
    pub fn offset_of(self, century: i32) -> Option<usize> {
        self.contains(century)
            .then(|| (i64::from(century) - i64::from(self.low)) as usize)
    }
}

impl TryFrom<[i32; 2]> for CenturyRange {
    type Error = AppError;

    fn try_from(value: [i32; 2]) -> AppResult<Self> {
        Self::new(value[0], value[1])
    }
}

impl From<CenturyRange> for [i32; 2] {
    fn from(value: CenturyRange) -> Self {
        [value.low, value.high]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenturySample {
    pub century: i32,
    pub count: u64,
}

/// Raw population row as stored upstream. Rows carrying only an event,
/// only a population, or both are all valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationRecord {
    pub century: i32,
    #[serde(default)]
    pub population: Option<f64>,
    #[serde(default)]
    pub event: Option<String>,
}

impl PopulationRecord {
    pub fn population(century: i32, population: f64) -> Self {
        Self {
            century,
            population: Some(population),
            event: None,
        }
    }

    pub fn event(century: i32, event: impl Into<String>) -> Self {
        Self {
            century,
            population: None,
            event: Some(event.into()),
        }
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Trimmed event text, or `None` when absent or blank.
    pub fn event_text(&self) -> Option<&str> {
        self.event
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationPoint {
    pub century: i32,
    pub population: Option<f64>,
    pub event_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEntry {
    pub event_id: u32,
    pub century: i32,
    pub text: String,
    /// Dense population value at `century`; the callout anchor.
    pub population: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurchRecord {
    pub cid: i64,
    pub built_century: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChurch {
    pub cid: i64,
    pub english_name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub built_century: Option<i32>,
    #[serde(default)]
    pub architect: Option<String>,
    #[serde(default)]
    pub dedication: Option<String>,
    #[serde(default)]
    pub artists: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurchDetail {
    pub english_name: String,
    pub address: Option<String>,
    pub architect: Option<String>,
    pub dedication: Option<String>,
    pub artists: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub churches: Vec<NewChurch>,
    #[serde(default)]
    pub population: Vec<PopulationRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub churches: usize,
    pub population_records: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationChart {
    pub range: CenturyRange,
    pub points: Vec<PopulationPoint>,
    pub events: Vec<EventEntry>,
    pub legend: Vec<String>,
    pub y_axis_max: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub snapshot_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub church_range: CenturyRange,
    pub churches_per_century: Vec<CenturySample>,
    pub dedication_pattern: String,
    pub dedicated_per_century: Vec<CenturySample>,
    pub population: PopulationChart,
    pub century_options: Vec<i32>,
}
