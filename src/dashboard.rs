use crate::config::DashboardConfig;
use crate::db::Database;
use crate::errors::AppResult;
use crate::models::{ChurchDetail, DashboardSnapshot, Dataset, ImportSummary, PopulationChart};
use crate::series::{count_by_century, reconcile, PopulationSeries};
use chrono::Utc;
use uuid::Uuid;

/// Headroom above the tallest population point, so callouts stay on the chart.
const Y_AXIS_HEADROOM: f64 = 1.3;

/// Builds presenter-ready snapshots from the store. Every call re-reads the
/// store; nothing is cached between calls.
#[derive(Debug)]
pub struct DashboardService {
    db: Database,
    config: DashboardConfig,
}

impl DashboardService {
    pub fn new(config: DashboardConfig) -> AppResult<Self> {
        let db = Database::new(&config.database_path)?;
        Ok(Self::with_database(db, config))
    }

    pub fn with_database(db: Database, config: DashboardConfig) -> Self {
        Self { db, config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn import(&self, dataset: &Dataset) -> AppResult<ImportSummary> {
        self.db.import_dataset(dataset)
    }

    pub fn snapshot(&self) -> AppResult<DashboardSnapshot> {
        let snapshot_id = Uuid::new_v4();
        let church_range = self.config.church_range;

        let churches = self.db.list_built_centuries()?;
        let churches_per_century = count_by_century(&churches, church_range);

        let dedicated = self.db.list_dedicated_centuries(&self.config.dedication_pattern)?;
        let dedicated_per_century = count_by_century(&dedicated, church_range);

        let records = self.db.list_population_records()?;
        let series = reconcile(&records, self.config.population_range)?;
        let population = population_chart(series);

        let century_options = self.db.list_distinct_built_centuries()?;

        tracing::info!(
            snapshot_id = %snapshot_id,
            churches = churches.len(),
            dedicated = dedicated.len(),
            population_records = records.len(),
            events = population.events.len(),
            "dashboard snapshot built"
        );

        Ok(DashboardSnapshot {
            snapshot_id,
            generated_at: Utc::now(),
            church_range,
            churches_per_century,
            dedication_pattern: self.config.dedication_pattern.clone(),
            dedicated_per_century,
            population,
            century_options,
        })
    }

    pub fn church_details(&self, century: i32) -> AppResult<Vec<ChurchDetail>> {
        let details = self.db.list_church_details(century)?;
        tracing::debug!(century, rows = details.len(), "church details loaded");
        Ok(details)
    }
}

pub fn population_chart(series: PopulationSeries) -> PopulationChart {
    let legend = series.legend_lines();
    let y_axis_max = series.max_population().map(|max| max * Y_AXIS_HEADROOM);
    PopulationChart {
        range: series.range,
        points: series.points,
        events: series.events,
        legend,
        y_axis_max,
    }
}
