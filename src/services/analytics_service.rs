//! Analytics service: filtered stats and CSV export over the hit log

use crate::analytics::{HitFilter, HitLog, HitStats, aggregate};
use crate::errors::Result;
use crate::utils::csv_handler::hits_to_csv;

pub struct AnalyticsService {
    hits: HitLog,
    recent_limit: usize,
}

impl AnalyticsService {
    pub fn new(hits: HitLog, recent_limit: usize) -> Self {
        Self { hits, recent_limit }
    }

    pub fn stats(&self, filter: &HitFilter) -> HitStats {
        self.hits
            .with_hits(|hits| aggregate(hits, filter, self.recent_limit))
    }

    /// CSV bytes of the filtered hits, in arrival order
    pub fn export_csv(&self, filter: &HitFilter) -> Result<Vec<u8>> {
        self.hits
            .with_hits(|hits| hits_to_csv(hits.iter().filter(|hit| filter.matches(hit))))
    }

    pub fn hit_count(&self) -> usize {
        self.hits.len()
    }

    pub fn hit_log(&self) -> &HitLog {
        &self.hits
    }
}
