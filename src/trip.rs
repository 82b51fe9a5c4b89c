use chrono::{Duration, Local, NaiveDate};

use crate::error::Error;
use crate::model::TripMeta;

pub const DEFAULT_SOURCE_CITY: &str = "Dallas, Texas";

pub fn display_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Inclusive number of days between two dates, or `None` for a reversed range.
pub fn day_count(start: NaiveDate, end: NaiveDate) -> Option<u32> {
    let days = (end - start).num_days();
    u32::try_from(days).ok().map(|d| d + 1)
}

/// Everything the user fills in before asking for an itinerary.
#[derive(Clone, Debug)]
pub struct TripRequest {
    pub source_city: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub interests: String,
    pub guardrails: String,
}

impl Default for TripRequest {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            source_city: DEFAULT_SOURCE_CITY.to_string(),
            destination: String::new(),
            start_date: today,
            end_date: today + Duration::days(3),
            interests: String::new(),
            guardrails: String::new(),
        }
    }
}

impl TripRequest {
    pub fn validate(&self) -> Result<TripMeta, Error> {
        if self.source_city.trim().is_empty() {
            return Err(Error::Validation("Please enter your source city.".into()));
        }
        if self.destination.trim().is_empty() {
            return Err(Error::Validation("Please enter a destination.".into()));
        }
        let day_count = day_count(self.start_date, self.end_date).ok_or_else(|| {
            Error::Validation(
                "Please select valid travel dates (end date must be on or after start date)."
                    .into(),
            )
        })?;

        Ok(TripMeta {
            source_city: self.source_city.trim().to_string(),
            destination: self.destination.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            day_count,
        })
    }

    pub fn date_range(&self) -> String {
        format!(
            "{} to {}",
            display_date(self.start_date),
            display_date(self.end_date)
        )
    }
}
