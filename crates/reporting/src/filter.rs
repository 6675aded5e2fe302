//! Date filters as submitted by report forms and chart requests.

use chrono::NaiveDate;
use serde::Deserialize;
use store::DateRange;

use crate::error::{ReportError, Result};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parses a calendar day in `YYYY-MM-DD` form.
pub fn parse_day(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DAY_FORMAT).map_err(|_| ReportError::InvalidDate {
        value: value.to_string(),
    })
}

/// Optional start and end days of a report.
///
/// Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportFilter {
    #[serde(rename = "data_inicio")]
    pub start: Option<String>,
    #[serde(rename = "data_fim")]
    pub end: Option<String>,
}

impl ReportFilter {
    /// Filter covering `start` through `end`.
    pub fn between(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    /// Parses whichever days are present.
    ///
    /// A malformed day is an error even when the other one is missing.
    pub fn days(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
        Ok((parse_optional(&self.start)?, parse_optional(&self.end)?))
    }

    /// The range to filter by, present only when both days are.
    pub fn range(&self) -> Result<Option<DateRange>> {
        Ok(match self.days()? {
            (Some(first), Some(last)) => Some(DateRange::days(first, last)),
            _ => None,
        })
    }
}

fn parse_optional(value: &Option<String>) -> Result<Option<NaiveDate>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_day(text).map(Some),
    }
}
