//! Column filters and their emitted parameters.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::FilterError;

/// Calendar date format used for emitted date parameters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| FilterError::invalid_date(value))
}

/// An inclusive date range with optional bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range, rejecting a start after the end.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, FilterError> {
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(FilterError::InvertedRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// Parses both bounds from `YYYY-MM-DD` strings; empty strings are
    /// treated as missing bounds.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, FilterError> {
        let bound = |value: Option<&str>| match value.map(str::trim) {
            Some(s) if !s.is_empty() => parse_date(s).map(Some),
            _ => Ok(None),
        };
        Self::new(bound(from)?, bound(to)?)
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    /// `true` when neither bound is set.
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether `date` falls within the range, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Filter values keyed by column id.
///
/// Text filters and date ranges are kept apart because they are emitted
/// differently: a date range becomes two parameters, `<column>Start` and
/// `<column>End`.
///
/// # Example
///
/// ```
/// use datagrid_lib::query::{DateRange, FilterState};
///
/// let mut filters = FilterState::new();
/// filters.set_text("status", "active");
/// filters.set_date_range("createdAt", DateRange::parse(Some("2024-01-05"), Some("2024-01-10")).unwrap());
///
/// let params = filters.to_params();
/// assert_eq!(params["status"], "active");
/// assert_eq!(params["createdAtStart"], "2024-01-05");
/// assert_eq!(params["createdAtEnd"], "2024-01-10");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    text: BTreeMap<String, String>,
    dates: BTreeMap<String, DateRange>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a text filter; an empty value removes it.
    pub fn set_text(&mut self, column_id: impl Into<String>, value: impl Into<String>) {
        let column_id = column_id.into();
        let value = value.into();
        if value.is_empty() {
            self.text.remove(&column_id);
        } else {
            self.text.insert(column_id, value);
        }
    }

    /// Sets a date range; an empty range removes it.
    pub fn set_date_range(&mut self, column_id: impl Into<String>, range: DateRange) {
        let column_id = column_id.into();
        if range.is_empty() {
            self.dates.remove(&column_id);
        } else {
            self.dates.insert(column_id, range);
        }
    }

    /// Removes every filter on `column_id`.
    pub fn remove(&mut self, column_id: &str) {
        self.text.remove(column_id);
        self.dates.remove(column_id);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.dates.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.dates.is_empty()
    }

    /// Number of filtered columns.
    pub fn len(&self) -> usize {
        self.text.len() + self.dates.len()
    }

    pub fn text(&self, column_id: &str) -> Option<&str> {
        self.text.get(column_id).map(String::as_str)
    }

    pub fn date_range(&self, column_id: &str) -> Option<&DateRange> {
        self.dates.get(column_id)
    }

    pub fn text_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.text.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn date_filters(&self) -> impl Iterator<Item = (&str, &DateRange)> {
        self.dates.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Ids of all filtered columns.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.text.keys().chain(self.dates.keys()).map(String::as_str)
    }

    /// Flattens the filters into the parameters handed to a data source.
    pub fn to_params(&self) -> BTreeMap<String, String> {
        let mut params = self.text.clone();
        for (column, range) in &self.dates {
            if let Some(from) = range.from {
                params.insert(
                    format!("{column}Start"),
                    from.format(DATE_FORMAT).to_string(),
                );
            }
            if let Some(to) = range.to {
                params.insert(format!("{column}End"), to.format(DATE_FORMAT).to_string());
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_date_range_params() {
        let mut filters = FilterState::new();
        filters.set_date_range(
            "createdAt",
            DateRange::new(Some(date("2024-01-05")), Some(date("2024-01-10"))).unwrap(),
        );
        let params = filters.to_params();
        assert_eq!(params.len(), 2);
        assert_eq!(params["createdAtStart"], "2024-01-05");
        assert_eq!(params["createdAtEnd"], "2024-01-10");
    }

    #[test]
    fn test_open_ended_range() {
        let mut filters = FilterState::new();
        filters.set_date_range("dueAt", DateRange::parse(None, Some("2024-03-01")).unwrap());
        let params = filters.to_params();
        assert_eq!(params.len(), 1);
        assert_eq!(params["dueAtEnd"], "2024-03-01");
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = DateRange::parse(Some("2024-02-01"), Some("2024-01-01")).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvertedRange {
                from: date("2024-02-01"),
                to: date("2024-01-01"),
            }
        );
    }

    #[test]
    fn test_invalid_date() {
        assert_eq!(
            parse_date("05/01/2024"),
            Err(FilterError::invalid_date("05/01/2024"))
        );
        assert!(DateRange::parse(Some("2024-13-01"), None).is_err());
    }

    #[test]
    fn test_empty_values_removed() {
        let mut filters = FilterState::new();
        filters.set_text("name", "ann");
        filters.set_date_range("createdAt", DateRange::parse(Some("2024-01-01"), None).unwrap());
        assert_eq!(filters.len(), 2);

        filters.set_text("name", "");
        filters.set_date_range("createdAt", DateRange::default());
        assert!(filters.is_empty());
        assert!(filters.to_params().is_empty());
    }

    #[test]
    fn test_range_contains_inclusive() {
        let range = DateRange::parse(Some("2024-01-05"), Some("2024-01-10")).unwrap();
        assert!(range.contains(date("2024-01-05")));
        assert!(range.contains(date("2024-01-10")));
        assert!(!range.contains(date("2024-01-04")));
        assert!(!range.contains(date("2024-01-11")));
    }
}
