//! Academic year value object

use chrono::{Datelike, NaiveDate, Utc};

use crate::error::{AppError, AppResult};

/// An academic year running from September 1st of the start year to
/// August 31st of the following year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcademicYear {
    year: String,
    start: NaiveDate,
    end: NaiveDate,
}

impl AcademicYear {
    /// Build an academic year from a 4-digit year string (e.g. "2025"),
    /// or from the literal "current".
    pub fn from_year(year: &str) -> AppResult<Self> {
        if year.eq_ignore_ascii_case("current") {
            return Self::current();
        }

        if year.len() != 4 {
            return Err(AppError::Validation(format!(
                "Academic year must be a 4-digit year, got '{}'",
                year
            )));
        }
        let year_int: i32 = year
            .parse()
            .map_err(|_| AppError::Validation(format!("Invalid academic year '{}'", year)))?;
        if !(2000..=2100).contains(&year_int) {
            return Err(AppError::Validation(format!(
                "Academic year {} outside supported range [2000, 2100]",
                year_int
            )));
        }

        // September 1st .. August 31st; dates are always valid for this range
        let start = NaiveDate::from_ymd_opt(year_int, 9, 1)
            .ok_or_else(|| AppError::Validation(format!("Invalid start date for year {}", year_int)))?;
        let end = NaiveDate::from_ymd_opt(year_int + 1, 8, 31)
            .ok_or_else(|| AppError::Validation(format!("Invalid end date for year {}", year_int)))?;
        if start >= end {
            return Err(AppError::Validation(
                "Academic year start must be before its end".to_string(),
            ));
        }

        Ok(Self {
            year: year.to_string(),
            start,
            end,
        })
    }

    /// The academic year containing today. Before September the academic
    /// year started the previous calendar year.
    pub fn current() -> AppResult<Self> {
        let today = Utc::now().date_naive();
        let start_year = if today.month() < 9 {
            today.year() - 1
        } else {
            today.year()
        };
        Self::from_year(&start_year.to_string())
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether a date falls within this academic year (inclusive bounds)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start.year(), self.end.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_year_builds_september_to_august_span() {
        let year = AcademicYear::from_year("2025").unwrap();
        assert_eq!(year.start(), NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert_eq!(year.end(), NaiveDate::from_ymd_opt(2026, 8, 31).unwrap());
        assert_eq!(year.to_string(), "2025-2026");
    }

    #[test]
    fn rejects_out_of_range_years() {
        assert!(AcademicYear::from_year("1999").is_err());
        assert!(AcademicYear::from_year("2101").is_err());
    }

    #[test]
    fn rejects_malformed_years() {
        assert!(AcademicYear::from_year("").is_err());
        assert!(AcademicYear::from_year("20xx").is_err());
        assert!(AcademicYear::from_year("20255").is_err());
    }

    #[test]
    fn contains_is_inclusive() {
        let year = AcademicYear::from_year("2024").unwrap();
        assert!(year.contains(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()));
        assert!(year.contains(NaiveDate::from_ymd_opt(2025, 8, 31).unwrap()));
        assert!(year.contains(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()));
        assert!(!year.contains(NaiveDate::from_ymd_opt(2024, 8, 31).unwrap()));
        assert!(!year.contains(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()));
    }

    #[test]
    fn current_keyword_resolves() {
        let year = AcademicYear::from_year("current").unwrap();
        assert!(year.start() < year.end());
    }

    #[test]
    fn current_contains_today() {
        let year = AcademicYear::current().unwrap();
        assert!(year.contains(Utc::now().date_naive()));
    }
}
