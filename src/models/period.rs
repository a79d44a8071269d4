use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest year accepted in a summary window. The open-ended sentinel sits on
/// December of this year, so it is never below a window's upper bound.
pub const MAX_WINDOW_YEAR: i32 = 9999;

/// A calendar month, as `(month, year)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub month: i32,
    pub year: i32,
}

impl Period {
    pub fn new(month: i32, year: i32) -> Self {
        Self { month, year }
    }

    /// Chronological index `year * 12 + month`; gap-free and strictly increasing
    /// as long as `month` lies in `1..=12`.
    pub fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month)
    }

    /// Parses `MM-YYYY`.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let invalid = || AppError::ValidationError(format!("Invalid period '{raw}', expected MM-YYYY"));

        let (month, year) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let month: i32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;

        let period = Self { month, year };
        period.validate()?;
        Ok(period)
    }

    /// Rejects a month outside `1..=12` or a year outside `1..=MAX_WINDOW_YEAR`.
    pub fn validate(&self) -> AppResult<()> {
        if !(1..=12).contains(&self.month) {
            return Err(AppError::ValidationError(format!(
                "Month must be between 1 and 12, got {}",
                self.month
            )));
        }
        if !(1..=MAX_WINDOW_YEAR).contains(&self.year) {
            return Err(AppError::ValidationError(format!(
                "Year must be between 1 and {MAX_WINDOW_YEAR}, got {}",
                self.year
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period() {
        assert_eq!(Period::parse("01-2024").unwrap(), Period::new(1, 2024));
        assert_eq!(Period::parse("7-2025").unwrap(), Period::new(7, 2025));
        assert_eq!(Period::parse(" 12-9999 ").unwrap(), Period::new(12, 9999));
    }

    #[test]
    fn test_parse_period_rejects_malformed() {
        for raw in ["", "2024", "13-2024", "00-2024", "01-0", "01-10000", "ab-2024", "01-20x4"] {
            assert!(
                matches!(Period::parse(raw), Err(AppError::ValidationError(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_index_orders_across_years() {
        assert!(Period::new(12, 2023).index() < Period::new(1, 2024).index());
        assert_eq!(Period::new(1, 2024).index() - Period::new(12, 2023).index(), 1);
        assert_eq!(Period::new(3, 2024).to_string(), "03-2024");
    }

    #[test]
    fn test_validate_bounds() {
        assert!(Period::new(1, 1).validate().is_ok());
        assert!(Period::new(12, MAX_WINDOW_YEAR).validate().is_ok());
        for (month, year) in [(0, 2024), (13, 2024), (1, 0), (12, MAX_WINDOW_YEAR + 1)] {
            assert!(
                matches!(Period::new(month, year).validate(), Err(AppError::ValidationError(_))),
                "{month}-{year} should be rejected"
            );
        }
    }
}
