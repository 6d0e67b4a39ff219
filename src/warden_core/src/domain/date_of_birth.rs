use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::user::UserError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const MINIMUM_AGE_YEARS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateOfBirth(NaiveDate);

impl DateOfBirth {
    /// Parses a `YYYY-MM-DD` date and checks the holder is old enough on `today`.
    pub fn parse(value: &str, today: NaiveDate) -> Result<Self, UserError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(UserError::MissingField("date_of_birth"));
        }
        let date = NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map_err(|_| UserError::InvalidDateOfBirth)?;
        let dob = Self(date);

        match dob.age_on(today) {
            Some(age) if age >= MINIMUM_AGE_YEARS => Ok(dob),
            _ => Err(UserError::TooYoung(MINIMUM_AGE_YEARS)),
        }
    }

    /// Full years completed on `today`; `None` for dates in the future.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        today.years_since(self.0)
    }

    pub fn as_date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DateOfBirth {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl fmt::Display for DateOfBirth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}
