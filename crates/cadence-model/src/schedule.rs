//! Recurrence schedules.
//!
//! A schedule is written by humans either as a plural noun (`"days"`) or as
//! an adjective (`"daily"`), in any letter case. Both spellings collapse to
//! one canonical [`Schedule`] with three projections:
//!
//! | Schedule | `expression()` | `to_json()` | `to_string()` |
//! |----------|----------------|-------------|---------------|
//! | Hours    | `@hourly`      | `hours`     | `HOURS`       |
//! | Days     | `@daily`       | `days`      | `DAYS`        |
//! | Weeks    | `@weekly`      | `weeks`     | `WEEKS`       |
//! | Months   | `@monthly`     | `months`    | `MONTHS`      |
//! | Years    | `@yearly`      | `years`     | `YEARS`       |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ScheduleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schedule {
  Hours,
  Days,
  Weeks,
  Months,
  Years,
}

impl Schedule {
  pub const ALL: [Schedule; 5] = [
    Schedule::Hours,
    Schedule::Days,
    Schedule::Weeks,
    Schedule::Months,
    Schedule::Years,
  ];

  /// Normalize a recurrence alias into its canonical schedule.
  pub fn parse(token: &str) -> Result<Self, ScheduleError> {
    match token.to_ascii_uppercase().as_str() {
      "HOURS" | "HOURLY" => Ok(Self::Hours),
      "DAYS" | "DAILY" => Ok(Self::Days),
      "WEEKS" | "WEEKLY" => Ok(Self::Weeks),
      "MONTHS" | "MONTHLY" => Ok(Self::Months),
      "YEARS" | "YEARLY" => Ok(Self::Years),
      _ => Err(ScheduleError {
        token: token.to_string(),
      }),
    }
  }

  /// The cron macro that triggers this schedule.
  pub fn expression(&self) -> &'static str {
    match self {
      Self::Hours => "@hourly",
      Self::Days => "@daily",
      Self::Weeks => "@weekly",
      Self::Months => "@monthly",
      Self::Years => "@yearly",
    }
  }

  /// Lowercase form used when persisting or transporting the schedule.
  pub fn to_json(&self) -> &'static str {
    match self {
      Self::Hours => "hours",
      Self::Days => "days",
      Self::Weeks => "weeks",
      Self::Months => "months",
      Self::Years => "years",
    }
  }

  /// Uppercase canonical name.
  pub fn name(&self) -> &'static str {
    match self {
      Self::Hours => "HOURS",
      Self::Days => "DAYS",
      Self::Weeks => "WEEKS",
      Self::Months => "MONTHS",
      Self::Years => "YEARS",
    }
  }
}

impl fmt::Display for Schedule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for Schedule {
  type Err = ScheduleError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl Serialize for Schedule {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.to_json())
  }
}

impl<'de> Deserialize<'de> for Schedule {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let token = String::deserialize(deserializer)?;
    Self::parse(&token).map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(token: &str) -> Schedule {
    Schedule::parse(token).expect("schedule should parse")
  }

  #[test]
  fn test_parse_expression() {
    assert_eq!(parse("HOURS").expression(), "@hourly");
    assert_eq!(parse("DAYS").expression(), "@daily");
    assert_eq!(parse("WEEKS").expression(), "@weekly");
    assert_eq!(parse("MONTHS").expression(), "@monthly");
    assert_eq!(parse("YEARS").expression(), "@yearly");
  }

  #[test]
  fn test_to_json() {
    assert_eq!(parse("HOURS").to_json(), "hours");
    assert_eq!(parse("DAYS").to_json(), "days");
    assert_eq!(parse("WEEKS").to_json(), "weeks");
    assert_eq!(parse("MONTHS").to_json(), "months");
    assert_eq!(parse("YEARS").to_json(), "years");
  }

  #[test]
  fn test_adjective_to_string() {
    assert_eq!(parse("HOURLY").to_string(), "HOURS");
    assert_eq!(parse("DAILY").to_string(), "DAYS");
    assert_eq!(parse("WEEKLY").to_string(), "WEEKS");
    assert_eq!(parse("MONTHLY").to_string(), "MONTHS");
    assert_eq!(parse("YEARLY").to_string(), "YEARS");
  }

  #[test]
  fn test_synonyms_collapse() {
    let pairs = [
      ("HOURS", "HOURLY"),
      ("DAYS", "DAILY"),
      ("WEEKS", "WEEKLY"),
      ("MONTHS", "MONTHLY"),
      ("YEARS", "YEARLY"),
    ];
    for (noun, adjective) in pairs {
      assert_eq!(parse(noun), parse(adjective));
      assert_eq!(parse(noun).to_json(), parse(adjective).to_json());
      assert_eq!(parse(noun).to_string(), parse(adjective).to_string());
    }
  }

  #[test]
  fn test_case_insensitive() {
    assert_eq!(parse("daily"), Schedule::Days);
    assert_eq!(parse("Weekly"), Schedule::Weeks);
    assert_eq!(parse("hOuRs"), Schedule::Hours);
  }

  #[test]
  fn test_unparsable() {
    for token in ["", "minutes", "@daily", "0 * * * *", " days", "day", "annually"] {
      assert_eq!(
        Schedule::parse(token),
        Err(ScheduleError {
          token: token.to_string()
        })
      );
    }
  }

  #[test]
  fn test_from_str() {
    let schedule: Schedule = "monthly".parse().unwrap();
    assert_eq!(schedule, Schedule::Months);
  }

  #[test]
  fn test_serde() {
    assert_eq!(serde_json::to_string(&Schedule::Weeks).unwrap(), "\"weeks\"");
    let schedule: Schedule = serde_json::from_str("\"YEARLY\"").unwrap();
    assert_eq!(schedule, Schedule::Years);
    assert!(serde_json::from_str::<Schedule>("\"fortnightly\"").is_err());
  }

  #[test]
  fn test_all_round_trips_through_name() {
    for schedule in Schedule::ALL {
      assert_eq!(parse(schedule.name()), schedule);
    }
  }
}
