// ABOUTME: Fixed-point card balance with two decimal places
// ABOUTME: Stored as integer cents, exchanged as a "12.50"-style decimal string

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Eight significant digits, two of them after the decimal point
pub const MAX_ABS_CENTS: i64 = 99_999_999;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("Invalid balance: {0:?}")]
    InvalidFormat(String),

    #[error("Balance out of range: {0}")]
    OutOfRange(i64),
}

fn balance_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([+-]?)([0-9]{1,6})(?:\.([0-9]{1,2}))?$").expect("balance pattern is valid")
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Balance {
    cents: i64,
}

impl Balance {
    pub fn from_cents(cents: i64) -> Result<Self, BalanceError> {
        if cents.abs() > MAX_ABS_CENTS {
            return Err(BalanceError::OutOfRange(cents));
        }
        Ok(Self { cents })
    }

    pub fn cents(self) -> i64 {
        self.cents
    }
}

impl FromStr for Balance {
    type Err = BalanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = balance_pattern()
            .captures(s)
            .ok_or_else(|| BalanceError::InvalidFormat(s.to_string()))?;

        let units: i64 = caps[2]
            .parse()
            .map_err(|_| BalanceError::InvalidFormat(s.to_string()))?;
        let fraction: i64 = match caps.get(3) {
            Some(m) => {
                let digits: i64 = m
                    .as_str()
                    .parse()
                    .map_err(|_| BalanceError::InvalidFormat(s.to_string()))?;
                if m.as_str().len() == 1 {
                    digits * 10
                } else {
                    digits
                }
            }
            None => 0,
        };

        let cents = units * 100 + fraction;
        let cents = if &caps[1] == "-" { -cents } else { cents };
        Self::from_cents(cents)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Balance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Balance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Integer(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
            Raw::Integer(units) => units
                .checked_mul(100)
                .ok_or(BalanceError::OutOfRange(units))
                .and_then(Balance::from_cents)
                .map_err(serde::de::Error::custom),
        }
    }
}
