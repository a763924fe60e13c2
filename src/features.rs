//! Customer attributes and their assembly into the model's input vector.
//!
//! The scaler and classifier were fitted on columns in [`FEATURE_NAMES`]
//! order. Nothing in a bare feature vector records that order, so
//! [`PredictionRequest::to_features`] is the single place it is decided.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Number of columns the artifacts are fitted on.
pub const FEATURE_COUNT: usize = 11;

/// Column order of the assembled feature vector.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Age",
    "Experience",
    "Income",
    "Family",
    "CCAvg",
    "Education",
    "Mortgage",
    "Securities",
    "CD",
    "Online",
    "CreditCard",
];

/// Highest education level attained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Education {
    Undergrad = 1,
    Graduate = 2,
    Advanced = 3,
}

impl Education {
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Undergrad => "Undergrad",
            Self::Graduate => "Graduate",
            Self::Advanced => "Advanced/Professional",
        }
    }
}

impl TryFrom<u8> for Education {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Undergrad),
            2 => Ok(Self::Graduate),
            3 => Ok(Self::Advanced),
            other => Err(format!("education level must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<Education> for u8 {
    fn from(value: Education) -> Self {
        value.ordinal()
    }
}

impl fmt::Display for Education {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ordinal(), self.description())
    }
}

/// One customer's attributes as submitted by the form or the JSON API.
///
/// Field names on the wire match the column names the model was trained on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Age in years.
    #[serde(rename = "Age")]
    pub age: f64,
    /// Years of professional experience.
    #[serde(rename = "Experience")]
    pub experience: f64,
    /// Annual income in $1000s.
    #[serde(rename = "Income")]
    pub income: f64,
    /// Number of family members.
    #[serde(rename = "Family")]
    pub family: f64,
    /// Average monthly credit card spending in $1000s.
    #[serde(rename = "CCAvg")]
    pub cc_avg: f64,
    #[serde(rename = "Education")]
    pub education: Education,
    /// Value of house mortgage, if any.
    #[serde(rename = "Mortgage")]
    pub mortgage: f64,
    /// Holds a securities account with the bank.
    #[serde(rename = "Securities", default, deserialize_with = "flag")]
    pub securities: bool,
    /// Holds a certificate of deposit account.
    #[serde(rename = "CD", default, deserialize_with = "flag")]
    pub cd: bool,
    /// Uses online banking.
    #[serde(rename = "Online", default, deserialize_with = "flag")]
    pub online: bool,
    /// Holds a credit card issued by the bank.
    #[serde(rename = "CreditCard", default, deserialize_with = "flag")]
    pub credit_card: bool,
}

impl PredictionRequest {
    /// Assembles the feature vector in [`FEATURE_NAMES`] order, with flags
    /// coerced to 0/1 and education to its ordinal.
    pub fn to_features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age,
            self.experience,
            self.income,
            self.family,
            self.cc_avg,
            f64::from(self.education.ordinal()),
            self.mortgage,
            f64::from(u8::from(self.securities)),
            f64::from(u8::from(self.cd)),
            f64::from(u8::from(self.online)),
            f64::from(u8::from(self.credit_card)),
        ]
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// Accepts JSON booleans, 0/1, and the strings HTML checkboxes and query
/// strings produce. An unchecked checkbox is simply absent from a form body,
/// which `#[serde(default)]` covers.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match FlagRepr::deserialize(deserializer)? {
        FlagRepr::Bool(value) => Ok(value),
        FlagRepr::Int(0) => Ok(false),
        FlagRepr::Int(1) => Ok(true),
        FlagRepr::Int(other) => Err(serde::de::Error::custom(format!(
            "expected 0 or 1, got {other}"
        ))),
        FlagRepr::Text(text) => match text.to_ascii_lowercase().as_str() {
            "on" | "true" | "1" | "yes" => Ok(true),
            "off" | "false" | "0" | "no" | "" => Ok(false),
            _ => Err(serde::de::Error::custom(format!(
                "expected a boolean flag, got '{text}'"
            ))),
        },
    }
}
