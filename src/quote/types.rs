//! Quote data types
//!
//! Wire format for the wizard is camelCase; the data store uses snake_case
//! columns. Both shapes are defined here so the mapping is one place.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Applicant gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Self-reported health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "excellent",
            HealthStatus::Good => "good",
            HealthStatus::Fair => "fair",
            HealthStatus::Poor => "poor",
        }
    }
}

/// Term length in years. Serialized as the bare number (10, 20, 30).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TermLength {
    Ten,
    Twenty,
    Thirty,
}

impl TermLength {
    pub fn years(&self) -> u8 {
        match self {
            TermLength::Ten => 10,
            TermLength::Twenty => 20,
            TermLength::Thirty => 30,
        }
    }
}

impl TryFrom<u8> for TermLength {
    type Error = String;

    fn try_from(years: u8) -> Result<Self, Self::Error> {
        match years {
            10 => Ok(TermLength::Ten),
            20 => Ok(TermLength::Twenty),
            30 => Ok(TermLength::Thirty),
            other => Err(format!("unsupported term length: {} years", other)),
        }
    }
}

impl From<TermLength> for u8 {
    fn from(term: TermLength) -> Self {
        term.years()
    }
}

/// In-progress quote wizard data.
///
/// Every field stays `None` until the step that collects it is completed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteFormData {
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub health_status: Option<HealthStatus>,
    #[serde(default)]
    pub coverage_amount: Option<f64>,
    #[serde(default)]
    pub term_length: Option<TermLength>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl QuoteFormData {
    /// Applicant display name, when both name parts are known
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        }
    }

    /// Build the insert payload, stamping `created_at`
    pub fn to_row(&self, created_at: DateTime<Utc>) -> NewQuoteRow {
        NewQuoteRow {
            gender: self.gender,
            date_of_birth: self.date_of_birth,
            health_status: self.health_status,
            coverage_amount: self.coverage_amount,
            term_length: self.term_length,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            created_at,
        }
    }
}

/// Row inserted into `quote_requests`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuoteRow {
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub health_status: Option<HealthStatus>,
    pub coverage_amount: Option<f64>,
    pub term_length: Option<TermLength>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row as stored, with the server-assigned identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub row: NewQuoteRow,
}

impl QuoteRecord {
    pub fn created_at(&self) -> DateTime<Utc> {
        self.row.created_at
    }
}
