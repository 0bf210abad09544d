//! Contractor records
//!
//! The typed record shape for rows in the `contractors` table. Every field's
//! nullability is declared here; conversion from database rows happens in
//! the repository and nowhere else.

pub mod repository;

pub use repository::ContractorRepository;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// License status as recorded by the licensing board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LicenseStatus {
    #[default]
    Clear,
    Active,
    Inactive,
    Expired,
    Suspended,
    Revoked,
}

impl LicenseStatus {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseStatus::Clear => "CLEAR",
            LicenseStatus::Active => "ACTIVE",
            LicenseStatus::Inactive => "INACTIVE",
            LicenseStatus::Expired => "EXPIRED",
            LicenseStatus::Suspended => "SUSPENDED",
            LicenseStatus::Revoked => "REVOKED",
        }
    }

    /// Parse from database string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CLEAR" => Some(LicenseStatus::Clear),
            "ACTIVE" => Some(LicenseStatus::Active),
            "INACTIVE" => Some(LicenseStatus::Inactive),
            "EXPIRED" => Some(LicenseStatus::Expired),
            "SUSPENDED" => Some(LicenseStatus::Suspended),
            "REVOKED" => Some(LicenseStatus::Revoked),
            _ => None,
        }
    }
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

/// A licensed contractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contractor {
    /// License number, the primary key (e.g. "996518")
    pub license_no: String,
    /// Registered business name
    pub business_name: String,
    /// City of record; absent for some out-of-state registrations
    pub city: Option<String>,
    /// Two-letter state code
    pub state: Option<String>,
    /// ZIP code
    pub zip: Option<String>,
    /// Phone number as published by the board
    pub phone: Option<String>,
    /// License status
    #[serde(default)]
    pub status: LicenseStatus,
    /// Primary classification code (e.g. "C-36")
    pub classification: Option<String>,
    /// Raw classification string from the source extract (e.g. "C-36 | C-42")
    pub raw_classifications: Option<String>,
    /// Normalized, searchable list of classification codes
    pub classification_codes: Option<String>,
    /// Human-readable trade label (e.g. "Plumbing")
    pub trade: Option<String>,
    /// License issue date
    pub issue_date: Option<NaiveDate>,
    /// License expiration date
    pub expire_date: Option<NaiveDate>,
    /// When the row was first imported
    #[serde(default = "now")]
    pub created_at: DateTime<Utc>,
    /// When the row was last refreshed from the source
    #[serde(default = "now")]
    pub updated_at: DateTime<Utc>,
}

impl Contractor {
    /// Create a new contractor record with the given license number and name
    pub fn new(license_no: impl Into<String>, business_name: impl Into<String>) -> Self {
        let ts = Utc::now();
        Self {
            license_no: license_no.into(),
            business_name: business_name.into(),
            city: None,
            state: Some("CA".to_string()),
            zip: None,
            phone: None,
            status: LicenseStatus::Clear,
            classification: None,
            raw_classifications: None,
            classification_codes: None,
            trade: None,
            issue_date: None,
            expire_date: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    /// Set the city
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Set the license status
    pub fn with_status(mut self, status: LicenseStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the classification code, mirroring it into the searchable
    /// classification columns
    pub fn with_classification(mut self, code: impl Into<String>, trade: impl Into<String>) -> Self {
        let code = code.into();
        self.raw_classifications = Some(code.clone());
        self.classification_codes = Some(code.clone());
        self.classification = Some(code);
        self.trade = Some(trade.into());
        self
    }
}
