//! Test fixtures for REST API testing.

use chrono::{Duration, Utc};
use serde_json::{Value, json};

/// Builder for create and update payloads.
#[derive(Debug, Clone)]
pub struct PatientFixture {
    pub document_type: String,
    pub document_number: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl PatientFixture {
    /// Creates a valid fixture with the given document number and names.
    pub fn new(
        document_number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            document_type: "CC".to_string(),
            document_number: document_number.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date: "1990-04-12".to_string(),
            phone_number: Some("3001234567".to_string()),
            email: None,
        }
    }

    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = document_type.into();
        self
    }

    pub fn with_birth_date(mut self, date: impl Into<String>) -> Self {
        self.birth_date = date.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets a birth date `days` after today (UTC).
    pub fn born_in_days(self, days: i64) -> Self {
        let date = (Utc::now() + Duration::days(days)).format("%Y-%m-%d").to_string();
        self.with_birth_date(date)
    }

    pub fn to_json(&self) -> Value {
        json!({
            "documentType": self.document_type,
            "documentNumber": self.document_number,
            "firstName": self.first_name,
            "lastName": self.last_name,
            "birthDate": self.birth_date,
            "phoneNumber": self.phone_number,
            "email": self.email,
        })
    }
}

/// Ana Rojas, CC 1020304050.
pub fn ana() -> PatientFixture {
    PatientFixture::new("1020304050", "Ana", "Rojas").with_email("ana.rojas@example.com")
}

/// Luis Pérez, CC 79865432.
pub fn luis() -> PatientFixture {
    PatientFixture::new("79865432", "Luis", "Pérez")
}
