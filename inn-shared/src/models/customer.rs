use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::contains_ci;

/// A registered guest of the inn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    /// National ID (CPF) in `000.000.000-00` form, unique among customers.
    pub national_id: String,
    pub email: String,
    pub phone: String,
    pub state: String,
    pub city: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(input: &CustomerInput, birth_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            birth_date,
            national_id: input.national_id.clone(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            state: input.state.trim().to_uppercase(),
            city: input.city.trim().to_string(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields, keeping identity and active flag.
    pub fn apply(&mut self, input: &CustomerInput, birth_date: NaiveDate) {
        self.name = input.name.trim().to_string();
        self.birth_date = birth_date;
        self.national_id = input.national_id.clone();
        self.email = input.email.trim().to_string();
        self.phone = input.phone.trim().to_string();
        self.state = input.state.trim().to_uppercase();
        self.city = input.city.trim().to_string();
        self.updated_at = Utc::now();
    }

    /// Matches by name, national id or email.
    pub fn matches_search(&self, term: &str) -> bool {
        contains_ci(&self.name, term) || self.national_id.contains(term) || contains_ci(&self.email, term)
    }
}

/// Create/update payload for a customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub national_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
}
