//! Input validation schemas
//!
//! One schema per form. Each collects every failing field instead of stopping
//! at the first one, so a client can render the messages inline.

use chrono::{NaiveDate, Utc};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use uuid::Uuid;

use inn_shared::{
    AccommodationInput, AccommodationTypeInput, CheckInInput, CustomerInput, MinibarItemInput,
};

// ── Text length limits ──────────────────────────────────────────────

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_NOTE_LEN: usize = 500;
pub const MAX_SHORT_TEXT_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 254;

// ── Money and quantity limits ───────────────────────────────────────

/// R$ 10.000.000,00. Keeps charge and revenue totals far from `i64` overflow.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;
pub const MAX_QUANTITY: i32 = 999;

static NATIONAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$").expect("national id pattern"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// Field name → first failing rule message.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` unless the field already has an error.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().copied().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

// ── Rule helpers ────────────────────────────────────────────────────

fn check_name(errors: &mut FieldErrors, field: &'static str, value: &str, label: &str) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, format!("{label} is required"));
    } else if trimmed.chars().count() < MIN_NAME_LEN {
        errors.add(field, format!("{label} must have at least {MIN_NAME_LEN} characters"));
    } else if trimmed.chars().count() > MAX_NAME_LEN {
        errors.add(field, format!("{label} is too long (max {MAX_NAME_LEN})"));
    }
}

fn check_required(errors: &mut FieldErrors, field: &'static str, value: &str, label: &str, max_len: usize) {
    if value.trim().is_empty() {
        errors.add(field, format!("{label} is required"));
    } else if value.chars().count() > max_len {
        errors.add(field, format!("{label} is too long (max {max_len})"));
    }
}

fn check_optional(errors: &mut FieldErrors, field: &'static str, value: &Option<String>, max_len: usize) {
    if let Some(v) = value {
        if v.chars().count() > max_len {
            errors.add(field, format!("{field} is too long (max {max_len})"));
        }
    }
}

// ── Schemas ─────────────────────────────────────────────────────────

/// Returns the validated birth date.
pub fn validate_customer(input: &CustomerInput) -> Result<NaiveDate, FieldErrors> {
    let mut errors = FieldErrors::new();

    check_name(&mut errors, "name", &input.name, "Name");

    let birth_date = match input.birth_date {
        None => {
            errors.add("birth_date", "Birth date is required");
            None
        }
        Some(date) if date > Utc::now().date_naive() => {
            errors.add("birth_date", "Birth date cannot be in the future");
            None
        }
        Some(date) => Some(date),
    };

    if input.national_id.trim().is_empty() {
        errors.add("national_id", "National ID is required");
    } else if !NATIONAL_ID_RE.is_match(&input.national_id) {
        errors.add("national_id", "National ID must match 000.000.000-00");
    }

    if input.email.trim().is_empty() {
        errors.add("email", "Email is required");
    } else if input.email.chars().count() > MAX_EMAIL_LEN || !EMAIL_RE.is_match(input.email.trim()) {
        errors.add("email", "Email is invalid");
    }

    check_required(&mut errors, "phone", &input.phone, "Phone", MAX_SHORT_TEXT_LEN);

    let state = input.state.trim();
    if state.is_empty() {
        errors.add("state", "State is required");
    } else if state.chars().count() != 2 {
        errors.add("state", "State must have exactly 2 characters");
    }

    check_name(&mut errors, "city", &input.city, "City");

    match birth_date {
        Some(date) => errors.into_result(date),
        None => Err(errors),
    }
}

pub fn validate_accommodation_type(input: &AccommodationTypeInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_name(&mut errors, "name", &input.name, "Name");
    check_optional(&mut errors, "description", &input.description, MAX_NOTE_LEN);
    errors.into_result(())
}

/// Returns the referenced type id.
pub fn validate_accommodation(input: &AccommodationInput) -> Result<Uuid, FieldErrors> {
    let mut errors = FieldErrors::new();

    check_name(&mut errors, "name", &input.name, "Name");
    check_required(&mut errors, "number", &input.number, "Number", MAX_SHORT_TEXT_LEN);

    if input.nightly_rate_cents < 0 {
        errors.add("nightly_rate_cents", "Nightly rate must not be negative");
    } else if input.nightly_rate_cents > MAX_PRICE_CENTS {
        errors.add("nightly_rate_cents", format!("Nightly rate must not exceed {MAX_PRICE_CENTS} cents"));
    }
    if input.max_occupancy < 1 {
        errors.add("max_occupancy", "Max occupancy must be at least 1");
    }
    if input.type_id.is_none() {
        errors.add("type_id", "Accommodation type is required");
    }

    match input.type_id {
        Some(type_id) => errors.into_result(type_id),
        None => Err(errors),
    }
}

pub fn validate_minibar_item(input: &MinibarItemInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_name(&mut errors, "name", &input.name, "Name");
    if input.price_cents < 0 {
        errors.add("price_cents", "Price must not be negative");
    } else if input.price_cents > MAX_PRICE_CENTS {
        errors.add("price_cents", format!("Price must not exceed {MAX_PRICE_CENTS} cents"));
    }
    errors.into_result(())
}

pub fn validate_check_in(input: &CheckInInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_optional(&mut errors, "notes", &input.notes, MAX_NOTE_LEN);
    errors.into_result(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if quantity < 1 {
        errors.add("quantity", "Quantity must be at least 1");
    } else if quantity > MAX_QUANTITY {
        errors.add("quantity", format!("Quantity must not exceed {MAX_QUANTITY}"));
    }
    errors.into_result(())
}

pub fn validate_period(from: NaiveDate, to: NaiveDate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if from > to {
        errors.add("from", "Start date must not be after end date");
    }
    errors.into_result(())
}

/// Formats raw digits as `000.000.000-00`, ignoring any other characters and
/// truncating after eleven digits. Partial input yields a partial mask.
pub fn format_national_id(raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).take(11).collect();
    let mut out = String::with_capacity(14);
    for (i, d) in digits.iter().enumerate() {
        match i {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(*d);
    }
    out
}
