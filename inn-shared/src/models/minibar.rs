use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::contains_ci;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MinibarItem {
    pub id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl MinibarItem {
    pub fn new(input: &MinibarItemInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            price_cents: input.price_cents,
            active: true,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, input: &MinibarItemInput) {
        self.name = input.name.trim().to_string();
        self.price_cents = input.price_cents;
    }

    pub fn matches_search(&self, term: &str) -> bool {
        contains_ci(&self.name, term)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinibarItemInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price_cents: i64,
}

/// A minibar item charged to a stay. Price is a snapshot taken when recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MinibarConsumption {
    pub id: Uuid,
    pub stay_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl MinibarConsumption {
    pub fn new(stay_id: Uuid, item: &MinibarItem, quantity: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            stay_id,
            item_id: item.id,
            quantity,
            unit_price_cents: item.price_cents,
            total_cents: item.price_cents.saturating_mul(i64::from(quantity)),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionInput {
    pub item_id: Uuid,
    #[serde(default)]
    pub quantity: i32,
}
