use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use inn_shared::{
    Accommodation, AccommodationType, ChangeLog, Customer, MinibarConsumption, MinibarItem,
    NewChangeLog, NewStay, Stay, StayStatus,
};

use crate::StoreResult;

/// Repository trait for the guest registry
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// All customers ordered by name.
    async fn list_customers(&self) -> StoreResult<Vec<Customer>>;

    async fn get_customer(&self, id: Uuid) -> StoreResult<Option<Customer>>;

    async fn find_customer_by_national_id(&self, national_id: &str) -> StoreResult<Option<Customer>>;

    /// Fails with `UniqueViolation { field: "national_id" }` when the id is taken.
    async fn insert_customer(&self, customer: &Customer) -> StoreResult<()>;

    async fn update_customer(&self, customer: &Customer) -> StoreResult<()>;

    async fn set_customer_active(&self, id: Uuid, active: bool) -> StoreResult<Customer>;
}

#[async_trait]
pub trait AccommodationTypeRepository: Send + Sync {
    /// All types ordered by name.
    async fn list_types(&self) -> StoreResult<Vec<AccommodationType>>;

    async fn get_type(&self, id: Uuid) -> StoreResult<Option<AccommodationType>>;

    async fn insert_type(&self, accommodation_type: &AccommodationType) -> StoreResult<()>;

    async fn update_type(&self, accommodation_type: &AccommodationType) -> StoreResult<()>;

    async fn set_type_active(&self, id: Uuid, active: bool) -> StoreResult<AccommodationType>;
}

#[async_trait]
pub trait AccommodationRepository: Send + Sync {
    /// All accommodations ordered by unit number.
    async fn list_accommodations(&self) -> StoreResult<Vec<Accommodation>>;

    async fn get_accommodation(&self, id: Uuid) -> StoreResult<Option<Accommodation>>;

    async fn find_accommodation_by_number(&self, number: &str) -> StoreResult<Option<Accommodation>>;

    /// Fails with `UniqueViolation { field: "number" }` when the unit number is taken.
    async fn insert_accommodation(&self, accommodation: &Accommodation) -> StoreResult<()>;

    async fn update_accommodation(&self, accommodation: &Accommodation) -> StoreResult<()>;

    async fn set_accommodation_active(&self, id: Uuid, active: bool) -> StoreResult<Accommodation>;
}

#[async_trait]
pub trait MinibarRepository: Send + Sync {
    /// All items ordered by name.
    async fn list_items(&self) -> StoreResult<Vec<MinibarItem>>;

    async fn get_item(&self, id: Uuid) -> StoreResult<Option<MinibarItem>>;

    async fn insert_item(&self, item: &MinibarItem) -> StoreResult<()>;

    async fn update_item(&self, item: &MinibarItem) -> StoreResult<()>;

    async fn set_item_active(&self, id: Uuid, active: bool) -> StoreResult<MinibarItem>;

    async fn insert_consumption(&self, consumption: &MinibarConsumption) -> StoreResult<()>;

    /// Consumption rows, optionally restricted to one stay, oldest first.
    async fn list_consumptions(&self, stay_id: Option<Uuid>) -> StoreResult<Vec<MinibarConsumption>>;
}

#[async_trait]
pub trait StayRepository: Send + Sync {
    /// Stays newest first, optionally filtered by status.
    async fn list_stays(&self, status: Option<StayStatus>) -> StoreResult<Vec<Stay>>;

    async fn get_stay(&self, id: Uuid) -> StoreResult<Option<Stay>>;

    /// Opens a checked-in stay. Fails with `AccommodationOccupied` when the
    /// accommodation already has one; the check happens at the store boundary.
    async fn insert_checked_in(&self, stay: NewStay) -> StoreResult<Stay>;

    /// Compare-and-swap on the status column. Returns `None` when the stay does
    /// not exist or is not currently in `from`.
    async fn transition(
        &self,
        id: Uuid,
        from: StayStatus,
        to: StayStatus,
        check_out_at: Option<DateTime<Utc>>,
    ) -> StoreResult<Option<Stay>>;
}

#[async_trait]
pub trait ChangeLogRepository: Send + Sync {
    async fn append(&self, entry: NewChangeLog) -> StoreResult<ChangeLog>;

    /// Newest first.
    async fn list_recent(&self, limit: usize) -> StoreResult<Vec<ChangeLog>>;

    async fn count(&self) -> StoreResult<u64>;

    /// Deletes every row and returns how many were removed.
    async fn purge(&self) -> StoreResult<u64>;
}

/// One handle per table family. Built either over PostgreSQL or over the
/// in-memory fixture store; callers never branch on which.
#[derive(Clone)]
pub struct DataSource {
    pub customers: Arc<dyn CustomerRepository>,
    pub accommodation_types: Arc<dyn AccommodationTypeRepository>,
    pub accommodations: Arc<dyn AccommodationRepository>,
    pub minibar: Arc<dyn MinibarRepository>,
    pub stays: Arc<dyn StayRepository>,
    pub change_log: Arc<dyn ChangeLogRepository>,
}

impl DataSource {
    /// Builds a data source where a single value serves every table.
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: CustomerRepository
            + AccommodationTypeRepository
            + AccommodationRepository
            + MinibarRepository
            + StayRepository
            + ChangeLogRepository
            + 'static,
    {
        Self {
            customers: store.clone(),
            accommodation_types: store.clone(),
            accommodations: store.clone(),
            minibar: store.clone(),
            stays: store.clone(),
            change_log: store,
        }
    }
}
