pub mod accommodation_repo;
pub mod app_config;
pub mod change_log_repo;
pub mod customer_repo;
pub mod database;
pub mod memory;
pub mod minibar_repo;
pub mod staff_repo;
pub mod stay_repo;

use std::sync::Arc;

use inn_core::repository::DataSource;

pub use app_config::{BackendMode, Config};
pub use database::DbClient;
pub use memory::MemoryStore;
pub use staff_repo::StoreStaffDirectory;

/// Wires every repository trait to its PostgreSQL implementation.
pub fn postgres_data_source(db: &DbClient) -> DataSource {
    let accommodations = Arc::new(accommodation_repo::StoreAccommodationRepository::new(db.pool.clone()));
    DataSource {
        customers: Arc::new(customer_repo::StoreCustomerRepository::new(db.pool.clone())),
        accommodation_types: accommodations.clone(),
        accommodations,
        minibar: Arc::new(minibar_repo::StoreMinibarRepository::new(db.pool.clone())),
        stays: Arc::new(stay_repo::StoreStayRepository::new(db.pool.clone())),
        change_log: Arc::new(change_log_repo::StoreChangeLogRepository::new(db.pool.clone())),
    }
}

/// A data source over a freshly seeded fixture store.
pub fn fixture_data_source() -> DataSource {
    DataSource::from_shared(Arc::new(MemoryStore::seeded()))
}
