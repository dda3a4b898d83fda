//! In-memory fixture store. Serves every repository trait from one set of
//! tables behind a single lock; nothing survives a restart.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use inn_core::repository::{
    AccommodationRepository, AccommodationTypeRepository, ChangeLogRepository, CustomerRepository,
    MinibarRepository, StayRepository,
};
use inn_core::{StoreError, StoreResult};
use inn_shared::{
    Accommodation, AccommodationType, ChangeLog, Customer, MinibarConsumption, MinibarItem, NewChangeLog,
    NewStay, Stay, StayStatus,
};

#[derive(Default)]
struct Tables {
    customers: Vec<Customer>,
    accommodation_types: Vec<AccommodationType>,
    accommodations: Vec<Accommodation>,
    minibar_items: Vec<MinibarItem>,
    consumptions: Vec<MinibarConsumption>,
    stays: Vec<Stay>,
    change_logs: Vec<ChangeLog>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

fn not_found(what: &str, id: Uuid) -> StoreError {
    StoreError::NotFound(format!("{} {}", what, id))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demo dataset: two types, three suites, two customers, five minibar
    /// items and one guest checked into 102.
    pub fn seeded() -> Self {
        let now = Utc::now();

        let suite = fixture_type("Suíte", now);
        let apartment = fixture_type("Apartamento", now);

        let accommodations = vec![
            fixture_accommodation("Suíte Lopes Mendes", "101", 35_000, 2, suite.id, true, now),
            fixture_accommodation("Suíte Parnaioca", "102", 40_000, 3, suite.id, true, now),
            fixture_accommodation("Suíte Lagoa Azul", "103", 38_000, 2, suite.id, false, now),
        ];

        let joao = fixture_customer("João Silva", "123.456.789-00", "joao@email.com", "RJ", "Angra dos Reis", now);
        let maria = fixture_customer("Maria Santos", "987.654.321-00", "maria@email.com", "SP", "São Paulo", now);

        let minibar_items = [
            ("Água Mineral 500ml", 350),
            ("Refrigerante Coca-Cola 350ml", 500),
            ("Cerveja Heineken 330ml", 800),
            ("Suco de Laranja 300ml", 450),
            ("Chocolate Nestlé", 600),
        ]
        .into_iter()
        .map(|(name, price_cents)| MinibarItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price_cents,
            active: true,
            created_at: now,
        })
        .collect();

        let parnaioca = &accommodations[1];
        let stay = NewStay {
            customer_id: joao.id,
            accommodation_id: parnaioca.id,
            nightly_rate_cents: parnaioca.nightly_rate_cents,
            notes: None,
            check_in_at: now,
        }
        .into_stay();

        Self {
            tables: RwLock::new(Tables {
                customers: vec![joao, maria],
                accommodation_types: vec![suite, apartment],
                accommodations,
                minibar_items,
                consumptions: Vec::new(),
                stays: vec![stay],
                change_logs: Vec::new(),
            }),
        }
    }
}

fn fixture_type(name: &str, now: DateTime<Utc>) -> AccommodationType {
    AccommodationType {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        active: true,
        created_at: now,
    }
}

fn fixture_accommodation(
    name: &str,
    number: &str,
    nightly_rate_cents: i64,
    max_occupancy: i32,
    type_id: Uuid,
    has_parking: bool,
    now: DateTime<Utc>,
) -> Accommodation {
    Accommodation {
        id: Uuid::new_v4(),
        name: name.to_string(),
        number: number.to_string(),
        nightly_rate_cents,
        max_occupancy,
        type_id,
        has_minibar: true,
        has_parking,
        active: true,
        created_at: now,
        updated_at: now,
    }
}

fn fixture_customer(
    name: &str,
    national_id: &str,
    email: &str,
    state: &str,
    city: &str,
    now: DateTime<Utc>,
) -> Customer {
    Customer {
        id: Uuid::new_v4(),
        name: name.to_string(),
        birth_date: NaiveDate::from_ymd_opt(1985, 6, 15).unwrap_or_default(),
        national_id: national_id.to_string(),
        email: email.to_string(),
        phone: "(24) 99999-0000".to_string(),
        state: state.to_string(),
        city: city.to_string(),
        active: true,
        created_at: now - Duration::days(30),
        updated_at: now - Duration::days(30),
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let mut customers = self.tables.read().await.customers.clone();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn get_customer(&self, id: Uuid) -> StoreResult<Option<Customer>> {
        Ok(self.tables.read().await.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn find_customer_by_national_id(&self, national_id: &str) -> StoreResult<Option<Customer>> {
        let tables = self.tables.read().await;
        Ok(tables.customers.iter().find(|c| c.national_id == national_id).cloned())
    }

    async fn insert_customer(&self, customer: &Customer) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.customers.iter().any(|c| c.national_id == customer.national_id) {
            return Err(StoreError::UniqueViolation { field: "national_id" });
        }
        tables.customers.push(customer.clone());
        Ok(())
    }

    async fn update_customer(&self, customer: &Customer) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables
            .customers
            .iter()
            .any(|c| c.id != customer.id && c.national_id == customer.national_id)
        {
            return Err(StoreError::UniqueViolation { field: "national_id" });
        }
        let slot = tables
            .customers
            .iter_mut()
            .find(|c| c.id == customer.id)
            .ok_or_else(|| not_found("customer", customer.id))?;
        *slot = customer.clone();
        Ok(())
    }

    async fn set_customer_active(&self, id: Uuid, active: bool) -> StoreResult<Customer> {
        let mut tables = self.tables.write().await;
        let customer = tables
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("customer", id))?;
        customer.active = active;
        customer.updated_at = Utc::now();
        Ok(customer.clone())
    }
}

#[async_trait]
impl AccommodationTypeRepository for MemoryStore {
    async fn list_types(&self) -> StoreResult<Vec<AccommodationType>> {
        let mut types = self.tables.read().await.accommodation_types.clone();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    async fn get_type(&self, id: Uuid) -> StoreResult<Option<AccommodationType>> {
        let tables = self.tables.read().await;
        Ok(tables.accommodation_types.iter().find(|t| t.id == id).cloned())
    }

    async fn insert_type(&self, accommodation_type: &AccommodationType) -> StoreResult<()> {
        self.tables.write().await.accommodation_types.push(accommodation_type.clone());
        Ok(())
    }

    async fn update_type(&self, accommodation_type: &AccommodationType) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .accommodation_types
            .iter_mut()
            .find(|t| t.id == accommodation_type.id)
            .ok_or_else(|| not_found("accommodation type", accommodation_type.id))?;
        *slot = accommodation_type.clone();
        Ok(())
    }

    async fn set_type_active(&self, id: Uuid, active: bool) -> StoreResult<AccommodationType> {
        let mut tables = self.tables.write().await;
        let accommodation_type = tables
            .accommodation_types
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("accommodation type", id))?;
        accommodation_type.active = active;
        Ok(accommodation_type.clone())
    }
}

#[async_trait]
impl AccommodationRepository for MemoryStore {
    async fn list_accommodations(&self) -> StoreResult<Vec<Accommodation>> {
        let mut accommodations = self.tables.read().await.accommodations.clone();
        accommodations.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(accommodations)
    }

    async fn get_accommodation(&self, id: Uuid) -> StoreResult<Option<Accommodation>> {
        Ok(self.tables.read().await.accommodations.iter().find(|a| a.id == id).cloned())
    }

    async fn find_accommodation_by_number(&self, number: &str) -> StoreResult<Option<Accommodation>> {
        let tables = self.tables.read().await;
        Ok(tables.accommodations.iter().find(|a| a.number == number).cloned())
    }

    async fn insert_accommodation(&self, accommodation: &Accommodation) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.accommodations.iter().any(|a| a.number == accommodation.number) {
            return Err(StoreError::UniqueViolation { field: "number" });
        }
        tables.accommodations.push(accommodation.clone());
        Ok(())
    }

    async fn update_accommodation(&self, accommodation: &Accommodation) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables
            .accommodations
            .iter()
            .any(|a| a.id != accommodation.id && a.number == accommodation.number)
        {
            return Err(StoreError::UniqueViolation { field: "number" });
        }
        let slot = tables
            .accommodations
            .iter_mut()
            .find(|a| a.id == accommodation.id)
            .ok_or_else(|| not_found("accommodation", accommodation.id))?;
        *slot = accommodation.clone();
        Ok(())
    }

    async fn set_accommodation_active(&self, id: Uuid, active: bool) -> StoreResult<Accommodation> {
        let mut tables = self.tables.write().await;
        let accommodation = tables
            .accommodations
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found("accommodation", id))?;
        accommodation.active = active;
        accommodation.updated_at = Utc::now();
        Ok(accommodation.clone())
    }
}

#[async_trait]
impl MinibarRepository for MemoryStore {
    async fn list_items(&self) -> StoreResult<Vec<MinibarItem>> {
        let mut items = self.tables.read().await.minibar_items.clone();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn get_item(&self, id: Uuid) -> StoreResult<Option<MinibarItem>> {
        Ok(self.tables.read().await.minibar_items.iter().find(|i| i.id == id).cloned())
    }

    async fn insert_item(&self, item: &MinibarItem) -> StoreResult<()> {
        self.tables.write().await.minibar_items.push(item.clone());
        Ok(())
    }

    async fn update_item(&self, item: &MinibarItem) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .minibar_items
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or_else(|| not_found("minibar item", item.id))?;
        *slot = item.clone();
        Ok(())
    }

    async fn set_item_active(&self, id: Uuid, active: bool) -> StoreResult<MinibarItem> {
        let mut tables = self.tables.write().await;
        let item = tables
            .minibar_items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found("minibar item", id))?;
        item.active = active;
        Ok(item.clone())
    }

    async fn insert_consumption(&self, consumption: &MinibarConsumption) -> StoreResult<()> {
        self.tables.write().await.consumptions.push(consumption.clone());
        Ok(())
    }

    async fn list_consumptions(&self, stay_id: Option<Uuid>) -> StoreResult<Vec<MinibarConsumption>> {
        let tables = self.tables.read().await;
        Ok(tables
            .consumptions
            .iter()
            .filter(|c| stay_id.map_or(true, |id| c.stay_id == id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StayRepository for MemoryStore {
    async fn list_stays(&self, status: Option<StayStatus>) -> StoreResult<Vec<Stay>> {
        let tables = self.tables.read().await;
        let mut stays: Vec<Stay> = tables
            .stays
            .iter()
            .filter(|s| status.map_or(true, |st| s.status == st))
            .cloned()
            .collect();
        stays.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(stays)
    }

    async fn get_stay(&self, id: Uuid) -> StoreResult<Option<Stay>> {
        Ok(self.tables.read().await.stays.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_checked_in(&self, stay: NewStay) -> StoreResult<Stay> {
        let mut tables = self.tables.write().await;
        // Checked under the write lock, so two check-ins cannot both pass.
        if tables
            .stays
            .iter()
            .any(|s| s.accommodation_id == stay.accommodation_id && s.status == StayStatus::CheckedIn)
        {
            return Err(StoreError::AccommodationOccupied);
        }
        let stay = stay.into_stay();
        tables.stays.push(stay.clone());
        Ok(stay)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: StayStatus,
        to: StayStatus,
        check_out_at: Option<DateTime<Utc>>,
    ) -> StoreResult<Option<Stay>> {
        let mut tables = self.tables.write().await;
        let Some(stay) = tables.stays.iter_mut().find(|s| s.id == id && s.status == from) else {
            return Ok(None);
        };
        stay.status = to;
        if check_out_at.is_some() {
            stay.check_out_at = check_out_at;
        }
        stay.updated_at = Utc::now();
        Ok(Some(stay.clone()))
    }
}

#[async_trait]
impl ChangeLogRepository for MemoryStore {
    async fn append(&self, entry: NewChangeLog) -> StoreResult<ChangeLog> {
        let log = entry.into_log();
        self.tables.write().await.change_logs.push(log.clone());
        Ok(log)
    }

    async fn list_recent(&self, limit: usize) -> StoreResult<Vec<ChangeLog>> {
        let tables = self.tables.read().await;
        Ok(tables.change_logs.iter().rev().take(limit).cloned().collect())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.tables.read().await.change_logs.len() as u64)
    }

    async fn purge(&self) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let removed = tables.change_logs.len() as u64;
        tables.change_logs.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seed_has_one_guest_in_102() {
        let store = MemoryStore::seeded();
        let stays = store.list_stays(Some(StayStatus::CheckedIn)).await.unwrap();
        assert_eq!(stays.len(), 1);

        let room = store.get_accommodation(stays[0].accommodation_id).await.unwrap().unwrap();
        assert_eq!(room.number, "102");
        assert_eq!(stays[0].nightly_rate_cents, 40_000);
    }

    #[tokio::test]
    async fn second_check_in_on_same_room_is_rejected() {
        let store = MemoryStore::seeded();
        let occupied = store.find_accommodation_by_number("102").await.unwrap().unwrap();
        let maria = store.find_customer_by_national_id("987.654.321-00").await.unwrap().unwrap();

        let result = store
            .insert_checked_in(NewStay {
                customer_id: maria.id,
                accommodation_id: occupied.id,
                nightly_rate_cents: occupied.nightly_rate_cents,
                notes: None,
                check_in_at: Utc::now(),
            })
            .await;
        assert!(matches!(result, Err(StoreError::AccommodationOccupied)));
    }

    #[tokio::test]
    async fn transition_only_moves_from_the_expected_status() {
        let store = MemoryStore::seeded();
        let stay = store.list_stays(None).await.unwrap().remove(0);

        let cancelled = store
            .transition(stay.id, StayStatus::CheckedOut, StayStatus::Cancelled, None)
            .await
            .unwrap();
        assert!(cancelled.is_none());

        let at = Utc::now();
        let out = store
            .transition(stay.id, StayStatus::CheckedIn, StayStatus::CheckedOut, Some(at))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(out.status, StayStatus::CheckedOut);
        assert_eq!(out.check_out_at, Some(at));
    }

    #[tokio::test]
    async fn change_log_lists_newest_first_and_purges() {
        let store = MemoryStore::new();
        for table_name in ["customers", "stays"] {
            store
                .append(NewChangeLog {
                    actor: "admin@parnaioca.com".into(),
                    table_name,
                    operation: inn_shared::ChangeOperation::Insert,
                    record_id: Uuid::new_v4(),
                    before: None,
                    after: None,
                })
                .await
                .unwrap();
        }

        let recent = store.list_recent(10).await.unwrap();
        assert_eq!(recent[0].table_name, "stays");
        assert_eq!(store.purge().await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
