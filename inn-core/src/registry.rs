//! Registry services: the create / edit / toggle forms for customers,
//! accommodation types, accommodations and minibar items.

use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use inn_shared::{
    Accommodation, AccommodationInput, AccommodationType, AccommodationTypeInput, ChangeOperation,
    Customer, CustomerInput, Masked, MinibarItem, MinibarItemInput,
};

use crate::audit;
use crate::identity::SessionContext;
use crate::repository::DataSource;
use crate::validation::{self, FieldErrors};
use crate::{CoreError, CoreResult};

const CUSTOMERS: &str = "customers";
const ACCOMMODATION_TYPES: &str = "accommodation_types";
const ACCOMMODATIONS: &str = "accommodations";
const MINIBAR_ITEMS: &str = "minibar_items";

fn search_term(search: Option<&str>) -> Option<&str> {
    search.map(str::trim).filter(|s| !s.is_empty())
}

// ============================================================================
// Customers
// ============================================================================

pub async fn list_customers(data: &DataSource, search: Option<&str>) -> CoreResult<Vec<Customer>> {
    let customers = data.customers.list_customers().await?;
    Ok(match search_term(search) {
        Some(term) => customers.into_iter().filter(|c| c.matches_search(term)).collect(),
        None => customers,
    })
}

pub async fn get_customer(data: &DataSource, id: Uuid) -> CoreResult<Customer> {
    data.customers
        .get_customer(id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("customer {}", id)))
}

/// Applies the `000.000.000-00` mask to bare digits the way the form does
/// while typing; anything else is left for validation to judge.
fn mask_national_id(input: &CustomerInput) -> CustomerInput {
    let raw = input.national_id.trim();
    let mut input = input.clone();
    if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
        input.national_id = validation::format_national_id(raw);
    }
    input
}

/// Rejects the national id when another customer already holds it.
async fn ensure_national_id_free(data: &DataSource, national_id: &str, editing: Option<Uuid>) -> CoreResult<()> {
    if let Some(existing) = data.customers.find_customer_by_national_id(national_id).await? {
        if Some(existing.id) != editing {
            tracing::info!(national_id = %Masked(national_id), "Duplicate national id rejected");
            return Err(CoreError::Duplicate { field: "national_id" });
        }
    }
    Ok(())
}

pub async fn create_customer(
    data: &DataSource,
    session: &SessionContext,
    input: &CustomerInput,
) -> CoreResult<Customer> {
    let input = &mask_national_id(input);
    let birth_date = validation::validate_customer(input)?;
    ensure_national_id_free(data, &input.national_id, None).await?;

    let customer = Customer::new(input, birth_date);
    data.customers.insert_customer(&customer).await?;

    audit::record(data, session, CUSTOMERS, ChangeOperation::Insert, customer.id, None, Some(&customer)).await;
    tracing::info!(customer = %customer.id, "Customer registered");
    Ok(customer)
}

pub async fn update_customer(
    data: &DataSource,
    session: &SessionContext,
    id: Uuid,
    input: &CustomerInput,
) -> CoreResult<Customer> {
    let input = &mask_national_id(input);
    let birth_date = validation::validate_customer(input)?;
    let before = get_customer(data, id).await?;
    ensure_national_id_free(data, &input.national_id, Some(id)).await?;

    let mut customer = before.clone();
    customer.apply(input, birth_date);
    data.customers.update_customer(&customer).await?;

    audit::record(data, session, CUSTOMERS, ChangeOperation::Update, id, Some(&before), Some(&customer)).await;
    Ok(customer)
}

pub async fn toggle_customer_status(
    data: &DataSource,
    session: &SessionContext,
    id: Uuid,
) -> CoreResult<Customer> {
    session.require_admin("change customer status")?;
    let before = get_customer(data, id).await?;
    let after = data.customers.set_customer_active(id, !before.active).await?;

    audit::record(data, session, CUSTOMERS, ChangeOperation::Update, id, Some(&before), Some(&after)).await;
    Ok(after)
}

// ============================================================================
// Accommodation types
// ============================================================================

pub async fn list_accommodation_types(
    data: &DataSource,
    search: Option<&str>,
) -> CoreResult<Vec<AccommodationType>> {
    let types = data.accommodation_types.list_types().await?;
    Ok(match search_term(search) {
        Some(term) => types.into_iter().filter(|t| t.matches_search(term)).collect(),
        None => types,
    })
}

pub async fn get_accommodation_type(data: &DataSource, id: Uuid) -> CoreResult<AccommodationType> {
    data.accommodation_types
        .get_type(id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("accommodation type {}", id)))
}

pub async fn create_accommodation_type(
    data: &DataSource,
    session: &SessionContext,
    input: &AccommodationTypeInput,
) -> CoreResult<AccommodationType> {
    validation::validate_accommodation_type(input)?;

    let accommodation_type = AccommodationType::new(input);
    data.accommodation_types.insert_type(&accommodation_type).await?;

    audit::record(
        data,
        session,
        ACCOMMODATION_TYPES,
        ChangeOperation::Insert,
        accommodation_type.id,
        None,
        Some(&accommodation_type),
    )
    .await;
    Ok(accommodation_type)
}

pub async fn update_accommodation_type(
    data: &DataSource,
    session: &SessionContext,
    id: Uuid,
    input: &AccommodationTypeInput,
) -> CoreResult<AccommodationType> {
    validation::validate_accommodation_type(input)?;
    let before = get_accommodation_type(data, id).await?;

    let mut accommodation_type = before.clone();
    accommodation_type.apply(input);
    data.accommodation_types.update_type(&accommodation_type).await?;

    audit::record(
        data,
        session,
        ACCOMMODATION_TYPES,
        ChangeOperation::Update,
        id,
        Some(&before),
        Some(&accommodation_type),
    )
    .await;
    Ok(accommodation_type)
}

pub async fn toggle_accommodation_type_status(
    data: &DataSource,
    session: &SessionContext,
    id: Uuid,
) -> CoreResult<AccommodationType> {
    session.require_admin("change accommodation type status")?;
    let before = get_accommodation_type(data, id).await?;
    let after = data.accommodation_types.set_type_active(id, !before.active).await?;

    audit::record(data, session, ACCOMMODATION_TYPES, ChangeOperation::Update, id, Some(&before), Some(&after)).await;
    Ok(after)
}

// ============================================================================
// Accommodations
// ============================================================================

/// An accommodation with its type name resolved for display.
#[derive(Debug, Clone, Serialize)]
pub struct AccommodationView {
    #[serde(flatten)]
    pub accommodation: Accommodation,
    pub type_name: String,
}

pub async fn list_accommodations(
    data: &DataSource,
    search: Option<&str>,
) -> CoreResult<Vec<AccommodationView>> {
    let accommodations = data.accommodations.list_accommodations().await?;
    let types: HashMap<Uuid, String> = data
        .accommodation_types
        .list_types()
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();

    let term = search_term(search);
    Ok(accommodations
        .into_iter()
        .filter(|a| term.map_or(true, |t| a.matches_search(t)))
        .map(|accommodation| {
            let type_name = types
                .get(&accommodation.type_id)
                .cloned()
                .unwrap_or_else(|| "N/A".to_string());
            AccommodationView { accommodation, type_name }
        })
        .collect())
}

pub async fn get_accommodation(data: &DataSource, id: Uuid) -> CoreResult<Accommodation> {
    data.accommodations
        .get_accommodation(id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("accommodation {}", id)))
}

async fn ensure_type_exists(data: &DataSource, type_id: Uuid) -> CoreResult<()> {
    if data.accommodation_types.get_type(type_id).await?.is_none() {
        let mut errors = FieldErrors::new();
        errors.add("type_id", "Accommodation type does not exist");
        return Err(CoreError::Validation(errors));
    }
    Ok(())
}

async fn ensure_number_free(data: &DataSource, number: &str, editing: Option<Uuid>) -> CoreResult<()> {
    if let Some(existing) = data.accommodations.find_accommodation_by_number(number.trim()).await? {
        if Some(existing.id) != editing {
            return Err(CoreError::Duplicate { field: "number" });
        }
    }
    Ok(())
}

pub async fn create_accommodation(
    data: &DataSource,
    session: &SessionContext,
    input: &AccommodationInput,
) -> CoreResult<Accommodation> {
    let type_id = validation::validate_accommodation(input)?;
    ensure_type_exists(data, type_id).await?;
    ensure_number_free(data, &input.number, None).await?;

    let accommodation = Accommodation::new(input, type_id);
    data.accommodations.insert_accommodation(&accommodation).await?;

    audit::record(
        data,
        session,
        ACCOMMODATIONS,
        ChangeOperation::Insert,
        accommodation.id,
        None,
        Some(&accommodation),
    )
    .await;
    tracing::info!(accommodation = %accommodation.id, number = %accommodation.number, "Accommodation created");
    Ok(accommodation)
}

pub async fn update_accommodation(
    data: &DataSource,
    session: &SessionContext,
    id: Uuid,
    input: &AccommodationInput,
) -> CoreResult<Accommodation> {
    let type_id = validation::validate_accommodation(input)?;
    let before = get_accommodation(data, id).await?;
    ensure_type_exists(data, type_id).await?;
    ensure_number_free(data, &input.number, Some(id)).await?;

    let mut accommodation = before.clone();
    accommodation.apply(input, type_id);
    data.accommodations.update_accommodation(&accommodation).await?;

    audit::record(
        data,
        session,
        ACCOMMODATIONS,
        ChangeOperation::Update,
        id,
        Some(&before),
        Some(&accommodation),
    )
    .await;
    Ok(accommodation)
}

pub async fn toggle_accommodation_status(
    data: &DataSource,
    session: &SessionContext,
    id: Uuid,
) -> CoreResult<Accommodation> {
    session.require_admin("change accommodation status")?;
    let before = get_accommodation(data, id).await?;
    let after = data.accommodations.set_accommodation_active(id, !before.active).await?;

    audit::record(data, session, ACCOMMODATIONS, ChangeOperation::Update, id, Some(&before), Some(&after)).await;
    Ok(after)
}

// ============================================================================
// Minibar items
// ============================================================================

pub async fn list_minibar_items(data: &DataSource, search: Option<&str>) -> CoreResult<Vec<MinibarItem>> {
    let items = data.minibar.list_items().await?;
    Ok(match search_term(search) {
        Some(term) => items.into_iter().filter(|i| i.matches_search(term)).collect(),
        None => items,
    })
}

pub async fn get_minibar_item(data: &DataSource, id: Uuid) -> CoreResult<MinibarItem> {
    data.minibar
        .get_item(id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("minibar item {}", id)))
}

pub async fn create_minibar_item(
    data: &DataSource,
    session: &SessionContext,
    input: &MinibarItemInput,
) -> CoreResult<MinibarItem> {
    validation::validate_minibar_item(input)?;

    let item = MinibarItem::new(input);
    data.minibar.insert_item(&item).await?;

    audit::record(data, session, MINIBAR_ITEMS, ChangeOperation::Insert, item.id, None, Some(&item)).await;
    Ok(item)
}

pub async fn update_minibar_item(
    data: &DataSource,
    session: &SessionContext,
    id: Uuid,
    input: &MinibarItemInput,
) -> CoreResult<MinibarItem> {
    validation::validate_minibar_item(input)?;
    let before = get_minibar_item(data, id).await?;

    let mut item = before.clone();
    item.apply(input);
    data.minibar.update_item(&item).await?;

    audit::record(data, session, MINIBAR_ITEMS, ChangeOperation::Update, id, Some(&before), Some(&item)).await;
    Ok(item)
}

pub async fn toggle_minibar_item_status(
    data: &DataSource,
    session: &SessionContext,
    id: Uuid,
) -> CoreResult<MinibarItem> {
    session.require_admin("change minibar item status")?;
    let before = get_minibar_item(data, id).await?;
    let after = data.minibar.set_item_active(id, !before.active).await?;

    audit::record(data, session, MINIBAR_ITEMS, ChangeOperation::Update, id, Some(&before), Some(&after)).await;
    Ok(after)
}
