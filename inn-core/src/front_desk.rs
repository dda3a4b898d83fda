//! Front desk: check-in, check-out, cancellation, minibar charges and the two
//! occupancy boards (check-in board, parking map).

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use inn_shared::{
    Accommodation, ChangeOperation, CheckInInput, ConsumptionInput, Customer, MinibarConsumption,
    NewStay, Stay, StayStatus,
};

use crate::audit;
use crate::identity::SessionContext;
use crate::occupancy::{reconcile, OccupancyEntry, OccupancySummary};
use crate::repository::DataSource;
use crate::stays::{plan_transition, TransitionPlan};
use crate::validation::{self, FieldErrors};
use crate::{CoreError, CoreResult};

const STAYS: &str = "stays";
const MINIBAR_CONSUMPTION: &str = "minibar_consumption";

/// A checked-in stay joined with its customer and accommodation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActiveStayView {
    pub stay_id: Uuid,
    pub customer_name: String,
    pub accommodation_name: String,
    pub accommodation_number: String,
    pub check_in_at: DateTime<Utc>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub nightly_rate_cents: i64,
}

/// Inner-join semantics: stays whose customer or accommodation is missing are dropped.
pub(crate) fn denormalize_stays(
    stays: &[Stay],
    customers: &[Customer],
    accommodations: &[Accommodation],
) -> Vec<ActiveStayView> {
    let customers: HashMap<Uuid, &Customer> = customers.iter().map(|c| (c.id, c)).collect();
    let accommodations: HashMap<Uuid, &Accommodation> = accommodations.iter().map(|a| (a.id, a)).collect();

    stays
        .iter()
        .filter_map(|stay| {
            let customer = customers.get(&stay.customer_id)?;
            let accommodation = accommodations.get(&stay.accommodation_id)?;
            Some(ActiveStayView {
                stay_id: stay.id,
                customer_name: customer.name.clone(),
                accommodation_name: accommodation.name.clone(),
                accommodation_number: accommodation.number.clone(),
                check_in_at: stay.check_in_at,
                check_out_at: stay.check_out_at,
                nightly_rate_cents: stay.nightly_rate_cents,
            })
        })
        .collect()
}

pub async fn get_stay(data: &DataSource, id: Uuid) -> CoreResult<Stay> {
    data.stays
        .get_stay(id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("stay {}", id)))
}

// ============================================================================
// Stay lifecycle
// ============================================================================

pub async fn check_in(data: &DataSource, session: &SessionContext, input: &CheckInInput) -> CoreResult<Stay> {
    validation::validate_check_in(input)?;

    let mut errors = FieldErrors::new();
    let customer = data.customers.get_customer(input.customer_id).await?;
    match &customer {
        None => errors.add("customer_id", "Customer does not exist"),
        Some(c) if !c.active => errors.add("customer_id", "Customer is inactive"),
        Some(_) => {}
    }
    let accommodation = data.accommodations.get_accommodation(input.accommodation_id).await?;
    let accommodation = match accommodation {
        Some(a) if a.active => Some(a),
        Some(_) => {
            errors.add("accommodation_id", "Accommodation is inactive");
            None
        }
        None => {
            errors.add("accommodation_id", "Accommodation does not exist");
            None
        }
    };
    let accommodation = match accommodation {
        Some(a) if errors.is_empty() => a,
        _ => return Err(CoreError::Validation(errors)),
    };

    let new_stay = NewStay {
        customer_id: input.customer_id,
        accommodation_id: accommodation.id,
        nightly_rate_cents: accommodation.nightly_rate_cents,
        notes: input.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()).map(String::from),
        check_in_at: Utc::now(),
    };

    let stay = data.stays.insert_checked_in(new_stay).await.map_err(|e| {
        tracing::info!(accommodation = %accommodation.number, "Check-in rejected: {}", e);
        CoreError::from(e)
    })?;

    audit::record(data, session, STAYS, ChangeOperation::Insert, stay.id, None, Some(&stay)).await;
    tracing::info!(stay = %stay.id, accommodation = %accommodation.number, "Guest checked in");
    Ok(stay)
}

async fn change_status(
    data: &DataSource,
    session: &SessionContext,
    id: Uuid,
    target: StayStatus,
) -> CoreResult<Stay> {
    let current = get_stay(data, id).await?;

    let (from, to) = match plan_transition(current.status, target)? {
        TransitionPlan::Noop => return Ok(current),
        TransitionPlan::Apply { from, to } => (from, to),
    };

    let check_out_at = (to == StayStatus::CheckedOut).then(Utc::now);
    match data.stays.transition(id, from, to, check_out_at).await? {
        Some(updated) => {
            audit::record(data, session, STAYS, ChangeOperation::Update, id, Some(&current), Some(&updated)).await;
            tracing::info!(stay = %id, from = %from, to = %to, "Stay status changed");
            Ok(updated)
        }
        None => {
            // Someone else moved the stay between our read and the conditional write.
            let latest = get_stay(data, id).await?;
            match plan_transition(latest.status, target)? {
                TransitionPlan::Noop => Ok(latest),
                TransitionPlan::Apply { .. } => Err(CoreError::Conflict(format!(
                    "stay {} changed concurrently, retry the request",
                    id
                ))),
            }
        }
    }
}

/// `checked_in → checked_out`; repeating it returns the stay unchanged.
pub async fn check_out(data: &DataSource, session: &SessionContext, id: Uuid) -> CoreResult<Stay> {
    change_status(data, session, id, StayStatus::CheckedOut).await
}

pub async fn cancel_stay(data: &DataSource, session: &SessionContext, id: Uuid) -> CoreResult<Stay> {
    change_status(data, session, id, StayStatus::Cancelled).await
}

// ============================================================================
// Minibar consumption
// ============================================================================

pub async fn record_consumption(
    data: &DataSource,
    session: &SessionContext,
    stay_id: Uuid,
    input: &ConsumptionInput,
) -> CoreResult<MinibarConsumption> {
    validation::validate_quantity(input.quantity)?;

    let stay = get_stay(data, stay_id).await?;
    if stay.status != StayStatus::CheckedIn {
        return Err(CoreError::Conflict(format!(
            "minibar charges need a checked-in stay, stay {} is {}",
            stay_id, stay.status
        )));
    }

    let item = match data.minibar.get_item(input.item_id).await? {
        Some(item) if item.active => item,
        _ => {
            let mut errors = FieldErrors::new();
            errors.add("item_id", "Minibar item does not exist or is inactive");
            return Err(CoreError::Validation(errors));
        }
    };

    let consumption = MinibarConsumption::new(stay_id, &item, input.quantity);
    data.minibar.insert_consumption(&consumption).await?;

    audit::record(
        data,
        session,
        MINIBAR_CONSUMPTION,
        ChangeOperation::Insert,
        consumption.id,
        None,
        Some(&consumption),
    )
    .await;
    Ok(consumption)
}

pub async fn list_consumptions(data: &DataSource, stay_id: Uuid) -> CoreResult<Vec<MinibarConsumption>> {
    get_stay(data, stay_id).await?;
    Ok(data.minibar.list_consumptions(Some(stay_id)).await?)
}

// ============================================================================
// Boards
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CheckInBoard {
    pub active_stays: Vec<ActiveStayView>,
    pub available_accommodations: Vec<Accommodation>,
    pub customers: Vec<Customer>,
    pub summary: OccupancySummary,
}

/// Guests in house, free active accommodations and the active customers a
/// new check-in can pick from.
pub async fn check_in_board(data: &DataSource) -> CoreResult<CheckInBoard> {
    let stays = data.stays.list_stays(Some(StayStatus::CheckedIn)).await?;
    let accommodations = data.accommodations.list_accommodations().await?;
    let customers = data.customers.list_customers().await?;

    let active_stays = denormalize_stays(&stays, &customers, &accommodations);

    let active_accommodations: Vec<Accommodation> =
        accommodations.into_iter().filter(|a| a.active).collect();
    let entries = reconcile(&active_accommodations, &stays, &customers);
    let summary = OccupancySummary::from_entries(&entries);

    let free: Vec<Uuid> = entries.iter().filter(|e| !e.occupied).map(|e| e.accommodation_id).collect();
    let available_accommodations = active_accommodations
        .into_iter()
        .filter(|a| free.contains(&a.id))
        .collect();

    Ok(CheckInBoard {
        active_stays,
        available_accommodations,
        customers: customers.into_iter().filter(|c| c.active).collect(),
        summary,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ParkingBoard {
    pub slots: Vec<OccupancyEntry>,
    pub summary: OccupancySummary,
}

/// One slot per active accommodation with parking; a slot is taken while
/// its accommodation has a checked-in stay.
pub async fn parking_board(data: &DataSource) -> CoreResult<ParkingBoard> {
    let accommodations: Vec<Accommodation> = data
        .accommodations
        .list_accommodations()
        .await?
        .into_iter()
        .filter(|a| a.active && a.has_parking)
        .collect();
    let stays = data.stays.list_stays(Some(StayStatus::CheckedIn)).await?;
    let customers = data.customers.list_customers().await?;

    let slots = reconcile(&accommodations, &stays, &customers);
    let summary = OccupancySummary::from_entries(&slots);
    Ok(ParkingBoard { slots, summary })
}
