//! Read-only screens: dashboard, period report and analytics.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use inn_shared::{Accommodation, Stay, StayStatus};

use crate::front_desk::{denormalize_stays, ActiveStayView};
use crate::occupancy::{reconcile, OccupancySummary};
use crate::repository::DataSource;
use crate::validation;
use crate::CoreResult;

/// First and last day of the month containing `today`.
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month.map(|d| d - Duration::days(1)).unwrap_or(first);
    (first, last)
}

fn within(ts: DateTime<Utc>, from: NaiveDate, to: NaiveDate) -> bool {
    let day = ts.date_naive();
    day >= from && day <= to
}

/// Occupancy over active accommodations only; non-checked-in stays are ignored.
fn occupancy_of_active(accommodations: &[Accommodation], stays: &[Stay]) -> OccupancySummary {
    let active: Vec<Accommodation> = accommodations.iter().filter(|a| a.active).cloned().collect();
    OccupancySummary::from_entries(&reconcile(&active, stays, &[]))
}

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub total_customers: usize,
    pub total_accommodations: usize,
    pub current_occupancy: usize,
    pub occupancy_percentage: u32,
    pub monthly_revenue_cents: i64,
    pub active_stays: Vec<ActiveStayView>,
}

pub async fn dashboard(data: &DataSource, today: NaiveDate) -> CoreResult<Dashboard> {
    let customers = data.customers.list_customers().await?;
    let accommodations = data.accommodations.list_accommodations().await?;
    let checked_in = data.stays.list_stays(Some(StayStatus::CheckedIn)).await?;
    let all_stays = data.stays.list_stays(None).await?;

    let (month_start, month_end) = month_bounds(today);
    let monthly_revenue_cents = all_stays
        .iter()
        .filter(|s| within(s.created_at, month_start, month_end))
        .map(|s| s.nightly_rate_cents)
        .fold(0, i64::saturating_add);

    let summary = occupancy_of_active(&accommodations, &checked_in);

    Ok(Dashboard {
        total_customers: customers.iter().filter(|c| c.active).count(),
        total_accommodations: summary.total,
        current_occupancy: summary.occupied,
        occupancy_percentage: summary.percentage,
        monthly_revenue_cents,
        active_stays: denormalize_stays(&checked_in, &customers, &accommodations),
    })
}

// ============================================================================
// Period report
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PeriodReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub customers_registered: usize,
    pub active_customers: usize,
    pub inactive_customers: usize,
    pub revenue_cents: i64,
    pub stays: usize,
    pub occupancy_rate: u32,
}

/// Figures for the inclusive range `[from, to]`.
pub async fn period_report(data: &DataSource, from: NaiveDate, to: NaiveDate) -> CoreResult<PeriodReport> {
    validation::validate_period(from, to)?;

    let customers = data.customers.list_customers().await?;
    let stays = data.stays.list_stays(None).await?;
    let accommodations = data.accommodations.list_accommodations().await?;

    let in_period: Vec<&Stay> = stays.iter().filter(|s| within(s.created_at, from, to)).collect();
    let active_customers = customers.iter().filter(|c| c.active).count();

    Ok(PeriodReport {
        from,
        to,
        customers_registered: customers.iter().filter(|c| within(c.created_at, from, to)).count(),
        active_customers,
        inactive_customers: customers.len() - active_customers,
        revenue_cents: in_period.iter().map(|s| s.nightly_rate_cents).fold(0, i64::saturating_add),
        stays: in_period.len(),
        occupancy_rate: occupancy_of_active(&accommodations, &stays).percentage,
    })
}

// ============================================================================
// Analytics
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RankedTotal {
    pub name: String,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    /// Empty name and zero when nothing was sold.
    pub most_sold_item: RankedTotal,
    pub most_profitable_accommodation: RankedTotal,
    pub revenue_by_type: Vec<RankedTotal>,
    pub customers_by_state: Vec<RankedTotal>,
}

/// Sum per key, highest first, ties broken by name.
fn rank(totals: HashMap<String, i64>) -> Vec<RankedTotal> {
    let mut ranked: Vec<RankedTotal> = totals
        .into_iter()
        .map(|(name, total)| RankedTotal { name, total })
        .collect();
    ranked.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    ranked
}

fn add_to(totals: &mut HashMap<String, i64>, key: &str, amount: i64) {
    let total = totals.entry(key.to_string()).or_default();
    *total = total.saturating_add(amount);
}

fn top(totals: HashMap<String, i64>) -> RankedTotal {
    rank(totals)
        .into_iter()
        .next()
        .unwrap_or(RankedTotal { name: String::new(), total: 0 })
}

pub async fn analytics(data: &DataSource) -> CoreResult<Analytics> {
    let items: HashMap<Uuid, String> = data
        .minibar
        .list_items()
        .await?
        .into_iter()
        .map(|i| (i.id, i.name))
        .collect();
    let consumptions = data.minibar.list_consumptions(None).await?;

    let mut sold: HashMap<String, i64> = HashMap::new();
    for consumption in &consumptions {
        if let Some(name) = items.get(&consumption.item_id) {
            add_to(&mut sold, name, i64::from(consumption.quantity));
        }
    }

    let accommodations: HashMap<Uuid, Accommodation> = data
        .accommodations
        .list_accommodations()
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();
    let types: HashMap<Uuid, String> = data
        .accommodation_types
        .list_types()
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();
    let stays = data.stays.list_stays(None).await?;

    let mut by_accommodation: HashMap<String, i64> = HashMap::new();
    let mut by_type: HashMap<String, i64> = HashMap::new();
    for stay in &stays {
        let Some(accommodation) = accommodations.get(&stay.accommodation_id) else {
            continue;
        };
        add_to(&mut by_accommodation, &accommodation.name, stay.nightly_rate_cents);
        if let Some(type_name) = types.get(&accommodation.type_id) {
            add_to(&mut by_type, type_name, stay.nightly_rate_cents);
        }
    }

    let mut by_state: HashMap<String, i64> = HashMap::new();
    for customer in data.customers.list_customers().await? {
        *by_state.entry(customer.state).or_default() += 1;
    }

    Ok(Analytics {
        most_sold_item: top(sold),
        most_profitable_accommodation: top(by_accommodation),
        revenue_by_type: rank(by_type),
        customers_by_state: rank(by_state),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_cover_the_whole_month() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(month_bounds(d(2024, 2, 17)), (d(2024, 2, 1), d(2024, 2, 29)));
        assert_eq!(month_bounds(d(2023, 12, 31)), (d(2023, 12, 1), d(2023, 12, 31)));
        assert_eq!(month_bounds(d(2024, 4, 1)), (d(2024, 4, 1), d(2024, 4, 30)));
    }

    #[test]
    fn ranking_orders_by_total_then_name() {
        let totals = HashMap::from([
            ("SP".to_string(), 18),
            ("RJ".to_string(), 25),
            ("MG".to_string(), 18),
        ]);
        let ranked = rank(totals);
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["RJ", "MG", "SP"]);
    }

    #[test]
    fn totals_saturate_instead_of_wrapping() {
        let mut totals = HashMap::new();
        add_to(&mut totals, "Suíte", i64::MAX - 1);
        add_to(&mut totals, "Suíte", 10);
        assert_eq!(totals["Suíte"], i64::MAX);
    }

    #[test]
    fn top_of_nothing_is_empty() {
        assert_eq!(top(HashMap::new()), RankedTotal { name: String::new(), total: 0 });
    }
}
