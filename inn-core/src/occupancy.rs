//! Occupancy reconciliation
//!
//! Decides, for a set of accommodations, which ones are occupied right now and
//! by whom, by matching them against the stays in `checked_in` status.

use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use inn_shared::{Accommodation, Customer, Stay, StayStatus};

/// One accommodation's slot on a board (parking map, check-in board).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OccupancyEntry {
    pub accommodation_id: Uuid,
    pub accommodation_name: String,
    pub accommodation_number: String,
    pub occupied: bool,
    pub occupant_name: Option<String>,
    pub stay_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct OccupancySummary {
    pub total: usize,
    pub occupied: usize,
    pub free: usize,
    pub percentage: u32,
}

impl OccupancySummary {
    pub fn from_entries(entries: &[OccupancyEntry]) -> Self {
        let occupied = entries.iter().filter(|e| e.occupied).count();
        Self::from_counts(occupied, entries.len())
    }

    pub fn from_counts(occupied: usize, total: usize) -> Self {
        Self {
            total,
            occupied,
            free: total.saturating_sub(occupied),
            percentage: occupancy_percentage(occupied, total),
        }
    }
}

/// `round(occupied / total * 100)`, 0 when there is nothing to occupy.
pub fn occupancy_percentage(occupied: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((occupied as f64 / total as f64) * 100.0).round() as u32
}

/// Match `accommodations` against `stays`. Stays not in `checked_in` are
/// ignored. When two checked-in stays point at the same accommodation the last
/// one seen wins.
pub fn reconcile(
    accommodations: &[Accommodation],
    stays: &[Stay],
    customers: &[Customer],
) -> Vec<OccupancyEntry> {
    let names: HashMap<Uuid, &str> = customers.iter().map(|c| (c.id, c.name.as_str())).collect();

    let mut by_accommodation: HashMap<Uuid, &Stay> = HashMap::new();
    for stay in stays.iter().filter(|s| s.status == StayStatus::CheckedIn) {
        if let Some(previous) = by_accommodation.insert(stay.accommodation_id, stay) {
            tracing::warn!(
                accommodation = %stay.accommodation_id,
                kept = %stay.id,
                dropped = %previous.id,
                "Multiple checked-in stays for one accommodation"
            );
        }
    }

    accommodations
        .iter()
        .map(|accommodation| {
            let stay = by_accommodation.get(&accommodation.id);
            OccupancyEntry {
                accommodation_id: accommodation.id,
                accommodation_name: accommodation.name.clone(),
                accommodation_number: accommodation.number.clone(),
                occupied: stay.is_some(),
                occupant_name: stay.and_then(|s| names.get(&s.customer_id)).map(|n| n.to_string()),
                stay_id: stay.map(|s| s.id),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn accommodation(number: &str, name: &str) -> Accommodation {
        let now = Utc::now();
        Accommodation {
            id: Uuid::new_v4(),
            name: name.to_string(),
            number: number.to_string(),
            nightly_rate_cents: 35_000,
            max_occupancy: 2,
            type_id: Uuid::new_v4(),
            has_minibar: true,
            has_parking: true,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn customer(name: &str) -> Customer {
        let now = Utc::now();
        Customer {
            id: Uuid::new_v4(),
            name: name.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
            national_id: "123.456.789-00".into(),
            email: "guest@email.com".into(),
            phone: "21 0000-0000".into(),
            state: "RJ".into(),
            city: "Angra dos Reis".into(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn stay(customer: &Customer, accommodation: &Accommodation, status: StayStatus) -> Stay {
        let now = Utc::now();
        Stay {
            id: Uuid::new_v4(),
            customer_id: customer.id,
            accommodation_id: accommodation.id,
            check_in_at: now,
            check_out_at: None,
            nightly_rate_cents: accommodation.nightly_rate_cents,
            status,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn one_of_two_rooms_occupied() {
        let room_101 = accommodation("101", "Suíte Lopes Mendes");
        let room_102 = accommodation("102", "Suíte Parnaioca");
        let joao = customer("João Silva");
        let stays = vec![stay(&joao, &room_102, StayStatus::CheckedIn)];

        let entries = reconcile(&[room_101.clone(), room_102.clone()], &stays, &[joao]);

        assert!(!entries[0].occupied);
        assert_eq!(entries[0].occupant_name, None);
        assert_eq!(entries[0].stay_id, None);
        assert!(entries[1].occupied);
        assert_eq!(entries[1].occupant_name.as_deref(), Some("João Silva"));
        assert_eq!(entries[1].stay_id, Some(stays[0].id));

        let summary = OccupancySummary::from_entries(&entries);
        assert_eq!(summary, OccupancySummary { total: 2, occupied: 1, free: 1, percentage: 50 });
    }

    #[test]
    fn empty_set_is_zero_percent() {
        let entries = reconcile(&[], &[], &[]);
        let summary = OccupancySummary::from_entries(&entries);
        assert_eq!(summary, OccupancySummary { total: 0, occupied: 0, free: 0, percentage: 0 });
    }

    #[test]
    fn finished_stays_do_not_occupy() {
        let room = accommodation("101", "Suíte Lopes Mendes");
        let guest = customer("Maria Santos");
        let stays = vec![
            stay(&guest, &room, StayStatus::CheckedOut),
            stay(&guest, &room, StayStatus::Cancelled),
        ];

        let entries = reconcile(&[room], &stays, &[guest]);
        assert!(!entries[0].occupied);
    }

    #[test]
    fn duplicate_checked_in_stays_keep_the_last_seen() {
        let room = accommodation("102", "Suíte Parnaioca");
        let first = customer("João Silva");
        let second = customer("Maria Santos");
        let stays = vec![
            stay(&first, &room, StayStatus::CheckedIn),
            stay(&second, &room, StayStatus::CheckedIn),
        ];

        let entries = reconcile(&[room], &stays, &[first, second]);
        assert_eq!(entries[0].occupant_name.as_deref(), Some("Maria Santos"));
        assert_eq!(entries[0].stay_id, Some(stays[1].id));
    }

    #[test]
    fn stays_for_rooms_outside_the_set_are_ignored() {
        let parking_room = accommodation("101", "Suíte Lopes Mendes");
        let other_room = accommodation("103", "Suíte Lagoa Azul");
        let guest = customer("João Silva");
        let stays = vec![stay(&guest, &other_room, StayStatus::CheckedIn)];

        let summary = OccupancySummary::from_entries(&reconcile(&[parking_room], &stays, &[guest]));
        assert_eq!(summary.occupied, 0);
        assert_eq!(summary.free, 1);
    }

    #[test]
    fn counts_always_add_up_and_percentage_stays_in_range() {
        let guest = customer("Hóspede");
        for total in 0..12usize {
            let rooms: Vec<Accommodation> =
                (0..total).map(|i| accommodation(&format!("{}", 100 + i), "Quarto")).collect();
            for occupied in 0..=total {
                let stays: Vec<Stay> = rooms[..occupied]
                    .iter()
                    .map(|r| stay(&guest, r, StayStatus::CheckedIn))
                    .collect();
                let summary =
                    OccupancySummary::from_entries(&reconcile(&rooms, &stays, &[guest.clone()]));

                assert_eq!(summary.occupied + summary.free, total);
                assert!(summary.percentage <= 100);
                if total == 0 {
                    assert_eq!(summary.percentage, 0);
                }
            }
        }
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(occupancy_percentage(1, 3), 33);
        assert_eq!(occupancy_percentage(2, 3), 67);
        assert_eq!(occupancy_percentage(1, 8), 13);
        assert_eq!(occupancy_percentage(3, 3), 100);
    }
}
