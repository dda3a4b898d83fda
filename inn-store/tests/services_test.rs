use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use inn_core::identity::{AuthenticatedUser, LocalIdentityProvider, SessionContext};
use inn_core::repository::DataSource;
use inn_core::{audit, front_desk, registry, validation, views, CoreError};
use inn_shared::{
    AccommodationInput, CheckInInput, ConsumptionInput, CustomerInput, MinibarItemInput, StayStatus,
};
use inn_store::MemoryStore;

const ADMIN_EMAIL: &str = "admin@parnaioca.com";

fn fixture() -> DataSource {
    DataSource::from_shared(Arc::new(MemoryStore::seeded()))
}

fn session(email: &str) -> SessionContext {
    SessionContext::establish(
        AuthenticatedUser {
            id: "1".into(),
            email: email.into(),
            display_name: "Test".into(),
        },
        ADMIN_EMAIL,
    )
}

fn admin() -> SessionContext {
    session(ADMIN_EMAIL)
}

fn staff() -> SessionContext {
    session("funcionario@parnaioca.com")
}

fn customer_input(name: &str, national_id: &str) -> CustomerInput {
    CustomerInput {
        name: name.into(),
        birth_date: NaiveDate::from_ymd_opt(1990, 3, 10),
        national_id: national_id.into(),
        email: "guest@email.com".into(),
        phone: "(24) 98888-1111".into(),
        state: "rj".into(),
        city: "Paraty".into(),
    }
}

#[tokio::test]
async fn duplicate_national_id_is_rejected() {
    let data = fixture();
    let err = registry::create_customer(&data, &staff(), &customer_input("Ana Costa", "123.456.789-00"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Duplicate { field: "national_id" }));

    // bare digits are masked before the uniqueness check
    let err = registry::create_customer(&data, &staff(), &customer_input("Ana Costa", "12345678900"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Duplicate { field: "national_id" }));
}

#[tokio::test]
async fn editing_a_customer_keeps_its_own_national_id() {
    let data = fixture();
    let created = registry::create_customer(&data, &staff(), &customer_input("Ana Costa", "111.222.333-44"))
        .await
        .unwrap();
    assert_eq!(created.state, "RJ");

    let mut input = customer_input("Ana Costa Lima", "111.222.333-44");
    input.city = "Angra dos Reis".into();
    let updated = registry::update_customer(&data, &staff(), created.id, &input).await.unwrap();
    assert_eq!(updated.name, "Ana Costa Lima");
    assert_eq!(updated.id, created.id);
}

#[tokio::test]
async fn invalid_customer_reports_every_field() {
    let data = fixture();
    let err = registry::create_customer(&data, &staff(), &CustomerInput::default())
        .await
        .unwrap_err();
    match err {
        CoreError::Validation(fields) => {
            assert!(fields.contains("name"));
            assert!(fields.contains("national_id"));
            assert!(fields.contains("birth_date"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn toggling_twice_restores_the_flag() {
    let data = fixture();
    let maria = registry::list_customers(&data, Some("maria")).await.unwrap().remove(0);
    assert!(maria.active);

    let off = registry::toggle_customer_status(&data, &admin(), maria.id).await.unwrap();
    assert!(!off.active);
    let on = registry::toggle_customer_status(&data, &admin(), maria.id).await.unwrap();
    assert!(on.active);
}

#[tokio::test]
async fn staff_cannot_toggle() {
    let data = fixture();
    let item = registry::list_minibar_items(&data, None).await.unwrap().remove(0);
    let err = registry::toggle_minibar_item_status(&data, &staff(), item.id).await.unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));

    let unchanged = registry::get_minibar_item(&data, item.id).await.unwrap();
    assert!(unchanged.active);
}

#[tokio::test]
async fn accommodation_numbers_are_unique_and_types_must_exist() {
    let data = fixture();
    let suite = registry::list_accommodation_types(&data, Some("suí")).await.unwrap().remove(0);

    let mut input = AccommodationInput {
        name: "Suíte Praia do Sul".into(),
        number: "101".into(),
        nightly_rate_cents: 42_000,
        max_occupancy: 2,
        type_id: Some(suite.id),
        has_minibar: true,
        has_parking: false,
    };
    let err = registry::create_accommodation(&data, &staff(), &input).await.unwrap_err();
    assert!(matches!(err, CoreError::Duplicate { field: "number" }));

    input.number = "104".into();
    input.type_id = Some(uuid::Uuid::new_v4());
    match registry::create_accommodation(&data, &staff(), &input).await.unwrap_err() {
        CoreError::Validation(fields) => assert!(fields.contains("type_id")),
        other => panic!("expected validation error, got {other:?}"),
    }

    input.type_id = Some(suite.id);
    registry::create_accommodation(&data, &staff(), &input).await.unwrap();

    let listed = registry::list_accommodations(&data, Some("104")).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].type_name, "Suíte");
}

#[tokio::test]
async fn check_out_is_idempotent() {
    let data = fixture();
    let stay = data.stays.list_stays(Some(StayStatus::CheckedIn)).await.unwrap().remove(0);

    let out = front_desk::check_out(&data, &staff(), stay.id).await.unwrap();
    assert_eq!(out.status, StayStatus::CheckedOut);
    let checked_out_at = out.check_out_at.expect("check-out timestamp");

    let again = front_desk::check_out(&data, &staff(), stay.id).await.unwrap();
    assert_eq!(again.status, StayStatus::CheckedOut);
    assert_eq!(again.check_out_at, Some(checked_out_at));

    let err = front_desk::cancel_stay(&data, &staff(), stay.id).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidTransition { from: StayStatus::CheckedOut, to: StayStatus::Cancelled }
    ));
}

#[tokio::test]
async fn cancelling_frees_the_accommodation() {
    let data = fixture();
    let stay = data.stays.list_stays(Some(StayStatus::CheckedIn)).await.unwrap().remove(0);

    let cancelled = front_desk::cancel_stay(&data, &staff(), stay.id).await.unwrap();
    assert_eq!(cancelled.status, StayStatus::Cancelled);
    assert_eq!(cancelled.check_out_at, None);

    let board = front_desk::check_in_board(&data).await.unwrap();
    assert!(board.active_stays.is_empty());
    assert!(board.available_accommodations.iter().any(|a| a.id == stay.accommodation_id));

    let err = front_desk::cancel_stay(&data, &staff(), stay.id).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidTransition { from: StayStatus::Cancelled, to: StayStatus::Cancelled }
    ));
}

#[tokio::test]
async fn an_occupied_accommodation_rejects_a_second_check_in() {
    let data = fixture();
    let board = front_desk::check_in_board(&data).await.unwrap();
    assert_eq!(board.active_stays.len(), 1);
    assert_eq!(board.active_stays[0].accommodation_number, "102");
    assert_eq!(board.available_accommodations.len(), 2);

    let room_102 = data.accommodations.find_accommodation_by_number("102").await.unwrap().unwrap();
    let maria = registry::list_customers(&data, Some("Maria")).await.unwrap().remove(0);

    let err = front_desk::check_in(
        &data,
        &staff(),
        &CheckInInput { customer_id: maria.id, accommodation_id: room_102.id, notes: None },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));

    let room_101 = data.accommodations.find_accommodation_by_number("101").await.unwrap().unwrap();
    let stay = front_desk::check_in(
        &data,
        &staff(),
        &CheckInInput { customer_id: maria.id, accommodation_id: room_101.id, notes: Some(" late arrival ".into()) },
    )
    .await
    .unwrap();
    assert_eq!(stay.nightly_rate_cents, 35_000);
    assert_eq!(stay.notes.as_deref(), Some("late arrival"));

    let board = front_desk::check_in_board(&data).await.unwrap();
    assert_eq!(board.summary.occupied, 2);
    assert_eq!(board.summary.free, 1);
}

#[tokio::test]
async fn parking_board_counts_slots_of_parking_rooms() {
    let data = fixture();
    let parking = front_desk::parking_board(&data).await.unwrap();

    assert_eq!(parking.slots.len(), 2);
    assert_eq!(parking.summary.occupied, 1);
    assert_eq!(parking.summary.free, 1);
    assert_eq!(parking.summary.percentage, 50);

    let taken = parking.slots.iter().find(|s| s.occupied).unwrap();
    assert_eq!(taken.accommodation_number, "102");
    assert_eq!(taken.occupant_name.as_deref(), Some("João Silva"));
}

#[tokio::test]
async fn minibar_charges_need_a_checked_in_stay() {
    let data = fixture();
    let stay = data.stays.list_stays(Some(StayStatus::CheckedIn)).await.unwrap().remove(0);
    let beer = registry::list_minibar_items(&data, Some("cerveja")).await.unwrap().remove(0);

    let charge = front_desk::record_consumption(
        &data,
        &staff(),
        stay.id,
        &ConsumptionInput { item_id: beer.id, quantity: 3 },
    )
    .await
    .unwrap();
    assert_eq!(charge.unit_price_cents, 800);
    assert_eq!(charge.total_cents, 2_400);

    // later price changes do not touch recorded charges
    registry::update_minibar_item(
        &data,
        &staff(),
        beer.id,
        &MinibarItemInput { name: beer.name.clone(), price_cents: 900 },
    )
    .await
    .unwrap();
    let charges = front_desk::list_consumptions(&data, stay.id).await.unwrap();
    assert_eq!(charges[0].total_cents, 2_400);

    front_desk::check_out(&data, &staff(), stay.id).await.unwrap();
    let err = front_desk::record_consumption(
        &data,
        &staff(),
        stay.id,
        &ConsumptionInput { item_id: beer.id, quantity: 1 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));
}

#[tokio::test]
async fn oversized_prices_never_reach_a_charge() {
    let data = fixture();
    let stay = data.stays.list_stays(Some(StayStatus::CheckedIn)).await.unwrap().remove(0);

    let err = registry::create_minibar_item(
        &data,
        &staff(),
        &MinibarItemInput { name: "Champanhe".into(), price_cents: i64::MAX / 2 },
    )
    .await
    .unwrap_err();
    match err {
        CoreError::Validation(fields) => assert!(fields.contains("price_cents")),
        other => panic!("expected validation error, got {other:?}"),
    }

    let item = registry::create_minibar_item(
        &data,
        &staff(),
        &MinibarItemInput { name: "Champanhe".into(), price_cents: validation::MAX_PRICE_CENTS },
    )
    .await
    .unwrap();
    let charge = front_desk::record_consumption(
        &data,
        &staff(),
        stay.id,
        &ConsumptionInput { item_id: item.id, quantity: validation::MAX_QUANTITY },
    )
    .await
    .unwrap();
    assert_eq!(charge.total_cents, validation::MAX_PRICE_CENTS * i64::from(validation::MAX_QUANTITY));

    let err = front_desk::record_consumption(
        &data,
        &staff(),
        stay.id,
        &ConsumptionInput { item_id: item.id, quantity: validation::MAX_QUANTITY + 1 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn report_rejects_inverted_period_and_counts_stays() {
    let data = fixture();
    let today = Utc::now().date_naive();

    let err = views::period_report(&data, today, today.pred_opt().unwrap()).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    let report = views::period_report(&data, today, today).await.unwrap();
    assert_eq!(report.stays, 1);
    assert_eq!(report.revenue_cents, 40_000);
    assert_eq!(report.active_customers, 2);
    assert_eq!(report.inactive_customers, 0);
    // 1 of 3 active rooms
    assert_eq!(report.occupancy_rate, 33);
}

#[tokio::test]
async fn dashboard_and_analytics_reflect_the_fixture() {
    let data = fixture();
    let dashboard = views::dashboard(&data, Utc::now().date_naive()).await.unwrap();
    assert_eq!(dashboard.total_customers, 2);
    assert_eq!(dashboard.total_accommodations, 3);
    assert_eq!(dashboard.current_occupancy, 1);
    assert_eq!(dashboard.occupancy_percentage, 33);
    assert_eq!(dashboard.monthly_revenue_cents, 40_000);

    let analytics = views::analytics(&data).await.unwrap();
    assert_eq!(analytics.most_sold_item.name, "");
    assert_eq!(analytics.most_sold_item.total, 0);
    assert_eq!(analytics.most_profitable_accommodation.name, "Suíte Parnaioca");
    assert_eq!(analytics.revenue_by_type[0].name, "Suíte");
    assert_eq!(analytics.customers_by_state.len(), 2);
}

#[tokio::test]
async fn dashboard_ignores_guests_in_deactivated_accommodations() {
    let data = fixture();
    let stay = data.stays.list_stays(Some(StayStatus::CheckedIn)).await.unwrap().remove(0);
    registry::toggle_accommodation_status(&data, &admin(), stay.accommodation_id).await.unwrap();

    let dashboard = views::dashboard(&data, Utc::now().date_naive()).await.unwrap();
    assert_eq!(dashboard.total_accommodations, 2);
    assert_eq!(dashboard.current_occupancy, 0);
    assert_eq!(dashboard.occupancy_percentage, 0);
}

#[tokio::test]
async fn mutations_are_logged_and_only_admins_read_the_log() {
    let data = fixture();
    registry::create_customer(&data, &staff(), &customer_input("Ana Costa", "555.666.777-88"))
        .await
        .unwrap();

    let err = audit::admin_overview(&data, &LocalIdentityProvider, &staff(), "fixture")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));

    let overview = audit::admin_overview(&data, &LocalIdentityProvider, &admin(), "fixture")
        .await
        .unwrap();
    assert_eq!(overview.total_logs, 1);
    assert_eq!(overview.total_users, 2);
    assert_eq!(overview.recent_logs[0].actor, "funcionario@parnaioca.com");
    assert_eq!(overview.recent_logs[0].table_name, "customers");

    assert!(audit::purge_logs(&data, &staff()).await.is_err());
    assert_eq!(audit::purge_logs(&data, &admin()).await.unwrap(), 1);
}
