pub mod accommodation;
pub mod change_log;
pub mod customer;
pub mod minibar;
pub mod stay;

pub use accommodation::{Accommodation, AccommodationInput, AccommodationType, AccommodationTypeInput};
pub use change_log::{ChangeLog, ChangeOperation, NewChangeLog};
pub use customer::{Customer, CustomerInput};
pub use minibar::{ConsumptionInput, MinibarConsumption, MinibarItem, MinibarItemInput};
pub use stay::{CheckInInput, NewStay, Stay, StayStatus};

/// Case-insensitive substring match used by the list endpoints' `q` filter.
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
