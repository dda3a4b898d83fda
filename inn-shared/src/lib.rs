pub mod models;
pub mod pii;

pub use models::{
    Accommodation, AccommodationInput, AccommodationType, AccommodationTypeInput, ChangeLog,
    ChangeOperation, CheckInInput, ConsumptionInput, Customer, CustomerInput, MinibarConsumption,
    MinibarItem, MinibarItemInput, NewChangeLog, NewStay, Stay, StayStatus,
};
pub use pii::Masked;
