pub mod ai;
pub mod assistant;
pub mod bookings;
pub mod geo;
pub mod mechanics;
pub mod notify;
pub mod payments;
pub mod profiles;
pub mod scheduling;
pub mod store;
