pub mod assistant;
pub mod bookings;
pub mod health;
pub mod mechanics;
pub mod profiles;
