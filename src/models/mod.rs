pub mod booking;
pub mod mechanic;
pub mod profile;
pub mod search;

pub use booking::{
    end_of, parse_booking_time, Booking, BookingStatus, NewBooking, BOOKINGS_TABLE,
    MAX_SERVICE_MINUTES,
};
pub use mechanic::{
    MechanicProfile, PerformanceMetrics, Specialties, MECHANICS_TABLE, MECHANIC_PROFILES_TABLE,
};
pub use profile::{changed_fields, CustomerProfileUpdate, MechanicProfileUpdate, USERS_TABLE};
pub use search::{page_bounds, MechanicSearch, NearbySearch, MAX_PAGE_SIZE};
