mod booking_service;
mod errors;

pub use booking_service::{
    ServiceDependencies, UserBooking, create_booking, list_current_user_bookings,
    list_spot_bookings,
};
pub use errors::{BookingApplicationError, Result};
