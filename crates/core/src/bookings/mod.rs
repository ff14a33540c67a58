//! Bookings and user accounts, as read by the admin dashboard.

pub mod model;

pub use model::{Booking, BookingStatus, BookingTotals, TimeWindow, User, UserCredentials};
