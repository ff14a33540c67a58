//! Domain core of the temple services backend: catalog content, services,
//! shopper carts, the admin session guard and dashboard statistics.

pub mod auth;
pub mod bookings;
pub mod cart;
pub mod catalog;
pub mod content;
pub mod events;
pub mod stats;
pub mod store;

#[cfg(test)]
mod test;
