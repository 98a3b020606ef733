// ridedesk-api: Async Rust client for the ride booking admin backend

pub mod auth;
pub mod bookings;
pub mod client;
pub mod error;
pub mod legal;
pub mod models;
pub mod session;
pub mod transport;
pub mod users;
pub mod vehicles;

pub use client::AdminClient;
pub use error::Error;
pub use session::Session;
pub use transport::{TlsMode, TransportConfig};
