//! Place-search API access: transport, credentials, and the endpoint client.
mod client;
mod credentials;
mod transport;

pub use client::{first_photo_reference, PlacesClient};
pub use credentials::ApiKey;
pub use transport::{HttpTransport, Pacer, ThreadPacer, Transport};

#[cfg(test)]
pub mod fake;
