/// Moltbook API layer: request building, transport, retries, decoding.
pub mod client;
pub mod errors;
pub mod models;
pub mod payload;
pub mod query;

#[cfg(test)]
pub(crate) mod testing;

pub use client::Client;
pub use errors::ApiError;
