//! Service layer for the band registry.
//! - `BandRepository` abstracts the record store (Postgres or in-memory).
//! - `BandService` validates payloads and performs one store call per operation.
//! - Errors are typed so the HTTP layer can pick status codes.

pub mod errors;
pub mod band;
pub mod db;
pub mod storage;
#[cfg(test)]
pub mod test_support;
