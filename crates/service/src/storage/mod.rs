//! Storage backends for the service layer that do not go through SeaORM.

pub mod memory_band_store;
