pub mod band_service;
