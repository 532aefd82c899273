//! Core library for the expediente expiry alert service: spreadsheet
//! loading, expiry classification, and report aggregation.

pub mod config;
pub mod error;
pub mod expedientes;
pub mod telemetry;
