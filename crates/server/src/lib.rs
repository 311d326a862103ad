//! HTTP/JSON transport and process startup for the email gateway

pub mod envelope;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod startup;

pub use startup::{build_app, run_with_config};
