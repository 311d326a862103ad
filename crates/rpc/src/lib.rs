//! gRPC transport for the email gateway
//!
//! - [`proto`] generated messages and service stubs
//! - [`server`] binds the five methods to `EmailGateway`
//! - [`client`] typed caller, and [`driver`] the end-to-end scenario built on it

pub mod proto;
pub mod server;
pub mod client;
pub mod driver;

pub use client::{EmailRpcClient, RpcError};
pub use server::{EmailRpcService, RpcServer};
