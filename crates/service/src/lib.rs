//! Service layer shared by both transports.
//! - `storage` defines the keyed storage contract and its implementations.
//! - `gateway` applies validation, per-call deadlines and the re-read rule.

pub mod errors;
pub mod pagination;
pub mod storage;
pub mod gateway;
#[cfg(test)]
pub mod test_support;

pub use errors::{GatewayError, StoreError};
pub use gateway::EmailGateway;
pub use pagination::BatchQuery;
pub use storage::{EmailStore, MemoryEmailStore, SeaOrmEmailStore};
