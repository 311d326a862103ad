pub mod types;
pub mod utils;
pub mod observability;

pub use types::EmailEntry;
