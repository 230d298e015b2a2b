pub mod brokers;
pub mod ingest;
pub mod listings;
pub mod schema;

mod error;

pub use brokers::Brokers;
pub use error::Error;
pub use listings::Listings;

pub type Result<T, E = Error> = std::result::Result<T, E>;
