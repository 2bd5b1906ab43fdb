//! Database schema, models, and chunked writes

pub mod init;
pub mod models;
pub mod writer;

pub use init::*;
pub use models::*;
pub use writer::*;
