//! cdg-seed - Demo database seeders
//!
//! Each seeder is an independent batch step: it reads the run configuration,
//! generates candidate records in memory from a deterministic seeded random
//! stream, and writes them through the chunked upsert writer. Seeders can run
//! individually or together via the `all` subcommand, which applies them in
//! dependency order.

pub mod data;
pub mod seeders;
