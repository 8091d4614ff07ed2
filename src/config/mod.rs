mod seed;

pub use seed::{DEFAULT_WORKSPACE, SeedConfig, SeedEntry, SeedError};
