pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{
    AllowedOrigins, AppEnvironment, ApplicationSettings, PostgresSettings, RedisSettings,
    TokenSettings, WardenSettings,
};
