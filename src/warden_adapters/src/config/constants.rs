pub mod env {
    pub const APP_ENVIRONMENT_ENV_VAR: &str = "APP_ENVIRONMENT";
    /// Prefix for overrides such as `WARDEN__TOKEN__SECRET`.
    pub const SETTINGS_ENV_PREFIX: &str = "WARDEN";
    pub const SETTINGS_ENV_SEPARATOR: &str = "__";
}

pub const CONFIG_DIR: &str = "config";
pub const BASE_CONFIG_FILE: &str = "base";

pub mod defaults {
    pub const APP_HOST: &str = "0.0.0.0";
    pub const APP_PORT: u16 = 3000;
    pub const REQUEST_TIMEOUT_IN_MILLIS: u64 = 10_000;
    pub const TOKEN_DURATION: &str = "24h";
    pub const POSTGRES_MAX_CONNECTIONS: u32 = 5;
    pub const REDIS_HOST_NAME: &str = "127.0.0.1";
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub const TOKEN_SECRET: &str = "test-token-secret";
}
