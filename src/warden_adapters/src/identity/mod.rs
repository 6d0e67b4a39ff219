pub mod os_rng_token_id_generator;

pub use os_rng_token_id_generator::OsRngTokenIdGenerator;
