use rand::{TryRngCore, rngs::OsRng};
use uuid::{Builder, Uuid};
use warden_core::TokenIdGenerator;

/// Random v4 token ids straight from the operating system RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRngTokenIdGenerator;

impl TokenIdGenerator for OsRngTokenIdGenerator {
    fn generate(&self) -> Result<Uuid, String> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| e.to_string())?;
        Ok(Builder::from_random_bytes(bytes).into_uuid())
    }
}
