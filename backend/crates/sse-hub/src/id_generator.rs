use crate::{HubError, Result as HubResult, SubscriberId};

use std::panic::Location;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use error_location::ErrorLocation;
use rand::TryRngCore;
use rand::rngs::OsRng;

/// Redraws allowed before giving up on a free id.
///
/// At 20 characters a single collision is already improbable; hitting this
/// limit means the entropy source is returning repeated bytes.
pub const MAX_ID_ATTEMPTS: usize = 16;

/// Source of random bytes for subscriber ids
pub trait EntropySource: Send + Sync {
    /// Fill `buf` completely or report why not.
    fn fill(&self, buf: &mut [u8]) -> std::result::Result<(), String>;
}

/// Operating-system CSPRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> std::result::Result<(), String> {
        OsRng.try_fill_bytes(buf).map_err(|e| e.to_string())
    }
}

/// Produces short URL-safe ids that are unique among live subscribers
pub struct IdGenerator {
    source: Box<dyn EntropySource>,
    id_length: usize,
}

impl IdGenerator {
    pub fn new(id_length: usize) -> Self {
        Self::with_source(id_length, OsEntropy)
    }

    pub fn with_source(id_length: usize, source: impl EntropySource + 'static) -> Self {
        Self {
            source: Box::new(source),
            id_length,
        }
    }

    pub fn id_length(&self) -> usize {
        self.id_length
    }

    /// Draw candidates until one is not taken.
    ///
    /// `is_taken` is evaluated against the live set, so the caller must hold
    /// whatever guards that set until the returned id is inserted.
    #[track_caller]
    pub fn generate<F>(&self, is_taken: F) -> HubResult<SubscriberId>
    where
        F: Fn(&SubscriberId) -> bool,
    {
        let mut random_bytes = vec![0u8; self.id_length];

        for _ in 0..MAX_ID_ATTEMPTS {
            self.source
                .fill(&mut random_bytes)
                .map_err(|message| HubError::RandomnessFailure {
                    message,
                    location: ErrorLocation::from(Location::caller()),
                })?;

            let mut encoded = URL_SAFE.encode(&random_bytes);
            encoded.truncate(self.id_length);

            let candidate = SubscriberId::from_generated(encoded);
            if !is_taken(&candidate) {
                return Ok(candidate);
            }

            log::debug!("Subscriber id collision on {candidate}, redrawing");
        }

        Err(HubError::IdCollision {
            attempts: MAX_ID_ATTEMPTS,
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(crate::RegistryConfig::default().id_length)
    }
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator")
            .field("id_length", &self.id_length)
            .finish()
    }
}
