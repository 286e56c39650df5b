//! Shared-secret admin check.

use std::sync::Arc;

use battlefield_common::{AppError, AppResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const TAG_KEY: &[u8] = b"battlefield-admin";

/// Gatekeeper for the moderation endpoints.
///
/// Only an HMAC-SHA256 tag of the password is kept; candidates are tagged the
/// same way and compared in constant time.
#[derive(Clone)]
pub struct AdminService {
    tag: Arc<[u8]>,
}

impl AdminService {
    /// Create an admin service guarding the given password.
    #[must_use]
    pub fn new(password: &str) -> Self {
        let tag = tagger()
            .map(|mut mac| {
                mac.update(password.as_bytes());
                mac.finalize().into_bytes().to_vec()
            })
            .unwrap_or_default();
        Self { tag: tag.into() }
    }

    /// Whether `candidate` is the admin password.
    #[must_use]
    pub fn is_valid(&self, candidate: &str) -> bool {
        let Some(mut mac) = tagger() else {
            return false;
        };
        mac.update(candidate.as_bytes());
        mac.verify_slice(&self.tag).is_ok()
    }

    /// Fail with `Unauthorized` unless `candidate` is the admin password.
    pub fn verify(&self, candidate: &str) -> AppResult<()> {
        if self.is_valid(candidate) {
            Ok(())
        } else {
            tracing::debug!("Rejected admin credentials");
            Err(AppError::Unauthorized)
        }
    }
}

fn tagger() -> Option<HmacSha256> {
    HmacSha256::new_from_slice(TAG_KEY).ok()
}

impl std::fmt::Debug for AdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminService").finish_non_exhaustive()
    }
}
