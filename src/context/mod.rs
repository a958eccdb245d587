#[cfg(test)]
mod context_test;

pub mod srtcp;
pub mod srtp;

pub use srtcp::SrtcpContext;
pub use srtp::SrtpContext;

use crate::crypto::CipherKind;
use crate::error::{Error, Result};
use crate::key_derivation::derive_session_key;
use crate::policy::Policy;

/// The enc/auth/salt triple derived for one direction of one stream kind.
/// Zeroed on close and again on drop.
pub(crate) struct SessionKeys {
    pub enc_key: Vec<u8>,
    pub auth_key: Vec<u8>,
    pub salt_key: Vec<u8>,
}

impl SessionKeys {
    /// Derive the triple from master material. The PRF family follows the
    /// policy cipher; authentication-only policies keep the AES PRF.
    pub fn derive(
        policy: &Policy,
        master_key: &[u8],
        master_salt: &[u8],
        labels: [u8; 3],
    ) -> Result<SessionKeys> {
        if master_key.len() != policy.enc_key_len() {
            return Err(Error::MasterKeyLength(policy.enc_key_len(), master_key.len()));
        }
        if master_salt.len() != policy.salt_key_len() {
            return Err(Error::MasterSaltLength(
                policy.salt_key_len(),
                master_salt.len(),
            ));
        }

        let kind = CipherKind::of(policy.encryption()).unwrap_or(CipherKind::Aes128);
        let [enc_label, auth_label, salt_label] = labels;
        Ok(SessionKeys {
            enc_key: derive_session_key(kind, enc_label, master_key, master_salt, policy.enc_key_len())?,
            auth_key: derive_session_key(kind, auth_label, master_key, master_salt, policy.auth_key_len())?,
            salt_key: derive_session_key(kind, salt_label, master_key, master_salt, policy.salt_key_len())?,
        })
    }

    pub fn scrub(&mut self) {
        self.enc_key.fill(0);
        self.auth_key.fill(0);
        self.salt_key.fill(0);
    }
}

impl Drop for SessionKeys {
    fn drop(&mut self) {
        self.scrub();
    }
}
