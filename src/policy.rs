
use crate::error::{Error, Result};

const CIPHER_KEY_LEN: usize = 16;
const CIPHER_SALT_LEN: usize = 14;
const HMAC_SHA1_KEY_LEN: usize = 20;
const HMAC_SHA1_OUTPUT_LEN: usize = 20;

/// Keystream transform applied to the protected portion of a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionAlgorithm {
    Null,
    AesCm,
    AesF8,
    TwofishCm,
    TwofishF8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationAlgorithm {
    Null,
    HmacSha1,
}

/// Policy describes the algorithms and key/tag sizes of one direction of a
/// protected stream, similar to a TLS cipher suite. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    encryption: EncryptionAlgorithm,
    authentication: AuthenticationAlgorithm,
    enc_key_len: usize,
    salt_key_len: usize,
    auth_key_len: usize,
    auth_tag_len: usize,
}

impl Policy {
    pub fn new(
        encryption: EncryptionAlgorithm,
        authentication: AuthenticationAlgorithm,
        enc_key_len: usize,
        salt_key_len: usize,
        auth_key_len: usize,
        auth_tag_len: usize,
    ) -> Result<Policy> {
        // The key-derivation PRF runs even for authentication-only policies,
        // so the null cipher keeps the 128-bit key and 112-bit salt sizes.
        if enc_key_len != CIPHER_KEY_LEN {
            return Err(Error::PolicyInvalid(format!(
                "encryption key must be {CIPHER_KEY_LEN} bytes, got {enc_key_len}"
            )));
        }
        if salt_key_len != CIPHER_SALT_LEN {
            return Err(Error::PolicyInvalid(format!(
                "salt key must be {CIPHER_SALT_LEN} bytes, got {salt_key_len}"
            )));
        }

        match authentication {
            AuthenticationAlgorithm::HmacSha1 => {
                if auth_key_len != HMAC_SHA1_KEY_LEN {
                    return Err(Error::PolicyInvalid(format!(
                        "HMAC-SHA1 auth key must be {HMAC_SHA1_KEY_LEN} bytes, got {auth_key_len}"
                    )));
                }
                if auth_tag_len == 0 || auth_tag_len > HMAC_SHA1_OUTPUT_LEN {
                    return Err(Error::PolicyInvalid(format!(
                        "HMAC-SHA1 tag must be 1..={HMAC_SHA1_OUTPUT_LEN} bytes, got {auth_tag_len}"
                    )));
                }
            }
            AuthenticationAlgorithm::Null => {
                if auth_key_len != 0 || auth_tag_len != 0 {
                    return Err(Error::PolicyInvalid(
                        "null authentication carries no key or tag".to_owned(),
                    ));
                }
            }
        }

        Ok(Policy {
            encryption,
            authentication,
            enc_key_len,
            salt_key_len,
            auth_key_len,
            auth_tag_len,
        })
    }

    pub fn aes_cm_128_hmac_sha1_80() -> Policy {
        Policy {
            encryption: EncryptionAlgorithm::AesCm,
            authentication: AuthenticationAlgorithm::HmacSha1,
            enc_key_len: CIPHER_KEY_LEN,
            salt_key_len: CIPHER_SALT_LEN,
            auth_key_len: HMAC_SHA1_KEY_LEN,
            auth_tag_len: 10,
        }
    }

    pub fn aes_cm_128_hmac_sha1_32() -> Policy {
        Policy {
            auth_tag_len: 4,
            ..Policy::aes_cm_128_hmac_sha1_80()
        }
    }

    pub fn aes_f8_128_hmac_sha1_80() -> Policy {
        Policy {
            encryption: EncryptionAlgorithm::AesF8,
            ..Policy::aes_cm_128_hmac_sha1_80()
        }
    }

    pub fn twofish_cm_128_hmac_sha1_80() -> Policy {
        Policy {
            encryption: EncryptionAlgorithm::TwofishCm,
            ..Policy::aes_cm_128_hmac_sha1_80()
        }
    }

    pub fn twofish_f8_128_hmac_sha1_80() -> Policy {
        Policy {
            encryption: EncryptionAlgorithm::TwofishF8,
            ..Policy::aes_cm_128_hmac_sha1_80()
        }
    }

    /// Authentication-only profile: payload stays in cleartext.
    pub fn null_cipher_hmac_sha1_80() -> Policy {
        Policy {
            encryption: EncryptionAlgorithm::Null,
            ..Policy::aes_cm_128_hmac_sha1_80()
        }
    }

    pub fn encryption(&self) -> EncryptionAlgorithm {
        self.encryption
    }

    pub fn authentication(&self) -> AuthenticationAlgorithm {
        self.authentication
    }

    pub fn enc_key_len(&self) -> usize {
        self.enc_key_len
    }

    pub fn salt_key_len(&self) -> usize {
        self.salt_key_len
    }

    pub fn auth_key_len(&self) -> usize {
        self.auth_key_len
    }

    pub fn auth_tag_len(&self) -> usize {
        self.auth_tag_len
    }
}
