#[cfg(test)]
mod crypto_test;

pub(crate) mod ctr;
pub(crate) mod f8;

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes128;
use twofish::Twofish;

use crate::error::{Error, Result};
use crate::policy::EncryptionAlgorithm;

pub(crate) const BLOCK_LEN: usize = 16;
pub(crate) const SESSION_KEY_LEN: usize = 16;

/// Block-cipher family behind a keystream mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CipherKind {
    Aes128,
    Twofish128,
}

impl CipherKind {
    /// The family an encryption transform draws its blocks from. The null
    /// cipher has none.
    pub fn of(encryption: EncryptionAlgorithm) -> Option<CipherKind> {
        KeystreamMode::of(encryption).map(|mode| match mode {
            KeystreamMode::Counter(kind) | KeystreamMode::F8(kind) => kind,
        })
    }

    pub fn block_cipher(&self, key: &[u8]) -> Result<SrtpBlockCipher> {
        match self {
            CipherKind::Aes128 => Aes128::new_from_slice(key)
                .map(SrtpBlockCipher::Aes)
                .map_err(|_| Error::SessionKeyLength(SESSION_KEY_LEN, key.len())),
            CipherKind::Twofish128 => Twofish::new_from_slice(key)
                .map(SrtpBlockCipher::Twofish)
                .map_err(|_| Error::SessionKeyLength(SESSION_KEY_LEN, key.len())),
        }
    }
}

/// How a policy's encryption transform builds its keystream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeystreamMode {
    Counter(CipherKind),
    F8(CipherKind),
}

impl KeystreamMode {
    pub fn of(encryption: EncryptionAlgorithm) -> Option<KeystreamMode> {
        match encryption {
            EncryptionAlgorithm::Null => None,
            EncryptionAlgorithm::AesCm => Some(KeystreamMode::Counter(CipherKind::Aes128)),
            EncryptionAlgorithm::AesF8 => Some(KeystreamMode::F8(CipherKind::Aes128)),
            EncryptionAlgorithm::TwofishCm => Some(KeystreamMode::Counter(CipherKind::Twofish128)),
            EncryptionAlgorithm::TwofishF8 => Some(KeystreamMode::F8(CipherKind::Twofish128)),
        }
    }
}

/// A keyed 128-bit block cipher of either family.
pub(crate) enum SrtpBlockCipher {
    Aes(Aes128),
    Twofish(Twofish),
}

impl SrtpBlockCipher {
    pub fn encrypt_block(&self, block: &mut [u8; BLOCK_LEN]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            SrtpBlockCipher::Aes(cipher) => cipher.encrypt_block(block),
            SrtpBlockCipher::Twofish(cipher) => cipher.encrypt_block(block),
        }
    }
}
