
use crate::crypto::{ctr, CipherKind, BLOCK_LEN};
use crate::error::Result;

pub(crate) const LABEL_RTP_ENCRYPTION: u8 = 0x00;
pub(crate) const LABEL_RTP_AUTHENTICATION: u8 = 0x01;
pub(crate) const LABEL_RTP_SALT: u8 = 0x02;
pub(crate) const LABEL_RTCP_ENCRYPTION: u8 = 0x03;
pub(crate) const LABEL_RTCP_AUTHENTICATION: u8 = 0x04;
pub(crate) const LABEL_RTCP_SALT: u8 = 0x05;

/// https://tools.ietf.org/html/rfc3711#section-4.3.1
/// The label is folded into byte 7 of the master salt; the result, with a
/// zeroed two-byte counter, seeds the counter-mode PRF under the master
/// key. The key-derivation rate is fixed at zero, so every session key is
/// derived exactly once, at context construction.
pub(crate) fn derive_session_key(
    kind: CipherKind,
    label: u8,
    master_key: &[u8],
    master_salt: &[u8],
    out_len: usize,
) -> Result<Vec<u8>> {
    let mut iv = [0u8; BLOCK_LEN];
    iv[..master_salt.len()].copy_from_slice(master_salt);
    iv[7] ^= label;
    ctr::keystream(kind, master_key, &iv, out_len)
}
