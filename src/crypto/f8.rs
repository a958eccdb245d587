use byteorder::{BigEndian, ByteOrder};

use super::{CipherKind, BLOCK_LEN};
use crate::error::Result;

/// https://tools.ietf.org/html/rfc3711#section-4.1.2.3
/// Packet IV for f8-protected RTP: byte 0 zeroed, bytes 1..12 taken from the
/// RTP header, the rollover counter in the last four bytes. The caller has
/// already validated the fixed header.
pub(crate) fn srtp_iv(packet: &[u8], roc: u32) -> [u8; BLOCK_LEN] {
    let mut iv = [0u8; BLOCK_LEN];
    iv[1..12].copy_from_slice(&packet[1..12]);
    BigEndian::write_u32(&mut iv[12..16], roc);
    iv
}

/// https://tools.ietf.org/html/rfc3711#section-4.1.2.4
/// Packet IV for f8-protected RTCP: four zero bytes, the E|index word, then
/// the first eight bytes of the RTCP header.
pub(crate) fn srtcp_iv(packet: &[u8], index_word: u32) -> [u8; BLOCK_LEN] {
    let mut iv = [0u8; BLOCK_LEN];
    BigEndian::write_u32(&mut iv[4..8], index_word);
    iv[8..16].copy_from_slice(&packet[..8]);
    iv
}

/// https://tools.ietf.org/html/rfc3711#section-4.1.2
/// The packet IV is encrypted under the session key masked with the session
/// salt (padded with 0x55) to give IV'; keystream blocks then chain as
/// S(j) = E(S(j-1) XOR IV' XOR j), with j folded into bytes 12..16.
pub(crate) fn xor_keystream(
    kind: CipherKind,
    key: &[u8],
    salt: &[u8],
    iv: &[u8; BLOCK_LEN],
    data: &mut [u8],
) -> Result<()> {
    let mut masked_key = key.to_vec();
    for (i, b) in masked_key.iter_mut().enumerate() {
        *b ^= salt.get(i).copied().unwrap_or(0x55);
    }
    let iv_cipher = kind.block_cipher(&masked_key)?;
    let data_cipher = kind.block_cipher(key)?;
    masked_key.fill(0);

    let mut iv_accent = *iv;
    iv_cipher.encrypt_block(&mut iv_accent);

    let mut s = [0u8; BLOCK_LEN];
    for (j, chunk) in data.chunks_mut(BLOCK_LEN).enumerate() {
        for (b, m) in s.iter_mut().zip(&iv_accent) {
            *b ^= m;
        }
        let counter = (j as u32).to_be_bytes();
        for (b, c) in s[12..16].iter_mut().zip(&counter) {
            *b ^= c;
        }
        data_cipher.encrypt_block(&mut s);
        for (b, k) in chunk.iter_mut().zip(&s) {
            *b ^= k;
        }
    }
    Ok(())
}
