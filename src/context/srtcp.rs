use byteorder::{BigEndian, ByteOrder};

use crate::auth::Authenticator;
use crate::crypto::{ctr, f8, KeystreamMode};
use crate::error::{Error, Result};
use crate::key_derivation::{LABEL_RTCP_AUTHENTICATION, LABEL_RTCP_ENCRYPTION, LABEL_RTCP_SALT};
use crate::packet::{RawPacket, RTCP_FIXED_HEADER_LEN, SRTCP_INDEX_LEN};
use crate::policy::{EncryptionAlgorithm, Policy};
use crate::replay::ReplayWindow;

use super::SessionKeys;

/// The explicit SRTCP index is 31 bits; the trailer word's top bit is the
/// E-flag.
pub(crate) const MAX_SRTCP_INDEX: u32 = 0x7fff_ffff;
const E_FLAG: u32 = 1 << 31;

/// Cryptographic state for one RTCP source. Unlike RTP, the packet index is
/// carried on the wire in the trailer word before the tag, and the eight
/// byte RTCP fixed header always stays in cleartext.
pub struct SrtcpContext {
    ssrc: u32,
    policy: Policy,
    keys: SessionKeys,
    auth: Authenticator,
    sent_index: u32,
    received_index: u32,
    replay: ReplayWindow,
    closed: bool,
}

impl SrtcpContext {
    pub fn new(
        ssrc: u32,
        master_key: &[u8],
        master_salt: &[u8],
        policy: Policy,
    ) -> Result<SrtcpContext> {
        let keys = SessionKeys::derive(
            &policy,
            master_key,
            master_salt,
            [LABEL_RTCP_ENCRYPTION, LABEL_RTCP_AUTHENTICATION, LABEL_RTCP_SALT],
        )?;
        let auth = Authenticator::new(&policy, &keys.auth_key)?;
        Ok(SrtcpContext {
            ssrc,
            policy,
            keys,
            auth,
            sent_index: 0,
            received_index: 0,
            replay: ReplayWindow::new(),
            closed: false,
        })
    }

    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    /// Apply protection in place: encrypt everything after the fixed
    /// header, append the E|index trailer, then the tag over both.
    pub fn transform(&mut self, packet: &mut RawPacket) -> Result<()> {
        self.ensure_open()?;
        if packet.len() < RTCP_FIXED_HEADER_LEN {
            return Err(Error::ShortPacket(packet.len(), RTCP_FIXED_HEADER_LEN));
        }

        self.sent_index = self.sent_index.wrapping_add(1) & MAX_SRTCP_INDEX;
        let encrypted = self.policy.encryption() != EncryptionAlgorithm::Null;
        let index_word = if encrypted {
            self.sent_index | E_FLAG
        } else {
            self.sent_index
        };

        let payload_end = packet.len();
        self.apply_keystream(packet, payload_end, index_word)?;

        let mut trailer = [0u8; SRTCP_INDEX_LEN];
        BigEndian::write_u32(&mut trailer, index_word);
        packet.append(&trailer);

        if let Some(tag) = self.auth.rtcp_tag(packet.as_slice()) {
            packet.append(&tag[..self.auth.tag_len()]);
        }
        Ok(())
    }

    /// Remove protection in place: replay-check the explicit index, verify
    /// the tag over packet and trailer, then honor the E-flag. A rejected
    /// packet mutates nothing.
    pub fn reverse_transform(&mut self, packet: &mut RawPacket) -> Result<()> {
        self.ensure_open()?;
        let tag_len = self.auth.tag_len();
        let index_word = packet.srtcp_index_word(tag_len)?;
        let encrypted = index_word & E_FLAG != 0;
        let index = index_word & MAX_SRTCP_INDEX;

        let delta = index as i64 - self.received_index as i64;
        self.replay.check(delta)?;

        let body_len = packet.len() - tag_len;
        if tag_len > 0 {
            let (body, wire_tag) = packet.as_slice().split_at(body_len);
            self.auth.verify_rtcp(body, wire_tag)?;
        }

        let payload_end = body_len - SRTCP_INDEX_LEN;
        if encrypted {
            if self.policy.encryption() == EncryptionAlgorithm::Null {
                return Err(Error::EncryptionMismatch);
            }
            self.apply_keystream(packet, payload_end, index_word)?;
        }
        packet.truncate(payload_end);

        if delta > 0 {
            self.received_index = index;
        }
        self.replay.accept(delta);
        Ok(())
    }

    /// Scrub the session keys; the context refuses all further work.
    pub fn close(&mut self) {
        self.keys.scrub();
        self.auth.scrub();
        self.closed = true;
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }
        Ok(())
    }

    fn apply_keystream(
        &self,
        packet: &mut RawPacket,
        payload_end: usize,
        index_word: u32,
    ) -> Result<()> {
        match KeystreamMode::of(self.policy.encryption()) {
            None => Ok(()),
            Some(KeystreamMode::Counter(kind)) => {
                let index = (index_word & MAX_SRTCP_INDEX) as u64;
                let iv = ctr::counter_iv(&self.keys.salt_key, self.ssrc, index);
                ctr::xor_keystream(
                    kind,
                    &self.keys.enc_key,
                    &iv,
                    &mut packet.as_mut_slice()[RTCP_FIXED_HEADER_LEN..payload_end],
                )
            }
            Some(KeystreamMode::F8(kind)) => {
                let iv = f8::srtcp_iv(packet.as_slice(), index_word);
                f8::xor_keystream(
                    kind,
                    &self.keys.enc_key,
                    &self.keys.salt_key,
                    &iv,
                    &mut packet.as_mut_slice()[RTCP_FIXED_HEADER_LEN..payload_end],
                )
            }
        }
    }
}
