use crate::auth::Authenticator;
use crate::crypto::{ctr, f8, KeystreamMode};
use crate::error::{Error, Result};
use crate::key_derivation::{LABEL_RTP_AUTHENTICATION, LABEL_RTP_ENCRYPTION, LABEL_RTP_SALT};
use crate::packet::RawPacket;
use crate::policy::Policy;
use crate::replay::ReplayWindow;

use super::SessionKeys;

const SEQ_NUM_MEDIAN: u16 = 1 << 15;

/// Cryptographic state for one RTP source. A context protects packets in
/// one direction only: it must be used either only for `transform` or only
/// for `reverse_transform`.
///
/// The 48-bit packet index of the newest accepted packet is
/// `(roc << 16) | last_seq`; the replay window trails it.
pub struct SrtpContext {
    ssrc: u32,
    policy: Policy,
    keys: SessionKeys,
    auth: Authenticator,
    roc: u32,
    last_seq: u16,
    seq_seen: bool,
    replay: ReplayWindow,
    closed: bool,
}

impl SrtpContext {
    /// Build the context for `ssrc`, deriving its session keys from the
    /// master material. The material is only borrowed; the derived keys are
    /// the only secret the context retains.
    pub fn new(
        ssrc: u32,
        master_key: &[u8],
        master_salt: &[u8],
        policy: Policy,
    ) -> Result<SrtpContext> {
        let keys = SessionKeys::derive(
            &policy,
            master_key,
            master_salt,
            [LABEL_RTP_ENCRYPTION, LABEL_RTP_AUTHENTICATION, LABEL_RTP_SALT],
        )?;
        let auth = Authenticator::new(&policy, &keys.auth_key)?;
        Ok(SrtpContext {
            ssrc,
            policy,
            keys,
            auth,
            roc: 0,
            last_seq: 0,
            seq_seen: false,
            replay: ReplayWindow::new(),
            closed: false,
        })
    }

    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    pub fn rollover_counter(&self) -> u32 {
        self.roc
    }

    /// Apply protection in place: encrypt the payload, append the tag, and
    /// step the rollover counter once the sequence number has topped out.
    pub fn transform(&mut self, packet: &mut RawPacket) -> Result<()> {
        self.ensure_open()?;
        let seq = packet.rtp_sequence_number()?;
        let header_len = packet.rtp_header_len()?;
        let index = ((self.roc as u64) << 16) | seq as u64;

        self.apply_keystream(packet, header_len, index, self.roc)?;

        if let Some(tag) = self.auth.rtp_tag(packet.as_slice(), self.roc) {
            packet.append(&tag[..self.auth.tag_len()]);
        }

        if seq == u16::MAX {
            self.roc = self.roc.wrapping_add(1);
        }
        Ok(())
    }

    /// Remove protection in place: estimate the 48-bit index, check the
    /// replay window, verify the tag, decrypt, then commit the new index
    /// state. A rejected packet mutates nothing.
    pub fn reverse_transform(&mut self, packet: &mut RawPacket) -> Result<()> {
        self.ensure_open()?;
        let seq = packet.rtp_sequence_number()?;
        let header_len = packet.rtp_header_len()?;
        let tag_len = self.auth.tag_len();
        if packet.len() < header_len + tag_len {
            return Err(Error::ShortPacket(packet.len(), header_len + tag_len));
        }

        let (guess_roc, guess_index) = self.guess_index(seq);
        if guess_index < 0 {
            // Below the start of this source's index space.
            return Err(Error::ReplayOld);
        }
        let local_index = if self.seq_seen {
            ((self.roc as i64) << 16) | self.last_seq as i64
        } else {
            guess_index
        };
        let delta = guess_index - local_index;
        self.replay.check(delta)?;

        if tag_len > 0 {
            let body_len = packet.len() - tag_len;
            let (body, wire_tag) = packet.as_slice().split_at(body_len);
            self.auth.verify_rtp(body, guess_roc as u32, wire_tag)?;
            packet.truncate(body_len);
        }

        self.apply_keystream(packet, header_len, guess_index as u64, guess_roc as u32)?;

        self.replay.accept(delta);
        if !self.seq_seen {
            self.seq_seen = true;
            self.last_seq = seq;
        } else if guess_roc > self.roc as i64 {
            self.roc = guess_roc as u32;
            self.last_seq = seq;
        } else if delta > 0 {
            self.last_seq = seq;
        }
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

    /// https://tools.ietf.org/html/rfc3711#section-3.3.1
    /// Estimate the rollover counter and 48-bit index for a received
    /// sequence number. The estimate can undershoot roc 0, which the caller
    /// treats as older-than-anything.
    fn guess_index(&self, seq: u16) -> (i64, i64) {
        let roc = self.roc as i64;
        let v = if self.seq_seen { self.last_seq } else { seq };
        let guess_roc = if v < SEQ_NUM_MEDIAN {
            if seq as i32 - v as i32 > SEQ_NUM_MEDIAN as i32 {
                roc - 1
            } else {
                roc
            }
        } else if v - SEQ_NUM_MEDIAN > seq {
            roc + 1
        } else {
            roc
        };
        (guess_roc, (guess_roc << 16) | seq as i64)
    }

    fn apply_keystream(
        &self,
        packet: &mut RawPacket,
        header_len: usize,
        index: u64,
        roc: u32,
    ) -> Result<()> {
        match KeystreamMode::of(self.policy.encryption()) {
            None => Ok(()),
            Some(KeystreamMode::Counter(kind)) => {
                let iv = ctr::counter_iv(&self.keys.salt_key, self.ssrc, index);
                ctr::xor_keystream(
                    kind,
                    &self.keys.enc_key,
                    &iv,
                    &mut packet.as_mut_slice()[header_len..],
                )
            }
            Some(KeystreamMode::F8(kind)) => {
                let iv = f8::srtp_iv(packet.as_slice(), roc);
                f8::xor_keystream(
                    kind,
                    &self.keys.enc_key,
                    &self.keys.salt_key,
                    &iv,
                    &mut packet.as_mut_slice()[header_len..],
                )
            }
        }
    }
}
