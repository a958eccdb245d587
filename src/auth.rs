use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};
use crate::policy::{AuthenticationAlgorithm, Policy};

type HmacSha1 = Hmac<Sha1>;

pub(crate) const MAX_TAG_LEN: usize = 20;

/// Tag generation and verification for one stream direction. The keyed MAC
/// is prepared once and cloned per packet.
pub(crate) struct Authenticator {
    tag_len: usize,
    mac: Option<HmacSha1>,
}

impl Authenticator {
    pub fn new(policy: &Policy, auth_key: &[u8]) -> Result<Authenticator> {
        let mac = match policy.authentication() {
            AuthenticationAlgorithm::Null => None,
            AuthenticationAlgorithm::HmacSha1 => Some(
                HmacSha1::new_from_slice(auth_key)
                    .map_err(|_| Error::SessionKeyLength(policy.auth_key_len(), auth_key.len()))?,
            ),
        };
        Ok(Authenticator {
            tag_len: policy.auth_tag_len(),
            mac,
        })
    }

    /// Truncated tag length on the wire; zero when authentication is off.
    pub fn tag_len(&self) -> usize {
        if self.mac.is_some() {
            self.tag_len
        } else {
            0
        }
    }

    /// https://tools.ietf.org/html/rfc3711#section-4.2
    /// SRTP authenticated data is the packet followed by the rollover
    /// counter in network order.
    pub fn rtp_tag(&self, packet: &[u8], roc: u32) -> Option<[u8; MAX_TAG_LEN]> {
        let mut signer = self.mac.as_ref()?.clone();
        signer.update(packet);
        signer.update(&roc.to_be_bytes());
        Some(signer.finalize().into_bytes().into())
    }

    /// SRTCP authenticated data is the packet with the E|index trailer
    /// already in place.
    pub fn rtcp_tag(&self, packet: &[u8]) -> Option<[u8; MAX_TAG_LEN]> {
        let mut signer = self.mac.as_ref()?.clone();
        signer.update(packet);
        Some(signer.finalize().into_bytes().into())
    }

    pub fn verify_rtp(&self, packet: &[u8], roc: u32, wire_tag: &[u8]) -> Result<()> {
        match self.rtp_tag(packet, roc) {
            Some(expected) => verify(&expected[..self.tag_len], wire_tag),
            None => Ok(()),
        }
    }

    pub fn verify_rtcp(&self, packet: &[u8], wire_tag: &[u8]) -> Result<()> {
        match self.rtcp_tag(packet) {
            Some(expected) => verify(&expected[..self.tag_len], wire_tag),
            None => Ok(()),
        }
    }

    /// Drop the keyed MAC state on close.
    pub fn scrub(&mut self) {
        self.mac = None;
    }
}

fn verify(expected: &[u8], wire: &[u8]) -> Result<()> {
    if expected.ct_eq(wire).unwrap_u8() != 1 {
        return Err(Error::AuthFailed);
    }
    Ok(())
}
