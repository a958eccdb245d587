
use byteorder::{BigEndian, ByteOrder};
use bytes::BytesMut;

use crate::error::{Error, Result};

pub(crate) const RTP_FIXED_HEADER_LEN: usize = 12;
pub(crate) const RTCP_FIXED_HEADER_LEN: usize = 8;
pub(crate) const SRTCP_INDEX_LEN: usize = 4;

/// An owned, mutable packet buffer plus the handful of RTP/RTCP field reads
/// the transforms need. It copies on construction and grows on append, so it
/// never aliases a caller's buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    buf: BytesMut,
}

impl RawPacket {
    pub fn copy_from(data: &[u8]) -> RawPacket {
        RawPacket {
            buf: BytesMut::from(data),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    pub fn append(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    pub fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    fn require(&self, len: usize) -> Result<()> {
        if self.buf.len() < len {
            return Err(Error::ShortPacket(self.buf.len(), len));
        }
        Ok(())
    }

    /// RTP sequence number, bytes 2..4 of the fixed header.
    pub fn rtp_sequence_number(&self) -> Result<u16> {
        self.require(RTP_FIXED_HEADER_LEN)?;
        Ok(BigEndian::read_u16(&self.buf[2..4]))
    }

    /// RTP synchronization source, bytes 8..12 of the fixed header.
    pub fn rtp_ssrc(&self) -> Result<u32> {
        self.require(RTP_FIXED_HEADER_LEN)?;
        Ok(BigEndian::read_u32(&self.buf[8..12]))
    }

    /// Length of the cleartext RTP header: the fixed 12 bytes, the CSRC
    /// list, and, when the X bit is set, the extension header and payload.
    pub fn rtp_header_len(&self) -> Result<usize> {
        self.require(RTP_FIXED_HEADER_LEN)?;
        let csrc_count = (self.buf[0] & 0x0f) as usize;
        let has_extension = self.buf[0] & 0x10 != 0;

        let mut header_len = RTP_FIXED_HEADER_LEN + 4 * csrc_count;
        if has_extension {
            self.require(header_len + 4)?;
            let ext_words = BigEndian::read_u16(&self.buf[header_len + 2..header_len + 4]) as usize;
            header_len += 4 + 4 * ext_words;
        }
        self.require(header_len)?;
        Ok(header_len)
    }

    /// SSRC of the first RTCP packet in the buffer, bytes 4..8.
    pub fn rtcp_ssrc(&self) -> Result<u32> {
        self.require(RTCP_FIXED_HEADER_LEN)?;
        Ok(BigEndian::read_u32(&self.buf[4..8]))
    }

    /// The E|index word sitting between the RTCP payload and the auth tag.
    pub fn srtcp_index_word(&self, auth_tag_len: usize) -> Result<u32> {
        self.require(RTCP_FIXED_HEADER_LEN + SRTCP_INDEX_LEN + auth_tag_len)?;
        let offset = self.buf.len() - auth_tag_len - SRTCP_INDEX_LEN;
        Ok(BigEndian::read_u32(&self.buf[offset..offset + 4]))
    }
}

impl AsRef<[u8]> for RawPacket {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}
