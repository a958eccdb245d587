
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::context::{SrtcpContext, SrtpContext};
use crate::engine::TransformEngine;
use crate::error::Result;
use crate::packet::RawPacket;

/// SSRC-keyed context cache: wait-free-ish read-locked lookup on the common
/// path, write-locked derivation the first time a source appears. Deriving
/// under the write lock guarantees a context is fully keyed before any
/// thread can observe it, and that racing inserts converge on one context.
struct ContextMap<C> {
    contexts: RwLock<HashMap<u32, Arc<Mutex<C>>>>,
}

impl<C> ContextMap<C> {
    fn new() -> ContextMap<C> {
        ContextMap {
            contexts: RwLock::new(HashMap::new()),
        }
    }

    fn get_or_derive(
        &self,
        ssrc: u32,
        derive: impl FnOnce() -> Result<C>,
    ) -> Result<Arc<Mutex<C>>> {
        if let Some(context) = self
            .contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&ssrc)
        {
            return Ok(Arc::clone(context));
        }

        let mut contexts = self
            .contexts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(context) = contexts.get(&ssrc) {
            return Ok(Arc::clone(context));
        }
        let context = Arc::new(Mutex::new(derive()?));
        contexts.insert(ssrc, Arc::clone(&context));
        Ok(context)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn locked<C>(context: &Mutex<C>) -> std::sync::MutexGuard<'_, C> {
    context.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Protects and unprotects RTP for any number of sources demuxed from one
/// socket. Packets for different SSRCs proceed in parallel; packets for one
/// SSRC serialise on that context's mutex.
pub struct RtpTransformer {
    forward: Arc<TransformEngine>,
    reverse: Arc<TransformEngine>,
    send: ContextMap<SrtpContext>,
    recv: ContextMap<SrtpContext>,
}

impl RtpTransformer {
    /// Usually both directions share one engine; sessions with split keying
    /// material pass two.
    pub fn with_engines(forward: Arc<TransformEngine>, reverse: Arc<TransformEngine>) -> RtpTransformer {
        RtpTransformer {
            forward,
            reverse,
            send: ContextMap::new(),
            recv: ContextMap::new(),
        }
    }

    pub fn transform(&self, mut packet: RawPacket) -> Result<RawPacket> {
        let ssrc = packet.rtp_ssrc()?;
        let context = self
            .send
            .get_or_derive(ssrc, || self.forward.derive_srtp_context(ssrc))?;
        locked(&context).transform(&mut packet)?;
        Ok(packet)
    }

    /// `Ok(None)` means the packet was rejected and dropped; rejection never
    /// mutates the context's accepted-index state.
    pub fn reverse_transform(&self, mut packet: RawPacket) -> Result<Option<RawPacket>> {
        let ssrc = match packet.rtp_ssrc() {
            Ok(ssrc) => ssrc,
            Err(err) if err.discards_packet() => {
                log::debug!("dropping inbound rtp packet: {err}");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let context = self
            .recv
            .get_or_derive(ssrc, || self.reverse.derive_srtp_context(ssrc))?;
        let result = match locked(&context).reverse_transform(&mut packet) {
            Ok(()) => Ok(Some(packet)),
            Err(err) if err.discards_packet() => {
                log::debug!("dropping inbound rtp packet, ssrc {ssrc:#010x}: {err}");
                Ok(None)
            }
            Err(err) => Err(err),
        };
        result
    }

    #[cfg(test)]
    pub(crate) fn cached_send_contexts(&self) -> usize {
        self.send.len()
    }
}

/// RTCP counterpart of [`RtpTransformer`].
pub struct RtcpTransformer {
    forward: Arc<TransformEngine>,
    reverse: Arc<TransformEngine>,
    send: ContextMap<SrtcpContext>,
    recv: ContextMap<SrtcpContext>,
}

impl RtcpTransformer {
    pub fn with_engines(forward: Arc<TransformEngine>, reverse: Arc<TransformEngine>) -> RtcpTransformer {
        RtcpTransformer {
            forward,
            reverse,
            send: ContextMap::new(),
            recv: ContextMap::new(),
        }
    }

    pub fn transform(&self, mut packet: RawPacket) -> Result<RawPacket> {
        let ssrc = packet.rtcp_ssrc()?;
        let context = self
            .send
            .get_or_derive(ssrc, || self.forward.derive_srtcp_context(ssrc))?;
        locked(&context).transform(&mut packet)?;
        Ok(packet)
    }

    /// `Ok(None)` means the packet was rejected and dropped; rejection never
    /// mutates the context's accepted-index state.
    pub fn reverse_transform(&self, mut packet: RawPacket) -> Result<Option<RawPacket>> {
        let ssrc = match packet.rtcp_ssrc() {
            Ok(ssrc) => ssrc,
            Err(err) if err.discards_packet() => {
                log::debug!("dropping inbound rtcp packet: {err}");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let context = self
            .recv
            .get_or_derive(ssrc, || self.reverse.derive_srtcp_context(ssrc))?;
        let result = match locked(&context).reverse_transform(&mut packet) {
            Ok(()) => Ok(Some(packet)),
            Err(err) if err.discards_packet() => {
                log::debug!("dropping inbound rtcp packet, ssrc {ssrc:#010x}: {err}");
                Ok(None)
            }
            Err(err) => Err(err),
        };
        result
    }
}
