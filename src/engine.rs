use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::context::{SrtcpContext, SrtpContext};
use crate::error::{Error, Result};
use crate::policy::{AuthenticationAlgorithm, Policy};
use crate::transformer::{RtcpTransformer, RtpTransformer};

/// Master key and salt handed over by the key exchange. Zeroed on close and
/// again on drop.
pub(crate) struct MasterMaterial {
    key: Vec<u8>,
    salt: Vec<u8>,
}

impl MasterMaterial {
    fn scrub(&mut self) {
        self.key.fill(0);
        self.salt.fill(0);
    }
}

impl Drop for MasterMaterial {
    fn drop(&mut self) {
        self.scrub();
    }
}

/// Per-direction template: a policy plus this template's own copy of the
/// master material. Per-SSRC contexts are derived from it; the template
/// itself never derives session keys or touches a packet.
struct TemplateContext {
    policy: Policy,
    material: MasterMaterial,
}

/// Factory for per-SSRC contexts and for the transformers that cache them.
/// Created once the key exchange has produced master material; closing it
/// scrubs both templates and stops further derivations.
pub struct TransformEngine {
    srtp_template: Mutex<Option<TemplateContext>>,
    srtcp_template: Mutex<Option<TemplateContext>>,
}

impl TransformEngine {
    pub fn new(
        master_key: &[u8],
        master_salt: &[u8],
        srtp_policy: Policy,
        srtcp_policy: Policy,
    ) -> Result<TransformEngine> {
        // Accepting control packets without a tag is excluded outright; the
        // E-flag alone cannot authenticate the explicit index.
        if srtcp_policy.authentication() == AuthenticationAlgorithm::Null {
            return Err(Error::PolicyInvalid(
                "SRTCP requires an authentication transform".to_owned(),
            ));
        }
        for policy in [&srtp_policy, &srtcp_policy] {
            if master_key.len() != policy.enc_key_len() {
                return Err(Error::MasterKeyLength(policy.enc_key_len(), master_key.len()));
            }
            if master_salt.len() != policy.salt_key_len() {
                return Err(Error::MasterSaltLength(
                    policy.salt_key_len(),
                    master_salt.len(),
                ));
            }
        }

        Ok(TransformEngine {
            srtp_template: Mutex::new(Some(TemplateContext {
                policy: srtp_policy,
                material: MasterMaterial {
                    key: master_key.to_vec(),
                    salt: master_salt.to_vec(),
                },
            })),
            srtcp_template: Mutex::new(Some(TemplateContext {
                policy: srtcp_policy,
                material: MasterMaterial {
                    key: master_key.to_vec(),
                    salt: master_salt.to_vec(),
                },
            })),
        })
    }

    /// An RTP transformer using this engine for both directions.
    pub fn rtp_transformer(self: &Arc<Self>) -> RtpTransformer {
        RtpTransformer::with_engines(Arc::clone(self), Arc::clone(self))
    }

    /// An RTCP transformer using this engine for both directions.
    pub fn rtcp_transformer(self: &Arc<Self>) -> RtcpTransformer {
        RtcpTransformer::with_engines(Arc::clone(self), Arc::clone(self))
    }

    pub(crate) fn derive_srtp_context(&self, ssrc: u32) -> Result<SrtpContext> {
        let guard = lock(&self.srtp_template);
        let template = guard.as_ref().ok_or(Error::Closed)?;
        SrtpContext::new(
            ssrc,
            &template.material.key,
            &template.material.salt,
            template.policy.clone(),
        )
    }

    pub(crate) fn derive_srtcp_context(&self, ssrc: u32) -> Result<SrtcpContext> {
        let guard = lock(&self.srtcp_template);
        let template = guard.as_ref().ok_or(Error::Closed)?;
        SrtcpContext::new(
            ssrc,
            &template.material.key,
            &template.material.salt,
            template.policy.clone(),
        )
    }

    /// Scrub both templates. Contexts already derived keep working until
    /// they are closed themselves; new derivations fail with `Closed`.
    pub fn close(&self) {
        for slot in [&self.srtp_template, &self.srtcp_template] {
            if let Some(mut template) = lock(slot).take() {
                template.material.scrub();
            }
        }
        log::debug!("transform engine closed, master material scrubbed");
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
