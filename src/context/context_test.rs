use super::*;
use crate::error::Error;
use crate::packet::RawPacket;
use crate::policy::Policy;

const MASTER_KEY: [u8; 16] = [
    0x0d, 0xcd, 0x21, 0x3e, 0x4c, 0xbc, 0xf2, 0x8f, 0x01, 0x7f, 0x69, 0x94, 0x40, 0x1e, 0x28,
    0x89,
];
const MASTER_SALT: [u8; 14] = [
    0x62, 0x77, 0x60, 0x38, 0xc0, 0x6d, 0xc9, 0x41, 0x9f, 0x6d, 0xd9, 0x43, 0x3e, 0x7c,
];

#[test]
fn test_master_material_lengths_validated() {
    let policy = Policy::aes_cm_128_hmac_sha1_80();

    let result = SrtpContext::new(1, &[], &MASTER_SALT, policy.clone());
    assert_eq!(result.err(), Some(Error::MasterKeyLength(16, 0)));

    let result = SrtpContext::new(1, &MASTER_KEY, &[0; 12], policy.clone());
    assert_eq!(result.err(), Some(Error::MasterSaltLength(14, 12)));

    let result = SrtcpContext::new(1, &MASTER_KEY[..8], &MASTER_SALT, policy.clone());
    assert_eq!(result.err(), Some(Error::MasterKeyLength(16, 8)));

    assert!(SrtpContext::new(1, &MASTER_KEY, &MASTER_SALT, policy.clone()).is_ok());
    assert!(SrtcpContext::new(1, &MASTER_KEY, &MASTER_SALT, policy).is_ok());
}

#[test]
fn test_rtp_and_rtcp_session_keys_differ() -> crate::error::Result<()> {
    let policy = Policy::aes_cm_128_hmac_sha1_80();
    let rtp = SessionKeys::derive(&policy, &MASTER_KEY, &MASTER_SALT, [0x00, 0x01, 0x02])?;
    let rtcp = SessionKeys::derive(&policy, &MASTER_KEY, &MASTER_SALT, [0x03, 0x04, 0x05])?;
    assert_ne!(rtp.enc_key, rtcp.enc_key);
    assert_ne!(rtp.auth_key, rtcp.auth_key);
    assert_ne!(rtp.salt_key, rtcp.salt_key);
    Ok(())
}

#[test]
fn test_session_keys_scrubbed() -> crate::error::Result<()> {
    let policy = Policy::aes_cm_128_hmac_sha1_80();
    let mut keys = SessionKeys::derive(&policy, &MASTER_KEY, &MASTER_SALT, [0x00, 0x01, 0x02])?;
    keys.scrub();
    assert_eq!(keys.enc_key, vec![0; 16]);
    assert_eq!(keys.auth_key, vec![0; 20]);
    assert_eq!(keys.salt_key, vec![0; 14]);
    Ok(())
}

#[test]
fn test_closed_context_refuses_work() -> crate::error::Result<()> {
    let policy = Policy::aes_cm_128_hmac_sha1_80();
    let mut packet = RawPacket::copy_from(&[
        0x80, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0, 1, 0xaa, 0xbb,
    ]);

    let mut context = SrtpContext::new(1, &MASTER_KEY, &MASTER_SALT, policy.clone())?;
    context.close();
    assert_eq!(context.transform(&mut packet), Err(Error::Closed));
    assert_eq!(context.reverse_transform(&mut packet), Err(Error::Closed));

    let mut context = SrtcpContext::new(1, &MASTER_KEY, &MASTER_SALT, policy)?;
    context.close();
    assert_eq!(context.transform(&mut packet), Err(Error::Closed));
    assert_eq!(context.reverse_transform(&mut packet), Err(Error::Closed));
    Ok(())
}
