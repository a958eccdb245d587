use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("inconsistent crypto policy: {0}")]
    PolicyInvalid(String),
    #[error("master key must be len {0}, got {1}")]
    MasterKeyLength(usize, usize),
    #[error("master salt must be len {0}, got {1}")]
    MasterSaltLength(usize, usize),
    #[error("session key must be len {0}, got {1}")]
    SessionKeyLength(usize, usize),
    #[error("packet too short: {0} bytes, need at least {1}")]
    ShortPacket(usize, usize),
    #[error("packet index below the replay window")]
    ReplayOld,
    #[error("packet index already seen")]
    ReplayDup,
    #[error("failed to verify auth tag")]
    AuthFailed,
    #[error("payload of {0} bytes exceeds keystream capacity")]
    PayloadTooLarge(usize),
    #[error("context used after close")]
    Closed,
    #[error("packet encryption flag contradicts the local policy")]
    EncryptionMismatch,
}

impl Error {
    /// Receive-path outcomes that mean "drop the packet, keep the state".
    /// Everything else is a caller or configuration fault and is surfaced.
    pub(crate) fn discards_packet(&self) -> bool {
        matches!(
            self,
            Error::ShortPacket(..)
                | Error::ReplayOld
                | Error::ReplayDup
                | Error::AuthFailed
                | Error::EncryptionMismatch
        )
    }
}
