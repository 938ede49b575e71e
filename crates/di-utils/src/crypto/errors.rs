use thiserror::Error;

/// The set of errors that can occur during key operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Can not retrieve signature
    #[error("can not retrieve signature from bytes")]
    CanNotRetrieveSignature,
    /// Invalid secret key
    #[error("missing or invalid secret key")]
    InvalidSecretKey,
    /// Invalid seed
    #[error("invalid seed")]
    InvalidSeed,
    /// Invalid public key
    #[error("invalid public key")]
    InvalidPublicKey,
    /// Error while signing
    #[error("signing failed")]
    SignatureError,
    /// Error while verifying
    #[error("signature verification failed")]
    VerificationError,
}
