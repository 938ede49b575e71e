use thiserror::Error;

use crate::crypto::Algorithm;

/// Errors raised while decoding a `did:key` identifier or DID URL.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DidKeyError {
    #[error("not a did:key identifier")]
    NotDidKey,
    #[error("method-specific identifier is not multibase-encoded")]
    InvalidMultibase,
    #[error("method-specific identifier must be base58btc encoded (prefix 'z')")]
    NotBase58Btc,
    #[error("unknown multicodec prefix")]
    UnknownMulticodec,
    #[error("expected an Ed25519 public key, found {0:?}")]
    UnsupportedPublicKeyType(Algorithm),
    #[error("invalid public key length: expected {expected} bytes, found {found}")]
    InvalidPublicKeyLength { expected: usize, found: usize },
    #[error("fragment does not match the method-specific identifier")]
    FragmentMismatch,
    #[error("public key is not a valid Ed25519 point")]
    InvalidPublicKey,
}
