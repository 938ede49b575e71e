//! This module contains cryptographic utilities.
//!
//! Provides the Ed25519 key pair used by the suite: key generation, signing and verification.
//!
//! [Ed25519]: https://en.wikipedia.org/wiki/EdDSA

pub(crate) mod alg;
mod ed25519;
mod errors;
mod traits;
mod utils;

pub use alg::Algorithm;
pub use ed25519::Ed25519KeyPair;
pub use errors::Error;
pub use traits::{CoreSign, Generate, KeyMaterial, ToMultikey, BYTES_LENGTH_32, SIGNATURE_LENGTH};

/// A wrapper struct for an asymmetric key pair.
/// This struct holds a public key and an optional secret key.
pub struct AsymmetricKey<P, S> {
    pub public_key: P,
    pub secret_key: Option<S>,
}
