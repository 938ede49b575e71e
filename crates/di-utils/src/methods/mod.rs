//! DID methods needed to resolve Ed25519Signature2020 verification methods.
//!
//! Only `did:key` is decoded locally. Other methods are accepted as opaque
//! URLs and resolution is left to the implementations under test.

mod did_key;
mod errors;

pub use did_key::DIDKeyMethod;
pub use errors::DidKeyError;
