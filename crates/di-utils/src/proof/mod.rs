//! The Ed25519Signature2020 proof model and structural inspection of
//! documents secured with it.

pub mod inspect;
pub mod model;

// public re-exports
pub use inspect::{ProofCheck, ProofInspector, ProofRule, ProofViolation};
pub use model::{Proof, ProofError};

/// The proof type defined by the Ed25519Signature2020 cryptosuite.
pub const ED25519_SIGNATURE_2020: &str = "Ed25519Signature2020";

/// The JSON-LD context defining the Ed25519Signature2020 vocabulary.
pub const ED25519_2020_CONTEXT: &str = "https://w3id.org/security/suites/ed25519-2020/v1";

/// The proof purpose expected on proofs securing a credential.
pub const ASSERTION_METHOD: &str = "assertionMethod";
