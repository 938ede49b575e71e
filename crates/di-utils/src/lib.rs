/*! # di-utils

Building blocks for exercising Ed25519Signature2020 implementations.

## Features

- **Cryptographic Operations**: Ed25519 key pairs used to forge well-formed but foreign signatures.
- **did:key**: Decoding of `did:key` verification methods into Ed25519 public keys.
- **Proofs**: The Ed25519Signature2020 proof model and a structural inspector reporting rule violations.
- **Verifiable Credentials**: Unsigned credential templates submitted to issuers.

*/
pub mod crypto;
pub mod methods;
pub mod proof;
pub mod vc;
