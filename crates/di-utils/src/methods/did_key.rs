use crate::crypto::{Algorithm, Ed25519KeyPair, Generate, ToMultikey};

use super::errors::DidKeyError;

const DID_KEY_PREFIX: &str = "did:key:";

/// The `did:key` method, restricted to what the suite needs: deriving an
/// identifier from an Ed25519 key pair and decoding a verification method
/// back into its public key.
#[derive(Default)]
pub struct DIDKeyMethod;

impl DIDKeyMethod {
    /// Returns the method's registered name.
    pub fn name() -> &'static str {
        "did:key"
    }

    /// Computes the did:key address corresponding to an Ed25519 key pair.
    pub fn from_ed25519_keypair(keypair: &Ed25519KeyPair) -> String {
        format!("{DID_KEY_PREFIX}{}", keypair.to_multikey())
    }

    /// Computes the verification method id `did:key:<mb>#<mb>` of an Ed25519 key pair.
    pub fn verification_method_id(keypair: &Ed25519KeyPair) -> String {
        let multikey = keypair.to_multikey();
        format!("{DID_KEY_PREFIX}{multikey}#{multikey}")
    }

    /// Decodes a `did:key` identifier or verification method URL into the
    /// algorithm and raw public key bytes it encodes.
    ///
    /// A fragment, when present, must repeat the method-specific identifier.
    pub fn decode_public_key(did_url: &str) -> Result<(Algorithm, Vec<u8>), DidKeyError> {
        let method_specific = did_url.strip_prefix(DID_KEY_PREFIX).ok_or(DidKeyError::NotDidKey)?;

        let (msid, fragment) = match method_specific.split_once('#') {
            Some((msid, fragment)) => (msid, Some(fragment)),
            None => (method_specific, None),
        };

        if let Some(fragment) = fragment {
            if fragment != msid {
                return Err(DidKeyError::FragmentMismatch);
            }
        }

        if !msid.starts_with('z') {
            return Err(DidKeyError::NotBase58Btc);
        }

        let (_, bytes) = multibase::decode(msid).map_err(|_| DidKeyError::InvalidMultibase)?;
        if bytes.len() < 2 {
            return Err(DidKeyError::UnknownMulticodec);
        }

        let prefix = [bytes[0], bytes[1]];
        let alg = Algorithm::from_muticodec_prefix(&prefix).ok_or(DidKeyError::UnknownMulticodec)?;
        let key = bytes[2..].to_vec();

        if let Some(expected) = alg.public_key_length() {
            if expected != key.len() {
                return Err(DidKeyError::InvalidPublicKeyLength {
                    expected,
                    found: key.len(),
                });
            }
        }

        Ok((alg, key))
    }

    /// Decodes a `did:key` verification method into an Ed25519 public key.
    pub fn ed25519_verification_key(did_url: &str) -> Result<Ed25519KeyPair, DidKeyError> {
        match Self::decode_public_key(did_url)? {
            (Algorithm::Ed25519, key) => {
                let bytes: [u8; 32] = key.try_into().map_err(|key: Vec<u8>| {
                    DidKeyError::InvalidPublicKeyLength {
                        expected: 32,
                        found: key.len(),
                    }
                })?;
                Ed25519KeyPair::from_public_key(&bytes).map_err(|_| DidKeyError::InvalidPublicKey)
            }
            (alg, _) => Err(DidKeyError::UnsupportedPublicKeyType(alg)),
        }
    }
}

#[cfg(test)]
mod tests {
    use multibase::Base::Base58Btc;

    use super::*;
    use crate::crypto::KeyMaterial;

    const DID: &str = "did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp";
    const PUBLIC_KEY_HEX: &str = "3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29";

    #[test]
    fn test_did_key_generation() {
        let keypair = Ed25519KeyPair::new().unwrap();
        let did = DIDKeyMethod::from_ed25519_keypair(&keypair);
        assert!(did.starts_with("did:key:z6Mk"));
    }

    #[test]
    fn test_verification_method_id_repeats_identifier() {
        let bytes = hex::decode(PUBLIC_KEY_HEX).unwrap();
        let keypair = Ed25519KeyPair::from_public_key(&bytes.try_into().unwrap()).unwrap();
        let vm = DIDKeyMethod::verification_method_id(&keypair);
        assert_eq!(vm, format!("{DID}#z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp"));
    }

    #[test]
    fn test_decode_did_and_verification_method() {
        let expected = hex::decode(PUBLIC_KEY_HEX).unwrap();

        let (alg, key) = DIDKeyMethod::decode_public_key(DID).unwrap();
        assert_eq!(alg, Algorithm::Ed25519);
        assert_eq!(key, expected);

        let vm = format!("{DID}#z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp");
        let keypair = DIDKeyMethod::ed25519_verification_key(&vm).unwrap();
        assert_eq!(keypair.public_key_bytes().unwrap().to_vec(), expected);
    }

    #[test]
    fn test_decode_rejects_malformed_identifiers() {
        let entries = [
            ("did:web:example.com", DidKeyError::NotDidKey),
            ("did:key:6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp", DidKeyError::NotBase58Btc),
            ("did:key:z0OIl", DidKeyError::InvalidMultibase),
            (
                "did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp#key-1",
                DidKeyError::FragmentMismatch,
            ),
        ];

        for (input, expected) in entries {
            assert_eq!(DIDKeyMethod::decode_public_key(input), Err(expected), "{input}");
        }
    }

    #[test]
    fn test_non_ed25519_key_is_rejected() {
        // X25519 key from the did:key test vectors
        let did = "did:key:z6LSeu9HkTHSfLLeUs2nnzUSNedgDUevfNQgQjQC23ZCit6F";
        assert_eq!(
            DIDKeyMethod::ed25519_verification_key(did).unwrap_err(),
            DidKeyError::UnsupportedPublicKeyType(Algorithm::X25519)
        );
    }

    #[test]
    fn test_truncated_key_is_rejected() {
        let mut bytes = Algorithm::Ed25519.muticodec_prefix().to_vec();
        bytes.extend_from_slice(&[1u8; 16]);
        let did = format!("did:key:{}", multibase::encode(Base58Btc, bytes));
        assert_eq!(
            DIDKeyMethod::decode_public_key(&did),
            Err(DidKeyError::InvalidPublicKeyLength {
                expected: 32,
                found: 16
            })
        );
    }
}
