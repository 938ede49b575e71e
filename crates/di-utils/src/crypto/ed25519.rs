use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use multibase::Base::Base58Btc;

use super::{
    alg::Algorithm,
    errors::Error,
    traits::{CoreSign, Generate, KeyMaterial, ToMultikey, BYTES_LENGTH_32},
    utils::generate_seed,
    AsymmetricKey,
};

/// A wrapper struct for an Ed25519 asymmetric key pair.
pub type Ed25519KeyPair = AsymmetricKey<VerifyingKey, SigningKey>;

impl std::fmt::Debug for Ed25519KeyPair {
    /// Returns a string representation of the public key.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:?}", self.public_key))
    }
}

impl KeyMaterial for Ed25519KeyPair {
    fn public_key_bytes(&self) -> Result<[u8; BYTES_LENGTH_32], Error> {
        Ok(self.public_key.to_bytes())
    }

    fn private_key_bytes(&self) -> Result<[u8; BYTES_LENGTH_32], Error> {
        match &self.secret_key {
            Some(sk) => Ok(sk.to_bytes()),
            None => Err(Error::InvalidSecretKey),
        }
    }
}

impl Generate for Ed25519KeyPair {
    fn new() -> Result<Ed25519KeyPair, Error> {
        Self::new_with_seed(&[])
    }

    fn new_with_seed(seed: &[u8]) -> Result<Ed25519KeyPair, Error> {
        let secret_seed = generate_seed(seed)?;
        Ok(Self::from_signing_key(SigningKey::from_bytes(&secret_seed)))
    }

    fn from_public_key(public_key: &[u8; BYTES_LENGTH_32]) -> Result<Ed25519KeyPair, Error> {
        let public_key = VerifyingKey::from_bytes(public_key).map_err(|_| Error::InvalidPublicKey)?;
        Ok(Ed25519KeyPair {
            public_key,
            secret_key: None,
        })
    }

    fn from_secret_key(secret_key: &[u8; BYTES_LENGTH_32]) -> Result<Ed25519KeyPair, Error> {
        Ok(Self::from_signing_key(SigningKey::from_bytes(secret_key)))
    }
}

impl CoreSign for Ed25519KeyPair {
    /// Signs the given payload and returns the 64-byte signature.
    ///
    /// # Example
    ///
    /// ```
    /// use di_utils::crypto::{CoreSign, Ed25519KeyPair, Generate};
    ///
    /// let kp = Ed25519KeyPair::new().unwrap();
    /// let signature = kp.sign(b"Hello, World!").unwrap();
    /// assert_eq!(signature.len(), 64);
    /// ```
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, Error> {
        match &self.secret_key {
            Some(sk) => sk
                .try_sign(payload)
                .map(|signature| signature.to_bytes().to_vec())
                .map_err(|_| Error::SignatureError),
            None => Err(Error::InvalidSecretKey),
        }
    }

    /// Verifies the signature of the given payload.
    fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<(), Error> {
        let sig = Signature::from_slice(signature).map_err(|_| Error::CanNotRetrieveSignature)?;
        self.public_key
            .verify(payload, &sig)
            .map_err(|_| Error::VerificationError)
    }
}

impl ToMultikey for Ed25519KeyPair {
    fn to_multikey(&self) -> String {
        let prefix = &Algorithm::Ed25519.muticodec_prefix();
        let bytes = &self.public_key.as_bytes()[..];
        multibase::encode(Base58Btc, [prefix, bytes].concat())
    }
}

impl Ed25519KeyPair {
    fn from_signing_key(sk: SigningKey) -> Self {
        Ed25519KeyPair {
            public_key: sk.verifying_key(),
            secret_key: Some(sk),
        }
    }
}
