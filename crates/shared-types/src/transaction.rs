//! # Transactions
//!
//! A transaction wraps exactly one type-tagged message, a nonce and the
//! signer's Ed25519 signature over the transaction with its signature
//! field cleared.

use serde::{Deserialize, Serialize};
use shared_crypto::{sha3_256, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

use crate::codec::{marshal, unmarshal, Any};
use crate::entities::{Address, Hash};
use crate::errors::{CodecError, ValidationError};

/// Public key and signature bytes as they appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
}

/// A signed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub msg: Any,
    pub signature: Option<Signature>,
    pub nonce: String,
}

/// Content hash of raw transaction bytes.
pub fn transaction_hash(bytes: &[u8]) -> Hash {
    sha3_256(bytes)
}

impl Transaction {
    /// Unsigned transaction around a message.
    pub fn new(msg: Any, nonce: impl Into<String>) -> Self {
        Self {
            msg,
            signature: None,
            nonce: nonce.into(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        unmarshal(bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        marshal(self)
    }

    pub fn hash(&self) -> Result<Hash, CodecError> {
        Ok(transaction_hash(&self.to_bytes()?))
    }

    /// Bytes covered by the signature.
    pub fn signable_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let unsigned = Transaction {
            msg: self.msg.clone(),
            signature: None,
            nonce: self.nonce.clone(),
        };
        marshal(&unsigned)
    }

    /// Sign in place, replacing any previous signature.
    pub fn sign(&mut self, keypair: &Ed25519KeyPair) -> Result<(), CodecError> {
        let bytes = self.signable_bytes()?;
        self.signature = Some(Signature {
            public_key: keypair.public_key().as_bytes().to_vec(),
            signature: keypair.sign(&bytes).as_bytes().to_vec(),
        });
        Ok(())
    }

    /// Address derived from the signing public key.
    pub fn signer_address(&self) -> Result<Address, ValidationError> {
        let signature = self
            .signature
            .as_ref()
            .ok_or(ValidationError::MissingSignature)?;
        let public_key = Ed25519PublicKey::from_slice(&signature.public_key)
            .map_err(ValidationError::InvalidPublicKey)?;
        Ok(public_key.address())
    }

    /// Stateless checks: nonce present, signature well-formed and valid.
    ///
    /// Message-level checks belong to whoever decodes `msg`.
    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.nonce.is_empty() {
            return Err(ValidationError::EmptyNonce);
        }
        let signature = self
            .signature
            .as_ref()
            .ok_or(ValidationError::MissingSignature)?;
        let public_key = Ed25519PublicKey::from_slice(&signature.public_key)
            .map_err(ValidationError::InvalidPublicKey)?;
        let sig = Ed25519Signature::from_slice(&signature.signature)
            .map_err(ValidationError::InvalidSignature)?;
        public_key
            .verify(&self.signable_bytes()?, &sig)
            .map_err(ValidationError::InvalidSignature)
    }
}
