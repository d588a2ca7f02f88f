//! Failure taxonomy of the derivation pipeline.
//!
//! Every pipeline call returns [`Error`], which is always one of three kinds:
//! the entropy could not be encoded or stretched, the seed/secret did not
//! yield a master node, or one step of the index path could not be applied.

use thiserror::Error;

use crate::curve::CurveKind;

/// Entropy or passphrase rejected by the mnemonic or Icarus stretching step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Invalid entropy length: {0} bytes (expected 16, 20, 24, 28 or 32)")]
    InvalidEntropyLength(usize),
    #[error("Mnemonic does not fit in a {capacity}-byte buffer")]
    CapacityExceeded { capacity: usize },
    #[error("Mnemonic encoder rejected entropy: {0}")]
    Rejected(String),
}

/// Seed or secret did not yield a valid master node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    #[error("Unsupported curve: {0}")]
    UnsupportedCurve(String),
    #[error("Curve {0} cannot be built from a seed")]
    SeedNotSupported(CurveKind),
    #[error("Master key is not a valid {0} secret")]
    InvalidMasterKey(CurveKind),
    #[error("Invalid Cardano extended secret: {0}")]
    InvalidCardanoSecret(&'static str),
}

/// A single child-key-derivation step could not be applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeriveError {
    #[error("Hardened index {0:#010x} requires a private key")]
    HardenedFromPublic(u32),
    #[error("Curve {curve} only supports hardened derivation (index {index:#010x})")]
    NonHardenedUnsupported { curve: CurveKind, index: u32 },
    #[error("Child key is undefined for index {0:#010x}")]
    InvalidChildKey(u32),
    #[error("Parent public key is not a valid curve point")]
    InvalidPublicKey,
    #[error("Node has no private key")]
    MissingPrivateKey,
    #[error("Maximum derivation depth reached")]
    DepthOverflow,
}

/// Which of the three failure kinds occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Encoding,
    NodeConstruction,
    Derivation,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Encoding failed: {0}")]
    Encoding(#[from] EncodingError),
    #[error("Node construction failed: {0}")]
    NodeConstruction(#[from] NodeError),
    /// `position` is the offset of the rejected index within the path.
    /// Steps before it were applied; the node must be discarded.
    #[error("Derivation failed at path position {position}: {source}")]
    Derivation {
        position: usize,
        #[source]
        source: DeriveError,
    },
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Encoding(_) => FailureKind::Encoding,
            Error::NodeConstruction(_) => FailureKind::NodeConstruction,
            Error::Derivation { .. } => FailureKind::Derivation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let e: Error = EncodingError::InvalidEntropyLength(15).into();
        assert_eq!(e.kind(), FailureKind::Encoding);

        let e: Error = NodeError::UnsupportedCurve("curve448".into()).into();
        assert_eq!(e.kind(), FailureKind::NodeConstruction);

        let e = Error::Derivation {
            position: 2,
            source: DeriveError::InvalidChildKey(7),
        };
        assert_eq!(e.kind(), FailureKind::Derivation);
    }

    #[test]
    fn test_messages_name_the_cause() {
        let e: Error = EncodingError::InvalidEntropyLength(17).into();
        assert_eq!(
            e.to_string(),
            "Encoding failed: Invalid entropy length: 17 bytes (expected 16, 20, 24, 28 or 32)"
        );

        let e = Error::Derivation {
            position: 1,
            source: DeriveError::HardenedFromPublic(0x8000_0000),
        };
        assert_eq!(
            e.to_string(),
            "Derivation failed at path position 1: Hardened index 0x80000000 requires a private key"
        );
    }
}
