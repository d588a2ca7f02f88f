//! Curve capabilities: master-key generation and child-key derivation
//!
//! Each supported curve is a unit type implementing [`CurveOps`]. A curve is
//! selected at runtime by name through [`CurveKind::from_str`]; unknown names
//! are an error, never a fallback.
//!
//! | name                   | master key           | CKD                      |
//! |------------------------|----------------------|--------------------------|
//! | `secp256k1`            | BIP-32 `Bitcoin seed`| BIP-32                   |
//! | `nist256p1`            | SLIP-10              | SLIP-10                  |
//! | `ed25519`              | SLIP-10              | SLIP-10 (hardened only)  |
//! | `ed25519 cardano seed` | Icarus secret only   | BIP32-Ed25519 V2         |

use std::fmt;
use std::str::FromStr;

use bitcoin::hashes::{hash160, sha512, Hash, HashEngine, Hmac, HmacEngine};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{DeriveError, NodeError};

pub(crate) mod cardano;
mod ed25519;
mod nist;
mod secp;

/// Beginning of hardened child indexes (2^31).
pub const HARDENED: u32 = 0x8000_0000;

/// Whether `index` selects hardened derivation.
pub fn is_hardened(index: u32) -> bool {
    index & HARDENED != 0
}

/// Curves a node can be built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveKind {
    Secp256k1,
    Nist256p1,
    Ed25519,
    /// Ed25519 with Icarus master secrets and BIP32-Ed25519 child derivation
    Ed25519Cardano,
}

impl CurveKind {
    pub const ALL: [CurveKind; 4] = [
        CurveKind::Secp256k1,
        CurveKind::Nist256p1,
        CurveKind::Ed25519,
        CurveKind::Ed25519Cardano,
    ];

    /// Canonical curve name
    pub fn name(self) -> &'static str {
        match self {
            CurveKind::Secp256k1 => "secp256k1",
            CurveKind::Nist256p1 => "nist256p1",
            CurveKind::Ed25519 => "ed25519",
            CurveKind::Ed25519Cardano => "ed25519 cardano seed",
        }
    }

    pub(crate) fn ops(self) -> &'static dyn CurveOps {
        match self {
            CurveKind::Secp256k1 => &secp::Secp256k1Curve,
            CurveKind::Nist256p1 => &nist::Nist256p1Curve,
            CurveKind::Ed25519 => &ed25519::Ed25519Curve,
            CurveKind::Ed25519Cardano => &cardano::CardanoCurve,
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CurveKind {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secp256k1" => Ok(CurveKind::Secp256k1),
            "nist256p1" | "secp256r1" => Ok(CurveKind::Nist256p1),
            "ed25519" => Ok(CurveKind::Ed25519),
            "ed25519 cardano seed" => Ok(CurveKind::Ed25519Cardano),
            other => Err(NodeError::UnsupportedCurve(other.to_string())),
        }
    }
}

/// Key material of one node. Zeroized on drop.
///
/// `public_key` is always 33 bytes: SEC1-compressed for the ECDSA curves,
/// `0x00 || A` for the Ed25519 curves.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) struct KeyMaterial {
    pub private_key: Option<[u8; 32]>,
    /// Cardano `kR`, the right half of the extended secret
    pub private_key_extension: Option<[u8; 32]>,
    pub public_key: [u8; 33],
    pub chain_code: [u8; 32],
}

impl KeyMaterial {
    pub fn private(
        private_key: [u8; 32],
        private_key_extension: Option<[u8; 32]>,
        public_key: [u8; 33],
        chain_code: [u8; 32],
    ) -> Self {
        Self {
            private_key: Some(private_key),
            private_key_extension,
            public_key,
            chain_code,
        }
    }

    pub fn public(public_key: [u8; 33], chain_code: [u8; 32]) -> Self {
        Self {
            private_key: None,
            private_key_extension: None,
            public_key,
            chain_code,
        }
    }

    pub fn secret(&self) -> Result<&[u8; 32], DeriveError> {
        self.private_key.as_ref().ok_or(DeriveError::MissingPrivateKey)
    }

    /// Copy without any private fields.
    pub fn neutered(&self) -> Self {
        Self::public(self.public_key, self.chain_code)
    }

    /// First 4 bytes of HASH160(public key), big-endian.
    pub fn fingerprint(&self) -> u32 {
        let hash = hash160::Hash::hash(&self.public_key).to_byte_array();
        u32::from_be_bytes([hash[0], hash[1], hash[2], hash[3]])
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("has_private_key", &self.private_key.is_some())
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// What a curve must provide to build and extend a key tree.
pub(crate) trait CurveOps: Sync {
    fn master_from_seed(&self, seed: &[u8]) -> Result<KeyMaterial, NodeError>;

    /// Private parent → private child. `parent` must carry a private key.
    fn derive_private(&self, parent: &KeyMaterial, index: u32)
        -> Result<KeyMaterial, DeriveError>;

    /// Public parent → public child, non-hardened indices only.
    fn derive_public(&self, parent: &KeyMaterial, index: u32) -> Result<KeyMaterial, DeriveError>;
}

/// HMAC-SHA512 over the concatenation of `parts`.
pub(crate) fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Zeroizing<[u8; 64]> {
    let mut engine = HmacEngine::<sha512::Hash>::new(key);
    for part in parts {
        engine.input(part);
    }
    Zeroizing::new(Hmac::<sha512::Hash>::from_engine(engine).to_byte_array())
}

/// Split an HMAC output into `(I_L, I_R)`.
pub(crate) fn split(i: &[u8; 64]) -> (Zeroizing<[u8; 32]>, [u8; 32]) {
    let mut left = Zeroizing::new([0u8; 32]);
    let mut right = [0u8; 32];
    left.copy_from_slice(&i[..32]);
    right.copy_from_slice(&i[32..]);
    (left, right)
}

/// `0x00 || key`: Ed25519 public keys padded to the 33-byte node layout
pub(crate) fn ed25519_public(key: [u8; 32]) -> [u8; 33] {
    let mut out = [0u8; 33];
    out[1..].copy_from_slice(&key);
    out
}
