//! HD nodes: key pair, chain code and position in the tree
//!
//! A [`Node`] is built once from a seed or a Cardano extended secret and then
//! mutated in place by each derivation step. A single step is atomic: the
//! child is computed in full before the node is overwritten. A *path* is
//! not: when step `k` fails, steps `0..k` stay applied and the caller must
//! discard the node.

use std::fmt;

use zeroize::Zeroize;

use crate::curve::{cardano, is_hardened, CurveKind, KeyMaterial};
use crate::error::{DeriveError, Error, NodeError};

pub use crate::curve::cardano::CARDANO_SECRET_LEN;

/// HD node. Secret fields are zeroized on drop.
#[derive(Clone)]
pub struct Node {
    curve: CurveKind,
    depth: u32,
    child_number: u32,
    parent_fingerprint: u32,
    keys: KeyMaterial,
}

impl Node {
    /// Master node for `curve_name` from a seed.
    pub fn from_seed(seed: &[u8], curve_name: &str) -> Result<Self, NodeError> {
        Self::from_seed_with(seed, curve_name.parse()?)
    }

    /// Master node for an already resolved curve from a seed.
    pub fn from_seed_with(seed: &[u8], curve: CurveKind) -> Result<Self, NodeError> {
        let keys = curve.ops().master_from_seed(seed)?;
        log::trace!("master node ready on {}", curve);
        Ok(Self::root(curve, keys))
    }

    /// Cardano master node from a 96-byte Icarus extended secret.
    pub fn from_cardano_secret(secret: &[u8; CARDANO_SECRET_LEN]) -> Result<Self, NodeError> {
        let keys = cardano::from_secret(secret)?;
        log::trace!("master node ready on {}", CurveKind::Ed25519Cardano);
        Ok(Self::root(CurveKind::Ed25519Cardano, keys))
    }

    fn root(curve: CurveKind, keys: KeyMaterial) -> Self {
        Self {
            curve,
            depth: 0,
            child_number: 0,
            parent_fingerprint: 0,
            keys,
        }
    }

    /// Replace this node with its child at `index`.
    ///
    /// On error the node is unchanged.
    pub fn derive_child(&mut self, index: u32) -> Result<(), DeriveError> {
        let depth = self.depth.checked_add(1).ok_or(DeriveError::DepthOverflow)?;

        let ops = self.curve.ops();
        let child = if self.keys.private_key.is_some() {
            ops.derive_private(&self.keys, index)?
        } else if is_hardened(index) {
            return Err(DeriveError::HardenedFromPublic(index));
        } else {
            ops.derive_public(&self.keys, index)?
        };

        self.parent_fingerprint = self.keys.fingerprint();
        self.child_number = index;
        self.depth = depth;
        self.keys = child;
        Ok(())
    }

    /// Apply `indices` in order, root to leaf.
    ///
    /// Stops at the first rejected index and reports its position. Indices
    /// before it remain applied; the node must not be used after an error.
    pub fn derive_path(&mut self, indices: &[u32]) -> Result<(), Error> {
        for (position, &index) in indices.iter().enumerate() {
            self.derive_child(index)
                .map_err(|source| Error::Derivation { position, source })?;
        }
        Ok(())
    }

    /// Public-only copy of this node.
    pub fn to_public(&self) -> Node {
        Node {
            curve: self.curve,
            depth: self.depth,
            child_number: self.child_number,
            parent_fingerprint: self.parent_fingerprint,
            keys: self.keys.neutered(),
        }
    }

    pub fn curve(&self) -> CurveKind {
        self.curve
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Index this node was derived with, `0` for a master node.
    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    pub fn parent_fingerprint(&self) -> u32 {
        self.parent_fingerprint
    }

    /// Fingerprint of this node (HASH160 of the public key, first 4 bytes).
    pub fn fingerprint(&self) -> u32 {
        self.keys.fingerprint()
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.keys.chain_code
    }

    /// 33 bytes: SEC1 compressed for ECDSA curves, `0x00 || A` for Ed25519.
    pub fn public_key(&self) -> &[u8; 33] {
        &self.keys.public_key
    }

    /// `None` for public-only nodes.
    pub fn private_key(&self) -> Option<&[u8; 32]> {
        self.keys.private_key.as_ref()
    }

    /// Cardano `kR`; `None` on every other curve.
    pub fn private_key_extension(&self) -> Option<&[u8; 32]> {
        self.keys.private_key_extension.as_ref()
    }

    pub fn is_private(&self) -> bool {
        self.keys.private_key.is_some()
    }

    /// Drop the secret halves in place.
    pub fn neuter(&mut self) {
        self.keys.private_key.zeroize();
        self.keys.private_key_extension.zeroize();
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("curve", &self.curve)
            .field("depth", &self.depth)
            .field("child_number", &self.child_number)
            .field("parent_fingerprint", &format_args!("{:08x}", self.parent_fingerprint))
            .field("public_key", &format_args!("{}", hex::encode(self.keys.public_key)))
            .field("private", &self.is_private())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::HARDENED;

    const SEED: [u8; 16] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];

    #[test]
    fn test_unsupported_curve_name() {
        assert_eq!(
            Node::from_seed(&SEED, "secp256k2").unwrap_err(),
            NodeError::UnsupportedCurve("secp256k2".into())
        );
        assert_eq!(
            Node::from_seed(&SEED, "ed25519 cardano seed").unwrap_err(),
            NodeError::SeedNotSupported(CurveKind::Ed25519Cardano)
        );
    }

    #[test]
    fn test_child_metadata() {
        let mut node = Node::from_seed(&SEED, "secp256k1").unwrap();
        assert_eq!(node.depth(), 0);
        assert_eq!(node.parent_fingerprint(), 0);

        let master_fingerprint = node.fingerprint();
        // BIP-32 test vector 1 master fingerprint
        assert_eq!(master_fingerprint, 0x3442193e);

        node.derive_child(HARDENED).unwrap();
        assert_eq!(node.depth(), 1);
        assert_eq!(node.child_number(), HARDENED);
        assert_eq!(node.parent_fingerprint(), master_fingerprint);
    }

    #[test]
    fn test_failed_step_leaves_node_unchanged() {
        let mut node = Node::from_seed(&SEED, "ed25519").unwrap();
        node.derive_child(HARDENED).unwrap();
        let before = node.clone();

        assert!(node.derive_child(7).is_err());
        assert_eq!(node.depth(), before.depth());
        assert_eq!(node.private_key(), before.private_key());
        assert_eq!(node.chain_code(), before.chain_code());
        assert_eq!(node.public_key(), before.public_key());
    }

    #[test]
    fn test_path_failure_keeps_applied_steps() {
        let mut failed = Node::from_seed(&SEED, "ed25519").unwrap();
        let err = failed
            .derive_path(&[HARDENED, HARDENED | 1, 2])
            .unwrap_err();
        assert_eq!(
            err,
            Error::Derivation {
                position: 2,
                source: DeriveError::NonHardenedUnsupported {
                    curve: CurveKind::Ed25519,
                    index: 2
                },
            }
        );

        let mut two_steps = Node::from_seed(&SEED, "ed25519").unwrap();
        two_steps.derive_path(&[HARDENED, HARDENED | 1]).unwrap();

        assert_eq!(failed.depth(), 2);
        assert_eq!(failed.private_key(), two_steps.private_key());
        assert_eq!(failed.chain_code(), two_steps.chain_code());
    }

    #[test]
    fn test_public_node_rejects_hardened() {
        let node = Node::from_seed(&SEED, "nist256p1").unwrap();
        let mut public = node.to_public();
        assert!(!public.is_private());
        assert_eq!(
            public.derive_child(HARDENED | 5).unwrap_err(),
            DeriveError::HardenedFromPublic(HARDENED | 5)
        );
        public.derive_child(5).unwrap();

        let mut private = node.clone();
        private.derive_child(5).unwrap();
        assert_eq!(public.public_key(), private.public_key());
        assert_eq!(public.parent_fingerprint(), private.parent_fingerprint());
    }

    #[test]
    fn test_neuter_clears_secrets() {
        let mut node = Node::from_seed(&SEED, "secp256k1").unwrap();
        let public_key = *node.public_key();
        node.neuter();
        assert!(node.private_key().is_none());
        assert!(node.private_key_extension().is_none());
        assert_eq!(node.public_key(), &public_key);
    }

    #[test]
    fn test_debug_omits_private_key() {
        let node = Node::from_seed(&SEED, "secp256k1").unwrap();
        let printed = format!("{:?}", node);
        let secret = hex::encode(node.private_key().unwrap());
        assert!(!printed.contains(&secret));
        assert!(printed.contains(
            "public_key: 0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2,"
        ));
    }
}
