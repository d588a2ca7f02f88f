//! The entropy → seed → node → child pipeline
//!
//! ```text
//! Start ─► SeedOrSecretReady ─► MasterNodeReady ─► Derived[0..k] ─► Done
//!   └──────────────┴────────────────────┴──────────────┴──► Failed(kind)
//! ```
//!
//! Every secret intermediate (mnemonic text, seed, Icarus extended secret)
//! sits in a [`SecretBuffer`] owned by the running call, so it is wiped
//! whether the call returns a node or an error.

use crate::error::Error;
use crate::memory::SecretBuffer;
use crate::mnemonic::{Bip39Encoder, MnemonicBuffer, MnemonicEncoder};
use crate::node::{Node, CARDANO_SECRET_LEN};
use crate::seed::Seed;
use crate::stretch::{KeyStretcher, Pbkdf2Stretcher};

/// Runs the pipeline with a given mnemonic encoder and key stretcher.
///
/// [`Deriver::default`] uses BIP-39 English and PBKDF2-HMAC-SHA512, which is
/// what the free functions [`entropy_to_seed`], [`entropy_to_node`] and
/// [`entropy_to_node_cardano`] call.
#[derive(Debug, Default, Clone)]
pub struct Deriver<E = Bip39Encoder, S = Pbkdf2Stretcher> {
    encoder: E,
    stretcher: S,
}

impl<E: MnemonicEncoder, S: KeyStretcher> Deriver<E, S> {
    pub fn new(encoder: E, stretcher: S) -> Self {
        Self { encoder, stretcher }
    }

    /// Entropy + passphrase → 64-byte seed.
    ///
    /// The entropy length is checked by the encoder before anything is
    /// stretched.
    pub fn entropy_to_seed(&self, entropy: &[u8], passphrase: &str) -> Result<Seed, Error> {
        let mut mnemonic = MnemonicBuffer::new();
        self.encoder.encode(entropy, &mut mnemonic)?;
        log::trace!("mnemonic encoded from {} bytes of entropy", entropy.len());

        let mut seed = Seed::new();
        self.stretcher
            .stretch_mnemonic(mnemonic.as_str(), passphrase, seed.as_mut_bytes());
        log::debug!("seed ready");
        Ok(seed)
    }

    /// Entropy + passphrase → master node on `curve_name` → child at `indices`.
    pub fn entropy_to_node(
        &self,
        entropy: &[u8],
        passphrase: &str,
        curve_name: &str,
        indices: &[u32],
    ) -> Result<Node, Error> {
        let seed = self.entropy_to_seed(entropy, passphrase)?;
        let node = Node::from_seed(seed.as_bytes(), curve_name)?;
        drop(seed);
        log::debug!("master node ready on {}", node.curve());

        finish(node, indices)
    }

    /// Cardano Icarus: entropy + passphrase → 96-byte extended secret →
    /// master node → child at `indices`.
    pub fn entropy_to_node_cardano(
        &self,
        entropy: &[u8],
        passphrase: &str,
        indices: &[u32],
    ) -> Result<Node, Error> {
        let mut secret = SecretBuffer::<CARDANO_SECRET_LEN>::new();
        self.stretcher
            .stretch_icarus(passphrase, entropy, secret.as_mut())?;
        log::debug!("icarus secret ready");

        let node = Node::from_cardano_secret(secret.as_ref())?;
        drop(secret);
        log::debug!("master node ready on {}", node.curve());

        finish(node, indices)
    }
}

fn finish(mut node: Node, indices: &[u32]) -> Result<Node, Error> {
    if let Err(e) = node.derive_path(indices) {
        log::debug!("derivation failed: {}", e);
        return Err(e);
    }
    log::debug!("derived {} levels, depth {}", indices.len(), node.depth());
    Ok(node)
}

/// [`Deriver::entropy_to_seed`] with BIP-39 English and PBKDF2.
pub fn entropy_to_seed(entropy: &[u8], passphrase: &str) -> Result<Seed, Error> {
    <Deriver>::default().entropy_to_seed(entropy, passphrase)
}

/// [`Deriver::entropy_to_node`] with BIP-39 English and PBKDF2.
pub fn entropy_to_node(
    entropy: &[u8],
    passphrase: &str,
    curve_name: &str,
    indices: &[u32],
) -> Result<Node, Error> {
    <Deriver>::default().entropy_to_node(entropy, passphrase, curve_name, indices)
}

/// [`Deriver::entropy_to_node_cardano`] with PBKDF2.
pub fn entropy_to_node_cardano(
    entropy: &[u8],
    passphrase: &str,
    indices: &[u32],
) -> Result<Node, Error> {
    <Deriver>::default().entropy_to_node_cardano(entropy, passphrase, indices)
}
