//! seedtree core
//!
//! Deterministic entropy → key tree derivation.
//!
//! # Pipelines
//!
//! - Standard: entropy → BIP-39 mnemonic → PBKDF2 seed → BIP-32 / SLIP-10
//!   master node on `secp256k1`, `nist256p1` or `ed25519` → child path
//! - Cardano Icarus: entropy → PBKDF2 96-byte extended secret →
//!   BIP32-Ed25519 (V2) master node → child path
//!
//! # Secret memory
//!
//! Mnemonics, seeds and extended secrets live in mlocked buffers that are
//! zeroized on every exit path. Nodes zeroize their private keys on drop.
//!
//! ```
//! use seedtree_core::{entropy_to_node, parse_path};
//!
//! let path = parse_path("m/44'/0'/0'/0/0").unwrap();
//! let node = entropy_to_node(&[0u8; 16], "", "secp256k1", &path).unwrap();
//! assert_eq!(node.depth(), 5);
//! ```

pub mod curve;
pub mod derive;
pub mod error;
pub mod memory;
pub mod mnemonic;
pub mod node;
pub mod path;
pub mod seed;
pub mod stretch;

pub use curve::{is_hardened, CurveKind, HARDENED};
pub use derive::{entropy_to_node, entropy_to_node_cardano, entropy_to_seed, Deriver};
pub use error::{DeriveError, EncodingError, Error, FailureKind, NodeError};
pub use mnemonic::{Bip39Encoder, MnemonicBuffer, MnemonicEncoder};
pub use node::{Node, CARDANO_SECRET_LEN};
pub use path::{format_path, parse_path, PathError};
pub use seed::{generate_entropy, Seed, SEED_LEN};
pub use stretch::{KeyStretcher, Pbkdf2Stretcher};
