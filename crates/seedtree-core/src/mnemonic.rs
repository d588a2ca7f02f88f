//! Entropy → BIP-39 mnemonic
//!
//! The mnemonic is an intermediate secret: it is written into a
//! [`MnemonicBuffer`] and never handed back to callers of the pipeline.

use bip39::{Language, Mnemonic};

use crate::error::EncodingError;
use crate::memory::SecretBuffer;

/// Byte capacity of the mnemonic buffer. 24 English words need at most 215.
pub const MNEMONIC_CAPACITY: usize = 256;

/// Entropy lengths accepted by BIP-39, in bytes.
pub const ENTROPY_LENGTHS: [usize; 5] = [16, 20, 24, 28, 32];

/// Reject entropy whose length BIP-39 does not define.
pub fn check_entropy_len(len: usize) -> Result<(), EncodingError> {
    if ENTROPY_LENGTHS.contains(&len) {
        Ok(())
    } else {
        Err(EncodingError::InvalidEntropyLength(len))
    }
}

/// Fixed-capacity, locked, self-wiping text buffer for a mnemonic.
#[derive(Default)]
pub struct MnemonicBuffer {
    bytes: SecretBuffer<MNEMONIC_CAPACITY>,
    len: usize,
}

impl MnemonicBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `s`. Fails without writing anything if it would not fit.
    pub fn push_str(&mut self, s: &str) -> Result<(), EncodingError> {
        let end = self
            .len
            .checked_add(s.len())
            .filter(|&end| end <= MNEMONIC_CAPACITY)
            .ok_or(EncodingError::CapacityExceeded {
                capacity: MNEMONIC_CAPACITY,
            })?;
        self.bytes.as_mut()[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        // Only whole `&str`s are ever appended.
        std::str::from_utf8(&self.bytes.as_ref()[..self.len]).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.bytes.wipe();
        self.len = 0;
    }
}

impl std::fmt::Debug for MnemonicBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MnemonicBuffer")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

/// Turns entropy into mnemonic text.
pub trait MnemonicEncoder {
    /// Write the mnemonic for `entropy` into `out`.
    ///
    /// Must reject entropy lengths it cannot encode with
    /// [`EncodingError::InvalidEntropyLength`].
    fn encode(&self, entropy: &[u8], out: &mut MnemonicBuffer) -> Result<(), EncodingError>;
}

/// English BIP-39 word list via the `bip39` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bip39Encoder;

impl MnemonicEncoder for Bip39Encoder {
    fn encode(&self, entropy: &[u8], out: &mut MnemonicBuffer) -> Result<(), EncodingError> {
        check_entropy_len(entropy.len())?;

        // Zeroized on drop (bip39 `zeroize` feature)
        let mnemonic = Mnemonic::from_entropy_in(Language::English, entropy)
            .map_err(|e| EncodingError::Rejected(e.to_string()))?;

        out.clear();
        for (i, word) in mnemonic.words().enumerate() {
            if i > 0 {
                out.push_str(" ")?;
            }
            out.push_str(word)?;
        }
        Ok(())
    }
}
