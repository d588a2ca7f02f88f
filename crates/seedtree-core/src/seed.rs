//! Seed buffers and fresh entropy

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::EncodingError;
use crate::memory::SecretBuffer;
use crate::mnemonic::check_entropy_len;

/// Length of a BIP-39 seed in bytes.
pub const SEED_LEN: usize = 64;

/// A 64-byte BIP-39 seed. Locked in memory and wiped on drop.
#[derive(Debug, Default)]
pub struct Seed(SecretBuffer<SEED_LEN>);

impl Seed {
    pub(crate) fn new() -> Self {
        Self(SecretBuffer::new())
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        self.0.as_ref()
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8; SEED_LEN] {
        self.0.as_mut()
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Fresh entropy from the OS RNG.
///
/// `len` must be one of the BIP-39 entropy lengths (16 for a 12-word wallet).
pub fn generate_entropy(len: usize) -> Result<Zeroizing<Vec<u8>>, EncodingError> {
    check_entropy_len(len)?;
    let mut entropy = Zeroizing::new(vec![0u8; len]);
    OsRng.fill_bytes(&mut entropy);
    Ok(entropy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_entropy_lengths() {
        for len in [16, 20, 24, 28, 32] {
            assert_eq!(generate_entropy(len).unwrap().len(), len);
        }
        assert_eq!(
            generate_entropy(12).unwrap_err(),
            EncodingError::InvalidEntropyLength(12)
        );
    }

    #[test]
    fn test_generate_entropy_is_fresh() {
        let a = generate_entropy(32).unwrap();
        let b = generate_entropy(32).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn test_seed_debug_is_redacted() {
        let mut seed = Seed::new();
        seed.as_mut_bytes().fill(0x99);
        assert!(!format!("{:?}", seed).contains("153"));
    }
}
