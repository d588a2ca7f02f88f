//! PBKDF2 key stretching for both seed schemes
//!
//! - BIP-39: `PBKDF2-HMAC-SHA512(mnemonic, "mnemonic" || NFKD(passphrase), 2048)` → 64 bytes
//! - Icarus: `PBKDF2-HMAC-SHA512(passphrase, entropy, 4096)` → 96 bytes, then clamped

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

use crate::error::EncodingError;
use crate::mnemonic::check_entropy_len;

/// PBKDF2 rounds for a BIP-39 seed.
pub const BIP39_ROUNDS: u32 = 2048;

/// PBKDF2 rounds for a Cardano Icarus master secret.
pub const ICARUS_ROUNDS: u32 = 4096;

const BIP39_SALT_PREFIX: &str = "mnemonic";

/// Stretches low-entropy secrets into seed material.
pub trait KeyStretcher {
    /// Mnemonic + passphrase → 64-byte BIP-39 seed.
    fn stretch_mnemonic(&self, mnemonic: &str, passphrase: &str, seed: &mut [u8; 64]);

    /// Passphrase + raw entropy → 96-byte Icarus extended secret.
    ///
    /// Rejects entropy lengths outside the BIP-39 set.
    fn stretch_icarus(
        &self,
        passphrase: &str,
        entropy: &[u8],
        secret: &mut [u8; 96],
    ) -> Result<(), EncodingError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Pbkdf2Stretcher;

impl KeyStretcher for Pbkdf2Stretcher {
    fn stretch_mnemonic(&self, mnemonic: &str, passphrase: &str, seed: &mut [u8; 64]) {
        let salt = nfkd_with_prefix(BIP39_SALT_PREFIX, passphrase);
        let password = nfkd_with_prefix("", mnemonic);
        pbkdf2_hmac::<Sha512>(password.as_bytes(), salt.as_bytes(), BIP39_ROUNDS, seed);
    }

    fn stretch_icarus(
        &self,
        passphrase: &str,
        entropy: &[u8],
        secret: &mut [u8; 96],
    ) -> Result<(), EncodingError> {
        check_entropy_len(entropy.len())?;
        pbkdf2_hmac::<Sha512>(passphrase.as_bytes(), entropy, ICARUS_ROUNDS, secret);
        clamp(secret);
        Ok(())
    }
}

/// `prefix || NFKD(text)` in a buffer sized up front.
///
/// Growing the string would hand unwiped copies back to the allocator.
fn nfkd_with_prefix(prefix: &str, text: &str) -> Zeroizing<String> {
    let len = prefix.len() + text.nfkd().map(char::len_utf8).sum::<usize>();
    let mut out = Zeroizing::new(String::with_capacity(len));
    out.push_str(prefix);
    out.extend(text.nfkd());
    out
}

/// Ed25519 scalar clamp on `kL`, plus clearing bit 253 as Icarus requires.
fn clamp(secret: &mut [u8; 96]) {
    secret[0] &= 0xf8;
    secret[31] &= 0x1f;
    secret[31] |= 0x40;
}
