//! BIP32-Ed25519 (derivation scheme V2) as used by Cardano Icarus wallets
//!
//! Nodes carry an extended secret `kL || kR` plus a chain code. The public
//! key is `A = kL·B` with no hashing of `kL`.
//!
//! ```text
//! hardened: Z = HMAC(c, 0x00 || kL || kR || le32(i))   c' = HMAC(c, 0x01 || kL || kR || le32(i))[32..]
//! soft:     Z = HMAC(c, 0x02 || A || le32(i))          c' = HMAC(c, 0x03 || A || le32(i))[32..]
//! kL' = kL + 8·trunc28(ZL)     kR' = kR + ZR mod 2^256
//! ```

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use zeroize::{Zeroize, Zeroizing};

use super::{ed25519_public, hmac_sha512, is_hardened, CurveKind, CurveOps, KeyMaterial};
use crate::error::{DeriveError, NodeError};

/// `kL (32) || kR (32) || chain code (32)`
pub const CARDANO_SECRET_LEN: usize = 96;

pub(crate) struct CardanoCurve;

/// `kL·B`, compressed.
fn public_of(kl: &[u8; 32]) -> [u8; 32] {
    let mut scalar = Scalar::from_bytes_mod_order(*kl);
    let public = EdwardsPoint::mul_base(&scalar).compress().to_bytes();
    scalar.zeroize();
    public
}

/// `x + 8 * y[0..28]`, little-endian
fn add_28_mul8(x: &[u8; 32], y: &[u8]) -> [u8; 32] {
    let mut carry: u16 = 0;
    let mut out = [0u8; 32];

    for i in 0..28 {
        let r = x[i] as u16 + ((y[i] as u16) << 3) + carry;
        out[i] = (r & 0xff) as u8;
        carry = r >> 8;
    }
    for i in 28..32 {
        let r = x[i] as u16 + carry;
        out[i] = (r & 0xff) as u8;
        carry = r >> 8;
    }
    out
}

/// `x + y mod 2^256`, little-endian
fn add_256bits(x: &[u8; 32], y: &[u8]) -> [u8; 32] {
    let mut carry: u16 = 0;
    let mut out = [0u8; 32];
    for i in 0..32 {
        let r = x[i] as u16 + y[i] as u16 + carry;
        out[i] = r as u8;
        carry = r >> 8;
    }
    out
}

/// Build the root key material from an Icarus extended secret.
///
/// `kL` must already carry the Icarus clamp: the low three bits clear and
/// the top three bits equal to `010`.
pub(crate) fn from_secret(secret: &[u8; CARDANO_SECRET_LEN]) -> Result<KeyMaterial, NodeError> {
    let mut kl = Zeroizing::new([0u8; 32]);
    let mut kr = Zeroizing::new([0u8; 32]);
    let mut chain_code = [0u8; 32];
    kl.copy_from_slice(&secret[..32]);
    kr.copy_from_slice(&secret[32..64]);
    chain_code.copy_from_slice(&secret[64..]);

    if kl[0] & 0x07 != 0 {
        return Err(NodeError::InvalidCardanoSecret(
            "low three bits of kL must be clear",
        ));
    }
    if kl[31] & 0xe0 != 0x40 {
        return Err(NodeError::InvalidCardanoSecret(
            "top three bits of kL must be 010",
        ));
    }

    let public = ed25519_public(public_of(&kl));
    Ok(KeyMaterial::private(*kl, Some(*kr), public, chain_code))
}

impl CurveOps for CardanoCurve {
    fn master_from_seed(&self, _seed: &[u8]) -> Result<KeyMaterial, NodeError> {
        Err(NodeError::SeedNotSupported(CurveKind::Ed25519Cardano))
    }

    fn derive_private(
        &self,
        parent: &KeyMaterial,
        index: u32,
    ) -> Result<KeyMaterial, DeriveError> {
        let kl = parent.secret()?;
        let kr = parent
            .private_key_extension
            .as_ref()
            .ok_or(DeriveError::MissingPrivateKey)?;
        let serialized = index.to_le_bytes();

        let (z, i) = if is_hardened(index) {
            (
                hmac_sha512(&parent.chain_code, &[&[0x00], kl, kr, &serialized]),
                hmac_sha512(&parent.chain_code, &[&[0x01], kl, kr, &serialized]),
            )
        } else {
            let public = &parent.public_key[1..];
            (
                hmac_sha512(&parent.chain_code, &[&[0x02], public, &serialized]),
                hmac_sha512(&parent.chain_code, &[&[0x03], public, &serialized]),
            )
        };

        let left = Zeroizing::new(add_28_mul8(kl, &z[..32]));
        let right = Zeroizing::new(add_256bits(kr, &z[32..]));
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);

        let public = ed25519_public(public_of(&left));
        Ok(KeyMaterial::private(*left, Some(*right), public, chain_code))
    }

    fn derive_public(&self, parent: &KeyMaterial, index: u32) -> Result<KeyMaterial, DeriveError> {
        if is_hardened(index) {
            return Err(DeriveError::HardenedFromPublic(index));
        }

        let mut public = [0u8; 32];
        public.copy_from_slice(&parent.public_key[1..]);
        let point = CompressedEdwardsY(public)
            .decompress()
            .ok_or(DeriveError::InvalidPublicKey)?;

        let serialized = index.to_le_bytes();
        let z = hmac_sha512(&parent.chain_code, &[&[0x02], &public, &serialized]);
        let i = hmac_sha512(&parent.chain_code, &[&[0x03], &public, &serialized]);

        // A' = A + (8·trunc28(ZL))·B
        let tweak = Scalar::from_bytes_mod_order(add_28_mul8(&[0u8; 32], &z[..32]));
        let child = point + EdwardsPoint::mul_base(&tweak);

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);
        Ok(KeyMaterial::public(
            ed25519_public(child.compress().to_bytes()),
            chain_code,
        ))
    }
}
