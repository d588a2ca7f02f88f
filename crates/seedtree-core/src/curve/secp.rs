//! BIP-32 over secp256k1
//!
//! Master: `I = HMAC-SHA512("Bitcoin seed", seed)`.
//! Child:  `I = HMAC-SHA512(c_par, 0x00 || k_par || ser32(i))` when hardened,
//!         `I = HMAC-SHA512(c_par, ser_P(K_par) || ser32(i))` otherwise;
//!         `k_i = I_L + k_par (mod n)`, `c_i = I_R`.
//!
//! An `I_L` that is zero or not below the curve order is reported, not
//! skipped.

use ::secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey};

use super::{hmac_sha512, is_hardened, split, CurveKind, CurveOps, KeyMaterial};
use crate::error::{DeriveError, NodeError};

const SEED_KEY: &[u8] = b"Bitcoin seed";

pub(crate) struct Secp256k1Curve;

/// Takes ownership of `secret` and erases it once its bytes are copied out.
fn private_material(mut secret: SecretKey, chain_code: [u8; 32]) -> KeyMaterial {
    let secp = Secp256k1::signing_only();
    let public = PublicKey::from_secret_key(&secp, &secret).serialize();
    let material = KeyMaterial::private(secret.secret_bytes(), None, public, chain_code);
    secret.non_secure_erase();
    material
}

impl CurveOps for Secp256k1Curve {
    fn master_from_seed(&self, seed: &[u8]) -> Result<KeyMaterial, NodeError> {
        let i = hmac_sha512(SEED_KEY, &[seed]);
        let (il, ir) = split(&i);

        let secret = SecretKey::from_slice(&il[..])
            .map_err(|_| NodeError::InvalidMasterKey(CurveKind::Secp256k1))?;

        Ok(private_material(secret, ir))
    }

    fn derive_private(
        &self,
        parent: &KeyMaterial,
        index: u32,
    ) -> Result<KeyMaterial, DeriveError> {
        let parent_secret = parent.secret()?;
        let mut parent_key =
            SecretKey::from_slice(parent_secret).map_err(|_| DeriveError::InvalidChildKey(index))?;

        let i = if is_hardened(index) {
            hmac_sha512(
                &parent.chain_code,
                &[&[0x00], parent_secret, &index.to_be_bytes()],
            )
        } else {
            hmac_sha512(
                &parent.chain_code,
                &[&parent.public_key, &index.to_be_bytes()],
            )
        };
        let (il, ir) = split(&i);

        let child = Scalar::from_be_bytes(*il)
            .ok()
            .and_then(|tweak| parent_key.add_tweak(&tweak).ok());
        parent_key.non_secure_erase();
        let child = child.ok_or(DeriveError::InvalidChildKey(index))?;

        Ok(private_material(child, ir))
    }

    fn derive_public(&self, parent: &KeyMaterial, index: u32) -> Result<KeyMaterial, DeriveError> {
        if is_hardened(index) {
            return Err(DeriveError::HardenedFromPublic(index));
        }

        let secp = Secp256k1::verification_only();
        let parent_key =
            PublicKey::from_slice(&parent.public_key).map_err(|_| DeriveError::InvalidPublicKey)?;

        let i = hmac_sha512(
            &parent.chain_code,
            &[&parent.public_key, &index.to_be_bytes()],
        );
        let (il, ir) = split(&i);

        // child = parent + I_L * G
        let tweak = Scalar::from_be_bytes(*il).map_err(|_| DeriveError::InvalidChildKey(index))?;
        let child = parent_key
            .add_exp_tweak(&secp, &tweak)
            .map_err(|_| DeriveError::InvalidChildKey(index))?;

        Ok(KeyMaterial::public(child.serialize(), ir))
    }
}
