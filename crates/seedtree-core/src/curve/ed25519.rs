//! SLIP-10 over Ed25519
//!
//! Only hardened derivation is defined:
//! `I = HMAC-SHA512(c_par, 0x00 || k_par || ser32(i))`, `k_i = I_L`, `c_i = I_R`.

use ed25519_dalek::SigningKey;

use super::{ed25519_public, hmac_sha512, is_hardened, split, CurveKind, CurveOps, KeyMaterial};
use crate::error::{DeriveError, NodeError};

const SEED_KEY: &[u8] = b"ed25519 seed";

pub(crate) struct Ed25519Curve;

fn private_material(key: &[u8; 32], chain_code: [u8; 32]) -> KeyMaterial {
    let public = SigningKey::from_bytes(key).verifying_key().to_bytes();
    KeyMaterial::private(*key, None, ed25519_public(public), chain_code)
}

impl CurveOps for Ed25519Curve {
    fn master_from_seed(&self, seed: &[u8]) -> Result<KeyMaterial, NodeError> {
        let i = hmac_sha512(SEED_KEY, &[seed]);
        let (il, ir) = split(&i);
        Ok(private_material(&il, ir))
    }

    fn derive_private(
        &self,
        parent: &KeyMaterial,
        index: u32,
    ) -> Result<KeyMaterial, DeriveError> {
        if !is_hardened(index) {
            return Err(DeriveError::NonHardenedUnsupported {
                curve: CurveKind::Ed25519,
                index,
            });
        }

        let i = hmac_sha512(
            &parent.chain_code,
            &[&[0x00], parent.secret()?, &index.to_be_bytes()],
        );
        let (il, ir) = split(&i);
        Ok(private_material(&il, ir))
    }

    fn derive_public(&self, _parent: &KeyMaterial, index: u32) -> Result<KeyMaterial, DeriveError> {
        if is_hardened(index) {
            return Err(DeriveError::HardenedFromPublic(index));
        }
        Err(DeriveError::NonHardenedUnsupported {
            curve: CurveKind::Ed25519,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SLIP-10 test vector 1 for ed25519: m and m/0H
    #[test]
    fn test_slip10_vector1() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let master = Ed25519Curve.master_from_seed(&seed).unwrap();

        assert_eq!(
            hex::encode(master.chain_code),
            "90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb"
        );
        assert_eq!(
            hex::encode(master.private_key.unwrap()),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(
            hex::encode(master.public_key),
            "00a4b2856bfec510abab89753fac1ac0e1112364e7d250545963f135f2a33188ed"
        );

        let child = Ed25519Curve.derive_private(&master, 0x8000_0000).unwrap();
        assert_eq!(
            hex::encode(child.chain_code),
            "8b59aa11380b624e81507a27fedda59fea6d0b779a778918a2fd3590e16e9c69"
        );
        assert_eq!(
            hex::encode(child.private_key.unwrap()),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
        assert_eq!(
            hex::encode(child.public_key),
            "008c8a13df77a28f3445213a0f432fde644acaa215fc72dcdf300d5efaa85d350c"
        );
    }

    #[test]
    fn test_non_hardened_is_rejected() {
        let master = Ed25519Curve.master_from_seed(&[0u8; 64]).unwrap();
        assert_eq!(
            Ed25519Curve.derive_private(&master, 1).unwrap_err(),
            DeriveError::NonHardenedUnsupported {
                curve: CurveKind::Ed25519,
                index: 1
            }
        );
        assert!(Ed25519Curve.derive_public(&master.neutered(), 1).is_err());
    }
}
