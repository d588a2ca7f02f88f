//! SLIP-10 over NIST P-256
//!
//! Same construction as BIP-32 with the `"Nist256p1 seed"` master key.

use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::elliptic_curve::PrimeField;
use p256::{AffinePoint, FieldBytes, ProjectivePoint, PublicKey, Scalar};
use zeroize::Zeroize;

use super::{hmac_sha512, is_hardened, split, CurveKind, CurveOps, KeyMaterial};
use crate::error::{DeriveError, NodeError};

const SEED_KEY: &[u8] = b"Nist256p1 seed";

pub(crate) struct Nist256p1Curve;

/// Parse 32 big-endian bytes as a scalar strictly below the group order.
fn scalar(bytes: &[u8; 32]) -> Option<Scalar> {
    Option::from(Scalar::from_repr(FieldBytes::clone_from_slice(bytes)))
}

fn compress(point: &ProjectivePoint) -> [u8; 33] {
    let encoded = AffinePoint::from(*point).to_encoded_point(true);
    let mut out = [0u8; 33];
    out.copy_from_slice(encoded.as_bytes());
    out
}

/// Takes ownership of `secret` and zeroizes it once its bytes are copied out.
fn private_material(mut secret: Scalar, chain_code: [u8; 32]) -> KeyMaterial {
    let mut repr = secret.to_repr();
    let mut key = [0u8; 32];
    key.copy_from_slice(&repr);
    repr.as_mut_slice().zeroize();

    let public = compress(&(ProjectivePoint::GENERATOR * secret));
    secret.zeroize();
    KeyMaterial::private(key, None, public, chain_code)
}

impl CurveOps for Nist256p1Curve {
    fn master_from_seed(&self, seed: &[u8]) -> Result<KeyMaterial, NodeError> {
        let i = hmac_sha512(SEED_KEY, &[seed]);
        let (il, ir) = split(&i);

        let secret = scalar(&il)
            .filter(|s| *s != Scalar::ZERO)
            .ok_or(NodeError::InvalidMasterKey(CurveKind::Nist256p1))?;

        Ok(private_material(secret, ir))
    }

    fn derive_private(
        &self,
        parent: &KeyMaterial,
        index: u32,
    ) -> Result<KeyMaterial, DeriveError> {
        let parent_secret = parent.secret()?;
        let mut parent_scalar = scalar(parent_secret).ok_or(DeriveError::InvalidChildKey(index))?;

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

        let child = scalar(&il).map(|mut tweak| {
            let sum = tweak + parent_scalar;
            tweak.zeroize();
            sum
        });
        parent_scalar.zeroize();

        match child {
            Some(child) if child != Scalar::ZERO => Ok(private_material(child, ir)),
            _ => Err(DeriveError::InvalidChildKey(index)),
        }
    }

    fn derive_public(&self, parent: &KeyMaterial, index: u32) -> Result<KeyMaterial, DeriveError> {
        if is_hardened(index) {
            return Err(DeriveError::HardenedFromPublic(index));
        }

        let parent_point = PublicKey::from_sec1_bytes(&parent.public_key)
            .map_err(|_| DeriveError::InvalidPublicKey)?
            .to_projective();

        let i = hmac_sha512(
            &parent.chain_code,
            &[&parent.public_key, &index.to_be_bytes()],
        );
        let (il, ir) = split(&i);

        let tweak = scalar(&il).ok_or(DeriveError::InvalidChildKey(index))?;
        let child = parent_point + ProjectivePoint::GENERATOR * tweak;
        if child == ProjectivePoint::IDENTITY {
            return Err(DeriveError::InvalidChildKey(index));
        }

        Ok(KeyMaterial::public(compress(&child), ir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SLIP-10 test vector 1 for nist256p1
    #[test]
    fn test_slip10_vector1_master() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let master = Nist256p1Curve.master_from_seed(&seed).unwrap();

        assert_eq!(
            hex::encode(master.chain_code),
            "beeb672fe4621673f722f38529c07392fecaa61015c80c34f29ce8b41b3cb6ea"
        );
        assert_eq!(
            hex::encode(master.private_key.unwrap()),
            "612091aaa12e22dd2abef664f8a01a82cae99ad7441b7ef8110424915c268bc2"
        );
        assert_eq!(
            hex::encode(master.public_key),
            "0266874dc6ade47b3ecd096745ca09bcd29638dd52c2c12117b11ed3e458cfa9e8"
        );
    }

    #[test]
    fn test_public_derivation_matches_private() {
        let master = Nist256p1Curve.master_from_seed(&[0x5a; 64]).unwrap();

        for index in [0u32, 3, 1000] {
            let private_child = Nist256p1Curve.derive_private(&master, index).unwrap();
            let public_child = Nist256p1Curve
                .derive_public(&master.neutered(), index)
                .unwrap();
            assert_eq!(private_child.public_key, public_child.public_key);
            assert_eq!(private_child.chain_code, public_child.chain_code);
        }
    }

    #[test]
    fn test_hardened_and_normal_children_differ() {
        let master = Nist256p1Curve.master_from_seed(&[0x11; 32]).unwrap();
        let normal = Nist256p1Curve.derive_private(&master, 0).unwrap();
        let hardened = Nist256p1Curve.derive_private(&master, 0x8000_0000).unwrap();
        assert_ne!(normal.private_key, hardened.private_key);
        assert_ne!(normal.chain_code, hardened.chain_code);
    }

    #[test]
    fn test_key_material_survives_scalar_zeroize() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0x42;
        let secret = scalar(&bytes).unwrap();
        let mut copy = secret;
        let material = private_material(secret, [0u8; 32]);
        assert_eq!(material.private_key, Some(bytes));

        copy.zeroize();
        assert_eq!(copy, Scalar::ZERO);
    }

    #[test]
    fn test_garbage_public_key_is_rejected() {
        let parent = KeyMaterial::public([0x05; 33], [0u8; 32]);
        assert_eq!(
            Nist256p1Curve.derive_public(&parent, 0).unwrap_err(),
            DeriveError::InvalidPublicKey
        );
    }
}
