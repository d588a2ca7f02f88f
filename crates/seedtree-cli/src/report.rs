//! Derive every configured profile and render the public result.
//!
//! Only public data leaves this module: public key, chain code,
//! fingerprints and the path. Private keys stay inside the `Node`s, which
//! are dropped (and zeroized) before `derive_profiles` returns.

use anyhow::{Context, Result};
use serde::Serialize;

use seedtree_core::{
    entropy_to_node, entropy_to_node_cardano, format_path, parse_path, CurveKind, Node,
};

use crate::config::Profile;

/// Public view of one derived node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileReport {
    pub label: String,
    pub curve: String,
    pub path: String,
    pub depth: u32,
    pub fingerprint: String,
    pub parent_fingerprint: String,
    pub public_key: String,
    pub chain_code: String,
}

impl ProfileReport {
    fn new(profile: &Profile, path: &[u32], node: &Node) -> Self {
        Self {
            label: profile.label.clone(),
            curve: node.curve().to_string(),
            path: format_path(path),
            depth: node.depth(),
            fingerprint: format!("{:08x}", node.fingerprint()),
            parent_fingerprint: format!("{:08x}", node.parent_fingerprint()),
            public_key: hex::encode(node.public_key()),
            chain_code: hex::encode(node.chain_code()),
        }
    }
}

/// Run the pipeline once per profile.
pub fn derive_profiles(
    profiles: &[Profile],
    entropy: &[u8],
    passphrase: &str,
) -> Result<Vec<ProfileReport>> {
    let mut reports = Vec::with_capacity(profiles.len());
    for profile in profiles {
        let path = parse_path(&profile.path)
            .with_context(|| format!("profile {}: bad path", profile.label))?;
        let node = match profile.curve_kind()? {
            CurveKind::Ed25519Cardano => entropy_to_node_cardano(entropy, passphrase, &path),
            curve => entropy_to_node(entropy, passphrase, curve.name(), &path),
        }
        .with_context(|| format!("profile {}: derivation failed", profile.label))?;

        log::info!("derived {} at {}", profile.label, profile.path);
        reports.push(ProfileReport::new(profile, &path, &node));
    }
    Ok(reports)
}

/// Plain-text rendering, one block per profile.
pub fn render_text(reports: &[ProfileReport]) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!("[{}]\n", report.label));
        out.push_str(&format!("  Curve:        {}\n", report.curve));
        out.push_str(&format!("  Path:         {}\n", report.path));
        out.push_str(&format!("  Fingerprint:  {}\n", report.fingerprint));
        out.push_str(&format!("  Parent:       {}\n", report.parent_fingerprint));
        out.push_str(&format!("  Public key:   {}\n", report.public_key));
        out.push_str(&format!("  Chain code:   {}\n", report.chain_code));
    }
    out
}
