//! Textual derivation paths: `m/44'/1815'/0'/0/0`
//!
//! Parsed with `bitcoin::bip32::DerivationPath`. `'`, `h` and `H` all mark a
//! hardened component; the leading `m/` is optional and an empty string or
//! a lone `m` is the empty path.

use std::str::FromStr;

use bitcoin::bip32::{self, ChildNumber, DerivationPath};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid derivation path {path:?}: {source}")]
pub struct PathError {
    pub path: String,
    #[source]
    pub source: bip32::Error,
}

/// Parse a path into child indices, root to leaf.
pub fn parse_path(path: &str) -> Result<Vec<u32>, PathError> {
    // bip32 only knows `'` and `h`
    let normalized = path.replace('H', "h");
    let parsed = DerivationPath::from_str(&normalized).map_err(|source| PathError {
        path: path.to_string(),
        source,
    })?;
    Ok(parsed.into_iter().map(|&child| u32::from(child)).collect())
}

/// Render indices as `m/...`, hardened components with `'`.
pub fn format_path(indices: &[u32]) -> String {
    if indices.is_empty() {
        return "m".to_string();
    }
    let path: DerivationPath = indices
        .iter()
        .map(|&index| ChildNumber::from(index))
        .collect::<Vec<_>>()
        .into();
    format!("m/{}", path)
}
