#![no_main]

use libfuzzer_sys::fuzz_target;
use seedtree_core::{entropy_to_node, CurveKind};

fuzz_target!(|data: &[u8]| {
    // Layout: curve selector, entropy length, then entropy followed by path indices.
    // The pipeline must return Ok or Err for every input, never panic.
    if data.len() < 2 {
        return;
    }
    let curve = CurveKind::ALL[data[0] as usize % CurveKind::ALL.len()];
    let entropy_len = (data[1] as usize % 33).min(data.len() - 2);
    let (entropy, rest) = data[2..].split_at(entropy_len);

    let indices: Vec<u32> = rest
        .chunks_exact(4)
        .take(8)
        .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    let _ = entropy_to_node(entropy, "", curve.name(), &indices);
});
