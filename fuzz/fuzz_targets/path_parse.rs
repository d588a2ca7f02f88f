#![no_main]

use libfuzzer_sys::fuzz_target;
use seedtree_core::{format_path, parse_path};

fuzz_target!(|data: &[u8]| {
    // Any accepted path must render back to a path that parses to the same indices.
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(indices) = parse_path(s) {
            assert_eq!(parse_path(&format_path(&indices)), Ok(indices));
        }
    }
});
