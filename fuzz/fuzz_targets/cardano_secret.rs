#![no_main]

use libfuzzer_sys::fuzz_target;
use seedtree_core::{Node, CARDANO_SECRET_LEN};

fuzz_target!(|data: &[u8]| {
    // Arbitrary 96-byte secrets must be accepted or rejected, never panic,
    // and accepted ones must derive soft children privately and publicly alike.
    let Some(secret) = data.get(..CARDANO_SECRET_LEN) else {
        return;
    };
    let mut bytes = [0u8; CARDANO_SECRET_LEN];
    bytes.copy_from_slice(secret);

    if let Ok(node) = Node::from_cardano_secret(&bytes) {
        let mut private = node.clone();
        let mut public = node.to_public();
        if private.derive_child(7).is_ok() {
            public.derive_child(7).unwrap();
            assert_eq!(private.public_key(), public.public_key());
        }
    }
});
