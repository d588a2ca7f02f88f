//! Mnemonic and passphrase text must not reach the allocator unwiped.
//!
//! A global allocator inspects every block handed back while the check is
//! armed. This file holds a single test so no other test shares the
//! allocator while it runs.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use seedtree_core::entropy_to_seed;

const NEEDLES: [&[u8]; 2] = [b"abandon", b"mnemonicTREZOR"];

static ARMED: AtomicBool = AtomicBool::new(false);
static DIRTY_FREES: AtomicUsize = AtomicUsize::new(0);

/// Forwards to `System`. Only `alloc`/`dealloc` are overridden so a
/// `realloc` shows up as the free of the old block.
struct ScanOnFree;

unsafe impl GlobalAlloc for ScanOnFree {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if ARMED.load(Ordering::SeqCst) {
            let block = std::slice::from_raw_parts(ptr, layout.size());
            if NEEDLES
                .iter()
                .any(|needle| block.windows(needle.len()).any(|w| w == *needle))
            {
                DIRTY_FREES.fetch_add(1, Ordering::SeqCst);
            }
        }
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static ALLOCATOR: ScanOnFree = ScanOnFree;

#[test]
fn test_seed_pipeline_frees_only_wiped_blocks() {
    // All-zero entropy encodes to "abandon ... about"
    ARMED.store(true, Ordering::SeqCst);
    let seed = entropy_to_seed(&[0u8; 16], "TREZOR").unwrap();
    drop(seed);
    ARMED.store(false, Ordering::SeqCst);

    assert_eq!(DIRTY_FREES.load(Ordering::SeqCst), 0);
}
