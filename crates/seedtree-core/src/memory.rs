//! Memory protection for secret intermediates
//!
//! Every secret the pipeline produces on the way to a node (mnemonic text,
//! 64-byte seed, 96-byte Cardano extended secret) lives in a [`SecretBuffer`]:
//!
//! 1. **Pinned and locked**: the bytes live on the heap at a stable address
//!    and are `mlock()`ed so the OS cannot swap them to disk.
//! 2. **Wiped on every exit path**: `Drop` zeroizes before unlocking, so an
//!    early `?` return leaves nothing behind.
//!
//! Locking is best-effort: containers and unprivileged users often cannot
//! `mlock`, which is logged and otherwise ignored.
//!
//! # Platform Support
//!
//! - Unix/macOS/Linux: full support via libc
//! - Other: no-ops with warnings

use std::sync::atomic::{AtomicBool, Ordering};

use zeroize::Zeroize;

/// Track whether core dumps have been disabled (call only once)
static CORE_DUMPS_DISABLED: AtomicBool = AtomicBool::new(false);

/// Disable core dumps for the current process.
///
/// A crash mid-derivation would otherwise write seed material to disk.
/// Binaries should call this before touching entropy.
///
/// Returns `true` if core dumps were successfully disabled.
///
/// # Example
/// ```
/// seedtree_core::memory::disable_core_dumps();
/// ```
pub fn disable_core_dumps() -> bool {
    if CORE_DUMPS_DISABLED.swap(true, Ordering::SeqCst) {
        return true; // Already disabled
    }

    #[cfg(unix)]
    {
        unix::disable_core_dumps_impl()
    }

    #[cfg(not(unix))]
    {
        log::warn!("core dump prevention not supported on this platform");
        false
    }
}

/// Lock a memory region to prevent it from being swapped to disk.
///
/// Returns `true` if the memory was successfully locked.
///
/// # Safety
///
/// The caller must ensure that:
/// - `ptr` points to a valid allocation of at least `len` bytes
/// - The locked region is unlocked (via [`munlock`]) before being freed,
///   or the process exits (which implicitly unlocks all pages)
pub unsafe fn mlock(ptr: *const u8, len: usize) -> bool {
    if len == 0 {
        return true;
    }

    #[cfg(unix)]
    {
        unix::mlock_impl(ptr, len)
    }

    #[cfg(not(unix))]
    {
        let _ = (ptr, len);
        log::warn!("mlock not supported on this platform");
        false
    }
}

/// Unlock a previously locked memory region.
///
/// # Safety
///
/// The caller must ensure `ptr` and `len` match a previous [`mlock`] call.
pub unsafe fn munlock(ptr: *const u8, len: usize) -> bool {
    if len == 0 {
        return true;
    }

    #[cfg(unix)]
    {
        unix::munlock_impl(ptr, len)
    }

    #[cfg(not(unix))]
    {
        let _ = (ptr, len);
        true
    }
}

/// Fixed-capacity secret buffer: mlocked on creation, zeroized and
/// munlocked on drop.
///
/// # Example
/// ```
/// use seedtree_core::memory::SecretBuffer;
/// let mut buf = SecretBuffer::<64>::new();
/// buf.as_mut()[..5].copy_from_slice(b"hello");
/// // Memory is locked, zeroized on drop, then unlocked
/// ```
pub struct SecretBuffer<const N: usize> {
    data: Box<[u8; N]>,
    locked: bool,
}

impl<const N: usize> SecretBuffer<N> {
    /// Create a new zero-filled buffer and lock it in memory.
    pub fn new() -> Self {
        let data = Box::new([0u8; N]);
        let locked = unsafe { mlock(data.as_ptr(), N) };

        if !locked {
            log::warn!("failed to mlock {} bytes, secret may be swappable", N);
        }

        #[cfg(test)]
        audit::acquired();

        Self { data, locked }
    }

    /// Capacity in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Whether the memory is actually locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Overwrite the contents with zeros without releasing the buffer.
    pub fn wipe(&mut self) {
        self.data.zeroize();
    }
}

impl<const N: usize> Default for SecretBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> AsRef<[u8; N]> for SecretBuffer<N> {
    fn as_ref(&self) -> &[u8; N] {
        &self.data
    }
}

impl<const N: usize> AsMut<[u8; N]> for SecretBuffer<N> {
    fn as_mut(&mut self) -> &mut [u8; N] {
        &mut self.data
    }
}

impl<const N: usize> std::fmt::Debug for SecretBuffer<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretBuffer")
            .field("len", &N)
            .field("locked", &self.locked)
            .finish_non_exhaustive()
    }
}

impl<const N: usize> Drop for SecretBuffer<N> {
    fn drop(&mut self) {
        // Zeroize before unlocking
        self.data.zeroize();

        #[cfg(test)]
        audit::released(self.data.iter().all(|&b| b == 0));

        if self.locked {
            unsafe {
                munlock(self.data.as_ptr(), N);
            }
        }
    }
}

/// Per-thread ledger of secret buffers, used by tests to prove that a call
/// released every buffer it acquired and that each one was zero on release.
#[cfg(test)]
pub(crate) mod audit {
    use std::cell::Cell;

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Ledger {
        pub acquired: usize,
        pub released: usize,
        pub dirty: usize,
    }

    impl Ledger {
        pub fn outstanding(&self) -> usize {
            self.acquired - self.released
        }
    }

    thread_local! {
        static LEDGER: Cell<Ledger> = Cell::new(Ledger::default());
    }

    pub fn reset() {
        LEDGER.with(|l| l.set(Ledger::default()));
    }

    pub fn snapshot() -> Ledger {
        LEDGER.with(|l| l.get())
    }

    pub(super) fn acquired() {
        LEDGER.with(|l| {
            let mut v = l.get();
            v.acquired += 1;
            l.set(v);
        });
    }

    pub(super) fn released(clean: bool) {
        LEDGER.with(|l| {
            let mut v = l.get();
            v.released += 1;
            if !clean {
                v.dirty += 1;
            }
            l.set(v);
        });
    }
}

// ---- Platform implementations ----

#[cfg(unix)]
mod unix {
    pub fn disable_core_dumps_impl() -> bool {
        // SAFETY: setrlimit with RLIMIT_CORE=0 is a standard POSIX operation
        unsafe {
            let rlim = libc::rlimit {
                rlim_cur: 0,
                rlim_max: 0,
            };
            if libc::setrlimit(libc::RLIMIT_CORE, &rlim) != 0 {
                let errno = std::io::Error::last_os_error();
                log::warn!("failed to disable core dumps: {}", errno);
                return false;
            }
        }
        true
    }

    pub unsafe fn mlock_impl(ptr: *const u8, len: usize) -> bool {
        if libc::mlock(ptr as *const libc::c_void, len) != 0 {
            let errno = std::io::Error::last_os_error();
            log::debug!("mlock failed for {} bytes: {}", len, errno);
            return false;
        }
        true
    }

    pub unsafe fn munlock_impl(ptr: *const u8, len: usize) -> bool {
        libc::munlock(ptr as *const libc::c_void, len) == 0
    }
}
