//! Process-wide environment helpers.
//!
//! Configuration loading reads `PROBE_*` variables while tests mutate them.
//! Every access goes through one mutex so the two never interleave.

use std::env;
use std::ffi::OsStr;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn lock() -> MutexGuard<'static, ()> {
    // A panicking test must not wedge every later test, so recover the guard.
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Set an environment variable while holding the global lock.
pub fn set_var<K: AsRef<OsStr>, V: AsRef<OsStr>>(key: K, value: V) {
    let _guard = lock();
    // SAFETY: the mutex serialises access to the unsynchronised std env calls.
    unsafe { env::set_var(key, value) };
}

/// Remove an environment variable while holding the global lock.
pub fn remove_var<K: AsRef<OsStr>>(key: K) {
    let _guard = lock();
    // SAFETY: the mutex serialises access to the unsynchronised std env calls.
    unsafe { env::remove_var(key) };
}

/// Read an environment variable while holding the global lock.
///
/// # Errors
///
/// Returns [`env::VarError`] when the variable is unset or contains invalid
/// Unicode.
pub fn var<K: AsRef<OsStr>>(key: K) -> Result<String, env::VarError> {
    let _guard = lock();
    env::var(key)
}

/// Run `op` while the environment mutex is held.
///
/// Configuration providers that scan the whole environment (such as
/// `figment::providers::Env`) run inside this so they observe a consistent
/// snapshot.
pub fn with_lock<T, F>(op: F) -> T
where
    F: FnOnce() -> T,
{
    let _guard = lock();
    op()
}
