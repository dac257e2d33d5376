//! Purpose: Process-wide current configuration behind a read/write lock.
//! Exports: `global`, `update`.
//! Invariants: Readers receive a deep clone taken under the read lock;
//! writers apply mutator batches atomically under the write lock.

use std::sync::RwLock;

use once_cell::sync::OnceCell;

use super::Config;

static CURRENT: OnceCell<RwLock<Config>> = OnceCell::new();

fn cell() -> &'static RwLock<Config> {
    CURRENT.get_or_init(|| RwLock::new(Config::standard()))
}

/// Returns a snapshot clone of the process-wide configuration.
pub fn global() -> Config {
    match cell().read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Applies a mutator to the live configuration under the write lock. No
/// reader observes a partially-applied batch.
pub fn update<F: FnOnce(&mut Config)>(mutate: F) {
    match cell().write() {
        Ok(mut guard) => mutate(&mut guard),
        Err(poisoned) => mutate(&mut poisoned.into_inner()),
    }
}

#[cfg(test)]
mod tests {
    use super::{global, update};
    use crate::config::Config;

    #[test]
    fn snapshot_is_independent_of_later_updates() {
        update(|cfg| cfg.reset_to_default());
        let snapshot = global();
        update(|cfg| cfg.boolean.disabled = true);
        assert!(!snapshot.boolean.is_disabled());

        update(|cfg| cfg.reset_to_default());
        assert_eq!(global(), Config::standard());
    }
}
