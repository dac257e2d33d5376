//! Purpose: Carry the per-decode configuration snapshot into serde impls.
//! Exports: `ConfigScope`, `active`.
//! Role: Scalar wrapper `Deserialize` impls have no parameter channel, so the
//! top-level decode installs its snapshot here; wrappers used outside an
//! engine entry point fall back to a fresh global snapshot.
//! Invariants: One snapshot per top-level decode; scopes nest and unwind.

use std::cell::RefCell;
use std::sync::Arc;

use crate::config::{self, Config};

thread_local! {
    static ACTIVE: RefCell<Vec<Arc<Config>>> = const { RefCell::new(Vec::new()) };
}

pub(crate) struct ConfigScope;

impl ConfigScope {
    pub(crate) fn enter(cfg: Arc<Config>) -> Self {
        ACTIVE.with(|stack| stack.borrow_mut().push(cfg));
        ConfigScope
    }
}

impl Drop for ConfigScope {
    fn drop(&mut self) {
        ACTIVE.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// The configuration governing the current decode.
pub(crate) fn active() -> Arc<Config> {
    ACTIVE.with(|stack| stack.borrow().last().cloned())
        .unwrap_or_else(|| Arc::new(config::global()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{active, ConfigScope};
    use crate::config::Config;

    #[test]
    fn scopes_nest_and_unwind() {
        let outer = Arc::new(Config::empty());
        let inner = Arc::new(Config::standard());

        let _a = ConfigScope::enter(outer.clone());
        assert!(active().boolean.is_disabled());
        {
            let _b = ConfigScope::enter(inner);
            assert!(!active().boolean.is_disabled());
        }
        assert!(active().boolean.is_disabled());
    }
}
