use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Per-user write serialization. Every mutating engine operation holds its
/// user's mutex across read-validate-compute-apply, which is what rules out
/// two concurrent buys reading the same holding snapshot and overwriting each
/// other's average. Locks are cheap and live for the process lifetime; the
/// map only ever grows by active users.
#[derive(Default)]
pub struct UserLocks {
    inner: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_user(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        self.inner
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::UserLocks;
    use uuid::Uuid;

    #[test]
    fn same_user_gets_same_lock() {
        let locks = UserLocks::new();
        let user = Uuid::new_v4();
        let a = locks.for_user(user);
        let b = locks.for_user(user);
        assert!(std::sync::Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_users_get_independent_locks() {
        let locks = UserLocks::new();
        let a = locks.for_user(Uuid::new_v4());
        let b = locks.for_user(Uuid::new_v4());
        assert!(!std::sync::Arc::ptr_eq(&a, &b));
    }
}
