//! Client configuration.

use crate::wait::WaitConfig;

/// User that privileged `oc` operations log in as.
pub const DEFAULT_ADMIN_USER: &str = "system:admin";

/// Tunables of a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Budget for readiness and creation waits
    pub readiness: WaitConfig,
    /// Budget for deletion and update waits
    pub deletion: WaitConfig,
    /// User assumed inside the elevated-privilege scope (`oc` only)
    pub admin_user: String,
    /// Run batch and content operations inside the elevated-privilege scope
    pub admin_by_default: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            readiness: WaitConfig::readiness(),
            deletion: WaitConfig::deletion(),
            admin_user: DEFAULT_ADMIN_USER.to_string(),
            admin_by_default: false,
        }
    }
}

impl ClientConfig {
    /// Replace the readiness budget.
    pub fn with_readiness(mut self, readiness: WaitConfig) -> Self {
        self.readiness = readiness;
        self
    }

    /// Replace the deletion/update budget.
    pub fn with_deletion(mut self, deletion: WaitConfig) -> Self {
        self.deletion = deletion;
        self
    }

    /// Replace the admin user.
    pub fn with_admin_user(mut self, user: impl Into<String>) -> Self {
        self.admin_user = user.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.readiness, WaitConfig::readiness());
        assert_eq!(config.deletion, WaitConfig::deletion());
        assert_eq!(config.admin_user, "system:admin");
        assert!(!config.admin_by_default);
    }

    #[test]
    fn test_builders() {
        let fast = WaitConfig::new(Duration::from_millis(10), Duration::from_millis(100)).unwrap();
        let config = ClientConfig::default()
            .with_readiness(fast)
            .with_deletion(fast)
            .with_admin_user("developer");
        assert_eq!(config.readiness.timeout(), Duration::from_millis(100));
        assert_eq!(config.deletion.poll_interval(), Duration::from_millis(10));
        assert_eq!(config.admin_user, "developer");
    }
}
