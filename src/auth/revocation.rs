use std::time::Duration;

use moka::future::Cache;

/// Tokens blacklisted by logout. Entries carry a time-to-live equal to
/// the token lifetime, so a revoked token stays listed for at least as
/// long as it could still verify, then ages out on its own. No capacity
/// bound; size is limited by logins per TTL window.
#[derive(Clone)]
pub struct RevocationSet {
    revoked: Cache<String, ()>,
}

impl RevocationSet {
    pub fn new(token_ttl_secs: u64) -> Self {
        Self {
            revoked: Cache::builder()
                .time_to_live(Duration::from_secs(token_ttl_secs))
                .build(),
        }
    }

    pub async fn revoke(&self, token: &str) {
        self.revoked.insert(token.to_string(), ()).await;
    }

    pub fn contains(&self, token: &str) -> bool {
        self.revoked.contains_key(token)
    }
}
