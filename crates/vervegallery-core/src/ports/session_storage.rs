//! Session storage port
//!
//! A small string key-value store, the desktop counterpart of browser local
//! storage. The auth store keeps a single serialized profile record in it.

/// Port trait for persisted session records
#[async_trait::async_trait]
pub trait ISessionStorage: Send + Sync {
    /// Reads the raw value stored under `key`
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Removes `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
