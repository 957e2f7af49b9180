//! Collision-free filename discriminators.
//!
//! With safe naming, every file derived from one upload shares a
//! discriminator (`""` or `-<N>`) placed right before the extension, e.g.
//! `cat-320x240-2.png`. The discriminator is computed from the files that
//! already exist in the destination directory.

use crate::traits::{Storage, StorageResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub struct NamingResolver;

impl NamingResolver {
    /// Compute the discriminator for `base_name` / `ext` in the storage's directory.
    pub async fn resolve(
        storage: &dyn Storage,
        base_name: &str,
        ext: &str,
    ) -> StorageResult<String> {
        let entries = storage.list().await?;
        let discriminator = Self::next_discriminator(&entries, base_name, ext);

        tracing::debug!(
            dir = %storage.root().display(),
            base_name = %base_name,
            ext = %ext,
            existing = entries.len(),
            discriminator = %discriminator,
            "Resolved filename discriminator"
        );

        Ok(discriminator)
    }

    /// Pure part of [`resolve`](Self::resolve).
    ///
    /// Entries matching `<base_name>*.<ext>` are considered. Each match
    /// contributes the number of a trailing `-<digits>` in its wildcard part,
    /// or 0 when it has none. No match yields `""`; otherwise the result is
    /// `-<max + 1>`.
    pub fn next_discriminator<S: AsRef<str>>(entries: &[S], base_name: &str, ext: &str) -> String {
        let mut highest: Option<u64> = None;

        for entry in entries {
            if let Some(rest) = wildcard_part(entry.as_ref(), base_name, ext) {
                let number = trailing_number(rest).unwrap_or(0);
                highest = Some(highest.map_or(number, |h| h.max(number)));
            }
        }

        match highest {
            None => String::new(),
            Some(n) => format!("-{}", n.saturating_add(1)),
        }
    }
}

/// The text matched by `*` in `<base_name>*.<ext>`, if `name` matches.
fn wildcard_part<'a>(name: &'a str, base_name: &str, ext: &str) -> Option<&'a str> {
    let rest = name.strip_prefix(base_name)?;
    let rest = rest.strip_suffix(ext)?;
    rest.strip_suffix('.')
}

fn trailing_number(s: &str) -> Option<u64> {
    let (_, digits) = s.rsplit_once('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Per-name async locks for one destination directory.
///
/// A handler holds the lock for its `(base name, extension)` pair from
/// discriminator resolution until its last write, so concurrent uploads of
/// the same name inside one process never compute the same discriminator.
///
/// Keys are exact: `cat` and `cat-1` take different locks even though both
/// scans can match `cat-1.<ext>`. Such a collision fails on exclusive create.
#[derive(Clone, Default)]
pub struct NameLocks {
    locks: Arc<Mutex<HashMap<(String, String), Arc<Mutex<()>>>>>,
}

impl NameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, base_name: &str, ext: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry((base_name.to_string(), ext.to_string()))
                .or_default()
                .clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LocalStorage, WriteMode};
    use bytes::Bytes;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_no_match_yields_empty() {
        let entries = ["dog.png", "cat.jpeg", "readme.txt"];
        assert_eq!(NamingResolver::next_discriminator(&entries, "cat", "png"), "");

        let empty: [&str; 0] = [];
        assert_eq!(NamingResolver::next_discriminator(&empty, "cat", "png"), "");
    }

    #[test]
    fn test_unnumbered_match_counts_as_zero() {
        let entries = ["cat.png"];
        assert_eq!(NamingResolver::next_discriminator(&entries, "cat", "png"), "-1");

        let entries = ["cat.png", "cat-100x100.png"];
        assert_eq!(NamingResolver::next_discriminator(&entries, "cat", "png"), "-1");
    }

    #[test]
    fn test_highest_number_wins() {
        let entries = ["cat.png", "cat-1.png", "cat-7.png", "cat-100x100-3.png", "cat-2.jpeg"];
        assert_eq!(NamingResolver::next_discriminator(&entries, "cat", "png"), "-8");
    }

    #[test]
    fn test_number_inside_base_name_is_ignored() {
        let entries = ["photo-2.png"];
        assert_eq!(
            NamingResolver::next_discriminator(&entries, "photo-2", "png"),
            "-1"
        );
    }

    #[test]
    fn test_trailing_number() {
        assert_eq!(trailing_number("-12"), Some(12));
        assert_eq!(trailing_number("-thumb-3"), Some(3));
        assert_eq!(trailing_number("-100x100"), None);
        assert_eq!(trailing_number("-"), None);
        assert_eq!(trailing_number(""), None);
    }

    #[tokio::test]
    async fn test_resolve_against_directory() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        assert_eq!(NamingResolver::resolve(&storage, "cat", "png").await.unwrap(), "");

        storage
            .write("cat.png", Bytes::from_static(b"x"), WriteMode::CreateNew)
            .await
            .unwrap();
        assert_eq!(
            NamingResolver::resolve(&storage, "cat", "png").await.unwrap(),
            "-1"
        );

        storage
            .write("cat-1.png", Bytes::from_static(b"x"), WriteMode::CreateNew)
            .await
            .unwrap();
        assert_eq!(
            NamingResolver::resolve(&storage, "cat", "png").await.unwrap(),
            "-2"
        );
    }

    #[tokio::test]
    async fn test_name_locks_serialize_same_key() {
        let locks = NameLocks::new();
        let guard = locks.acquire("cat", "png").await;

        // A different key is independent
        let other = tokio::time::timeout(Duration::from_millis(100), locks.acquire("dog", "png"))
            .await;
        assert!(other.is_ok());

        // The same key waits until the first guard is released
        let blocked =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("cat", "png")).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired =
            tokio::time::timeout(Duration::from_millis(100), locks.acquire("cat", "png")).await;
        assert!(reacquired.is_ok());
    }
}
