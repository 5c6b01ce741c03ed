//! Namespace enumeration

use crate::domain::Namespace;
use crate::errors::{Error, Result};
use crate::storage::NamespaceSource;
use std::collections::HashSet;
use std::sync::Arc;

/// Produces the flat set of namespaces a tick scans
#[derive(Clone)]
pub struct NamespaceEnumerator {
    source: Arc<dyn NamespaceSource>,
}

impl NamespaceEnumerator {
    pub fn new(source: Arc<dyn NamespaceSource>) -> Self {
        Self { source }
    }

    /// All namespaces, root first, without duplicates.
    ///
    /// # Errors
    ///
    /// Any source failure is reported as [`Error::NamespaceSource`], which is
    /// fatal to the tick.
    pub async fn enumerate(&self) -> Result<Vec<Namespace>> {
        let listed = self.source.list_namespaces().await.map_err(|e| match e {
            Error::NamespaceSource { .. } => e,
            other => Error::namespace_source(other.to_string()),
        })?;

        Ok(with_root_deduplicated(listed))
    }
}

/// Prepend the root namespace and drop repeated identifiers, keeping first occurrences
pub fn with_root_deduplicated(listed: Vec<Namespace>) -> Vec<Namespace> {
    let root = Namespace::root();
    let mut seen = HashSet::with_capacity(listed.len() + 1);
    seen.insert(root.id.clone());

    let mut namespaces = Vec::with_capacity(listed.len() + 1);
    namespaces.push(root);
    namespaces.extend(listed.into_iter().filter(|ns| seen.insert(ns.id.clone())));
    namespaces
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedSource(Vec<Namespace>);

    #[async_trait]
    impl NamespaceSource for FixedSource {
        async fn list_namespaces(&self) -> Result<Vec<Namespace>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl NamespaceSource for BrokenSource {
        async fn list_namespaces(&self) -> Result<Vec<Namespace>> {
            Err(Error::internal("tree unreadable"))
        }
    }

    #[test]
    fn test_root_added_when_missing() {
        let namespaces = with_root_deduplicated(vec![Namespace::new("a", "team-a/")]);
        assert_eq!(namespaces.len(), 2);
        assert!(namespaces[0].is_root());
    }

    #[test]
    fn test_duplicates_removed() {
        let namespaces = with_root_deduplicated(vec![
            Namespace::root(),
            Namespace::new("a", "team-a/"),
            Namespace::new("a", "team-a/"),
            Namespace::new("b", "team-a/b/"),
        ]);
        let ids: Vec<_> = namespaces.iter().map(|ns| ns.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "a", "b"]);
    }

    #[tokio::test]
    async fn test_enumerate_from_source() {
        let enumerator = NamespaceEnumerator::new(Arc::new(FixedSource(vec![Namespace::new(
            "a", "team-a/",
        )])));
        let namespaces = enumerator.enumerate().await.unwrap();
        assert_eq!(namespaces.len(), 2);
    }

    #[tokio::test]
    async fn test_source_failure_is_fatal() {
        let enumerator = NamespaceEnumerator::new(Arc::new(BrokenSource));
        let err = enumerator.enumerate().await.unwrap_err();
        assert!(err.is_fatal_to_tick());
        assert!(err.to_string().contains("tree unreadable"));
    }
}
