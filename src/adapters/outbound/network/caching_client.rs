use crate::ports::outbound::MetadataRepository;
use crate::sbom_generation::domain::{Ecosystem, PackageMetadata};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Registries treat ids case-insensitively, so the key is lowercased
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    ecosystem: Ecosystem,
    package_name: String,
    version: String,
}

impl CacheKey {
    fn new(ecosystem: Ecosystem, package_name: &str, version: &str) -> Self {
        Self {
            ecosystem,
            package_name: package_name.to_lowercase(),
            version: version.to_lowercase(),
        }
    }
}

/// CachingMetadataRepository wraps a MetadataRepository and adds in-memory caching.
///
/// Records that differ only in name casing, or that appear in several
/// target frameworks, hit the registry once. Failures are not cached.
pub struct CachingMetadataRepository<R: MetadataRepository> {
    inner: R,
    cache: Arc<DashMap<CacheKey, Option<PackageMetadata>>>,
}

impl<R: MetadataRepository> CachingMetadataRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<R: MetadataRepository> MetadataRepository for CachingMetadataRepository<R> {
    async fn fetch_metadata(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Option<PackageMetadata>> {
        let key = CacheKey::new(ecosystem, name, version);

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        let metadata = self.inner.fetch_metadata(ecosystem, name, version).await?;
        self.cache.insert(key, metadata.clone());

        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRepository {
        call_count: AtomicUsize,
        fail: bool,
    }

    impl CountingRepository {
        fn new(fail: bool) -> Self {
            Self {
                call_count: AtomicUsize::new(0),
                fail,
            }
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MetadataRepository for CountingRepository {
        async fn fetch_metadata(
            &self,
            _ecosystem: Ecosystem,
            name: &str,
            _version: &str,
        ) -> Result<Option<PackageMetadata>> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("registry unavailable");
            }
            Ok(Some(PackageMetadata {
                description: Some(format!("{} description", name)),
                ..PackageMetadata::default()
            }))
        }
    }

    #[tokio::test]
    async fn test_returns_cached_value() {
        let caching_repo = CachingMetadataRepository::new(CountingRepository::new(false));

        let first = caching_repo
            .fetch_metadata(Ecosystem::NuGet, "Serilog", "3.1.1")
            .await
            .unwrap();
        let second = caching_repo
            .fetch_metadata(Ecosystem::NuGet, "Serilog", "3.1.1")
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(caching_repo.inner.calls(), 1);
        assert_eq!(caching_repo.cache_size(), 1);
    }

    #[tokio::test]
    async fn test_name_casing_shares_entry() {
        let caching_repo = CachingMetadataRepository::new(CountingRepository::new(false));

        caching_repo
            .fetch_metadata(Ecosystem::NuGet, "Serilog", "3.1.1")
            .await
            .unwrap();
        caching_repo
            .fetch_metadata(Ecosystem::NuGet, "serilog", "3.1.1")
            .await
            .unwrap();

        assert_eq!(caching_repo.inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_versions_and_ecosystems_cached_separately() {
        let caching_repo = CachingMetadataRepository::new(CountingRepository::new(false));

        caching_repo
            .fetch_metadata(Ecosystem::NuGet, "debug", "1.0.0")
            .await
            .unwrap();
        caching_repo
            .fetch_metadata(Ecosystem::NuGet, "debug", "2.0.0")
            .await
            .unwrap();
        caching_repo
            .fetch_metadata(Ecosystem::Npm, "debug", "1.0.0")
            .await
            .unwrap();

        assert_eq!(caching_repo.inner.calls(), 3);
        assert_eq!(caching_repo.cache_size(), 3);
    }

    #[tokio::test]
    async fn test_errors_not_cached() {
        let caching_repo = CachingMetadataRepository::new(CountingRepository::new(true));

        assert!(caching_repo
            .fetch_metadata(Ecosystem::NuGet, "Serilog", "3.1.1")
            .await
            .is_err());
        assert!(caching_repo
            .fetch_metadata(Ecosystem::NuGet, "Serilog", "3.1.1")
            .await
            .is_err());

        assert_eq!(caching_repo.inner.calls(), 2);
        assert_eq!(caching_repo.cache_size(), 0);
    }
}
