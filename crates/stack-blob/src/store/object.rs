//! [`BlobStore`] over any [`object_store::ObjectStore`] backend.

use std::sync::Arc;

use bytes::Bytes;
use jiff::Timestamp;
use object_store::path::Path;
use object_store::{Attribute, GetOptions, ObjectStore, PutMode, PutOptions, PutPayload};

use super::meta::{BlobMeta, CREATED_AT_ATTRIBUTE, ObjectAttributes};
use super::BlobStore;
use crate::TRACING_TARGET;
use crate::config::BlobStoreConfig;
use crate::error::{Error, Result};
use crate::path::object_path;
use crate::providers::{GcsProvider, Provider};

/// Key looked up by [`ObjectBlobStore::verify_reachable`].
const VERIFY_KEY: &str = "_stack_blob_verify";

/// Cloneable blob store that namespaces every key under a prefix inside a
/// single bucket.
#[derive(Clone)]
pub struct ObjectBlobStore {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl ObjectBlobStore {
    /// Wraps a shared [`ObjectStore`] handle.
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Wraps a concrete [`ObjectStore`] implementation.
    pub fn from_store(store: impl ObjectStore, prefix: impl Into<String>) -> Self {
        Self::new(Arc::new(store), prefix)
    }

    /// Connects to the bucket described by `config`.
    pub fn from_config(config: &BlobStoreConfig) -> Result<Self> {
        config.validate()?;

        let credentials = config.gcs_credentials();
        if credentials.service_account_key.is_none()
            && credentials.endpoint.is_none()
            && !config.suppress_gcloud_creds_warning
        {
            tracing::warn!(
                target: TRACING_TARGET,
                bucket = %config.bucket,
                "No service account key configured, using application default credentials"
            );
        }

        let store = GcsProvider::connect(&credentials)?;

        tracing::info!(
            target: TRACING_TARGET,
            provider = GcsProvider::ID,
            bucket = %config.bucket,
            prefix = %config.prefix,
            endpoint = ?credentials.endpoint,
            "Blob store initialized"
        );

        Ok(Self::new(store, config.prefix.clone()))
    }

    /// Returns the prefix every key is stored under.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the object path `key` maps to.
    ///
    /// The path is the literal object name; characters such as `%` or `#`
    /// are not escaped.
    pub fn path_for(&self, key: &str) -> Result<Path> {
        object_path(&self.prefix, key)
    }

    /// Verifies that the bucket is reachable.
    ///
    /// Issues a HEAD for a reserved key. A not-found response is treated as
    /// success, any other error is propagated.
    #[tracing::instrument(name = "blob.verify", skip(self))]
    pub async fn verify_reachable(&self) -> Result<()> {
        let path = self.path_for(VERIFY_KEY)?;
        match self.store.head(&path).await {
            Ok(_) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(Error::storage(e)),
        }
    }
}

#[async_trait::async_trait]
impl BlobStore for ObjectBlobStore {
    #[tracing::instrument(name = "blob.get", skip(self))]
    async fn get(&self, key: &str) -> Result<Bytes> {
        let path = self.path_for(key)?;
        let data = self.store.get(&path).await?.bytes().await?;

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            size = data.len(),
            "Blob read complete"
        );

        Ok(data)
    }

    #[tracing::instrument(name = "blob.get_meta", skip(self))]
    async fn get_meta(&self, key: &str) -> Result<BlobMeta> {
        let path = self.path_for(key)?;
        let options = GetOptions {
            head: true,
            ..Default::default()
        };
        let result = self.store.get_opts(&path, options).await?;

        let attributes = ObjectAttributes::from_object(&result.meta, &result.attributes);
        Ok(attributes.into_meta(Timestamp::now()))
    }

    #[tracing::instrument(name = "blob.set", skip(self, content), fields(size = content.len()))]
    async fn set(&self, key: &str, content: Bytes) -> Result<()> {
        let path = self.path_for(key)?;

        let mut options = PutOptions {
            mode: PutMode::Overwrite,
            ..Default::default()
        };
        options.attributes.insert(
            Attribute::Metadata(CREATED_AT_ATTRIBUTE.into()),
            Timestamp::now().to_string().into(),
        );

        self.store
            .put_opts(&path, PutPayload::from(content), options)
            .await
            .map_err(Error::storage)?;

        tracing::debug!(target: TRACING_TARGET, path = %path, "Blob write complete");
        Ok(())
    }

    #[tracing::instrument(name = "blob.remove", skip(self))]
    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;

        // Some backends accept deletes of missing objects.
        self.store.head(&path).await?;
        self.store.delete(&path).await?;

        tracing::debug!(target: TRACING_TARGET, path = %path, "Blob deleted");
        Ok(())
    }
}

impl std::fmt::Debug for ObjectBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectBlobStore")
            .field("store", &self.store.to_string())
            .field("prefix", &self.prefix)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use object_store::local::LocalFileSystem;
    use object_store::memory::InMemory;

    use super::*;

    fn test_store() -> (Arc<dyn ObjectStore>, ObjectBlobStore) {
        let backend: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let store = ObjectBlobStore::new(backend.clone(), "media");
        (backend, store)
    }

    #[tokio::test]
    async fn set_and_get() {
        let (_, store) = test_store();
        let data = Bytes::from("hello world");
        store.set("a.txt", data.clone()).await.unwrap();

        let result = store.get("a.txt").await.unwrap();
        assert_eq!(result, data);
    }

    #[tokio::test]
    async fn set_writes_under_prefix() {
        let (backend, store) = test_store();
        store
            .set("2024/01/photo.jpg", Bytes::from("jpg"))
            .await
            .unwrap();

        let meta = backend
            .head(&Path::from("media/2024/01/photo.jpg"))
            .await
            .unwrap();
        assert_eq!(meta.size, 3);
    }

    #[tokio::test]
    async fn absolute_key_addresses_bucket_root() {
        let (backend, store) = test_store();
        store.set("/shared/logo.png", Bytes::from("png")).await.unwrap();

        backend.head(&Path::from("shared/logo.png")).await.unwrap();
        let err = backend
            .head(&Path::from("media/shared/logo.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, object_store::Error::NotFound { .. }));
        assert_eq!(store.get("/shared/logo.png").await.unwrap(), Bytes::from("png"));
    }

    #[tokio::test]
    async fn keys_keep_literal_object_names() {
        let (backend, store) = test_store();
        for key in ["100%.jpg", "a[1].jpg", "x#y.jpg"] {
            store.set(key, Bytes::from(key)).await.unwrap();

            let name = format!("media/{key}");
            let meta = backend.head(&Path::parse(&name).unwrap()).await.unwrap();
            assert_eq!(meta.location.as_ref(), name);
            assert_eq!(store.get(key).await.unwrap(), Bytes::from(key));
        }
    }

    #[tokio::test]
    async fn set_reports_backend_failures_as_storage() {
        // A filesystem store rooted at a regular file cannot hold objects.
        let root = tempfile::NamedTempFile::new().unwrap();
        let backend = LocalFileSystem::new_with_prefix(root.path()).unwrap();
        let store = ObjectBlobStore::from_store(backend, "media");

        let err = store.set("a.txt", Bytes::from("x")).await.unwrap_err();
        assert!(matches!(err, Error::Storage { .. }));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn set_overwrites() {
        let (_, store) = test_store();
        store.set("a.txt", Bytes::from("first")).await.unwrap();
        store.set("a.txt", Bytes::from("second")).await.unwrap();

        assert_eq!(store.get("a.txt").await.unwrap(), Bytes::from("second"));
    }

    #[tokio::test]
    async fn get_not_found() {
        let (_, store) = test_store();
        let err = store.get("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn get_meta_reports_size_and_times() {
        let (backend, store) = test_store();
        let before = Timestamp::now();
        store.set("meta.bin", Bytes::from("abcd")).await.unwrap();
        let after = Timestamp::now();

        let meta = store.get_meta("meta.bin").await.unwrap();
        assert_eq!(meta.size, 4);
        assert!(meta.ctime >= before && meta.ctime <= after);
        assert_eq!(meta.atime, meta.mtime);

        let head = backend.head(&Path::from("media/meta.bin")).await.unwrap();
        let modified = Timestamp::new(
            head.last_modified.timestamp(),
            head.last_modified.timestamp_subsec_nanos() as i32,
        )
        .unwrap();
        assert_eq!(meta.mtime, modified);
    }

    #[tokio::test]
    async fn get_meta_without_creation_stamp() {
        let (backend, store) = test_store();
        backend
            .put(&Path::from("media/foreign.bin"), PutPayload::from("xy"))
            .await
            .unwrap();

        let before = Timestamp::now();
        let meta = store.get_meta("foreign.bin").await.unwrap();
        let after = Timestamp::now();

        assert_eq!(meta.size, 2);
        assert!(meta.ctime >= before && meta.ctime <= after);
    }

    #[tokio::test]
    async fn get_meta_not_found() {
        let (_, store) = test_store();
        let err = store.get_meta("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn remove() {
        let (_, store) = test_store();
        store.set("del.bin", Bytes::from("x")).await.unwrap();
        store.remove("del.bin").await.unwrap();

        assert!(store.get("del.bin").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn remove_not_found() {
        let (_, store) = test_store();
        let err = store.remove("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn empty_key_is_rejected() {
        let (_, store) = test_store();
        let err = store.set("/", Bytes::from("x")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[tokio::test]
    async fn prefixes_are_isolated() {
        let backend: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let left = ObjectBlobStore::new(backend.clone(), "left");
        let right = ObjectBlobStore::new(backend, "right/");

        left.set("k", Bytes::from("l")).await.unwrap();
        assert!(right.get("k").await.unwrap_err().is_not_found());
        assert_eq!(left.path_for("k").unwrap(), Path::from("left/k"));
        assert_eq!(right.path_for("k").unwrap(), Path::from("right/k"));
    }

    #[tokio::test]
    async fn verify_reachable() {
        let (_, store) = test_store();
        store.verify_reachable().await.unwrap();
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let (_, store) = test_store();
        let store: Box<dyn BlobStore> = Box::new(store);
        store.set("dyn.bin", Bytes::from("dyn")).await.unwrap();
        assert_eq!(store.get("dyn.bin").await.unwrap(), Bytes::from("dyn"));
    }
}
