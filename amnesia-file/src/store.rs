//! Filesystem storage implementation for document stores.
//!
//! Every collection is a directory under the configured base directory and
//! every document is one pretty-printed JSON file inside it:
//!
//! ```text
//! <base_dir>/<collection>/<id>.json
//! ```
//!
//! There is no manifest or index; the directory listing is the only source of
//! truth. Each write is durable once the call returns.

use std::{
    ffi::OsStr,
    fs::{self, DirBuilder},
    io,
    path::{Path, PathBuf},
};

use log::{debug, trace, warn};

use amnesia_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::{self, Document},
    error::{DocumentStoreError, DocumentStoreResult},
    filter::Filter,
    id::IdGenerator,
};

/// Extension of document files. Files with any other extension are ignored.
pub const DOCUMENT_EXTENSION: &str = "json";

/// Extension appended to a document file while it is being written.
const PENDING_EXTENSION: &str = "json.tmp";

/// Filesystem document storage backend.
///
/// Collection directories are created lazily on the first write and are never
/// removed, even when every document in them is deleted. A single document
/// write goes to a temporary file that is then renamed over the target, so a
/// reader never observes a half-written document. No guarantee is made across
/// documents.
///
/// The backend assumes it is the only writer of its base directory.
///
/// # Example
///
/// ```ignore
/// use amnesia_file::FileStore;
/// use amnesia_core::{backend::StoreBackend, document::into_document};
/// use serde_json::json;
///
/// let store = FileStore::new("/var/lib/myapp/data");
/// let id = store.write("people", into_document(json!({ "name": "Jane" }))?)?;
/// // -> /var/lib/myapp/data/people/<id>.json
/// # Ok::<(), amnesia_core::error::DocumentStoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
    ids: IdGenerator,
}

impl FileStore {
    /// Creates a store rooted at `base_dir`.
    ///
    /// The directory does not need to exist yet; it is created with the first
    /// collection.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into(), ids: IdGenerator::default() }
    }

    /// Creates a builder for a store rooted at `base_dir`.
    pub fn builder(base_dir: impl Into<PathBuf>) -> FileStoreBuilder {
        FileStoreBuilder::new(base_dir)
    }

    /// Returns the base directory of this store.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the directory backing a collection.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidCollectionName`] if the name is not
    /// a single plain path component.
    pub fn collection_dir(&self, collection: &str) -> DocumentStoreResult<PathBuf> {
        if !is_plain_component(collection) {
            return Err(DocumentStoreError::InvalidCollectionName(collection.to_string()));
        }

        Ok(self.base_dir.join(collection))
    }

    fn document_path(dir: &Path, id: &str) -> DocumentStoreResult<PathBuf> {
        if !is_plain_component(id) {
            return Err(DocumentStoreError::InvalidDocument(format!(
                "`id` {id:?} cannot be used as a file name"
            )));
        }

        Ok(dir.join(format!("{id}.{DOCUMENT_EXTENSION}")))
    }

    fn ensure_collection_dir(&self, collection: &str, dir: &Path) -> DocumentStoreResult<()> {
        let mut builder = DirBuilder::new();
        builder.recursive(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }

        builder
            .create(dir)
            .map_err(|source| io_error("create directory", collection, dir, source))
    }

    fn write_document(
        &self,
        collection: &str,
        path: &Path,
        document: &Document,
    ) -> DocumentStoreResult<()> {
        let data = serde_json::to_vec_pretty(document)?;
        let pending = path.with_extension(PENDING_EXTENSION);

        if let Err(source) = fs::write(&pending, data) {
            let _ = fs::remove_file(&pending);
            return Err(io_error("write", collection, &pending, source));
        }

        if let Err(source) = fs::rename(&pending, path) {
            let _ = fs::remove_file(&pending);
            return Err(io_error("replace", collection, path, source));
        }

        Ok(())
    }

    fn read_document(collection: &str, path: &Path) -> DocumentStoreResult<Document> {
        let data = fs::read(path)
            .map_err(|source| io_error("read", collection, path, source))?;

        serde_json::from_slice(&data).map_err(|source| DocumentStoreError::Corrupt {
            collection: collection.to_string(),
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads every document file of a collection together with its path.
    fn scan(&self, collection: &str) -> DocumentStoreResult<Vec<(PathBuf, Document)>> {
        let dir = self.collection_dir(collection)?;

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(source) => return Err(io_error("list", collection, &dir, source)),
        };

        let mut documents = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|source| io_error("list", collection, &dir, source))?;
            let path = entry.path();

            if path.extension() != Some(OsStr::new(DOCUMENT_EXTENSION)) {
                trace!("skipping {} in collection {collection}", path.display());
                continue;
            }

            if path.is_dir() {
                warn!("skipping directory {} in collection {collection}", path.display());
                continue;
            }

            let document = Self::read_document(collection, &path)?;
            documents.push((path, document));
        }

        Ok(documents)
    }
}

impl StoreBackend for FileStore {
    fn write(&self, collection: &str, mut document: Document) -> DocumentStoreResult<String> {
        let dir = self.collection_dir(collection)?;
        let id = document::ensure_id(&mut document, &self.ids)?;
        let path = Self::document_path(&dir, &id)?;

        self.ensure_collection_dir(collection, &dir)?;
        self.write_document(collection, &path, &document)?;

        debug!("wrote document {id} to {}", path.display());

        Ok(id)
    }

    fn read(&self, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        let documents = self
            .scan(collection)?
            .into_iter()
            .map(|(_, doc)| doc)
            .collect::<Vec<_>>();

        trace!("read {} document(s) from collection {collection}", documents.len());

        Ok(documents)
    }

    fn update(&self, collection: &str, document: Document) -> DocumentStoreResult<()> {
        let dir = self.collection_dir(collection)?;
        let id = document::document_id(&document)?;
        let path = Self::document_path(&dir, id)?;

        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(not_found(id, collection)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(not_found(id, collection));
            }
            Err(source) => return Err(io_error("inspect", collection, &path, source)),
        }

        self.write_document(collection, &path, &document)?;

        debug!("updated document {id} at {}", path.display());

        Ok(())
    }

    fn delete(&self, collection: &str, filter: &Filter) -> DocumentStoreResult<()> {
        let mut removed = 0usize;

        for (path, doc) in self.scan(collection)? {
            if !filter.matches(&doc) {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    warn!("{} was already removed", path.display());
                }
                Err(source) => return Err(io_error("remove", collection, &path, source)),
            }
        }

        debug!("deleted {removed} document(s) from collection {collection}");

        Ok(())
    }
}

/// Builder for constructing [`FileStore`] instances.
///
/// # Example
///
/// ```ignore
/// use amnesia_file::FileStore;
/// use amnesia_core::backend::StoreBackendBuilder;
///
/// let store = FileStore::builder("./data").build()?;
/// # Ok::<(), amnesia_core::error::DocumentStoreError>(())
/// ```
#[derive(Debug)]
pub struct FileStoreBuilder {
    base_dir: PathBuf,
    ids: Option<IdGenerator>,
}

impl FileStoreBuilder {
    /// Creates a builder for a store rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into(), ids: None }
    }

    /// Sets the generator used for documents written without an `id`.
    pub fn id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = Some(ids);
        self
    }
}

impl StoreBackendBuilder for FileStoreBuilder {
    type Backend = FileStore;

    /// Builds the store.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Config`] if the base directory is empty or
    /// names an existing file that is not a directory.
    fn build(self) -> DocumentStoreResult<Self::Backend> {
        if self.base_dir.as_os_str().is_empty() {
            return Err(DocumentStoreError::Config("base directory must not be empty".to_string()));
        }

        if self.base_dir.exists() && !self.base_dir.is_dir() {
            return Err(DocumentStoreError::Config(format!(
                "base directory {} is not a directory",
                self.base_dir.display()
            )));
        }

        Ok(FileStore {
            base_dir: self.base_dir,
            ids: self.ids.unwrap_or_default(),
        })
    }
}

/// A name usable as exactly one path component on every platform.
fn is_plain_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|c| matches!(c, '/' | '\\' | '\0'))
}

fn io_error(
    operation: &'static str,
    collection: &str,
    path: &Path,
    source: io::Error,
) -> DocumentStoreError {
    DocumentStoreError::Io {
        operation,
        collection: collection.to_string(),
        path: path.to_path_buf(),
        source,
    }
}

fn not_found(id: &str, collection: &str) -> DocumentStoreError {
    DocumentStoreError::DocumentNotFound {
        id: id.to_string(),
        collection: collection.to_string(),
    }
}
