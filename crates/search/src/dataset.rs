//! Dataset loading, flattening and session caching.
//!
//! The dataset is a JSON object of named groups (`countries`, `temples`,
//! `beaches`, ...), each an array of destination records. It is fetched at
//! most once per session; a failed fetch is not cached, so the next search
//! tries again.

use crate::error::{Result, SearchError};
use crate::record::DestinationRecord;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use wayfarer_core::config::DatasetConfig;

/// Number of records contributed by one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Group name as it appears in the document
    pub name: String,
    /// Records flattened from it
    pub records: usize,
}

/// The flattened record collection.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Arc<DestinationRecord>>,
    groups: Vec<GroupSummary>,
}

impl Dataset {
    /// Parse a dataset document and flatten the listed groups, in order.
    ///
    /// Groups absent from the document are skipped. A group that is not an
    /// array, or any record that fails to parse, fails the whole load.
    pub fn from_json(document: &str, groups: &[String]) -> Result<Self> {
        let root: serde_json::Map<String, serde_json::Value> = serde_json::from_str(document)
            .map_err(|e| SearchError::dataset(format!("invalid dataset document: {e}")))?;

        let mut dataset = Dataset::default();
        for group in groups {
            let Some(value) = root.get(group) else {
                debug!(group = %group, "dataset group missing, skipping");
                continue;
            };

            let items = value
                .as_array()
                .ok_or_else(|| SearchError::dataset(format!("group `{group}` is not a list")))?;

            for (index, item) in items.iter().enumerate() {
                let record = DestinationRecord::deserialize(item).map_err(|e| {
                    SearchError::dataset(format!("record {index} of group `{group}`: {e}"))
                })?;
                dataset.records.push(Arc::new(record));
            }

            dataset.groups.push(GroupSummary {
                name: group.clone(),
                records: items.len(),
            });
        }

        Ok(dataset)
    }

    /// Build a dataset from records already in memory.
    pub fn from_records(records: impl IntoIterator<Item = DestinationRecord>) -> Self {
        let records: Vec<Arc<DestinationRecord>> = records.into_iter().map(Arc::new).collect();
        let groups = vec![GroupSummary {
            name: "inline".to_string(),
            records: records.len(),
        }];
        Self { records, groups }
    }

    /// All records, group by group.
    pub fn records(&self) -> &[Arc<DestinationRecord>] {
        &self.records
    }

    /// Per-group record counts.
    pub fn groups(&self) -> &[GroupSummary] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Where the dataset document comes from.
pub trait DatasetSource: Send + Sync {
    /// Retrieve the raw document.
    fn fetch(&self) -> impl Future<Output = Result<String>> + Send;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

/// Dataset stored on the local filesystem.
#[cfg(feature = "file")]
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

#[cfg(feature = "file")]
impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(feature = "file")]
impl DatasetSource for FileSource {
    async fn fetch(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SearchError::dataset(format!("{}: {e}", self.path.display())))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Dataset served over HTTP(S).
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

#[cfg(feature = "http")]
impl HttpSource {
    /// Create a source with a request timeout.
    pub fn new(url: impl Into<String>, timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::dataset(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { client, url: url.into() })
    }
}

#[cfg(feature = "http")]
impl DatasetSource for HttpSource {
    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| SearchError::dataset(format!("{}: {e}", self.url)))?;

        response
            .text()
            .await
            .map_err(|e| SearchError::dataset(format!("{}: {e}", self.url)))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Dataset document held in memory.
#[derive(Debug, Clone)]
pub struct StaticSource {
    document: Arc<str>,
}

impl StaticSource {
    pub fn new(document: impl Into<Arc<str>>) -> Self {
        Self { document: document.into() }
    }
}

impl DatasetSource for StaticSource {
    async fn fetch(&self) -> Result<String> {
        Ok(self.document.to_string())
    }

    fn describe(&self) -> String {
        format!("<inline, {} bytes>", self.document.len())
    }
}

/// Parsed dataset location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLocation {
    /// Local path
    File(PathBuf),
    /// `http://` or `https://` URL
    Url(String),
}

impl DatasetLocation {
    /// Classify a configured location string.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DatasetLocation::Url(location.to_string())
        } else {
            DatasetLocation::File(PathBuf::from(location))
        }
    }
}

/// Any of the built-in sources, chosen from configuration.
#[derive(Debug, Clone)]
pub enum AnySource {
    #[cfg(feature = "file")]
    File(FileSource),
    #[cfg(feature = "http")]
    Http(HttpSource),
    Static(StaticSource),
}

impl AnySource {
    /// Pick a source for the `[dataset]` section.
    pub fn from_config(config: &DatasetConfig) -> Result<Self> {
        match DatasetLocation::parse(&config.location) {
            #[cfg(feature = "file")]
            DatasetLocation::File(path) => Ok(AnySource::File(FileSource::new(path))),
            #[cfg(not(feature = "file"))]
            DatasetLocation::File(path) => Err(SearchError::dataset(format!(
                "{}: built without the `file` feature",
                path.display()
            ))),
            #[cfg(feature = "http")]
            DatasetLocation::Url(url) => Ok(AnySource::Http(HttpSource::new(
                url,
                std::time::Duration::from_secs(config.timeout_secs),
            )?)),
            #[cfg(not(feature = "http"))]
            DatasetLocation::Url(url) => Err(SearchError::dataset(format!(
                "{url}: built without the `http` feature"
            ))),
        }
    }
}

impl DatasetSource for AnySource {
    async fn fetch(&self) -> Result<String> {
        match self {
            #[cfg(feature = "file")]
            AnySource::File(source) => source.fetch().await,
            #[cfg(feature = "http")]
            AnySource::Http(source) => source.fetch().await,
            AnySource::Static(source) => source.fetch().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            #[cfg(feature = "file")]
            AnySource::File(source) => source.describe(),
            #[cfg(feature = "http")]
            AnySource::Http(source) => source.describe(),
            AnySource::Static(source) => source.describe(),
        }
    }
}

/// Lazily loads and caches the dataset for the session.
#[derive(Debug)]
pub struct DatasetAccess<S> {
    source: S,
    groups: Vec<String>,
    cache: OnceCell<Arc<Dataset>>,
}

impl<S: DatasetSource> DatasetAccess<S> {
    pub fn new(source: S, groups: Vec<String>) -> Self {
        Self {
            source,
            groups,
            cache: OnceCell::new(),
        }
    }

    /// Load every configured group as one collection.
    ///
    /// Fetches on first use, then serves the cached collection. Concurrent
    /// callers share a single fetch.
    pub async fn load_all(&self) -> Result<Arc<Dataset>> {
        let dataset = self
            .cache
            .get_or_try_init(|| async {
                debug!(source = %self.source.describe(), "fetching dataset");
                let document = self.source.fetch().await?;
                let dataset = Dataset::from_json(&document, &self.groups)?;
                info!(
                    records = dataset.len(),
                    groups = dataset.groups().len(),
                    "dataset loaded"
                );
                Ok::<_, SearchError>(Arc::new(dataset))
            })
            .await?;

        Ok(Arc::clone(dataset))
    }

    /// True once a load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.cache.initialized()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DOCUMENT: &str = r#"{
        "countries": [
            {"id": 1, "name": "Japan", "description": "islands", "categories": ["culture"]},
            {"id": 2, "name": "Brazil"}
        ],
        "temples": [
            {"id": 1, "name": "Angkor Wat", "imageUrl": "angkor.jpg"}
        ],
        "beaches": [],
        "meta": {"version": 3}
    }"#;

    fn default_groups() -> Vec<String> {
        DatasetConfig::default().groups
    }

    struct CountingSource {
        document: Option<&'static str>,
        fetches: AtomicUsize,
    }

    impl CountingSource {
        fn ok(document: &'static str) -> Self {
            Self { document: Some(document), fetches: AtomicUsize::new(0) }
        }

        fn failing() -> Self {
            Self { document: None, fetches: AtomicUsize::new(0) }
        }
    }

    impl DatasetSource for CountingSource {
        async fn fetch(&self) -> Result<String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.document
                .map(str::to_string)
                .ok_or_else(|| SearchError::dataset("connection refused"))
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    #[test]
    fn test_flattens_configured_groups() {
        let dataset = Dataset::from_json(DOCUMENT, &default_groups()).unwrap();
        let names: Vec<&str> = dataset.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Japan", "Brazil", "Angkor Wat"]);
        assert_eq!(dataset.groups().len(), 3);
        assert_eq!(dataset.groups()[1], GroupSummary { name: "temples".into(), records: 1 });
    }

    #[test]
    fn test_missing_group_is_skipped() {
        let groups = vec!["temples".to_string(), "volcanoes".to_string()];
        let dataset = Dataset::from_json(DOCUMENT, &groups).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_group_that_is_not_a_list_fails() {
        let groups = vec!["meta".to_string()];
        let err = Dataset::from_json(DOCUMENT, &groups).unwrap_err();
        assert!(matches!(err, SearchError::DatasetUnavailable(_)));
    }

    #[test]
    fn test_record_without_name_fails_whole_load() {
        let document = r#"{"countries": [{"name": "Chile"}, {"description": "nameless"}]}"#;
        let err = Dataset::from_json(document, &default_groups()).unwrap_err();
        assert!(err.to_string().contains("record 1 of group `countries`"));
    }

    #[test]
    fn test_unparseable_document_fails() {
        assert!(Dataset::from_json("<html>404</html>", &default_groups()).is_err());
        assert!(Dataset::from_json("[1, 2]", &default_groups()).is_err());
    }

    #[test]
    fn test_location_parse() {
        assert_eq!(
            DatasetLocation::parse("HTTPS://cdn.example.com/db.json"),
            DatasetLocation::Url("HTTPS://cdn.example.com/db.json".to_string())
        );
        assert_eq!(
            DatasetLocation::parse(" ./database.json "),
            DatasetLocation::File(PathBuf::from("./database.json"))
        );
    }

    #[tokio::test]
    async fn test_load_all_fetches_once() {
        let access = DatasetAccess::new(CountingSource::ok(DOCUMENT), default_groups());

        let first = access.load_all().await.unwrap();
        let second = access.load_all().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(access.source().fetches.load(Ordering::SeqCst), 1);
        assert!(access.is_loaded());
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let access = DatasetAccess::new(CountingSource::failing(), default_groups());

        assert!(access.load_all().await.is_err());
        assert!(access.load_all().await.is_err());

        assert_eq!(access.source().fetches.load(Ordering::SeqCst), 2);
        assert!(!access.is_loaded());
    }

    #[cfg(feature = "file")]
    #[tokio::test]
    async fn test_file_source_reads_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        std::fs::write(&path, DOCUMENT).unwrap();

        let access = DatasetAccess::new(FileSource::new(&path), default_groups());
        assert_eq!(access.load_all().await.unwrap().len(), 3);
    }

    #[cfg(feature = "file")]
    #[tokio::test]
    async fn test_file_source_missing_file() {
        let access = DatasetAccess::new(FileSource::new("/no/such/database.json"), default_groups());
        let err = access.load_all().await.unwrap_err();
        assert!(matches!(err, SearchError::DatasetUnavailable(_)));
    }

    #[cfg(feature = "file")]
    #[tokio::test]
    async fn test_any_source_from_config_file() {
        let config = DatasetConfig { location: "/no/such/file.json".to_string(), ..DatasetConfig::default() };
        let source = AnySource::from_config(&config).unwrap();
        assert!(matches!(source, AnySource::File(_)));
        assert!(source.fetch().await.is_err());
    }

    #[cfg(not(feature = "file"))]
    #[test]
    fn test_file_location_needs_file_feature() {
        let config = DatasetConfig { location: "database.json".to_string(), ..DatasetConfig::default() };
        let err = AnySource::from_config(&config).unwrap_err();
        assert!(matches!(err, SearchError::DatasetUnavailable(_)));
    }
}
