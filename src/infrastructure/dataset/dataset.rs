use std::fmt;
use std::sync::Arc;

use polars::prelude::DataFrame;
use tracing::{debug, info};

use super::codec::write_parquet;
use super::loader::DatasetLoader;
use super::serializer::serialize_table;
use crate::domain::dataset::{
    BundleFile, DATA_FILE_NAME, DatasetPath, DatasetRegistry, PushReceipt, PushRequest,
    SCHEMA_FILE_NAME, SemanticLayerSchema, Source, column_hash,
};
use crate::domain::{AgentResponse, DomainError, FileManager, LlmProvider, QueryTable, Sandbox};
use crate::infrastructure::agent::{Agent, AgentConfig, AgentTable};
use crate::infrastructure::registry::read_archive;

/// Dialect announced for data read from local files
const LOCAL_DIALECT: &str = "duckdb";

/// Dialect announced when the schema has no source
const DEFAULT_DIALECT: &str = "postgres";

/// A frame together with its schema document, local path and chat agent
#[derive(Debug)]
pub struct Dataset {
    frame: DataFrame,
    schema: SemanticLayerSchema,
    path: Option<DatasetPath>,
    table_name: Option<String>,
    column_hash: String,
    agent: Option<Agent>,
    agent_config: AgentConfig,
}

impl Dataset {
    /// Wrap a frame with an inferred schema
    pub fn new(frame: DataFrame) -> Self {
        let schema = SemanticLayerSchema::infer(&frame, None);
        let column_hash = column_hash(&frame);

        Self {
            frame,
            schema,
            path: None,
            table_name: None,
            column_hash,
            agent: None,
            agent_config: AgentConfig::default(),
        }
    }

    /// Name the table queries refer to. Kept when the dataset is saved.
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.schema.name = name.clone();
        self.table_name = Some(name);
        self.agent = None;
        self
    }

    pub fn with_schema(mut self, schema: SemanticLayerSchema) -> Self {
        self.schema = schema;
        self.agent = None;
        self
    }

    /// Assign the `organization/dataset` path used by push and pull
    pub fn with_path(mut self, path: &str) -> Result<Self, DomainError> {
        self.path = Some(DatasetPath::parse(path)?);
        Ok(self)
    }

    pub(super) fn with_dataset_path(mut self, path: DatasetPath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_agent_config(mut self, config: AgentConfig) -> Self {
        self.agent_config = config;
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.schema.description = Some(description.into());
        self.agent = None;
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn schema(&self) -> &SemanticLayerSchema {
        &self.schema
    }

    pub fn path(&self) -> Option<&DatasetPath> {
        self.path.as_ref()
    }

    pub fn column_hash(&self) -> &str {
        &self.column_hash
    }

    pub fn rows_count(&self) -> usize {
        self.frame.height()
    }

    pub fn columns_count(&self) -> usize {
        self.frame.width()
    }

    pub fn head(&self, rows: usize) -> DataFrame {
        self.frame.head(Some(rows))
    }

    /// SQL dialect the prompt announces for this dataset
    pub fn dialect(&self) -> &str {
        match &self.schema.source {
            Some(source) if source.is_local() => LOCAL_DIALECT,
            Some(source) => &source.source_type,
            None => DEFAULT_DIALECT,
        }
    }

    /// Render the dataset for inclusion in a prompt
    pub fn serialize(&self) -> Result<String, DomainError> {
        serialize_table(&self.schema, &self.frame, self.dialect())
    }

    /// The frame registered under the schema name
    pub fn query_table(&self) -> QueryTable {
        QueryTable::new(self.schema.name.clone(), self.frame.clone())
    }

    /// Write the schema document and the data into a new local dataset directory
    pub async fn save(
        &mut self,
        path: &str,
        file_manager: &dyn FileManager,
    ) -> Result<(), DomainError> {
        let path = DatasetPath::parse(path)?;
        let dir = path.to_path_buf();
        let schema_path = dir.join(SCHEMA_FILE_NAME);

        if file_manager.exists(&schema_path).await {
            return Err(DomainError::dataset_already_exists(path.to_string()));
        }

        let mut schema = self.schema.clone();
        schema.name = match &self.table_name {
            Some(name) => name.clone(),
            None => path.dataset().replace('-', "_"),
        };
        schema.source = Some(Source::parquet(DATA_FILE_NAME));
        schema.validate()?;

        file_manager.mkdir(&dir).await?;
        file_manager.write(&schema_path, &schema.to_yaml()?).await?;
        file_manager
            .write_binary(&dir.join(DATA_FILE_NAME), &write_parquet(&self.frame)?)
            .await?;

        info!(path = %path, name = %schema.name, "Dataset saved");

        self.schema = schema;
        self.path = Some(path);
        self.agent = None;
        Ok(())
    }

    /// Start a new conversation about this dataset.
    ///
    /// The agent is created on first use with `llm` and `sandbox` and reused afterwards.
    pub async fn chat(
        &mut self,
        prompt: &str,
        llm: Arc<dyn LlmProvider>,
        sandbox: Option<Arc<dyn Sandbox>>,
    ) -> Result<AgentResponse, DomainError> {
        if self.agent.is_none() {
            let table = AgentTable::new(self.query_table(), self.serialize()?);
            self.agent = Some(Agent::new(
                vec![table],
                llm,
                sandbox,
                self.agent_config.clone(),
            ));
        }

        match &mut self.agent {
            Some(agent) => agent.chat(prompt).await,
            None => Err(DomainError::NoConversation),
        }
    }

    /// Continue the conversation started by [`Dataset::chat`]
    pub async fn follow_up(&mut self, query: &str) -> Result<AgentResponse, DomainError> {
        match &mut self.agent {
            Some(agent) => agent.follow_up(query).await,
            None => Err(DomainError::NoConversation),
        }
    }

    /// Upload the saved dataset directory to the registry
    pub async fn push(
        &self,
        registry: &dyn DatasetRegistry,
        file_manager: &dyn FileManager,
    ) -> Result<PushReceipt, DomainError> {
        let path = self.path.as_ref().ok_or(DomainError::MissingLocalPath)?;
        self.schema.validate()?;
        registry.ensure_credentials()?;

        let dir = path.to_path_buf();
        let mut files = vec![BundleFile::new(
            SCHEMA_FILE_NAME,
            file_manager.load_binary(&dir.join(SCHEMA_FILE_NAME)).await?,
            "application/x-yaml",
        )];

        let data_path = dir.join(DATA_FILE_NAME);
        if file_manager.exists(&data_path).await {
            files.push(BundleFile::new(
                DATA_FILE_NAME,
                file_manager.load_binary(&data_path).await?,
                "application/octet-stream",
            ));
        }

        let receipt = registry
            .push(PushRequest {
                path: path.clone(),
                name: self.schema.name.clone(),
                description: self.schema.description.clone(),
                files,
            })
            .await?;

        info!(path = %path, url = %receipt.url, "Dataset pushed");
        Ok(receipt)
    }

    /// Replace the local copy with the registry's version and reload it
    pub async fn pull(
        &mut self,
        registry: &dyn DatasetRegistry,
        file_manager: &dyn FileManager,
    ) -> Result<(), DomainError> {
        registry.ensure_credentials()?;
        let path = self.path.clone().ok_or(DomainError::MissingLocalPath)?;

        let pulled = pull_dataset(&path, registry, file_manager).await?;

        self.column_hash = pulled.column_hash;
        self.frame = pulled.frame;
        self.schema = pulled.schema;
        self.table_name = None;
        self.agent = None;
        Ok(())
    }
}

/// Download `path` from the registry into the local dataset directory and load it
pub async fn pull_dataset(
    path: &DatasetPath,
    registry: &dyn DatasetRegistry,
    file_manager: &dyn FileManager,
) -> Result<Dataset, DomainError> {
    registry.ensure_credentials()?;

    let archive = registry.pull(path).await?;
    let entries = read_archive(&archive)?;
    let dir = path.to_path_buf();

    for entry in entries {
        let target = dir.join(&entry.path);

        if let Some(parent) = target.parent() {
            file_manager.mkdir(parent).await?;
        }

        if file_manager.exists(&target).await {
            info!(file = %target.display(), "Replacing existing file");
        } else {
            debug!(file = %target.display(), "Writing pulled file");
        }

        file_manager.write_binary(&target, &entry.content).await?;
    }

    info!(path = %path, "Dataset pulled");

    DatasetLoader::from_path(path, file_manager)
        .await?
        .load()
        .await
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset: {}", self.schema.name)?;
        if let Some(description) = &self.schema.description {
            writeln!(f, "Description: {}", description)?;
        }
        write!(f, "{}", self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::mock::MockDatasetRegistry;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::ColumnType;
    use crate::infrastructure::registry::build_archive;
    use crate::infrastructure::storage::InMemoryFileManager;
    use polars::prelude::*;
    use std::path::Path;

    fn sales() -> DataFrame {
        df!(
            "country" => ["Spain", "France", "Italy"],
            "revenue" => [5000.0, 3200.5, 4100.0],
            "units" => [50i64, 32, 41]
        )
        .unwrap()
    }

    #[test]
    fn test_new_infers_schema() {
        let dataset = Dataset::new(sales());

        assert_eq!(dataset.rows_count(), 3);
        assert_eq!(dataset.columns_count(), 3);
        assert_eq!(dataset.schema().name, format!("table_{}", dataset.column_hash()));

        let types: Vec<_> = dataset.schema().columns.iter().map(|c| c.column_type).collect();
        assert_eq!(
            types,
            vec![
                Some(ColumnType::String),
                Some(ColumnType::Float),
                Some(ColumnType::Integer)
            ]
        );
    }

    #[test]
    fn test_dialect_follows_source() {
        let dataset = Dataset::new(sales());
        assert_eq!(dataset.dialect(), "duckdb");

        let mut schema = dataset.schema().clone();
        schema.source = Some(Source {
            source_type: "mysql".to_string(),
            path: None,
        });
        let dataset = dataset.with_schema(schema.clone());
        assert_eq!(dataset.dialect(), "mysql");

        schema.source = None;
        let dataset = dataset.with_schema(schema);
        assert_eq!(dataset.dialect(), "postgres");
    }

    #[test]
    fn test_with_path_validates() {
        assert!(Dataset::new(sales()).with_path("acme/sales").is_ok());
        assert!(matches!(
            Dataset::new(sales()).with_path("Acme/Sales Data"),
            Err(DomainError::InvalidDatasetPath { .. })
        ));
    }

    #[test]
    fn test_display() {
        let mut dataset = Dataset::new(sales()).with_table_name("sales");
        dataset.set_description("Revenue by country");

        let text = dataset.to_string();
        assert!(text.starts_with("Dataset: sales\nDescription: Revenue by country\n"));
        assert!(text.contains("Spain"));
    }

    #[tokio::test]
    async fn test_save_writes_schema_and_data() {
        let fm = InMemoryFileManager::new();
        let mut dataset = Dataset::new(sales());

        dataset.save("acme/sales-data", &fm).await.unwrap();

        assert_eq!(dataset.schema().name, "sales_data");
        assert_eq!(dataset.path().unwrap().to_string(), "acme/sales-data");

        let yaml = fm.load(Path::new("acme/sales-data/schema.yaml")).await.unwrap();
        let schema = SemanticLayerSchema::from_yaml(&yaml).unwrap();
        assert_eq!(&schema, dataset.schema());
        assert!(fm.exists(Path::new("acme/sales-data/data.parquet")).await);
    }

    #[tokio::test]
    async fn test_save_refuses_existing_dataset() {
        let fm = InMemoryFileManager::new();
        Dataset::new(sales()).save("acme/sales", &fm).await.unwrap();

        let result = Dataset::new(sales()).save("acme/sales", &fm).await;
        assert!(matches!(result, Err(DomainError::DatasetAlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_push_requires_saved_path() {
        let fm = InMemoryFileManager::new();
        let registry = MockDatasetRegistry::new();

        let result = Dataset::new(sales()).push(&registry, &fm).await;

        assert!(matches!(result, Err(DomainError::MissingLocalPath)));
        assert_eq!(registry.calls(), 0);
    }

    #[tokio::test]
    async fn test_push_sends_bundle() {
        let fm = InMemoryFileManager::new();
        let registry = MockDatasetRegistry::new();
        let mut dataset = Dataset::new(sales());
        dataset.set_description("Quarterly sales");
        dataset.save("acme/sales", &fm).await.unwrap();

        let receipt = dataset.push(&registry, &fm).await.unwrap();

        assert_eq!(receipt.path.to_string(), "acme/sales");
        let pushed = registry.pushed();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].name, "sales");
        assert_eq!(pushed[0].description.as_deref(), Some("Quarterly sales"));
        let names: Vec<_> = pushed[0].files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["schema.yaml", "data.parquet"]);
    }

    #[tokio::test]
    async fn test_pull_requires_credentials() {
        let fm = InMemoryFileManager::new();
        let registry = MockDatasetRegistry::new().without_credentials();
        let mut dataset = Dataset::new(sales()).with_path("acme/sales").unwrap();

        let result = dataset.pull(&registry, &fm).await;

        assert!(matches!(result, Err(DomainError::MissingRegistryApiKey)));
        assert_eq!(registry.calls(), 0);
    }

    #[tokio::test]
    async fn test_pull_missing_dataset_writes_nothing() {
        let fm = InMemoryFileManager::new();
        let registry = MockDatasetRegistry::new();
        let mut dataset = Dataset::new(sales()).with_path("acme/sales").unwrap();

        let result = dataset.pull(&registry, &fm).await;

        assert!(matches!(result, Err(DomainError::DatasetNotFound { .. })));
        assert!(fm.file_paths().is_empty());
    }

    #[tokio::test]
    async fn test_push_then_pull_round_trip() {
        let source_fm = InMemoryFileManager::new();
        let uploads = MockDatasetRegistry::new();
        let mut dataset = Dataset::new(sales());
        dataset.save("acme/sales", &source_fm).await.unwrap();
        dataset.push(&uploads, &source_fm).await.unwrap();

        let archive = build_archive(&uploads.pushed()[0].files).unwrap();
        let downloads = MockDatasetRegistry::new().with_archive("acme/sales", archive);
        let target_fm = InMemoryFileManager::new();
        let path = DatasetPath::parse("acme/sales").unwrap();

        let pulled = pull_dataset(&path, &downloads, &target_fm).await.unwrap();

        assert_eq!(pulled.schema(), dataset.schema());
        assert!(pulled.frame().equals(dataset.frame()));
        assert_eq!(pulled.path(), Some(&path));
    }

    #[tokio::test]
    async fn test_pull_replaces_local_copy() {
        let fm = InMemoryFileManager::new();
        let mut remote = Dataset::new(df!("city" => ["Oslo"]).unwrap());
        remote.save("acme/places", &fm).await.unwrap();
        let files = vec![
            BundleFile::new(
                SCHEMA_FILE_NAME,
                fm.load_binary(Path::new("acme/places/schema.yaml")).await.unwrap(),
                "application/x-yaml",
            ),
            BundleFile::new(
                DATA_FILE_NAME,
                fm.load_binary(Path::new("acme/places/data.parquet")).await.unwrap(),
                "application/octet-stream",
            ),
        ];
        let registry =
            MockDatasetRegistry::new().with_archive("acme/places", build_archive(&files).unwrap());

        let local_fm = InMemoryFileManager::new();
        let mut local = Dataset::new(sales());
        local.save("acme/places", &local_fm).await.unwrap();

        local.pull(&registry, &local_fm).await.unwrap();

        assert_eq!(local.columns_count(), 1);
        assert_eq!(local.schema(), remote.schema());
    }

    #[tokio::test]
    async fn test_chat_and_follow_up() {
        let llm = Arc::new(
            MockLlmProvider::new()
                .with_reply("```sql\nSELECT SUM(units) FROM sales\n```")
                .with_reply("```sql\nSELECT country FROM sales WHERE units > 40\n```"),
        );
        let mut dataset = Dataset::new(sales()).with_table_name("sales");

        let total = dataset.chat("Total units?", llm.clone(), None).await.unwrap();
        assert_eq!(total.as_number(), Some(123.0));

        let countries = dataset.follow_up("Which sold more than 40?").await.unwrap();
        assert_eq!(countries.as_frame().unwrap().height(), 2);

        let prompt = llm.requests()[0].system_prompt().unwrap().to_string();
        assert!(prompt.contains("<table dialect=\"duckdb\" table_name=\"sales\""));
    }

    #[tokio::test]
    async fn test_metadata_changes_rebuild_the_agent() {
        let first = Arc::new(MockLlmProvider::new().with_reply("SELECT COUNT(*) FROM sales"));
        let mut dataset = Dataset::new(sales()).with_table_name("sales");
        dataset.chat("How many rows?", first, None).await.unwrap();

        dataset.set_description("Units sold per country");
        let second = Arc::new(MockLlmProvider::new().with_reply("SELECT SUM(units) FROM totals"));
        let mut dataset = dataset.with_table_name("totals");

        let response = dataset.chat("Total units?", second.clone(), None).await.unwrap();

        assert_eq!(response.as_number(), Some(123.0));
        let prompt = second.requests()[0].system_prompt().unwrap().to_string();
        assert!(prompt.contains("table_name=\"totals\""));
        assert!(prompt.contains("description=\"Units sold per country\""));
    }

    #[tokio::test]
    async fn test_follow_up_without_chat() {
        let mut dataset = Dataset::new(sales());
        assert!(matches!(
            dataset.follow_up("anything").await,
            Err(DomainError::NoConversation)
        ));
    }
}
