//! LanceDB vector database client
//!
//! One table per collection. Each row holds a chunk's vector, its text and
//! the chunk metadata as flat columns so searches can filter on them.

use crate::error::VectorDbError;
use crate::types::{CategoryStats, ChunkMetadata, IndexedEntry, RetrievalResult, SearchFilter};
use crate::vector_db::{DatabaseStats, VectorDatabase};
use anyhow::{Context, Result};
use arrow_array::{
    Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
    UInt32Array, types::Float32Type,
};
use arrow_schema::{DataType, Field, Schema};
use futures::stream::TryStreamExt;
use lancedb::Table;
use lancedb::connection::Connection;
use lancedb::query::{ExecutableQuery, QueryBase};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// LanceDB vector database implementation (embedded, no server required)
pub struct LanceVectorDB {
    connection: Connection,
    table_name: String,
    db_path: String,
}

impl LanceVectorDB {
    /// Open (or create) the database at `db_path` and bind it to a collection
    pub async fn with_path(db_path: &str, table_name: &str) -> Result<Self> {
        tracing::info!("Connecting to LanceDB at: {}", db_path);

        let connection = lancedb::connect(db_path)
            .execute()
            .await
            .context("Failed to connect to LanceDB")?;

        Ok(Self {
            connection,
            table_name: table_name.to_string(),
            db_path: db_path.to_string(),
        })
    }

    /// Create schema for the chunk table
    fn create_schema(dimension: usize) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    dimension as i32,
                ),
                false,
            ),
            Field::new("id", DataType::Utf8, false),
            Field::new("source", DataType::Utf8, false),
            Field::new("title", DataType::Utf8, false),
            Field::new("author", DataType::Utf8, false),
            Field::new("total_pages", DataType::UInt32, false),
            Field::new("page", DataType::UInt32, false),
            Field::new("chunk_index", DataType::UInt32, false),
            Field::new("category", DataType::Utf8, false),
            Field::new("content", DataType::Utf8, false),
        ]))
    }

    /// Vector dimension recorded in an existing table's schema
    fn stored_dimension(schema: &Schema) -> Option<usize> {
        match schema.field_with_name("vector").ok()?.data_type() {
            DataType::FixedSizeList(_, size) => Some(*size as usize),
            _ => None,
        }
    }

    async fn table_exists(&self) -> Result<bool> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .context("Failed to list tables")?;
        Ok(table_names.contains(&self.table_name))
    }

    async fn get_table(&self) -> Result<Table> {
        self.connection
            .open_table(&self.table_name)
            .execute()
            .await
            .context("Failed to open table")
    }

    /// Convert entries to a RecordBatch
    fn create_record_batch(entries: Vec<IndexedEntry>, schema: Arc<Schema>) -> Result<RecordBatch> {
        let dimension = entries[0].vector.len();

        let id_array = StringArray::from(entries.iter().map(|e| e.id.as_str()).collect::<Vec<_>>());
        let source_array = StringArray::from(
            entries
                .iter()
                .map(|e| e.metadata.source.as_str())
                .collect::<Vec<_>>(),
        );
        let title_array = StringArray::from(
            entries
                .iter()
                .map(|e| e.metadata.title.as_str())
                .collect::<Vec<_>>(),
        );
        let author_array = StringArray::from(
            entries
                .iter()
                .map(|e| e.metadata.author.as_str())
                .collect::<Vec<_>>(),
        );
        let total_pages_array = UInt32Array::from(
            entries
                .iter()
                .map(|e| e.metadata.total_pages)
                .collect::<Vec<_>>(),
        );
        let page_array =
            UInt32Array::from(entries.iter().map(|e| e.metadata.page).collect::<Vec<_>>());
        let chunk_index_array = UInt32Array::from(
            entries
                .iter()
                .map(|e| e.metadata.chunk_index)
                .collect::<Vec<_>>(),
        );
        let category_array = StringArray::from(
            entries
                .iter()
                .map(|e| e.metadata.category.as_str())
                .collect::<Vec<_>>(),
        );
        let content_array =
            StringArray::from(entries.iter().map(|e| e.content.as_str()).collect::<Vec<_>>());

        // Create FixedSizeListArray for vectors
        let vector_array = FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
            entries
                .into_iter()
                .map(|e| Some(e.vector.into_iter().map(Some))),
            dimension as i32,
        );

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(vector_array),
                Arc::new(id_array),
                Arc::new(source_array),
                Arc::new(title_array),
                Arc::new(author_array),
                Arc::new(total_pages_array),
                Arc::new(page_array),
                Arc::new(chunk_index_array),
                Arc::new(category_array),
                Arc::new(content_array),
            ],
        )
        .context("Failed to create RecordBatch")
    }

    /// Build the SQL predicate for a search filter
    fn filter_predicate(filter: &SearchFilter) -> Option<String> {
        if filter.is_empty() {
            return None;
        }

        let clauses: Vec<String> = [("category", &filter.category), ("source", &filter.source)]
            .into_iter()
            .filter_map(|(column, value)| {
                value
                    .as_ref()
                    .map(|v| format!("{} = '{}'", column, v.replace('\'', "''")))
            })
            .collect();

        Some(clauses.join(" AND "))
    }

    /// Turn search batches into results, scoring `1 / (1 + distance)`
    fn batches_to_results(batches: &[RecordBatch]) -> Result<Vec<RetrievalResult>> {
        let mut results = Vec::new();

        for batch in batches {
            let distance_array = batch
                .column_by_name("_distance")
                .context("Missing _distance column")?
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("Invalid _distance type")?;
            let source_array = string_column(batch, "source")?;
            let title_array = string_column(batch, "title")?;
            let author_array = string_column(batch, "author")?;
            let total_pages_array = u32_column(batch, "total_pages")?;
            let page_array = u32_column(batch, "page")?;
            let chunk_index_array = u32_column(batch, "chunk_index")?;
            let category_array = string_column(batch, "category")?;
            let content_array = string_column(batch, "content")?;

            for i in 0..batch.num_rows() {
                let distance = distance_array.value(i);
                results.push(RetrievalResult {
                    content: content_array.value(i).to_string(),
                    metadata: ChunkMetadata {
                        source: source_array.value(i).to_string(),
                        title: title_array.value(i).to_string(),
                        author: author_array.value(i).to_string(),
                        total_pages: total_pages_array.value(i),
                        page: page_array.value(i),
                        chunk_index: chunk_index_array.value(i),
                        category: category_array.value(i).to_string(),
                    },
                    score: 1.0 / (1.0 + distance),
                });
            }
        }

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(results)
    }
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .with_context(|| format!("Missing {} column", name))?
        .as_any()
        .downcast_ref::<StringArray>()
        .with_context(|| format!("Invalid {} type", name))
}

fn u32_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a UInt32Array> {
    batch
        .column_by_name(name)
        .with_context(|| format!("Missing {} column", name))?
        .as_any()
        .downcast_ref::<UInt32Array>()
        .with_context(|| format!("Invalid {} type", name))
}

#[async_trait::async_trait]
impl VectorDatabase for LanceVectorDB {
    async fn initialize(&self, dimension: usize) -> Result<()> {
        tracing::info!(
            "Initializing LanceDB with dimension {} at {}",
            dimension,
            self.db_path
        );

        if self.table_exists().await? {
            let table = self.get_table().await?;
            let schema = table.schema().await.context("Failed to read table schema")?;

            if let Some(stored) = Self::stored_dimension(&schema)
                && stored != dimension
            {
                return Err(VectorDbError::DimensionMismatch {
                    collection: self.table_name.clone(),
                    stored,
                    expected: dimension,
                }
                .into());
            }

            tracing::info!("Table '{}' already exists", self.table_name);
            return Ok(());
        }

        let schema = Self::create_schema(dimension);
        let empty_batch = RecordBatch::new_empty(schema.clone());
        let batches =
            RecordBatchIterator::new(vec![empty_batch].into_iter().map(Ok), schema.clone());

        self.connection
            .create_table(&self.table_name, Box::new(batches))
            .execute()
            .await
            .context("Failed to create table")?;

        tracing::info!("Created table '{}'", self.table_name);
        Ok(())
    }

    async fn store(&self, entries: Vec<IndexedEntry>) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }

        let dimension = entries[0].vector.len();
        if let Some(bad) = entries.iter().find(|e| e.vector.len() != dimension) {
            anyhow::bail!(
                "Entry '{}' has {} dimensions, expected {}",
                bad.id,
                bad.vector.len(),
                dimension
            );
        }

        self.initialize(dimension).await?;

        let schema = Self::create_schema(dimension);
        let batch = Self::create_record_batch(entries, schema.clone())?;
        let count = batch.num_rows();
        let batches = RecordBatchIterator::new(vec![batch].into_iter().map(Ok), schema);

        let table = self.get_table().await?;
        table
            .add(Box::new(batches))
            .execute()
            .await
            .context("Failed to add records to table")?;

        tracing::info!("Stored {} entries in '{}'", count, self.table_name);
        Ok(count)
    }

    async fn search(
        &self,
        query_vector: Vec<f32>,
        limit: usize,
        filter: &SearchFilter,
    ) -> Result<Vec<RetrievalResult>> {
        if limit == 0 || !self.table_exists().await? {
            return Ok(Vec::new());
        }

        let table = self.get_table().await?;
        let query = table
            .vector_search(query_vector)
            .context("Failed to create vector search")?
            .limit(limit);

        let stream = match Self::filter_predicate(filter) {
            Some(predicate) => query
                .only_if(predicate)
                .execute()
                .await
                .context("Failed to execute search")?,
            None => query.execute().await.context("Failed to execute search")?,
        };

        let batches: Vec<RecordBatch> = stream
            .try_collect()
            .await
            .context("Failed to collect search results")?;

        let results = Self::batches_to_results(&batches)?;
        tracing::debug!(
            collection = %self.table_name,
            results = results.len(),
            "Vector search complete"
        );
        Ok(results)
    }

    async fn count(&self) -> Result<usize> {
        if !self.table_exists().await? {
            return Ok(0);
        }

        let table = self.get_table().await?;
        table
            .count_rows(None)
            .await
            .context("Failed to count rows")
    }

    async fn clear(&self) -> Result<()> {
        if !self.table_exists().await? {
            tracing::info!("Table '{}' does not exist, nothing to clear", self.table_name);
            return Ok(());
        }

        // Empty namespace array for default namespace
        self.connection
            .drop_table(&self.table_name, &[])
            .await
            .context("Failed to drop table")?;

        tracing::info!("Dropped table '{}'", self.table_name);
        Ok(())
    }

    async fn get_statistics(&self) -> Result<DatabaseStats> {
        if !self.table_exists().await? {
            return Ok(DatabaseStats::default());
        }

        let table = self.get_table().await?;
        let total_chunks = table
            .count_rows(None)
            .await
            .context("Failed to count rows")?;

        let stream = table
            .query()
            .select(lancedb::query::Select::Columns(vec![
                "source".to_string(),
                "category".to_string(),
            ]))
            .execute()
            .await
            .context("Failed to query categories")?;

        let batches: Vec<RecordBatch> = stream
            .try_collect()
            .await
            .context("Failed to collect category data")?;

        let mut documents: HashSet<String> = HashSet::new();
        let mut per_category: BTreeMap<String, (HashSet<String>, usize)> = BTreeMap::new();

        for batch in &batches {
            let source_array = string_column(batch, "source")?;
            let category_array = string_column(batch, "category")?;

            for i in 0..batch.num_rows() {
                let source = source_array.value(i).to_string();
                let entry = per_category
                    .entry(category_array.value(i).to_string())
                    .or_default();
                entry.0.insert(source.clone());
                entry.1 += 1;
                documents.insert(source);
            }
        }

        let mut category_breakdown: Vec<CategoryStats> = per_category
            .into_iter()
            .map(|(category, (sources, chunk_count))| CategoryStats {
                category,
                document_count: sources.len(),
                chunk_count,
            })
            .collect();
        category_breakdown.sort_by(|a, b| b.chunk_count.cmp(&a.chunk_count));

        Ok(DatabaseStats {
            total_chunks,
            total_documents: documents.len(),
            category_breakdown,
        })
    }

    fn collection_name(&self) -> &str {
        &self.table_name
    }
}
