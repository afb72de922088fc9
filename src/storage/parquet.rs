//! Parquet persistence for edge lists
//!
//! # Format
//!
//! An edge list is stored as `{path}_edges.parquet` with columns
//! `(source, target[, weight])`. The vertex count and directedness travel in
//! the file's key/value metadata so isolated trailing vertices survive a round
//! trip.

use super::coo::EdgeList;
use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float32Array, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

const NODES_KEY: &str = "frontier_graph.nodes";
const DIRECTED_KEY: &str = "frontier_graph.directed";

fn edges_path(base_path: &Path) -> String {
    format!("{}_edges.parquet", base_path.display())
}

impl EdgeList<u32, f32> {
    /// Write the edge list to `{path}_edges.parquet`
    ///
    /// # Errors
    ///
    /// Returns error if the list is not host-readable, file I/O fails, or
    /// Arrow conversion fails
    #[allow(clippy::unused_async)] // Async API for future I/O operations
    pub async fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let edges_path = edges_path(path.as_ref());

        let pairs = self.pairs()?;
        let sources: Vec<u32> = pairs.iter().map(|&(s, _)| s).collect();
        let targets: Vec<u32> = pairs.iter().map(|&(_, d)| d).collect();

        let mut fields = vec![
            Field::new("source", DataType::UInt32, false),
            Field::new("target", DataType::UInt32, false),
        ];
        let mut columns: Vec<Arc<dyn Array>> = vec![
            Arc::new(UInt32Array::from(sources)),
            Arc::new(UInt32Array::from(targets)),
        ];
        if let Some(weights) = self.edge_values()? {
            fields.push(Field::new("weight", DataType::Float32, false));
            columns.push(Arc::new(Float32Array::from(weights.to_vec())));
        }
        let schema = Arc::new(Schema::new(fields));

        let batch =
            RecordBatch::try_new(schema.clone(), columns).context("Failed to create RecordBatch")?;

        let file =
            File::create(&edges_path).with_context(|| format!("Failed to create {edges_path}"))?;

        let props = WriterProperties::builder()
            .set_compression(parquet::basic::Compression::ZSTD(
                parquet::basic::ZstdLevel::try_new(3)?,
            ))
            .set_key_value_metadata(Some(vec![
                KeyValue::new(NODES_KEY.to_string(), self.nodes().to_string()),
                KeyValue::new(DIRECTED_KEY.to_string(), self.directed().to_string()),
            ]))
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        info!(path = %edges_path, edges = self.edges(), "wrote edge list");
        Ok(())
    }

    /// Read an edge list written by [`EdgeList::write_parquet`]
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, a column has the wrong type,
    /// or an endpoint falls outside the stored vertex count
    #[allow(clippy::unused_async)] // Async API for future I/O operations
    pub async fn read_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        let edges_path = edges_path(path.as_ref());

        let file =
            File::open(&edges_path).with_context(|| format!("Failed to open {edges_path}"))?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

        let mut nodes = None;
        let mut directed = true;
        if let Some(entries) = builder.metadata().file_metadata().key_value_metadata() {
            for entry in entries {
                match (entry.key.as_str(), entry.value.as_deref()) {
                    (NODES_KEY, Some(value)) => {
                        nodes = Some(value.parse::<usize>().context("Invalid node count")?);
                    }
                    (DIRECTED_KEY, Some(value)) => {
                        directed = value.parse::<bool>().context("Invalid directed flag")?;
                    }
                    _ => {}
                }
            }
        }

        let reader = builder.build()?;
        let mut pairs = Vec::new();
        let mut weights: Option<Vec<f32>> = None;

        for batch_result in reader {
            let batch: RecordBatch = batch_result?;

            let sources = batch
                .column(0)
                .as_any()
                .downcast_ref::<UInt32Array>()
                .context("Invalid source column type")?;

            let targets = batch
                .column(1)
                .as_any()
                .downcast_ref::<UInt32Array>()
                .context("Invalid target column type")?;

            pairs.extend((0..batch.num_rows()).map(|i| (sources.value(i), targets.value(i))));

            if batch.num_columns() > 2 {
                let column = batch
                    .column(2)
                    .as_any()
                    .downcast_ref::<Float32Array>()
                    .context("Invalid weight column type")?;
                weights
                    .get_or_insert_with(Vec::new)
                    .extend(column.values().iter().copied());
            }
        }

        let nodes = match nodes {
            Some(n) => n,
            None => pairs
                .iter()
                .map(|&(s, d)| s.max(d) as usize + 1)
                .max()
                .unwrap_or(0),
        };
        if weights.as_ref().is_some_and(|w| w.len() != pairs.len()) {
            bail!("{edges_path}: weight column is missing from some row groups");
        }

        let list = Self::from_pairs(nodes, directed, pairs, weights)?;
        info!(path = %edges_path, nodes, edges = list.edges(), "read edge list");
        Ok(list)
    }
}
