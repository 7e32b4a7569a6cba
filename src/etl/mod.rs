//! Core ETL (Extract, Load) abstractions
//!
//! This module provides the trait seams between source and target stores
//! and the pipeline that drains one into the other, batch by batch.

mod bundle;
mod extract;
mod load;
mod pipeline;
mod report;

pub use bundle::DatasetBundle;
pub use extract::{Batches, DEFAULT_BATCH_SIZE, Extractor, RowStream};
pub use load::Loader;
pub use pipeline::Pipeline;
pub use report::{MigrationReport, TableReport};
