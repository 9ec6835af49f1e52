//! CSV collaborators around the estimators: the reference catalog loader and
//! the batch-file runner.

pub mod batch;
pub mod catalog;
pub mod error;
pub mod output;

pub use batch::{
    default_output_path, run_batch, run_batch_file, BatchSchema, BatchSummary, LimitColumns,
    ParamColumns,
};
pub use catalog::{load_catalog, read_catalog, DEFAULT_CATALOG_PATH};
pub use error::CatalogError;
pub use output::{format_ratio, result_columns};
