pub mod batch;
pub mod cleanup;
pub mod cli;
pub mod compressor;
pub mod constants;
pub mod encoder;
pub mod error;
pub mod formats;
pub mod logger;
pub mod planner;
pub mod utils;

pub use batch::{
    collect_source_files, prepare_directories, process_file, run_batch, BatchConfig, BatchReport,
    BatchSummary, DerivativeOutcome, FileOutcome, FileReport, WrittenDerivative,
};
pub use compressor::{Compressor, CompressorConfig, TinifyClient};
pub use error::{Result, ShrinkError};
pub use formats::{classify, OutputFormat, SourceKind};
pub use planner::{output_path, plan_derivatives, DerivativePlan, EncodeOptions, SourceFile};
