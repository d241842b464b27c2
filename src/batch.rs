use crate::compressor::Compressor;
use crate::constants::{ERROR_PREFIX, OK_PREFIX, SKIP_PREFIX, SUMMARY_PREFIX};
use crate::encoder::{encode, load_source};
use crate::error::{Result, ShrinkError};
use crate::formats::OutputFormat;
use crate::planner::{output_path, plan_derivatives, DerivativePlan, SourceFile};
use crate::utils::{
    calculate_compression_ratio, create_progress_spinner, display_relative, format_file_size,
};
use futures::future::join_all;
use image::DynamicImage;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Empty the input directory after a run without failures.
    pub clean: bool,
    /// Suppress OK/SKIP lines and the spinner. Errors and the summary still print.
    pub quiet: bool,
}

/// A derivative that made it to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenDerivative {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub encoded_size: u64,
    pub compressed_size: u64,
}

#[derive(Debug)]
pub struct DerivativeOutcome {
    pub plan: DerivativePlan,
    pub output_path: PathBuf,
    pub result: Result<WrittenDerivative>,
}

#[derive(Debug)]
pub enum FileOutcome {
    Succeeded {
        outputs: Vec<WrittenDerivative>,
    },
    Skipped,
    /// `message` is the first failure in plan order. `derivatives` keeps every
    /// task's own result and is empty when the source could not be decoded.
    Failed {
        message: String,
        derivatives: Vec<DerivativeOutcome>,
    },
}

impl FileOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }
}

#[derive(Debug)]
pub struct FileReport {
    pub source: SourceFile,
    pub outcome: FileOutcome,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Succeeded { .. } => self.succeeded += 1,
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} skipped, {} failed",
            self.succeeded, self.skipped, self.failed
        )
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub files: Vec<FileReport>,
}

/// Runs one full batch: setup, enumeration, one file at a time, summary.
///
/// Only setup failures are returned as errors. Everything that goes wrong
/// for an individual file is recorded in its `FileOutcome` and the loop
/// moves on to the next file.
pub async fn run_batch<C>(config: &BatchConfig, compressor: &C) -> Result<BatchReport>
where
    C: Compressor + ?Sized,
{
    let start_time = Instant::now();
    let output_root = prepare_directories(config)?;

    info!(
        "Scanning {:?}, writing derivatives to {:?}",
        config.input_dir, config.output_dir
    );
    let sources = collect_source_files(&config.input_dir, Some(&output_root))?;
    if !config.quiet {
        println!("🚀 Found {} files in {:?}", sources.len(), config.input_dir);
    }

    let display_root = config
        .input_dir
        .canonicalize()
        .unwrap_or_else(|_| config.input_dir.clone());

    let mut report = BatchReport::default();
    for source in sources {
        let name = display_relative(&source.path, &display_root);
        let spinner = create_progress_spinner(&format!("Processing {}", name), config.quiet);

        let outcome = process_file(&source, &config.output_dir, compressor).await;

        spinner.finish_and_clear();
        print_outcome(&name, &outcome, config.quiet);
        report.summary.record(&outcome);
        report.files.push(FileReport { source, outcome });
    }

    println!(
        "{} Done: {} ({:.2?})",
        SUMMARY_PREFIX,
        report.summary,
        start_time.elapsed()
    );

    if config.clean {
        clean_after_run(config, &report.summary, &output_root);
    }

    Ok(report)
}

/// Creates the output directory (and the input directory when it does not
/// exist yet) and checks that the input directory can be listed.
///
/// Returns the canonical output directory. The output may live inside the
/// input tree but must not be the input directory itself.
pub fn prepare_directories(config: &BatchConfig) -> Result<PathBuf> {
    fs::create_dir_all(&config.input_dir)
        .map_err(|e| ShrinkError::setup(&config.input_dir, e))?;
    fs::read_dir(&config.input_dir).map_err(|e| ShrinkError::setup(&config.input_dir, e))?;
    fs::create_dir_all(&config.output_dir)
        .map_err(|e| ShrinkError::setup(&config.output_dir, e))?;

    let input_root = config
        .input_dir
        .canonicalize()
        .map_err(|e| ShrinkError::setup(&config.input_dir, e))?;
    let output_root = config
        .output_dir
        .canonicalize()
        .map_err(|e| ShrinkError::setup(&config.output_dir, e))?;

    if input_root == output_root {
        return Err(ShrinkError::setup(
            &config.output_dir,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "output directory is the input directory",
            ),
        ));
    }

    Ok(output_root)
}

/// Recursively lists every regular file under `input_dir`.
///
/// Hidden entries are skipped and files reachable through more than one
/// path are only returned once. `skip_dir` is a canonical directory whose
/// subtree is left out, used for an output directory nested in the input.
/// Order follows the directory listing.
pub fn collect_source_files(
    input_dir: &Path,
    skip_dir: Option<&Path>,
) -> Result<Vec<SourceFile>> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    // Walk the canonical root so entry paths compare against `skip_dir`.
    let root = input_dir
        .canonicalize()
        .unwrap_or_else(|_| input_dir.to_path_buf());
    // An input tree nested inside the output directory is still walked.
    let skip_dir = skip_dir.filter(|skip| skip.starts_with(&root));
    let is_skipped = |path: &Path| skip_dir.map_or(false, |skip| path.starts_with(skip));

    let walker = WalkDir::new(&root).into_iter().filter_entry(|e| {
        e.depth() == 0
            || !(e.file_name().to_string_lossy().starts_with('.') || is_skipped(e.path()))
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let canonical_path = match path.canonicalize() {
            Ok(canonical_path) => canonical_path,
            Err(e) => {
                warn!("Skipping {:?}: {}", path, e);
                continue;
            }
        };

        if is_skipped(&canonical_path) {
            debug!("Skipping {:?}: inside the output directory", path);
            continue;
        }

        if seen.insert(canonical_path.clone()) {
            sources.push(SourceFile::from_path(canonical_path));
        } else {
            debug!("Skipping duplicate {:?}", path);
        }
    }

    Ok(sources)
}

/// Plans, encodes, compresses and writes every derivative of one source.
///
/// All derivatives of the file run concurrently and each task's result is
/// captured; a failing task never cancels its siblings, and siblings that
/// were already written stay on disk.
pub async fn process_file<C>(source: &SourceFile, output_dir: &Path, compressor: &C) -> FileOutcome
where
    C: Compressor + ?Sized,
{
    let plans = plan_derivatives(source.kind());
    if plans.is_empty() {
        return FileOutcome::Skipped;
    }

    let img = match load_source(&source.path).await {
        Ok(img) => img,
        Err(e) => {
            return FileOutcome::Failed {
                message: e.describe(),
                derivatives: Vec::new(),
            }
        }
    };

    let tasks = plans.into_iter().map(|plan| {
        let output_path = output_path(output_dir, source, &plan);
        let img = &img;
        async move {
            let result = run_derivative(img, &plan, &output_path, compressor).await;
            DerivativeOutcome {
                plan,
                output_path,
                result,
            }
        }
    });
    let derivatives = join_all(tasks).await;

    let first_failure = derivatives
        .iter()
        .find_map(|d| d.result.as_ref().err().map(ShrinkError::describe));
    if let Some(message) = first_failure {
        return FileOutcome::Failed {
            message,
            derivatives,
        };
    }

    let outputs = derivatives
        .into_iter()
        .filter_map(|d| d.result.ok())
        .collect();
    FileOutcome::Succeeded { outputs }
}

async fn run_derivative<C>(
    img: &DynamicImage,
    plan: &DerivativePlan,
    output_path: &Path,
    compressor: &C,
) -> Result<WrittenDerivative>
where
    C: Compressor + ?Sized,
{
    let encoded = encode(img, &plan.options)?;
    let encoded_size = encoded.len() as u64;

    let compressed = compressor.compress(encoded).await?;
    tokio::fs::write(output_path, &compressed).await?;
    debug!(
        "Wrote {:?} ({} -> {} bytes)",
        output_path,
        encoded_size,
        compressed.len()
    );

    Ok(WrittenDerivative {
        path: output_path.to_path_buf(),
        format: plan.format,
        encoded_size,
        compressed_size: compressed.len() as u64,
    })
}

fn print_outcome(name: &str, outcome: &FileOutcome, quiet: bool) {
    match outcome {
        FileOutcome::Succeeded { outputs } => {
            if quiet {
                return;
            }
            let written: Vec<String> = outputs.iter().map(describe_written).collect();
            println!("{} {} -> {}", OK_PREFIX, name, written.join(", "));
        }
        FileOutcome::Skipped => {
            if !quiet {
                println!("{} {} (unsupported extension)", SKIP_PREFIX, name);
            }
        }
        FileOutcome::Failed {
            message,
            derivatives,
        } => {
            eprintln!("{} {}: {}", ERROR_PREFIX, name, message);
            for derivative in derivatives {
                match &derivative.result {
                    Ok(written) => eprintln!("    written: {}", describe_written(written)),
                    Err(e) => eprintln!(
                        "    {} failed: {}",
                        derivative.plan.target_extension(),
                        e.describe()
                    ),
                }
            }
        }
    }
}

fn describe_written(written: &WrittenDerivative) -> String {
    let file_name = written
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(
        "{} ({} -> {}, {:.1}% smaller)",
        file_name,
        format_file_size(written.encoded_size),
        format_file_size(written.compressed_size),
        calculate_compression_ratio(written.encoded_size, written.compressed_size)
    )
}

fn clean_after_run(config: &BatchConfig, summary: &BatchSummary, output_root: &Path) {
    if summary.failed > 0 {
        warn!(
            "Leaving {:?} untouched: {} files failed",
            config.input_dir, summary.failed
        );
        return;
    }

    match crate::cleanup::clean_input_dir(&config.input_dir, Some(output_root)) {
        Ok(removed) => info!("Removed {} entries from {:?}", removed, config.input_dir),
        Err(e) => eprintln!(
            "{} cleaning {:?}: {}",
            ERROR_PREFIX,
            config.input_dir,
            e.describe()
        ),
    }
}
