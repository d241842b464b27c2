use crate::batch::BatchConfig;
use crate::compressor::CompressorConfig;
use crate::constants::{
    DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR, DEFAULT_TINIFY_ENDPOINT, TINIFY_API_KEY_ENV,
    TINIFY_ENDPOINT_ENV,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "img-shrink",
    about = "Convert PNG/JPEG images to JPG and WebP and shrink them with the Tinify API",
    long_about = "img-shrink scans an input directory for PNG and JPEG images, converts each one into \
                  its derivatives (PNG -> JPG + WebP, JPEG -> WebP), sends every derivative through \
                  the Tinify shrink API and writes the results to an output directory. \
                  Files are processed one at a time; a failing file never stops the batch.",
    version,
    after_help = "EXAMPLES:\n  \
    TINIFY_API_KEY=xxxx img-shrink\n  \
    img-shrink --input ./photos --output ./web --api-key xxxx\n  \
    img-shrink --clean -q"
)]
pub struct Args {
    #[arg(
        short = 'i',
        long,
        default_value = DEFAULT_INPUT_DIR,
        help = "Directory scanned recursively for source images"
    )]
    pub input: PathBuf,

    #[arg(
        short = 'o',
        long,
        default_value = DEFAULT_OUTPUT_DIR,
        help = "Directory receiving the derivatives (created if missing)"
    )]
    pub output: PathBuf,

    #[arg(
        long,
        env = TINIFY_API_KEY_ENV,
        hide_env_values = true,
        help = "Tinify API key",
        long_help = "Tinify API key. A missing key is not fatal: every file that needs \
                     compression is reported as failed with a ConfigurationError."
    )]
    pub api_key: Option<String>,

    #[arg(
        long,
        env = TINIFY_ENDPOINT_ENV,
        default_value = DEFAULT_TINIFY_ENDPOINT,
        help = "Base URL of the shrink API"
    )]
    pub endpoint: String,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Per-request timeout in seconds (default: wait indefinitely)"
    )]
    pub timeout: Option<u64>,

    #[arg(
        long,
        help = "Empty the input directory after a run with no failed files"
    )]
    pub clean: bool,

    #[arg(short = 'v', long, help = "Show debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Only print errors and the final summary"
    )]
    pub quiet: bool,
}

impl Args {
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            input_dir: self.input.clone(),
            output_dir: self.output.clone(),
            clean: self.clean,
            quiet: self.quiet,
        }
    }

    pub fn compressor_config(&self) -> CompressorConfig {
        CompressorConfig::new(self.api_key.clone(), Some(self.endpoint.clone()))
            .with_timeout(self.timeout.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["img-shrink"]).unwrap();
        assert_eq!(args.input, PathBuf::from("input"));
        assert_eq!(args.output, PathBuf::from("output"));
        assert!(!args.clean);
        assert!(args.timeout.is_none());
        // endpoint can come from the environment
        assert!(!args.endpoint.is_empty());
    }

    #[test]
    fn test_args_into_configs() {
        let args = Args::try_parse_from([
            "img-shrink",
            "--input",
            "photos",
            "--output",
            "web",
            "--api-key",
            "secret",
            "--endpoint",
            "http://localhost:9000",
            "--timeout",
            "30",
            "--clean",
            "-q",
        ])
        .unwrap();

        let batch = args.batch_config();
        assert_eq!(batch.input_dir, PathBuf::from("photos"));
        assert_eq!(batch.output_dir, PathBuf::from("web"));
        assert!(batch.clean);
        assert!(batch.quiet);

        let compressor = args.compressor_config();
        assert_eq!(compressor.api_key.as_deref(), Some("secret"));
        assert_eq!(compressor.endpoint, "http://localhost:9000");
        assert_eq!(compressor.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["img-shrink", "-q", "-v"]).is_err());
    }
}
