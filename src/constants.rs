pub const DEFAULT_INPUT_DIR: &str = "input";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

pub const JPEG_DERIVATIVE_QUALITY: u8 = 90;
pub const WEBP_DERIVATIVE_QUALITY: u8 = 85;

pub const DEFAULT_TINIFY_ENDPOINT: &str = "https://api.tinify.com";
pub const TINIFY_SHRINK_PATH: &str = "/shrink";
pub const TINIFY_API_USER: &str = "api";
pub const TINIFY_API_KEY_ENV: &str = "TINIFY_API_KEY";
pub const TINIFY_ENDPOINT_ENV: &str = "TINIFY_ENDPOINT";
pub const COMPRESSION_COUNT_HEADER: &str = "compression-count";

pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
pub const SPINNER_TICK_MS: u64 = 100;

// Status line prefixes
pub const OK_PREFIX: &str = "✅ OK";
pub const SKIP_PREFIX: &str = "⏭️  SKIP";
pub const ERROR_PREFIX: &str = "❌ ERROR";
pub const SUMMARY_PREFIX: &str = "📊";
