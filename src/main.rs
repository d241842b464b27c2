use anyhow::Context;
use clap::Parser;
use img_shrink::cli::Args;
use img_shrink::{logger, run_batch, TinifyClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.verbose, args.quiet);

    let config = args.batch_config();
    let client = TinifyClient::new(args.compressor_config())
        .context("failed to set up the shrink client")?;

    run_batch(&config, &client)
        .await
        .with_context(|| format!("batch over {:?} aborted", config.input_dir))?;

    Ok(())
}
