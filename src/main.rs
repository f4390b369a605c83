use anyhow::{Context, Result};
use clap::Parser;
use layer_build::cli::LayerArgs;
use layer_build::{build_layer, logging};

fn main() -> Result<()> {
    let args = LayerArgs::parse();
    logging::init(args.verbose);

    let config = args.to_config().context("resolve layer configuration")?;
    let report = build_layer(&config).map_err(|err| {
        let step = err.step();
        anyhow::Error::new(err).context(format!("layer build failed at step: {step}"))
    })?;

    if args.json {
        let text = serde_json::to_string_pretty(&report).context("serialize layer report")?;
        println!("{text}");
    }
    Ok(())
}
