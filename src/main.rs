use anyhow::{Context, Result};
use sun_orient::{config, telemetry, SunOrientComponent};
use config::Config;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = match std::env::args().nth(1) {
        Some(path) => Config::from_path(&path)?,
        None => Config::load()?,
    };
    let inputs = cfg
        .evaluation
        .clone()
        .context("configuration has no [evaluation] section")?;

    let mut component = SunOrientComponent::from_config(&cfg.geocoder)?;

    info!(address = %inputs.address, fetch = inputs.fetch, "evaluating");

    let result = component.evaluate(&inputs).await.map(|o| o.clone());
    for message in component.messages() {
        warn!(level = ?message.level, text = %message.text, "runtime message");
    }

    match result {
        Ok(outputs) => {
            println!("{}", outputs.status);
            println!("{}", serde_json::to_string_pretty(&outputs)?);
            Ok(())
        }
        Err(err) if !err.kind().is_fatal() => {
            println!("{}", component.status().unwrap_or_default());
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
