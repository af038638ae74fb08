use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use aeropulse::config::AeroPulseConfig;
use aeropulse::coordinator::{Locus, RefreshOptions, RequestCoordinator};
use aeropulse::sink::ConsoleSink;
use aeropulse::store::PreferenceStore;
use aeropulse::{OpenMeteoClient, UnsupportedGeolocator};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AeroPulseConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    let mut args = std::env::args().skip(1).peekable();
    let watch = args.peek().is_some_and(|arg| arg == "--watch");
    if watch {
        args.next();
    }
    let city = {
        let rest: Vec<String> = args.collect();
        let joined = rest.join(" ");
        (!joined.trim().is_empty()).then_some(joined)
    };

    let prefs = match config.storage_path() {
        Some(path) => match PreferenceStore::open(&path) {
            Ok(store) => Some(store),
            Err(error) => {
                warn!("preference store unavailable at {}: {error}", path.display());
                None
            }
        },
        None => None,
    };

    let api = Arc::new(OpenMeteoClient::new(&config).context("failed to create API client")?);
    let coordinator = Arc::new(RequestCoordinator::new(
        api,
        Arc::new(UnsupportedGeolocator),
        Arc::new(ConsoleSink),
        prefs,
        config,
    ));

    let outcome = match city {
        Some(city) => {
            coordinator
                .refresh(Locus::City(city), RefreshOptions::default())
                .await
        }
        None => coordinator.initialize().await,
    };

    if watch {
        if let Err(error) = &outcome {
            warn!("initial refresh failed, auto refresh keeps trying: {error}");
        }
        coordinator.set_visible(true);
        Arc::clone(&coordinator).run_auto_refresh().await;
        Ok(())
    } else {
        outcome?;
        Ok(())
    }
}
