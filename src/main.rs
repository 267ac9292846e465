//! The ringmaster service: artists and shows over JSON files.
//!
//! ```text
//! ringmaster [config.toml]
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use ringmaster::middleware::{JsonBody, Trace};
use ringmaster::resources::{self, artists::ARTISTS, shows::SHOWS};
use ringmaster::{App, Config, Error, JsonStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log)),
        )
        .init();

    tracing::info!(
        addr = %config.addr(),
        data_dir = %config.data_dir.display(),
        "configuration loaded"
    );

    let store = Arc::new(JsonStore::new(&config.data_dir));

    let mut app = App::new();
    app.use_middleware(Trace).use_middleware(JsonBody);
    resources::mount(&mut app, &store, &ARTISTS)?;
    resources::mount(&mut app, &store, &SHOWS)?;

    app.listen_on(config.addr()).await
}
