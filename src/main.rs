use std::sync::Arc;

use anyhow::Context;

use certdesk::config::Config;
use certdesk::db::{DynStore, MySqlStore};
use certdesk::session::signing_key;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            return Err(err.into());
        }
    };

    let store = MySqlStore::connect_lazy(&config.database);
    if config.init_schema {
        store
            .ensure_schema()
            .await
            .context("could not create the database schema")?;
    }

    let store: DynStore = Arc::new(store);
    let app = certdesk::app(store, signing_key(&config.secret_key));

    log::info!(
        "Starting certificate desk on http://{} (database {}@{}:{}/{})",
        config.bind_addr,
        config.database.user,
        config.database.host,
        config.database.port,
        config.database.name
    );
    axum::Server::bind(&config.bind_addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
