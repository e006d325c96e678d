//! Delete every contact of every alias owned by a SimpleLogin account.
//!
//! A run lists the account's aliases, lists the contacts of each alias, and
//! only then deletes each contact once. See [`pipeline`] for the phases.

pub mod api;
pub mod config;
pub mod ids;
pub mod observability;
pub mod pagination;
pub mod pipeline;

#[cfg(test)]
mod tests;

use thiserror::Error;

pub use crate::{
    api::{ApiError, ContactApi, SimpleLoginClient},
    config::{ConfigError, PurgeConfig},
    ids::{AliasId, ContactId, PageId},
    pipeline::{PurgeError, PurgeOptions, PurgeReport, Purger, Stage},
};

/// Any failure that ends a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Purge(#[from] PurgeError),

    #[error(transparent)]
    Tracing(#[from] observability::TracingError),
}

/// Resolve the API key, build the client and run a full purge.
pub async fn purge(config: &PurgeConfig, options: PurgeOptions) -> Result<PurgeReport, Error> {
    let api_key = config.api.resolve_api_key()?;
    let client = SimpleLoginClient::from_config(&config.api, api_key)?;

    tracing::info!(base_url = client.base_url(), "Using SimpleLogin API");

    let mut purger = Purger::new(client, options);
    Ok(purger.run().await?)
}
