use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::get_config;
use crate::error::Result;

/// Pool sized for a mostly-read pipeline API. Acquisition shares the
/// store-boundary timeout, so a saturated pool surfaces as the same
/// `Error::Timeout` a slow query does.
pub async fn create_pool() -> Result<PgPool> {
    let config = get_config();
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(config.store_timeout_secs))
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}
