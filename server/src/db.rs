//! SurrealDB connection setup.

use shared_utils::{RetryConfig, retry_async};
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::remote::http::{Client, Http, Https};
use surrealdb::opt::auth::{Database, Namespace, Root};
use tokio_retry::{Retry, strategy::ExponentialBackoff};

use crate::config::{Protocol, SiteConfig};

/// Connects, signs in with the most specific credentials available and
/// selects the namespace and database.
pub async fn connect(config: &SiteConfig) -> Result<Surreal<Client>, surrealdb::Error> {
    let connect_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .take(5);

    let db = Retry::spawn(connect_strategy, || async {
        tracing::info!(host = %config.host, protocol = ?config.protocol, "Connecting to SurrealDB");
        match config.protocol {
            Protocol::Http => Surreal::new::<Http>(config.host.as_str()).await,
            Protocol::Https => Surreal::new::<Https>(config.host.as_str()).await,
        }
    })
    .await
    .map_err(|e| {
        tracing::error!("Failed to connect to SurrealDB after retries: {e:?}");
        e
    })?;

    sign_in(&db, config).await?;

    retry_async("use_ns", RetryConfig::from_env(), || async {
        db.use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await
    })
    .await?;

    tracing::info!(namespace = %config.namespace, database = %config.database, "Connected to SurrealDB");
    Ok(db)
}

/// Tries database, then namespace, then root credentials. Without any
/// credentials the session stays anonymous.
async fn sign_in(db: &Surreal<Client>, config: &SiteConfig) -> Result<(), surrealdb::Error> {
    if config.database_user.is_none() && config.namespace_user.is_none() && config.root.is_none() {
        tracing::warn!("No SurrealDB credentials configured; continuing anonymously");
        return Ok(());
    }

    let auth_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(3))
        .take(3);

    Retry::spawn(auth_strategy, || async {
        let mut last_err = None;

        if let Some(user) = &config.database_user {
            match db
                .signin(Database {
                    namespace: &config.namespace,
                    database: &config.database,
                    username: &user.username,
                    password: &user.password,
                })
                .await
            {
                Ok(_) => return Ok(()),
                Err(e) => {
                    tracing::debug!("Database sign-in failed: {e:?}");
                    last_err = Some(e);
                }
            }
        }

        if let Some(user) = &config.namespace_user {
            match db
                .signin(Namespace {
                    namespace: &config.namespace,
                    username: &user.username,
                    password: &user.password,
                })
                .await
            {
                Ok(_) => return Ok(()),
                Err(e) => {
                    tracing::debug!("Namespace sign-in failed: {e:?}");
                    last_err = Some(e);
                }
            }
        }

        if let Some(user) = &config.root {
            match db
                .signin(Root {
                    username: &user.username,
                    password: &user.password,
                })
                .await
            {
                Ok(_) => return Ok(()),
                Err(e) => {
                    tracing::debug!("Root sign-in failed: {e:?}");
                    last_err = Some(e);
                }
            }
        }

        last_err.map_or(Ok(()), Err)
    })
    .await
    .map_err(|e| {
        tracing::error!(
            namespace = %config.namespace,
            database = %config.database,
            "Failed to authenticate with SurrealDB after retries: {e:?}"
        );
        e
    })
}
