//! Redis implementation of [`ModelStore`].
//!
//! One synchronous connection, opened once and dropped with the store. TLS
//! goes through rustls when the connection info asks for it.

use crate::core::ConnectionInfo;
use crate::error::{Result, StoreError};
use crate::store::command::{MODELGET, MODELSTORE, ModelStoreRequest};
use crate::store::traits::{ModelMeta, ModelStore};
use redis::{Client, Commands, Connection, Value};
use std::time::Duration;

/// Default connect and I/O timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport options that are not part of the connection string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Connect timeout, also applied to reads and writes.
    pub timeout: Duration,
    /// Skip TLS certificate verification.
    pub insecure: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            insecure: false,
        }
    }
}

/// Redis-backed model store.
pub struct RedisModelStore {
    conn: Connection,
}

impl RedisModelStore {
    /// Opens a connection and checks it with `PING`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConnectFailed`] if the server is unreachable,
    /// the TLS handshake fails, or authentication is refused.
    pub fn connect(info: &ConnectionInfo, options: &ConnectOptions) -> Result<Self> {
        let server = info.redacted();
        tracing::debug!(%server, tls = info.tls, "connecting to store");

        let client = Client::open(info.client_url(options.insecure)?.as_str())
            .map_err(|e| StoreError::ConnectFailed(format!("{server}: {e}")))?;

        let mut conn = client
            .get_connection_with_timeout(options.timeout)
            .map_err(|e| StoreError::ConnectFailed(format!("{server}: {e}")))?;

        conn.set_read_timeout(Some(options.timeout))
            .and_then(|()| conn.set_write_timeout(Some(options.timeout)))
            .map_err(|e| StoreError::ConnectFailed(format!("{server}: {e}")))?;

        let _: String = redis::cmd("PING")
            .query(&mut conn)
            .map_err(|e| StoreError::ConnectFailed(format!("{server}: ping failed: {e}")))?;

        tracing::info!(%server, "connected to store");
        Ok(Self { conn })
    }
}

impl ModelStore for RedisModelStore {
    fn store_model(&mut self, request: &ModelStoreRequest<'_>) -> Result<()> {
        let mut cmd = redis::cmd(MODELSTORE);
        for arg in request.args() {
            cmd.arg(&*arg);
        }

        let _: () = cmd
            .query(&mut self.conn)
            .map_err(|e| StoreError::from_redis(MODELSTORE, &e))?;
        Ok(())
    }

    fn model_meta(&mut self, key: &str) -> Result<Option<ModelMeta>> {
        if !self.exists(key)? {
            return Ok(None);
        }

        let reply: Vec<Value> = redis::cmd(MODELGET)
            .arg(key)
            .arg("META")
            .query(&mut self.conn)
            .map_err(|e| StoreError::from_redis(MODELGET, &e))?;

        parse_meta(&reply).map(Some)
    }

    fn exists(&mut self, key: &str) -> Result<bool> {
        self.conn
            .exists(key)
            .map_err(|e| StoreError::from_redis("EXISTS", &e).into())
    }

    fn set_value(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.conn
            .set::<_, _, ()>(key, value)
            .map_err(|e| StoreError::from_redis("SET", &e).into())
    }

    fn value_len(&mut self, key: &str) -> Result<usize> {
        self.conn
            .strlen(key)
            .map_err(|e| StoreError::from_redis("STRLEN", &e).into())
    }
}

/// Decodes the flat field/value list returned by `AI.MODELGET … META`.
///
/// Fields other than backend, device and tag are ignored.
fn parse_meta(reply: &[Value]) -> Result<ModelMeta> {
    let mut meta = ModelMeta::default();

    for pair in reply.chunks_exact(2) {
        let field: String = redis::from_redis_value(&pair[0])
            .map_err(|e| StoreError::from_redis(MODELGET, &e))?;
        let slot = match field.to_lowercase().as_str() {
            "backend" => &mut meta.backend,
            "device" => &mut meta.device,
            "tag" => &mut meta.tag,
            _ => continue,
        };
        *slot = redis::from_redis_value(&pair[1])
            .map_err(|e| StoreError::from_redis(MODELGET, &e))?;
    }

    if meta.backend.is_empty() {
        return Err(StoreError::UnexpectedReply {
            command: MODELGET.to_string(),
            reason: "reply carries no backend".to_string(),
        }
        .into());
    }
    Ok(meta)
}
