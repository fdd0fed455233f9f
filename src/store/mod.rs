//! Remote store layer.
//!
//! Renders the registration command and sends it to a Redis server running
//! the RedisAI module. The [`ModelStore`] trait is the seam between the
//! loader and the network.

pub mod command;
pub mod redis;
pub mod traits;

pub use self::redis::{ConnectOptions, DEFAULT_TIMEOUT, RedisModelStore};
pub use command::{MODELGET, MODELSTORE, ModelStoreRequest};
pub use traits::{ModelMeta, ModelStore};
