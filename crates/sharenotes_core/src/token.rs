//! Paste token minting.

use crate::base62;
use crate::snowflake::{Clock, SnowflakeError, SnowflakeGenerator, SystemClock};

/// A freshly minted token together with the id it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub id: u64,
}

/// Mints unique tokens for one worker id.
///
/// Ids from one generator strictly increase and [`base62::encode`] is
/// injective, so tokens from one instance never repeat. Each storage backend
/// owns exactly one of these.
pub struct TokenGenerator<C: Clock = SystemClock> {
    snowflake: SnowflakeGenerator<C>,
}

impl TokenGenerator<SystemClock> {
    /// # Errors
    /// Returns [`SnowflakeError::InvalidWorkerId`] outside `0..=1023`.
    pub fn new(worker_id: i64) -> Result<Self, SnowflakeError> {
        Ok(Self {
            snowflake: SnowflakeGenerator::new(worker_id)?,
        })
    }
}

impl<C: Clock> TokenGenerator<C> {
    pub fn from_generator(snowflake: SnowflakeGenerator<C>) -> Self {
        Self { snowflake }
    }

    pub fn worker_id(&self) -> u16 {
        self.snowflake.worker_id()
    }

    /// Mint one id and return it with its token form.
    ///
    /// # Errors
    /// Propagates [`SnowflakeError`] from the underlying generator.
    pub fn generate_token(&self) -> Result<IssuedToken, SnowflakeError> {
        let id = self.snowflake.generate()?;
        Ok(IssuedToken {
            token: base62::encode(id),
            id,
        })
    }
}
