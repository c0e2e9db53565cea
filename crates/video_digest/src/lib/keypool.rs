//! Credential failover for quota-limited providers.
//!
//! A [`KeyPool`] holds an ordered list of interchangeable API keys and a
//! "last-known-good" cursor. Every call starts at the cursor and walks the
//! pool (wrapping) at most once; the cursor only moves when a key succeeds.
//! The cursor sits behind a mutex so one pool can be shared across requests.

use std::{
    fmt::{self, Debug, Display},
    future::Future,
    sync::{Mutex, PoisonError},
};

use serde::Serialize;

use crate::error::Error;

/// How a provider failure affects the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Quota, auth or transient provider failure: try the next key.
    Rotate,
    /// Stop immediately and surface the error.
    Fatal,
}

pub trait KeyedFailure {
    fn failure_class(&self) -> FailureClass;
}

#[derive(Debug, thiserror::Error)]
pub enum RotationError<E> {
    #[error("all {attempts} API keys for {provider} failed; last error: {last}")]
    Exhausted {
        provider: &'static str,
        attempts: usize,
        last: E,
    },
    #[error("{0}")]
    Fatal(E),
}

impl<E: Display> From<RotationError<E>> for Error {
    fn from(value: RotationError<E>) -> Self {
        match value {
            e @ RotationError::Exhausted { .. } => Error::ServiceUnavailable(e.to_string()),
            RotationError::Fatal(e) => Error::Upstream(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyPoolStatus {
    /// 1-based index of the last-known-good key
    pub current_key_index: usize,
    pub total_keys: usize,
    pub remaining_keys: usize,
}

pub struct KeyPool {
    provider: &'static str,
    keys: Vec<String>,
    cursor: Mutex<usize>,
}

impl Debug for KeyPool {
    // keys are secrets; never print them
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPool")
            .field("provider", &self.provider)
            .field("keys", &self.keys.len())
            .field("cursor", &self.current_index())
            .finish()
    }
}

impl KeyPool {
    /// Builds a pool from `keys`, dropping blanks and duplicates while keeping order.
    pub fn new(
        provider: &'static str,
        keys: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, Error> {
        let mut unique: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into().trim().to_string();
            if !key.is_empty() && !unique.contains(&key) {
                unique.push(key);
            }
        }

        if unique.is_empty() {
            return Err(Error::Config(format!("no API keys configured for {provider}")));
        }

        Ok(Self {
            provider,
            keys: unique,
            cursor: Mutex::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn current_index(&self) -> usize {
        *self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mark_good(&self, index: usize) {
        *self.cursor.lock().unwrap_or_else(PoisonError::into_inner) = index;
    }

    pub fn status(&self) -> KeyPoolStatus {
        let current = self.current_index();
        KeyPoolStatus {
            current_key_index: current + 1,
            total_keys: self.keys.len(),
            remaining_keys: self.keys.len() - current - 1,
        }
    }

    /// Runs `call` with successive keys until one succeeds.
    ///
    /// At most `self.len()` attempts are made. A [`FailureClass::Fatal`] error
    /// ends the walk right away.
    pub async fn run<T, E, F, Fut>(&self, mut call: F) -> Result<T, RotationError<E>>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: KeyedFailure + Display,
    {
        let start = self.current_index();
        let total = self.keys.len();
        let mut last_err = None;

        for attempt in 0..total {
            let index = (start + attempt) % total;
            match call(self.keys[index].clone()).await {
                Ok(value) => {
                    if index != start {
                        tracing::info!(
                            provider = self.provider,
                            key_index = index + 1,
                            total_keys = total,
                            "Switched to backup API key"
                        );
                    }
                    self.mark_good(index);
                    return Ok(value);
                }
                Err(e) if e.failure_class() == FailureClass::Rotate => {
                    tracing::warn!(
                        provider = self.provider,
                        key_index = index + 1,
                        attempt = attempt + 1,
                        total_keys = total,
                        error = %e,
                        "API key rejected, rotating to next key"
                    );
                    last_err = Some(e);
                }
                Err(e) => {
                    tracing::error!(provider = self.provider, key_index = index + 1, error = %e, "Non-retryable provider failure");
                    return Err(RotationError::Fatal(e));
                }
            }
        }

        match last_err {
            Some(last) => Err(RotationError::Exhausted {
                provider: self.provider,
                attempts: total,
                last,
            }),
            // `new` rejects empty pools
            None => unreachable!("key pool is never empty"),
        }
    }
}
