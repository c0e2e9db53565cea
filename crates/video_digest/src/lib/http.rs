use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
    default_on_request_failure, default_on_request_success, policies::ExponentialBackoff,
    RetryTransientMiddleware, Retryable, RetryableStrategy,
};

pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Retries transport failures and 5xx/408 only.
///
/// 401/403/429 are returned as-is; key pools deal with them.
struct ProviderRetryStrategy;

impl RetryableStrategy for ProviderRetryStrategy {
    fn handle(
        &self,
        res: &Result<reqwest::Response, reqwest_middleware::Error>,
    ) -> Option<Retryable> {
        match res {
            Ok(response) if matches!(response.status().as_u16(), 401 | 403 | 429) => None,
            Ok(response) => default_on_request_success(response),
            Err(error) => default_on_request_failure(error),
        }
    }
}

pub fn build_http_client(timeout: Duration) -> ClientWithMiddleware {
    build_http_client_with_retries(timeout, DEFAULT_MAX_RETRIES)
}

pub fn build_http_client_with_retries(timeout: Duration, max_retries: u32) -> ClientWithMiddleware {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to build configured http client, using defaults");
            reqwest::Client::new()
        });

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

    ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy_and_strategy(
            retry_policy,
            ProviderRetryStrategy,
        ))
        .build()
}
