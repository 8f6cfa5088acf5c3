// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;

/// Create a configured asynchronous HTTP client.
///
/// Without `timeout_secs` the client waits indefinitely; callers that need a
/// deadline set one in configuration.
pub fn create_async_client(user_agent: &str, timeout_secs: Option<u64>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(user_agent);
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_with_and_without_timeout() {
        assert!(create_async_client("arca-test", None).is_ok());
        assert!(create_async_client("arca-test", Some(30)).is_ok());
    }
}
