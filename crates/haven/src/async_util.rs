use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Run `future` under `limit`, flattening both failure paths into the message
/// an error state will carry.
pub(crate) async fn run_with_timeout<T, E, F>(
    limit: Duration,
    operation: &'static str,
    future: F,
) -> Result<T, String>
where
    F: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    match tokio::time::timeout(limit, future).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(error.to_string()),
        Err(_) => Err(format!(
            "{operation} timed out after {}s",
            limit.as_secs()
        )),
    }
}
