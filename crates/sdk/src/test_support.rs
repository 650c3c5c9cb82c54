//! Helpers shared by the wiremock-backed tests.

/// The blocking client owns a runtime, so it must live off the async workers.
pub(crate) async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}
