use std::time::Duration;

/// Suspends the current task without blocking the event loop.
#[cfg(feature = "wasm")]
pub async fn sleep(duration: Duration) {
    let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
    gloo_timers::future::TimeoutFuture::new(millis).await;
}

/// Suspends the current task without blocking the event loop.
#[cfg(all(feature = "no-wasm", not(feature = "wasm")))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}
