//! Time types used across the crate, plus the async sleep used when
//! waiting for ticks on a tokio runtime.
pub use std::time::{Duration, Instant};

/// Sleep until `deadline` on the tokio timer.
///
/// Returns immediately if the deadline already passed.
#[cfg(feature = "async_tokio")]
pub async fn sleep_until(deadline: Instant) {
    tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await
}

#[cfg(all(test, feature = "async_tokio"))]
mod tests {
    use super::*;
    use tokio::runtime;

    #[test]
    fn sleeps_until_deadline() {
        let rt = runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();

        rt.block_on(async {
            let deadline = Instant::now() + Duration::from_millis(10);
            sleep_until(deadline).await;
            assert!(Instant::now() >= deadline);

            // a deadline in the past does not wait
            let before = Instant::now();
            sleep_until(before - Duration::from_millis(1)).await;
            assert!(before.elapsed() < Duration::from_secs(1));
        });
    }
}
