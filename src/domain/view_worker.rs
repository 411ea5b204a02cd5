//! Background worker persisting product views.
//!
//! Events that are already queued when the worker wakes up are folded into one
//! counter update per product, so a burst of views costs one query each.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::repositories::ProductRepository;
use crate::domain::view_event::ProductView;

/// Maximum events folded into a single flush.
const MAX_BATCH: usize = 512;
const RETRY_ATTEMPTS: usize = 3;

/// Consumes view events until every sender is dropped.
pub async fn run_view_worker(
    mut rx: mpsc::Receiver<ProductView>,
    products: Arc<dyn ProductRepository>,
) {
    info!("View worker started");

    while let Some(first) = rx.recv().await {
        let mut counts: HashMap<i64, i64> = HashMap::new();
        *counts.entry(first.product_id).or_default() += 1;

        let mut batched = 1;
        while batched < MAX_BATCH {
            match rx.try_recv() {
                Ok(ev) => *counts.entry(ev.product_id).or_default() += 1,
                Err(_) => break,
            }
            batched += 1;
        }

        flush(&products, counts).await;
    }

    info!("View worker stopped");
}

async fn flush(products: &Arc<dyn ProductRepository>, counts: HashMap<i64, i64>) {
    for (product_id, views) in counts {
        // 50ms, 100ms, 200ms before jitter
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(25)
            .max_delay(Duration::from_secs(2))
            .map(jitter)
            .take(RETRY_ATTEMPTS);

        let result = Retry::spawn(strategy, || {
            let products = products.clone();
            async move { products.record_views(product_id, views).await }
        })
        .await;

        match result {
            Ok(()) => debug!(product_id, views, "Recorded product views"),
            Err(e) => warn!(product_id, views, error = %e, "Dropping product views after retries"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockProductRepository;
    use crate::error::AppError;
    use serde_json::json;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_worker_aggregates_queued_views() {
        let recorded = Arc::new(Mutex::new(HashMap::new()));
        let sink = recorded.clone();

        let mut repo = MockProductRepository::new();
        repo.expect_record_views().returning(move |id, views| {
            *sink.lock().unwrap().entry(id).or_insert(0) += views;
            Ok(())
        });

        let (tx, rx) = mpsc::channel(16);
        for id in [1, 1, 2, 1] {
            tx.send(ProductView::new(id)).await.unwrap();
        }
        drop(tx);

        run_view_worker(rx, Arc::new(repo)).await;

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.get(&1), Some(&3));
        assert_eq!(recorded.get(&2), Some(&1));
    }

    #[tokio::test]
    async fn test_worker_retries_failed_writes() {
        let attempts = Arc::new(Mutex::new(0));
        let counter = attempts.clone();

        let mut repo = MockProductRepository::new();
        repo.expect_record_views().returning(move |_, _| {
            let mut n = counter.lock().unwrap();
            *n += 1;
            if *n < 3 {
                Err(AppError::internal("Database error", json!({})))
            } else {
                Ok(())
            }
        });

        let (tx, rx) = mpsc::channel(4);
        tx.send(ProductView::new(9)).await.unwrap();
        drop(tx);

        run_view_worker(rx, Arc::new(repo)).await;

        assert_eq!(*attempts.lock().unwrap(), 3);
    }
}
