//! Shared shutdown signal helpers.
//!
//! The whole pipeline observes one `watch::Receiver<bool>`; `true` means stop.
//! A dropped sender counts as a stop request.

use tokio::sync::watch;

/// Resolve once shutdown has been requested (or the sender is gone).
pub async fn requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

/// Non-blocking check of the current signal value.
#[must_use]
pub fn is_requested(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn resolves_when_signal_fires() {
        let (tx, mut rx) = watch::channel(false);
        let waiter = tokio::spawn(async move { requested(&mut rx).await });
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
    }

    #[tokio::test]
    async fn resolves_when_sender_dropped() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);
        tokio::time::timeout(Duration::from_secs(1), requested(&mut rx))
            .await
            .expect("closed channel counts as shutdown");
    }

    #[tokio::test]
    async fn resolves_immediately_if_already_set() {
        let (_tx, mut rx) = watch::channel(true);
        assert!(is_requested(&rx));
        tokio::time::timeout(Duration::from_millis(100), requested(&mut rx))
            .await
            .expect("already requested");
    }
}
