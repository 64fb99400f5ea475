//! Cancellable, restartable delayed actions.
//!
//! Each [`Debouncer::arm`] aborts the previously armed task and bumps a
//! generation counter. The armed action receives its generation so whoever
//! consumes the fire event can ask [`Debouncer::fire`] whether it is still the
//! latest arm; an event from an arm that was superseded after it had already
//! fired is rejected there.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            handle: None,
        }
    }

    /// Restarts the quiet period. `action` runs once `delay` passes without
    /// another `arm` or `cancel`. Must be called inside a tokio runtime.
    pub fn arm<F, Fut>(&mut self, action: F) -> u64
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.abort_pending();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let delay = self.delay;
        let fired = action(generation);
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fired.await;
        }));
        generation
    }

    pub fn cancel(&mut self) {
        if self.handle.is_some() {
            self.abort_pending();
            self.generation = self.generation.wrapping_add(1);
        }
    }

    /// True while an arm is waiting to be consumed by [`fire`](Self::fire).
    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    /// Consumes a fire event. Returns false for stale generations.
    pub fn fire(&mut self, generation: u64) -> bool {
        if self.handle.is_none() || generation != self.generation {
            return false;
        }
        self.handle = None;
        true
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.abort_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn arm_into(debouncer: &mut Debouncer, tx: &mpsc::UnboundedSender<u64>) -> u64 {
        let tx = tx.clone();
        debouncer.arm(move |generation| async move {
            let _ = tx.send(generation);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_quiet_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        let generation = arm_into(&mut debouncer, &tx);
        assert!(debouncer.is_armed());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(rx.try_recv().is_err());

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired, generation);
        assert!(debouncer.fire(fired));
        assert!(!debouncer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_restarts_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        arm_into(&mut debouncer, &tx);
        tokio::time::sleep(Duration::from_millis(200)).await;
        arm_into(&mut debouncer, &tx);
        tokio::time::sleep(Duration::from_millis(200)).await;
        let last = arm_into(&mut debouncer, &tx);

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(rx.try_recv().unwrap(), last);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        let generation = arm_into(&mut debouncer, &tx);
        debouncer.cancel();
        assert!(!debouncer.is_armed());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
        assert!(!debouncer.fire(generation));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_generation_is_rejected() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        let first = arm_into(&mut debouncer, &tx);
        let second = arm_into(&mut debouncer, &tx);
        assert!(!debouncer.fire(first));
        assert!(debouncer.fire(second));
        assert!(!debouncer.fire(second));
    }
}
