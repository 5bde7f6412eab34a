//! Background license renewal.
//!
//! One periodic task per process proactively renews the license before it
//! expires. The scheduler never revokes anything: on failure it logs a
//! warning inside the grace window (error past it) and leaves enforcement
//! to the guards.

use crate::service::LicensingService;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Renewal is attempted once time-to-expiry drops below this threshold.
pub const RENEWAL_THRESHOLD_SECS: i64 = 24 * 60 * 60;

/// Snapshot of the scheduler's in-memory state.
#[derive(Debug, Clone)]
pub struct RenewalState {
    /// When the last tick completed.
    pub last_check: Option<DateTime<Utc>>,
    /// Whether a tick is currently executing.
    pub in_progress: bool,
    /// The configured tick interval.
    pub interval: Duration,
}

/// Periodic renewal driver.
pub struct RenewalScheduler {
    service: Arc<LicensingService>,
    interval: Duration,
    running: Arc<AtomicBool>,
    in_progress: Arc<AtomicBool>,
    last_check: Arc<RwLock<Option<DateTime<Utc>>>>,
    shutdown: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl RenewalScheduler {
    /// Creates a scheduler ticking at the given interval. Nothing runs
    /// until [`start`](Self::start).
    #[must_use]
    pub fn new(service: Arc<LicensingService>, interval: Duration) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            service,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            in_progress: Arc::new(AtomicBool::new(false)),
            last_check: Arc::new(RwLock::new(None)),
            shutdown,
            handle: Mutex::new(None),
        }
    }

    /// Starts the periodic task. Calling it again while running is a no-op.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("renewal scheduler already running");
            return;
        }

        let service = Arc::clone(&self.service);
        let running = Arc::clone(&self.running);
        let in_progress = Arc::clone(&self.in_progress);
        let last_check = Arc::clone(&self.last_check);
        let mut shutdown_rx = self.shutdown.subscribe();
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if !running.load(Ordering::SeqCst) {
                            break;
                        }
                        Self::tick(&service, &in_progress, &last_check).await;
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
            debug!("renewal scheduler task exited");
        });

        *self.handle.lock().expect("scheduler handle lock poisoned") = Some(handle);
        info!(interval_secs = self.interval.as_secs(), "renewal scheduler started");
    }

    /// Stops the periodic task. An in-flight tick is allowed to finish
    /// (bounded by the Hub call timeout); calling stop again is a no-op.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown.send(true);

        let handle = self
            .handle
            .lock()
            .expect("scheduler handle lock poisoned")
            .take();
        if let Some(handle) = handle {
            if tokio::time::timeout(Duration::from_secs(60), handle).await.is_err() {
                warn!("renewal tick did not finish before shutdown timeout");
            }
        }
        info!("renewal scheduler stopped");
    }

    /// Whether the periodic task is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The scheduler's in-memory state.
    #[must_use]
    pub fn state(&self) -> RenewalState {
        RenewalState {
            last_check: *self.last_check.read().expect("last-check lock poisoned"),
            in_progress: self.in_progress.load(Ordering::SeqCst),
            interval: self.interval,
        }
    }

    /// Runs one tick now, outside the periodic schedule.
    ///
    /// Subject to the same non-overlap rule as scheduled ticks: if another
    /// tick is executing this returns without contacting the Hub.
    pub async fn run_tick(&self) {
        Self::tick(&self.service, &self.in_progress, &self.last_check).await;
    }

    async fn tick(
        service: &LicensingService,
        in_progress: &AtomicBool,
        last_check: &RwLock<Option<DateTime<Utc>>>,
    ) {
        // Non-overlap: a tick that finds one running skips entirely
        // rather than queuing, so at most one Hub mutation of the stored
        // credential is in flight.
        if in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("previous renewal tick still running, skipping");
            return;
        }

        Self::tick_inner(service).await;

        *last_check.write().expect("last-check lock poisoned") = Some(Utc::now());
        in_progress.store(false, Ordering::SeqCst);
    }

    async fn tick_inner(service: &LicensingService) {
        let Some(claims) = service.stored_claims() else {
            debug!("no stored license, skipping renewal tick");
            return;
        };

        let now = Utc::now();
        let remaining = (claims.expires_at - now).num_seconds();
        if remaining > RENEWAL_THRESHOLD_SECS {
            debug!(remaining_secs = remaining, "license not due for renewal");
            return;
        }

        info!("license within renewal threshold, contacting Hub");
        match service.renew().await {
            Ok(renewed) => {
                info!(expires = %renewed.expires_at, "license renewed");
            }
            Err(e) => {
                let grace_end = claims.grace_ends_at();
                if now < grace_end {
                    warn!(grace_end = %grace_end, "license renewal failed, still inside grace window: {e}");
                } else {
                    // No destructive action here: denial is the guards' job.
                    error!("license renewal failed and the grace window has elapsed: {e}");
                }
            }
        }
    }
}
