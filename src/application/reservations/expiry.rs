//! Background task that expires lapsed reservation holds

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::ReservationService;
use crate::shared::ShutdownSignal;

/// Periodically runs [`ReservationService::expire_overdue`] until shutdown.
pub struct ReservationExpiryTask {
    service: Arc<ReservationService>,
    interval: Duration,
}

impl ReservationExpiryTask {
    pub fn new(service: Arc<ReservationService>, interval_secs: u64) -> Self {
        Self {
            service,
            interval: Duration::from_secs(interval_secs.max(1)),
        }
    }

    pub fn start(self, shutdown: ShutdownSignal) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                interval_secs = self.interval.as_secs(),
                "⏳ Reservation expiry task started"
            );

            let mut interval = tokio::time::interval(self.interval);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        match self.service.expire_overdue().await {
                            Ok(0) => debug!("No overdue reservations"),
                            Ok(n) => info!(expired = n, "Expired overdue reservations"),
                            Err(e) => warn!(error = %e, "Reservation expiry check failed"),
                        }
                    }
                    _ = shutdown.wait() => {
                        info!("⏳ Reservation expiry task shutting down");
                        break;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::World;
    use crate::domain::{RepositoryProvider, ReservationStatus, UserRole};
    use chrono::Utc;

    #[tokio::test]
    async fn task_expires_and_stops_on_shutdown() {
        let w = World::new();
        let owner = w.user("owner", UserRole::Landlord).await;
        let tenant = w.user("tenant", UserRole::Tenant).await;
        let unit = w.listed_unit(&owner, "A1", 10_000).await;
        let r = w
            .reservations
            .reserve(&tenant, unit.id, Utc::now().date_naive(), "")
            .await
            .unwrap();
        w.backdate(r.id).await;

        let shutdown = ShutdownSignal::new();
        let handle = ReservationExpiryTask::new(w.reservations.clone(), 1).start(shutdown.clone());

        // The first tick fires immediately.
        let mut expired = false;
        for _ in 0..50 {
            let stored = w.repos.reservations().find_by_id(r.id).await.unwrap().unwrap();
            if stored.status == ReservationStatus::Expired {
                expired = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(expired);

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("task did not stop")
            .unwrap();
    }
}
