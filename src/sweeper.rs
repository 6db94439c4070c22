// SmartClip - Purge periodique de l'historique
//
// Toutes les `interval` (10 minutes par defaut), supprime les entrees
// plus vieilles que `max_age` (24 heures). Le premier passage a lieu
// une periode apres le demarrage. Une purge qui supprime au moins une
// entree est sauvegardee par le store et notifiee a l'interface.

use crate::events::{EngineEvent, EventBus};
use crate::history::store::HistoryStore;
use crate::lifecycle::StopListener;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

pub struct RetentionSweeper {
    history: Arc<HistoryStore>,
    events: EventBus,
    interval: Duration,
    max_age: Duration,
}

impl RetentionSweeper {
    pub fn new(history: Arc<HistoryStore>, events: EventBus, interval: Duration, max_age: Duration) -> Self {
        Self {
            history,
            events,
            interval,
            max_age,
        }
    }

    /// Un passage de purge. Retourne le nombre d'entrees supprimees.
    pub fn sweep_once(&self) -> usize {
        let removed = self.history.purge_older_than(self.max_age);
        if removed > 0 {
            info!(removed, "expired history entries purged");
            self.events.emit(EngineEvent::HistoryUpdated);
        }
        removed
    }

    pub async fn run(self, mut stop: StopListener) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = stop.stopped() => break,
                _ = ticker.tick() => {
                    self.sweep_once();
                }
            }
        }
        debug!("retention sweeper stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::entry::{ClipboardEntry, EntryKind};
    use crate::lifecycle::ShutdownSignal;
    use crate::storage::gateway::PersistenceGateway;
    use chrono::Utc;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn aged(content: &str, hours: i64) -> ClipboardEntry {
        let mut e = ClipboardEntry::new(EntryKind::Text, content);
        e.created_at = Utc::now() - chrono::Duration::hours(hours);
        e
    }

    fn store() -> Arc<HistoryStore> {
        Arc::new(HistoryStore::new(
            50,
            vec![aged("fresh", 1), aged("old", 25), aged("recent", 23), aged("ancient", 48)],
            PersistenceGateway::disabled(),
        ))
    }

    #[tokio::test]
    async fn test_sweep_once_keeps_order_of_survivors() {
        let history = store();
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let sweeper = RetentionSweeper::new(history.clone(), bus, DAY, DAY);

        assert_eq!(sweeper.sweep_once(), 2);
        let kept: Vec<String> = history.snapshot().iter().map(|e| e.content.to_string()).collect();
        assert_eq!(kept, vec!["fresh", "recent"]);
        assert_eq!(rx.try_recv().unwrap(), EngineEvent::HistoryUpdated);

        // Rien a purger : pas de notification.
        assert_eq!(sweeper.sweep_once(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sweeps_after_one_interval() {
        let history = store();
        let signal = ShutdownSignal::new();
        let sweeper = RetentionSweeper::new(history.clone(), EventBus::new(), Duration::from_secs(600), DAY);
        let handle = tokio::spawn(sweeper.run(signal.subscribe()));

        tokio::time::sleep(Duration::from_secs(599)).await;
        assert_eq!(history.len(), 4);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(history.len(), 2);

        signal.trigger();
        handle.await.unwrap();
    }
}
