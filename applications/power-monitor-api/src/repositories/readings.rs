use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use tokio::sync::RwLock;

use crate::ingest::RegisterSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestReading {
    pub slave_id: u16,
    pub snapshot: RegisterSnapshot,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerSample {
    pub slave_id: u16,
    pub power_watts: f64,
    pub ts: DateTime<Utc>,
}

/// Latest frame per slave plus a bounded power history for the chart.
pub struct ReadingsRepository {
    latest: RwLock<BTreeMap<u16, LatestReading>>,
    history: RwLock<VecDeque<PowerSample>>,
    capacity: usize,
}

impl ReadingsRepository {
    /// `capacity` is clamped to at least one sample.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            latest: RwLock::new(BTreeMap::new()),
            history: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    pub async fn record(&self, slave_id: u16, snapshot: RegisterSnapshot, received_at: DateTime<Utc>) {
        self.latest.write().await.insert(
            slave_id,
            LatestReading {
                slave_id,
                snapshot,
                received_at,
            },
        );

        if let Some(power_watts) = snapshot.power_watts {
            let mut history = self.history.write().await;
            while history.len() >= self.capacity {
                history.pop_front();
            }
            history.push_back(PowerSample {
                slave_id,
                power_watts,
                ts: received_at,
            });
        }
    }

    /// Latest frame of every slave that has reported, ordered by slave id.
    pub async fn latest(&self) -> Vec<LatestReading> {
        self.latest.read().await.values().cloned().collect()
    }

    /// Oldest-first samples at or after `since`, at most `limit` of them.
    pub async fn power_history(&self, since: DateTime<Utc>, limit: usize) -> Vec<PowerSample> {
        let mut samples: Vec<PowerSample> = self
            .history
            .read()
            .await
            .iter()
            .filter(|s| s.ts >= since)
            .cloned()
            .collect();
        samples.sort_by_key(|s| s.ts);
        samples.truncate(limit);
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn snapshot(power: f64) -> RegisterSnapshot {
        RegisterSnapshot {
            power_watts: Some(power),
            ..RegisterSnapshot::default()
        }
    }

    #[tokio::test]
    async fn test_latest_keeps_newest_frame_per_slave() {
        let repo = ReadingsRepository::new(10);
        let t0 = Utc::now();
        repo.record(7, snapshot(10.0), t0).await;
        repo.record(5, snapshot(20.0), t0).await;
        repo.record(7, snapshot(30.0), t0 + Duration::seconds(2)).await;

        let latest = repo.latest().await;
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].slave_id, 5);
        assert_eq!(latest[1].snapshot.power_watts, Some(30.0));
        assert_eq!(latest[1].received_at, t0 + Duration::seconds(2));
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let repo = ReadingsRepository::new(3);
        let t0 = Utc::now();
        for i in 0..5 {
            repo.record(5, snapshot(i as f64), t0 + Duration::seconds(i)).await;
        }

        let samples = repo.power_history(t0 - Duration::hours(1), 100).await;
        let powers: Vec<f64> = samples.iter().map(|s| s.power_watts).collect();
        assert_eq!(powers, vec![2.0, 3.0, 4.0]);
    }

    #[tokio::test]
    async fn test_zero_capacity_keeps_latest_sample() {
        let repo = ReadingsRepository::new(0);
        let t0 = Utc::now();
        repo.record(5, snapshot(10.0), t0).await;
        repo.record(5, snapshot(20.0), t0 + Duration::seconds(1)).await;

        let samples = repo.power_history(t0 - Duration::hours(1), 100).await;
        let powers: Vec<f64> = samples.iter().map(|s| s.power_watts).collect();
        assert_eq!(powers, vec![20.0]);
    }

    #[tokio::test]
    async fn test_history_window_and_limit() {
        let repo = ReadingsRepository::new(100);
        let t0 = Utc::now();
        for i in 0..10 {
            repo.record(5, snapshot(i as f64), t0 + Duration::minutes(i)).await;
        }

        let samples = repo.power_history(t0 + Duration::minutes(4), 3).await;
        let powers: Vec<f64> = samples.iter().map(|s| s.power_watts).collect();
        assert_eq!(powers, vec![4.0, 5.0, 6.0]);
    }

    #[tokio::test]
    async fn test_frames_without_power_are_not_charted() {
        let repo = ReadingsRepository::new(10);
        let now = Utc::now();
        repo.record(5, RegisterSnapshot::default(), now).await;

        assert_eq!(repo.latest().await.len(), 1);
        assert!(repo.power_history(now - Duration::hours(1), 10).await.is_empty());
    }
}
