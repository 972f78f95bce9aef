use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::repositories::PowerSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartPeriod {
    #[default]
    Day,
    Week,
    Month,
}

impl ChartPeriod {
    /// Unknown or missing periods fall back to a day.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("week") => ChartPeriod::Week,
            Some("month") => ChartPeriod::Month,
            _ => ChartPeriod::Day,
        }
    }

    pub fn window(&self) -> Duration {
        match self {
            ChartPeriod::Day => Duration::hours(24),
            ChartPeriod::Week => Duration::days(7),
            ChartPeriod::Month => Duration::days(30),
        }
    }

    pub fn label_format(&self) -> &'static str {
        match self {
            ChartPeriod::Day => "%H:%M:%S",
            ChartPeriod::Week => "%d/%m %H:%M",
            ChartPeriod::Month => "%d/%m %H:00",
        }
    }

    pub fn row_limit(&self) -> usize {
        match self {
            ChartPeriod::Day => 500,
            ChartPeriod::Week => 1000,
            ChartPeriod::Month => 2000,
        }
    }

    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.window()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerChart {
    pub labels: Vec<String>,
    pub total_power: Vec<f64>,
    pub period: ChartPeriod,
    pub count: usize,
}

/// Sum power of all rooms per label. Every sample with the same label lands
/// in one point, even when the samples are not adjacent. Labels keep the
/// order of their first sample.
pub fn build_chart(samples: &[PowerSample], period: ChartPeriod) -> PowerChart {
    let format = period.label_format();
    let mut labels: Vec<String> = Vec::new();
    let mut total_power: Vec<f64> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for sample in samples {
        let label = sample.ts.format(format).to_string();
        match index.get(&label) {
            Some(&i) => total_power[i] += sample.power_watts,
            None => {
                index.insert(label.clone(), labels.len());
                labels.push(label);
                total_power.push(sample.power_watts);
            }
        }
    }

    PowerChart {
        count: labels.len(),
        labels,
        total_power,
        period,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample(slave_id: u16, power: f64, ts: DateTime<Utc>) -> PowerSample {
        PowerSample {
            slave_id,
            power_watts: power,
            ts,
        }
    }

    #[test]
    fn test_parse_falls_back_to_day() {
        assert_eq!(ChartPeriod::parse(Some("week")), ChartPeriod::Week);
        assert_eq!(ChartPeriod::parse(Some("month")), ChartPeriod::Month);
        assert_eq!(ChartPeriod::parse(Some("year")), ChartPeriod::Day);
        assert_eq!(ChartPeriod::parse(None), ChartPeriod::Day);
    }

    #[test]
    fn test_same_second_is_summed_for_day() {
        let t = Utc.with_ymd_and_hms(2025, 3, 4, 10, 15, 30).unwrap();
        let samples = vec![
            sample(5, 100.0, t),
            sample(7, 50.0, t),
            sample(5, 120.0, t + Duration::seconds(2)),
        ];

        let chart = build_chart(&samples, ChartPeriod::Day);
        assert_eq!(chart.labels, vec!["10:15:30", "10:15:32"]);
        assert_eq!(chart.total_power, vec![150.0, 120.0]);
        assert_eq!(chart.count, 2);
    }

    #[test]
    fn test_month_groups_by_hour() {
        let t = Utc.with_ymd_and_hms(2025, 3, 4, 10, 5, 0).unwrap();
        let samples = vec![
            sample(5, 100.0, t),
            sample(5, 100.0, t + Duration::minutes(30)),
            sample(5, 40.0, t + Duration::minutes(60)),
        ];

        let chart = build_chart(&samples, ChartPeriod::Month);
        assert_eq!(chart.labels, vec!["04/03 10:00", "04/03 11:00"]);
        assert_eq!(chart.total_power, vec![200.0, 40.0]);
    }

    #[test]
    fn test_repeated_label_is_merged() {
        // Day labels carry no date, so samples 24h apart share a label
        let t = Utc.with_ymd_and_hms(2025, 3, 4, 10, 15, 30).unwrap();
        let samples = vec![
            sample(5, 100.0, t),
            sample(5, 40.0, t + Duration::seconds(5)),
            sample(7, 60.0, t + Duration::hours(24)),
        ];

        let chart = build_chart(&samples, ChartPeriod::Day);
        assert_eq!(chart.labels, vec!["10:15:30", "10:15:35"]);
        assert_eq!(chart.total_power, vec![160.0, 40.0]);
        assert_eq!(chart.count, 2);
    }

    #[test]
    fn test_empty_history() {
        let chart = build_chart(&[], ChartPeriod::Week);
        assert!(chart.labels.is_empty());
        assert_eq!(chart.count, 0);
        assert_eq!(chart.period, ChartPeriod::Week);
    }
}
