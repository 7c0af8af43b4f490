//! Window bucketing and page ranking over fetched visit rows
//!
//! Everything here is synchronous and works on rows already in memory.
//! Calendar days are UTC days: an event belongs to the day named by the
//! `YYYY-MM-DD` prefix of its UTC timestamp.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use std::collections::HashMap;

use crate::analytics::models::{DailyBucket, PageRanking};
use crate::models::VisitRow;

/// Number of calendar days in the trailing window, today included
pub const WINDOW_DAYS: i64 = 7;

/// Maximum number of entries in the top-pages ranking
pub const TOP_PAGES_LIMIT: usize = 5;

/// Path used for rows that carry no page path
pub const DEFAULT_PATH: &str = "/";

/// The trailing window of whole UTC days ending on the current day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWindow {
    today: NaiveDate,
}

impl TrailingWindow {
    pub fn ending_at(now: DateTime<Utc>) -> Self {
        Self {
            today: now.date_naive(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn first_day(&self) -> NaiveDate {
        self.today - Duration::days(WINDOW_DAYS - 1)
    }

    /// Days of the window, oldest first
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day();
        (0..WINDOW_DAYS).map(move |offset| first + Duration::days(offset))
    }

    /// Midnight starting the current day
    pub fn today_start(&self) -> DateTime<Utc> {
        start_of_day(self.today)
    }

    /// Inclusive lower bound for the window fetch
    pub fn start(&self) -> DateTime<Utc> {
        start_of_day(self.first_day())
    }

    /// Exclusive upper bound for the window fetch (next midnight)
    pub fn end(&self) -> DateTime<Utc> {
        start_of_day(self.today + Duration::days(1))
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Count rows per calendar day of the window.
///
/// Always returns one bucket per window day, including empty days. Rows
/// dated outside the window are ignored.
pub fn daily_buckets(rows: &[VisitRow], window: &TrailingWindow) -> Vec<DailyBucket> {
    let mut per_day: HashMap<NaiveDate, u64> = HashMap::new();
    for row in rows {
        *per_day.entry(row.created_at.date_naive()).or_insert(0) += 1;
    }

    window
        .days()
        .map(|date| DailyBucket {
            date,
            label: date.format("%b %d").to_string(),
            count: per_day.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Rank page paths by visit count, most visited first.
///
/// Paths tied on count keep the order in which they were first seen.
pub fn top_pages(rows: &[VisitRow]) -> Vec<PageRanking> {
    let mut ranking: Vec<PageRanking> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let path = match row.page_path.as_deref() {
            Some(path) if !path.is_empty() => path,
            _ => DEFAULT_PATH,
        };

        match position.get(path) {
            Some(&idx) => ranking[idx].count += 1,
            None => {
                position.insert(path, ranking.len());
                ranking.push(PageRanking {
                    path: path.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    ranking.sort_by(|a, b| b.count.cmp(&a.count));
    ranking.truncate(TOP_PAGES_LIMIT);
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: NaiveDate, hour: u32) -> DateTime<Utc> {
        day.and_hms_opt(hour, 0, 0).unwrap().and_utc()
    }

    fn window() -> TrailingWindow {
        TrailingWindow::ending_at(Utc.with_ymd_and_hms(2024, 3, 7, 15, 30, 0).unwrap())
    }

    #[test]
    fn test_window_bounds() {
        let window = window();
        assert_eq!(window.today(), NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(window.first_day(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(window.start(), Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end(), Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap());
        assert_eq!(
            window.today_start(),
            Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_window_crosses_month_boundary() {
        let window = TrailingWindow::ending_at(Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap());
        let days: Vec<NaiveDate> = window.days().collect();
        assert_eq!(days.first(), Some(&NaiveDate::from_ymd_opt(2024, 2, 25).unwrap()));
        assert_eq!(days.last(), Some(&NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()));
    }

    #[test]
    fn test_empty_rows_yield_seven_zero_buckets() {
        let buckets = daily_buckets(&[], &window());
        assert_eq!(buckets.len(), 7);
        assert!(buckets.iter().all(|b| b.count == 0));
        assert!(buckets.windows(2).all(|pair| pair[0].date < pair[1].date));
        assert_eq!(buckets[0].label, "Mar 01");
        assert_eq!(buckets[6].label, "Mar 07");
        assert!(top_pages(&[]).is_empty());
    }

    #[test]
    fn test_scenario_counts_and_ranking() {
        let window = window();
        let day0 = window.first_day();
        let day3 = day0 + Duration::days(3);
        let rows = vec![
            VisitRow::new(at(day0, 8), "/a"),
            VisitRow::new(at(day0, 9), "/a"),
            VisitRow::new(at(day0, 10), "/b"),
            VisitRow::new(at(day3, 11), "/a"),
        ];

        let counts: Vec<u64> = daily_buckets(&rows, &window).iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![3, 0, 0, 1, 0, 0, 0]);

        assert_eq!(
            top_pages(&rows),
            vec![
                PageRanking { path: "/a".to_string(), count: 3 },
                PageRanking { path: "/b".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_bucket_boundaries_are_utc_midnight() {
        let window = window();
        let today = window.today();
        let rows = vec![
            VisitRow::new(window.today_start(), "/"),
            VisitRow::new(window.today_start() - Duration::milliseconds(1), "/"),
            VisitRow::new(window.end() - Duration::milliseconds(1), "/"),
        ];

        let buckets = daily_buckets(&rows, &window);
        assert_eq!(buckets[6].date, today);
        assert_eq!(buckets[6].count, 2);
        assert_eq!(buckets[5].count, 1);
    }

    #[test]
    fn test_rows_outside_window_are_ignored_by_buckets() {
        let window = window();
        let rows = vec![
            VisitRow::new(window.start() - Duration::seconds(1), "/old"),
            VisitRow::new(window.end(), "/future"),
            VisitRow::new(at(window.today(), 1), "/now"),
        ];

        let total: u64 = daily_buckets(&rows, &window).iter().map(|b| b.count).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_missing_or_empty_path_counts_as_root() {
        let day = window().today();
        let rows = vec![
            VisitRow { created_at: at(day, 1), page_path: None },
            VisitRow::new(at(day, 2), ""),
            VisitRow::new(at(day, 3), "/"),
        ];

        assert_eq!(
            top_pages(&rows),
            vec![PageRanking { path: "/".to_string(), count: 3 }]
        );
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let day = window().today();
        let rows: Vec<VisitRow> = ["/c", "/a", "/b", "/a", "/c", "/b", "/d"]
            .iter()
            .enumerate()
            .map(|(i, path)| VisitRow::new(at(day, i as u32), *path))
            .collect();

        let paths: Vec<String> = top_pages(&rows).into_iter().map(|p| p.path).collect();
        assert_eq!(paths, vec!["/c", "/a", "/b", "/d"]);
    }

    #[test]
    fn test_ranking_is_truncated_to_five() {
        let day = window().today();
        let mut rows = Vec::new();
        for (i, path) in ["/1", "/2", "/3", "/4", "/5", "/6", "/7"].iter().enumerate() {
            for _ in 0..=i {
                rows.push(VisitRow::new(at(day, 12), *path));
            }
        }

        let ranking = top_pages(&rows);
        assert_eq!(ranking.len(), TOP_PAGES_LIMIT);
        assert_eq!(ranking[0], PageRanking { path: "/7".to_string(), count: 7 });
        assert_eq!(ranking[4], PageRanking { path: "/3".to_string(), count: 3 });
        assert!(ranking.windows(2).all(|pair| pair[0].count >= pair[1].count));
    }
}
