//! The three summary views derived from a filtered table.
//!
//! Every aggregator is a pure function of its input: total over empty tables
//! and deterministic in its output order.

use std::collections::{BTreeMap, BTreeSet};

use bikeshare_core::dates::days_between;
use bikeshare_core::models::{CategoryCount, DailySharing, EntityId, RfmRow, Table};
use chrono::NaiveDate;

// ── RFM accumulator ──────────────────────────────────────────────────────────

/// Running state for one entity while scanning the table.
#[derive(Debug, Clone, Copy)]
struct EntityActivity {
    latest: NaiveDate,
    monetary: u64,
}

// ── SharingAggregator ────────────────────────────────────────────────────────

/// Stateless helper that groups bike sharing records.
pub struct SharingAggregator;

impl SharingAggregator {
    /// One row per distinct `dteday` with the summed `cnt`, ascending by date.
    ///
    /// Days without records are not synthesized. Sums saturate at `u64::MAX`.
    pub fn aggregate_daily(table: &Table) -> Vec<DailySharing> {
        let mut map: BTreeMap<NaiveDate, u64> = BTreeMap::new();

        for record in table {
            let total = map.entry(record.dteday).or_default();
            *total = total.saturating_add(record.cnt);
        }

        map.into_iter()
            .map(|(date, total_cnt)| DailySharing { date, total_cnt })
            .collect()
    }

    /// Distinct `instant` count per `holiday` value, ascending by key.
    ///
    /// This is a distinct-entity count, not a row tally: an entity seen on
    /// several rows of one category counts once.
    pub fn aggregate_by_category(table: &Table) -> Vec<CategoryCount> {
        let mut map: BTreeMap<_, BTreeSet<&EntityId>> = BTreeMap::new();

        for record in table {
            map.entry(&record.holiday)
                .or_default()
                .insert(&record.instant);
        }

        map.into_iter()
            .map(|(holiday, instants)| CategoryCount {
                holiday: holiday.clone(),
                distinct_instants: instants.len(),
            })
            .collect()
    }

    /// Recency and monetary value per `instant`, ascending by identifier.
    ///
    /// Recency is measured against the latest date present in `table` itself,
    /// so narrowing the filter window changes every entity's recency.
    pub fn aggregate_rfm(table: &Table) -> Vec<RfmRow> {
        let Some(global_latest) = table.iter().map(|r| r.dteday).max() else {
            return Vec::new();
        };

        let mut map: BTreeMap<&EntityId, EntityActivity> = BTreeMap::new();

        for record in table {
            map.entry(&record.instant)
                .and_modify(|a| {
                    a.latest = a.latest.max(record.dteday);
                    a.monetary = a.monetary.saturating_add(record.cnt);
                })
                .or_insert(EntityActivity {
                    latest: record.dteday,
                    monetary: record.cnt,
                });
        }

        map.into_iter()
            .map(|(instant, activity)| RfmRow {
                instant: instant.clone(),
                recency_days: days_between(global_latest, activity.latest),
                monetary: activity.monetary,
            })
            .collect()
    }

    /// Sum of `total_cnt` over all daily rows ("Total Sharing").
    pub fn total_sharing(daily: &[DailySharing]) -> u64 {
        daily
            .iter()
            .fold(0u64, |acc, d| acc.saturating_add(d.total_cnt))
    }

    /// Mean `recency_days`, or `None` when there are no rows.
    pub fn average_recency(rfm: &[RfmRow]) -> Option<f64> {
        mean(rfm.iter().map(|r| r.recency_days as f64))
    }

    /// Mean `monetary`, or `None` when there are no rows.
    pub fn average_monetary(rfm: &[RfmRow]) -> Option<f64> {
        mean(rfm.iter().map(|r| r.monetary as f64))
    }

    /// The `n` most recently active entities (smallest recency first).
    ///
    /// Ties keep ascending identifier order.
    pub fn top_by_recency(rfm: &[RfmRow], n: usize) -> Vec<RfmRow> {
        let mut ranked = rfm.to_vec();
        ranked.sort_by(|a, b| {
            a.recency_days
                .cmp(&b.recency_days)
                .then_with(|| a.instant.cmp(&b.instant))
        });
        ranked.truncate(n);
        ranked
    }

    /// The `n` entities with the largest monetary value.
    ///
    /// Ties keep ascending identifier order.
    pub fn top_by_monetary(rfm: &[RfmRow], n: usize) -> Vec<RfmRow> {
        let mut ranked = rfm.to_vec();
        ranked.sort_by(|a, b| {
            b.monetary
                .cmp(&a.monetary)
                .then_with(|| a.instant.cmp(&b.instant))
        });
        ranked.truncate(n);
        ranked
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::models::{Key, Record};
    use std::collections::HashSet;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rec(instant: i64, dteday: NaiveDate, holiday: i64, cnt: u64) -> Record {
        Record::new(Key::Int(instant), dteday, Key::Int(holiday), cnt)
    }

    /// The three-row example used throughout the docs.
    fn scenario_table() -> Table {
        Table::from_records(vec![
            rec(1, d(2011, 1, 1), 0, 10),
            rec(1, d(2011, 1, 2), 0, 5),
            rec(2, d(2011, 1, 2), 1, 20),
        ])
    }

    /// A messier table: repeated entities across categories and days.
    fn mixed_table() -> Table {
        Table::from_records(vec![
            rec(3, d(2011, 1, 5), 0, 7),
            rec(1, d(2011, 1, 1), 0, 4),
            rec(2, d(2011, 1, 1), 1, 9),
            rec(1, d(2011, 1, 3), 1, 2),
            rec(3, d(2011, 1, 3), 0, 0),
            rec(2, d(2011, 1, 5), 1, 11),
            rec(4, d(2011, 1, 2), 0, 6),
        ])
    }

    // ── Scenario ─────────────────────────────────────────────────────────────

    #[test]
    fn test_scenario_daily() {
        let daily = SharingAggregator::aggregate_daily(&scenario_table());
        assert_eq!(
            daily,
            vec![
                DailySharing {
                    date: d(2011, 1, 1),
                    total_cnt: 10
                },
                DailySharing {
                    date: d(2011, 1, 2),
                    total_cnt: 25
                },
            ]
        );
    }

    #[test]
    fn test_scenario_category() {
        let categories = SharingAggregator::aggregate_by_category(&scenario_table());
        assert_eq!(
            categories,
            vec![
                CategoryCount {
                    holiday: Key::Int(0),
                    distinct_instants: 1
                },
                CategoryCount {
                    holiday: Key::Int(1),
                    distinct_instants: 1
                },
            ]
        );
    }

    #[test]
    fn test_scenario_rfm() {
        let rfm = SharingAggregator::aggregate_rfm(&scenario_table());
        assert_eq!(
            rfm,
            vec![
                RfmRow {
                    instant: Key::Int(1),
                    recency_days: 1,
                    monetary: 15
                },
                RfmRow {
                    instant: Key::Int(2),
                    recency_days: 0,
                    monetary: 20
                },
            ]
        );
    }

    // ── aggregate_daily ──────────────────────────────────────────────────────

    #[test]
    fn test_daily_conserves_total() {
        let table = mixed_table();
        let daily = SharingAggregator::aggregate_daily(&table);
        assert_eq!(SharingAggregator::total_sharing(&daily), table.total_cnt());
    }

    #[test]
    fn test_daily_one_row_per_distinct_date_sorted() {
        let table = mixed_table();
        let daily = SharingAggregator::aggregate_daily(&table);

        let distinct: HashSet<NaiveDate> = table.iter().map(|r| r.dteday).collect();
        assert_eq!(daily.len(), distinct.len());
        assert!(daily.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_daily_does_not_fill_gaps() {
        let table = Table::from_records(vec![
            rec(1, d(2011, 1, 1), 0, 1),
            rec(1, d(2011, 1, 10), 0, 1),
        ]);
        let daily = SharingAggregator::aggregate_daily(&table);
        assert_eq!(daily.len(), 2);
    }

    #[test]
    fn test_daily_empty() {
        assert!(SharingAggregator::aggregate_daily(&Table::default()).is_empty());
    }

    // ── aggregate_by_category ────────────────────────────────────────────────

    #[test]
    fn test_category_counts_distinct_instants_not_rows() {
        let table = Table::from_records(vec![
            rec(1, d(2011, 1, 1), 0, 1),
            rec(1, d(2011, 1, 2), 0, 1),
            rec(1, d(2011, 1, 3), 0, 1),
            rec(2, d(2011, 1, 3), 0, 1),
        ]);
        let categories = SharingAggregator::aggregate_by_category(&table);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].distinct_instants, 2);
    }

    #[test]
    fn test_category_properties() {
        let table = mixed_table();
        let categories = SharingAggregator::aggregate_by_category(&table);

        let distinct_keys: HashSet<&Key> = table.iter().map(|r| &r.holiday).collect();
        assert_eq!(categories.len(), distinct_keys.len());

        for row in &categories {
            let rows: Vec<&Record> = table.iter().filter(|r| r.holiday == row.holiday).collect();
            let instants: HashSet<&Key> = rows.iter().map(|r| &r.instant).collect();
            assert!(row.distinct_instants <= rows.len());
            assert_eq!(row.distinct_instants, instants.len());
        }
    }

    #[test]
    fn test_category_sorted_by_key() {
        let table = Table::from_records(vec![
            Record::new(Key::Int(1), d(2011, 1, 1), Key::from("weekend"), 1),
            Record::new(Key::Int(2), d(2011, 1, 1), Key::Int(1), 1),
            Record::new(Key::Int(3), d(2011, 1, 1), Key::Int(0), 1),
        ]);
        let keys: Vec<Key> = SharingAggregator::aggregate_by_category(&table)
            .into_iter()
            .map(|c| c.holiday)
            .collect();
        assert_eq!(keys, vec![Key::Int(0), Key::Int(1), Key::from("weekend")]);
    }

    #[test]
    fn test_category_empty() {
        assert!(SharingAggregator::aggregate_by_category(&Table::default()).is_empty());
    }

    // ── aggregate_rfm ────────────────────────────────────────────────────────

    #[test]
    fn test_rfm_recency_non_negative_and_zero_for_latest() {
        let table = mixed_table();
        let rfm = SharingAggregator::aggregate_rfm(&table);
        let global_latest = table.iter().map(|r| r.dteday).max().unwrap();

        assert!(rfm.iter().all(|r| r.recency_days >= 0));
        for row in &rfm {
            let entity_latest = table
                .iter()
                .filter(|r| r.instant == row.instant)
                .map(|r| r.dteday)
                .max()
                .unwrap();
            if entity_latest == global_latest {
                assert_eq!(row.recency_days, 0);
            }
        }
    }

    #[test]
    fn test_rfm_values() {
        let rfm = SharingAggregator::aggregate_rfm(&mixed_table());
        let by_id: Vec<(Key, i64, u64)> = rfm
            .into_iter()
            .map(|r| (r.instant, r.recency_days, r.monetary))
            .collect();
        assert_eq!(
            by_id,
            vec![
                (Key::Int(1), 2, 6),
                (Key::Int(2), 0, 20),
                (Key::Int(3), 0, 7),
                (Key::Int(4), 3, 6),
            ]
        );
    }

    #[test]
    fn test_rfm_single_record_entity() {
        let table = Table::from_records(vec![
            rec(1, d(2011, 1, 1), 0, 3),
            rec(2, d(2011, 1, 31), 0, 4),
        ]);
        let rfm = SharingAggregator::aggregate_rfm(&table);
        assert_eq!(rfm[0].recency_days, 30);
        assert_eq!(rfm[1].recency_days, 0);
    }

    #[test]
    fn test_rfm_empty() {
        assert!(SharingAggregator::aggregate_rfm(&Table::default()).is_empty());
    }

    #[test]
    fn test_aggregators_idempotent() {
        let table = mixed_table();
        assert_eq!(
            SharingAggregator::aggregate_daily(&table),
            SharingAggregator::aggregate_daily(&table)
        );
        assert_eq!(
            SharingAggregator::aggregate_by_category(&table),
            SharingAggregator::aggregate_by_category(&table)
        );
        assert_eq!(
            SharingAggregator::aggregate_rfm(&table),
            SharingAggregator::aggregate_rfm(&table)
        );
    }

    // ── Summaries ────────────────────────────────────────────────────────────

    #[test]
    fn test_averages() {
        let rfm = SharingAggregator::aggregate_rfm(&scenario_table());
        assert_eq!(SharingAggregator::average_recency(&rfm), Some(0.5));
        assert_eq!(SharingAggregator::average_monetary(&rfm), Some(17.5));
    }

    #[test]
    fn test_averages_empty_are_none() {
        assert_eq!(SharingAggregator::average_recency(&[]), None);
        assert_eq!(SharingAggregator::average_monetary(&[]), None);
        assert_eq!(SharingAggregator::total_sharing(&[]), 0);
    }

    #[test]
    fn test_counts_near_u64_max_saturate() {
        let data = format!(
            "instant,dteday,holiday,cnt\n1,2011-01-01,0,{}\n1,2011-01-01,0,1\n",
            u64::MAX
        );
        let table = crate::reader::read_table(data.as_bytes()).unwrap();

        let daily = SharingAggregator::aggregate_daily(&table);
        assert_eq!(daily[0].total_cnt, u64::MAX);

        let rfm = SharingAggregator::aggregate_rfm(&table);
        assert_eq!(rfm[0].monetary, u64::MAX);

        let split = vec![
            DailySharing {
                date: d(2011, 1, 1),
                total_cnt: u64::MAX,
            },
            DailySharing {
                date: d(2011, 1, 2),
                total_cnt: 7,
            },
        ];
        assert_eq!(SharingAggregator::total_sharing(&split), u64::MAX);
        assert_eq!(table.total_cnt(), u64::MAX);
    }

    // ── Rankings ─────────────────────────────────────────────────────────────

    #[test]
    fn test_top_by_recency() {
        let rfm = SharingAggregator::aggregate_rfm(&mixed_table());
        let top: Vec<Key> = SharingAggregator::top_by_recency(&rfm, 3)
            .into_iter()
            .map(|r| r.instant)
            .collect();
        assert_eq!(top, vec![Key::Int(2), Key::Int(3), Key::Int(1)]);
    }

    #[test]
    fn test_top_by_monetary() {
        let rfm = SharingAggregator::aggregate_rfm(&mixed_table());
        let top: Vec<Key> = SharingAggregator::top_by_monetary(&rfm, 10)
            .into_iter()
            .map(|r| r.instant)
            .collect();
        // 1 and 4 tie on 6; the lower id ranks first.
        assert_eq!(top, vec![Key::Int(2), Key::Int(3), Key::Int(1), Key::Int(4)]);
    }
}
