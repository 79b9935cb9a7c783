use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

use crate::MonthlyBucket;

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Number of calendar months in the activity chart, current month included.
pub const ACTIVITY_WINDOW_MONTHS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month0: u32,
}

impl MonthKey {
    pub fn of(date: &impl Datelike) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn name(&self) -> &'static str {
        MONTH_NAMES[self.month0 as usize % 12]
    }
}

/// Fixed run of monthly buckets ending at the month of `now`.
///
/// Buckets are keyed by year and month, so a date from the same month of the
/// previous year never lands in a current bucket. Dates outside the window
/// are dropped.
#[derive(Debug, Clone)]
pub struct MonthWindow {
    buckets: Vec<(MonthKey, MonthlyBucket)>,
    cutoff: DateTime<Utc>,
}

impl MonthWindow {
    pub fn ending_at(now: DateTime<Utc>) -> Self {
        let first_of_month = NaiveDate::from_ymd_opt(now.year(), now.month(), 1);
        let buckets = (0..ACTIVITY_WINDOW_MONTHS)
            .rev()
            .filter_map(|offset| first_of_month?.checked_sub_months(Months::new(offset)))
            .map(|month| {
                let key = MonthKey::of(&month);
                (key, MonthlyBucket::empty(key.name()))
            })
            .collect();

        Self {
            buckets,
            cutoff: now
                .checked_sub_months(Months::new(ACTIVITY_WINDOW_MONTHS))
                .unwrap_or(now),
        }
    }

    /// Same instant `ACTIVITY_WINDOW_MONTHS` months back. Used as the lower
    /// bound for upstream queries.
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    pub fn keys(&self) -> impl Iterator<Item = MonthKey> + '_ {
        self.buckets.iter().map(|(key, _)| *key)
    }

    pub fn bucket_mut(&mut self, date: &impl Datelike) -> Option<&mut MonthlyBucket> {
        let key = MonthKey::of(date);
        self.buckets
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, bucket)| bucket)
    }

    pub fn add_commits(&mut self, date: NaiveDate, count: u32) {
        if let Some(bucket) = self.bucket_mut(&date) {
            bucket.commit += count as u64;
        }
    }

    pub fn add_pull_request(&mut self, created_at: DateTime<Utc>) {
        if let Some(bucket) = self.bucket_mut(&created_at) {
            bucket.prs += 1;
        }
    }

    pub fn add_review(&mut self, created_at: DateTime<Utc>) {
        if let Some(bucket) = self.bucket_mut(&created_at) {
            bucket.review += 1;
        }
    }

    /// Buckets oldest first.
    pub fn into_buckets(self) -> Vec<MonthlyBucket> {
        self.buckets.into_iter().map(|(_, bucket)| bucket).collect()
    }
}
