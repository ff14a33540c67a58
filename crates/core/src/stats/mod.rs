//! Dashboard rollups over bookings, users and services.
//!
//! Snapshots are computed on every call and never cached.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AdminIdentity;
use crate::bookings::TimeWindow;
use crate::store::{Store, StoreError};

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("cannot derive calendar months around {0}")]
    Calendar(DateTime<Utc>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_bookings: u64,
    pub total_users: u64,
    pub total_revenue: f64,
    pub total_services: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub bookings: u64,
    pub users: u64,
    pub revenue: f64,
    pub booking_growth: f64,
    pub user_growth: f64,
    pub revenue_growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub overview: Overview,
    pub this_month: MonthSummary,
}

/// Percentage change from `previous` to `current`, to one decimal place.
/// A zero baseline yields 0 when nothing happened and 100 otherwise.
pub fn growth_percent(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current == 0.0 { 0.0 } else { 100.0 };
    }
    let change = (current - previous) / previous * 100.0;
    (change * 10.0).round() / 10.0
}

fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    Some(NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?.and_utc())
}

/// `(this month, last month)` as UTC calendar months around `now`.
fn month_windows(now: DateTime<Utc>) -> Option<(TimeWindow, TimeWindow)> {
    let this_start = month_start(now.year(), now.month())?;
    let next_start = this_start.checked_add_months(Months::new(1))?;
    let last_start = this_start.checked_sub_months(Months::new(1))?;
    Some((
        TimeWindow {
            from: this_start,
            to: next_start,
        },
        TimeWindow {
            from: last_start,
            to: this_start,
        },
    ))
}

#[derive(Clone)]
pub struct StatsAggregator {
    store: Arc<dyn Store>,
}

impl StatsAggregator {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn compute_snapshot(&self, admin: &AdminIdentity) -> Result<StatsSnapshot, StatsError> {
        tracing::debug!(admin = %admin.email, "computing stats snapshot");
        self.compute_at(Utc::now()).await
    }

    async fn compute_at(&self, now: DateTime<Utc>) -> Result<StatsSnapshot, StatsError> {
        let (this_month, last_month) = month_windows(now).ok_or(StatsError::Calendar(now))?;

        let all = self.store.booking_totals(None).await?;
        let total_users = self.store.user_count(None).await?;
        let total_services = self.store.count_active_services().await?;

        let current = self.store.booking_totals(Some(this_month)).await?;
        let previous = self.store.booking_totals(Some(last_month)).await?;
        let users_now = self.store.user_count(Some(this_month)).await?;
        let users_before = self.store.user_count(Some(last_month)).await?;

        Ok(StatsSnapshot {
            overview: Overview {
                total_bookings: all.count,
                total_users,
                total_revenue: all.revenue,
                total_services,
            },
            this_month: MonthSummary {
                bookings: current.count,
                users: users_now,
                revenue: current.revenue,
                booking_growth: growth_percent(current.count as f64, previous.count as f64),
                user_growth: growth_percent(users_now as f64, users_before as f64),
                revenue_growth: growth_percent(current.revenue, previous.revenue),
            },
        })
    }
}
