//! Daily activity aggregation for movement charts.
//!
//! Buckets are calendar days **in the viewer's timezone**, not fixed 24-hour
//! offsets from the query instant. A warehouse manager in UTC+2 looking at
//! "today" sees movements grouped by their local midnight boundaries, so a
//! movement stamped 23:30 UTC belongs to the next local day.

use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use serde::Serialize;

use stockbook_ledger::{MovementKind, StockMovement};

/// Totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityBucket {
    pub date: NaiveDate,
    pub stock_in: i64,
    pub stock_out: i64,
}

/// Bucket movements into the last `window_days` calendar days, as seen from
/// `now`'s timezone.
///
/// Returns exactly `window_days` buckets, oldest first, ending with the
/// (possibly still accumulating) current day. Days without movements are
/// present with zero totals. Movements outside the window are ignored.
pub fn daily_activity<Tz: TimeZone>(
    movements: &[StockMovement],
    window_days: u32,
    now: DateTime<Tz>,
) -> Vec<ActivityBucket> {
    if window_days == 0 {
        return Vec::new();
    }

    let today = now.date_naive();
    let start = today - Duration::days(i64::from(window_days) - 1);

    let mut buckets: Vec<ActivityBucket> = (0..window_days)
        .map(|offset| ActivityBucket {
            date: start + Duration::days(i64::from(offset)),
            stock_in: 0,
            stock_out: 0,
        })
        .collect();

    let tz = now.timezone();
    for movement in movements {
        let local_date = movement.occurred_at.with_timezone(&tz).date_naive();
        if local_date < start || local_date > today {
            continue;
        }
        let index = (local_date - start).num_days() as usize;
        match movement.kind {
            MovementKind::In => buckets[index].stock_in += movement.quantity,
            MovementKind::Out => buckets[index].stock_out += movement.quantity,
        }
    }

    buckets
}
