use crate::domain::model::{DailySummaryRow, EnrichedAppointment};
use crate::utils::error::{EtlError, Result};
use std::collections::BTreeMap;

type BucketKey = (String, String, String);

#[derive(Debug, Clone, Default)]
struct SummaryBucket {
    appointments_count: u64,
    completed_appointments: u64,
    service_revenue: f64,
    tip_revenue: f64,
}

fn parse_amount(field: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| EtlError::parse(field, value, e, None))
}

/// Groups appointments by (date, employee id, employee name).
///
/// Every appointment counts towards `appointments_count`; only completed ones
/// add to the completed count and revenue. Rows come out sorted by key.
pub fn summarize_daily(rows: &[EnrichedAppointment]) -> Result<Vec<DailySummaryRow>> {
    let mut buckets: BTreeMap<BucketKey, SummaryBucket> = BTreeMap::new();

    for row in rows {
        let appointment_date = row
            .appointment_start
            .split(' ')
            .next()
            .unwrap_or_default()
            .to_string();
        let key = (appointment_date, row.employee_id.clone(), row.employee_name.clone());
        let bucket = buckets.entry(key).or_default();

        bucket.appointments_count += 1;

        if row.status.trim().eq_ignore_ascii_case("completed") {
            bucket.completed_appointments += 1;
            bucket.service_revenue += parse_amount("service_price", &row.service_price)?;
            bucket.tip_revenue += parse_amount("tip_amount", &row.tip_amount)?;
        }
    }

    tracing::debug!("Built {} daily summary buckets", buckets.len());

    Ok(buckets
        .into_iter()
        .map(|((appointment_date, employee_id, employee_name), bucket)| DailySummaryRow {
            appointment_date,
            employee_id,
            employee_name,
            appointments_count: bucket.appointments_count,
            completed_appointments: bucket.completed_appointments,
            service_revenue: format!("{:.2}", bucket.service_revenue),
            tip_revenue: format!("{:.2}", bucket.tip_revenue),
            total_revenue: format!("{:.2}", bucket.service_revenue + bucket.tip_revenue),
        })
        .collect())
}
