//! Per-entity row transformers (employees, customers, appointments).

use crate::core::normalize::{
    normalize_appointment_status, normalize_date, normalize_datetime, normalize_phone,
    parse_active_flag, parse_datetime, parse_marketing_opt_in, title_case, DateFormatError,
};
use crate::core::RowTransformer;
use crate::domain::model::{AppointmentRecord, CustomerRecord, EmployeeRecord, RawRow};
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDateTime;

/// Applies `transformer` to every row, stopping at the first failure.
pub fn transform_rows<T: RowTransformer>(transformer: &T, rows: &[RawRow]) -> Result<Vec<T::Output>> {
    rows.iter()
        .map(|row| {
            row.require(transformer.required_fields())?;
            transformer.transform_row(row)
        })
        .collect()
}

fn text(row: &RawRow, field: &str) -> Result<String> {
    Ok(row.get(field)?.trim().to_string())
}

fn title(row: &RawRow, field: &str) -> Result<String> {
    Ok(title_case(row.get(field)?.trim()))
}

fn lower(row: &RawRow, field: &str) -> Result<String> {
    Ok(row.get(field)?.trim().to_lowercase())
}

fn full_name(row: &RawRow) -> Result<String> {
    Ok(format!("{} {}", title(row, "first_name")?, title(row, "last_name")?))
}

fn number(row: &RawRow, field: &str) -> Result<f64> {
    let value = row.get(field)?;
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|e| EtlError::parse(field, value, e, Some(row.line())))?;

    if !parsed.is_finite() {
        return Err(EtlError::parse(field, value, "value is not a finite number", Some(row.line())));
    }
    Ok(parsed)
}

fn amount(row: &RawRow, field: &str) -> Result<String> {
    Ok(format!("{:.2}", number(row, field)?))
}

fn date(row: &RawRow, field: &str) -> Result<String> {
    let value = row.get(field)?;
    normalize_date(value).map_err(|e| EtlError::parse(field, value, e, Some(row.line())))
}

fn datetime(row: &RawRow, field: &str) -> Result<(NaiveDateTime, String)> {
    let value = row.get(field)?;
    let err = |e: DateFormatError| EtlError::parse(field, value, e, Some(row.line()));

    let parsed = parse_datetime(value).map_err(err)?;
    let normalized = normalize_datetime(value).map_err(err)?;
    Ok((parsed, normalized))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmployeeTransformer;

impl RowTransformer for EmployeeTransformer {
    type Output = EmployeeRecord;

    fn required_fields(&self) -> &'static [&'static str] {
        &[
            "employee_id",
            "first_name",
            "last_name",
            "email",
            "phone",
            "role",
            "hire_date",
            "is_active",
            "hourly_rate",
            "commission_rate",
            "specialty",
        ]
    }

    fn transform_row(&self, row: &RawRow) -> Result<EmployeeRecord> {
        Ok(EmployeeRecord {
            employee_id: text(row, "employee_id")?,
            full_name: full_name(row)?,
            email: lower(row, "email")?,
            phone: normalize_phone(row.get("phone")?),
            role: title(row, "role")?,
            hire_date: date(row, "hire_date")?,
            status: parse_active_flag(row.get("is_active")?),
            hourly_rate: amount(row, "hourly_rate")?,
            commission_rate: amount(row, "commission_rate")?,
            specialty: title(row, "specialty")?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerTransformer;

impl RowTransformer for CustomerTransformer {
    type Output = CustomerRecord;

    fn required_fields(&self) -> &'static [&'static str] {
        &[
            "customer_id",
            "first_name",
            "last_name",
            "email",
            "phone",
            "joined_date",
            "loyalty_points",
            "marketing_opt_in",
            "preferred_contact",
        ]
    }

    fn transform_row(&self, row: &RawRow) -> Result<CustomerRecord> {
        // 點數可能以小數輸出，取整數部分（向零截斷）；不轉 i64 以免大數飽和，+ 0.0 去掉 -0
        let loyalty_points = number(row, "loyalty_points")?.trunc() + 0.0;

        Ok(CustomerRecord {
            customer_id: text(row, "customer_id")?,
            full_name: full_name(row)?,
            email: lower(row, "email")?,
            phone: normalize_phone(row.get("phone")?),
            joined_date: date(row, "joined_date")?,
            loyalty_points: format!("{:.0}", loyalty_points),
            marketing_opt_in: parse_marketing_opt_in(row.get("marketing_opt_in")?),
            preferred_contact: lower(row, "preferred_contact")?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppointmentTransformer;

impl RowTransformer for AppointmentTransformer {
    type Output = AppointmentRecord;

    fn required_fields(&self) -> &'static [&'static str] {
        &[
            "appointment_id",
            "customer_id",
            "employee_id",
            "service_name",
            "appointment_start",
            "appointment_end",
            "status",
            "service_price",
            "payment_method",
            "tip_amount",
        ]
    }

    fn transform_row(&self, row: &RawRow) -> Result<AppointmentRecord> {
        let (start, appointment_start) = datetime(row, "appointment_start")?;
        let (end, appointment_end) = datetime(row, "appointment_end")?;
        let duration_minutes = (end - start).num_seconds().div_euclid(60);

        Ok(AppointmentRecord {
            appointment_id: text(row, "appointment_id")?,
            customer_id: text(row, "customer_id")?,
            employee_id: text(row, "employee_id")?,
            service_name: title(row, "service_name")?,
            appointment_start,
            appointment_end,
            duration_minutes: duration_minutes.to_string(),
            status: normalize_appointment_status(row.get("status")?),
            service_price: amount(row, "service_price")?,
            payment_method: lower(row, "payment_method")?,
            tip_amount: amount(row, "tip_amount")?,
        })
    }
}
