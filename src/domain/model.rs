use crate::utils::error::{EtlError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One line of a source CSV, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    line: u64,
    data: HashMap<String, String>,
}

impl RawRow {
    pub fn new(line: u64, data: HashMap<String, String>) -> Self {
        Self { line, data }
    }

    pub fn from_pairs<K, V, I>(line: u64, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            line,
            data: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Source line number (1-based, header is line 1).
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn get(&self, field: &str) -> Result<&str> {
        self.data
            .get(field)
            .map(String::as_str)
            .ok_or_else(|| EtlError::MissingFieldError {
                field: field.to_string(),
                line: Some(self.line),
            })
    }

    /// Fails on the first field in `fields` that the row does not carry.
    pub fn require(&self, fields: &[&str]) -> Result<()> {
        for field in fields {
            self.get(field)?;
        }
        Ok(())
    }
}

/// A typed output row with a fixed column order.
///
/// `COLUMNS` must list the struct's fields in declaration order so that the
/// explicit header matches what serde writes.
pub trait CsvRecord: Serialize + DeserializeOwned {
    const COLUMNS: &'static [&'static str];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub hire_date: String,
    pub status: String,
    pub hourly_rate: String,
    pub commission_rate: String,
    pub specialty: String,
}

impl CsvRecord for EmployeeRecord {
    const COLUMNS: &'static [&'static str] = &[
        "employee_id",
        "full_name",
        "email",
        "phone",
        "role",
        "hire_date",
        "status",
        "hourly_rate",
        "commission_rate",
        "specialty",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub joined_date: String,
    pub loyalty_points: String,
    pub marketing_opt_in: String,
    pub preferred_contact: String,
}

impl CsvRecord for CustomerRecord {
    const COLUMNS: &'static [&'static str] = &[
        "customer_id",
        "full_name",
        "email",
        "phone",
        "joined_date",
        "loyalty_points",
        "marketing_opt_in",
        "preferred_contact",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub appointment_id: String,
    pub customer_id: String,
    pub employee_id: String,
    pub service_name: String,
    pub appointment_start: String,
    pub appointment_end: String,
    pub duration_minutes: String,
    pub status: String,
    pub service_price: String,
    pub payment_method: String,
    pub tip_amount: String,
}

impl CsvRecord for AppointmentRecord {
    const COLUMNS: &'static [&'static str] = &[
        "appointment_id",
        "customer_id",
        "employee_id",
        "service_name",
        "appointment_start",
        "appointment_end",
        "duration_minutes",
        "status",
        "service_price",
        "payment_method",
        "tip_amount",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedAppointment {
    pub appointment_id: String,
    pub appointment_start: String,
    pub appointment_end: String,
    pub duration_minutes: String,
    pub status: String,
    pub service_name: String,
    pub service_price: String,
    pub tip_amount: String,
    pub payment_method: String,
    pub customer_id: String,
    pub customer_name: String,
    pub employee_id: String,
    pub employee_name: String,
}

impl CsvRecord for EnrichedAppointment {
    const COLUMNS: &'static [&'static str] = &[
        "appointment_id",
        "appointment_start",
        "appointment_end",
        "duration_minutes",
        "status",
        "service_name",
        "service_price",
        "tip_amount",
        "payment_method",
        "customer_id",
        "customer_name",
        "employee_id",
        "employee_name",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummaryRow {
    pub appointment_date: String,
    pub employee_id: String,
    pub employee_name: String,
    pub appointments_count: u64,
    pub completed_appointments: u64,
    pub service_revenue: String,
    pub tip_revenue: String,
    pub total_revenue: String,
}

impl CsvRecord for DailySummaryRow {
    const COLUMNS: &'static [&'static str] = &[
        "appointment_date",
        "employee_id",
        "employee_name",
        "appointments_count",
        "completed_appointments",
        "service_revenue",
        "tip_revenue",
        "total_revenue",
    ];
}
