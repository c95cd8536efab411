use crate::domain::model::{AppointmentRecord, EnrichedAppointment, RawRow};
use crate::utils::error::Result;
use std::collections::HashMap;

pub const UNKNOWN_CUSTOMER: &str = "Unknown Customer";
pub const UNKNOWN_EMPLOYEE: &str = "Unknown Employee";

/// Id → display name, with a fallback for ids that are not present.
#[derive(Debug, Clone)]
pub struct NameLookup {
    names: HashMap<String, String>,
    fallback: &'static str,
}

impl NameLookup {
    pub fn new(fallback: &'static str) -> Self {
        Self {
            names: HashMap::new(),
            fallback,
        }
    }

    /// Builds a lookup from normalized output rows. A repeated id keeps the
    /// name from its last row.
    pub fn from_rows(
        rows: &[RawRow],
        id_field: &str,
        name_field: &str,
        fallback: &'static str,
    ) -> Result<Self> {
        let mut lookup = Self::new(fallback);
        for row in rows {
            lookup.insert(row.get(id_field)?, row.get(name_field)?);
        }
        Ok(lookup)
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn resolve(&self, id: &str) -> &str {
        self.get(id).unwrap_or(self.fallback)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub rows: Vec<EnrichedAppointment>,
    pub customer_misses: usize,
    pub employee_misses: usize,
}

impl Enrichment {
    pub fn lookup_misses(&self) -> usize {
        self.customer_misses + self.employee_misses
    }
}

pub fn enrich_appointments(
    appointments: &[AppointmentRecord],
    employees: &NameLookup,
    customers: &NameLookup,
) -> Enrichment {
    let mut enrichment = Enrichment {
        rows: Vec::with_capacity(appointments.len()),
        ..Default::default()
    };

    for appointment in appointments {
        if customers.get(&appointment.customer_id).is_none() {
            tracing::warn!(
                "⚠️ Appointment {} references unknown customer '{}'",
                appointment.appointment_id,
                appointment.customer_id
            );
            enrichment.customer_misses += 1;
        }
        if employees.get(&appointment.employee_id).is_none() {
            tracing::warn!(
                "⚠️ Appointment {} references unknown employee '{}'",
                appointment.appointment_id,
                appointment.employee_id
            );
            enrichment.employee_misses += 1;
        }

        enrichment.rows.push(EnrichedAppointment {
            appointment_id: appointment.appointment_id.clone(),
            appointment_start: appointment.appointment_start.clone(),
            appointment_end: appointment.appointment_end.clone(),
            duration_minutes: appointment.duration_minutes.clone(),
            status: appointment.status.clone(),
            service_name: appointment.service_name.clone(),
            service_price: appointment.service_price.clone(),
            tip_amount: appointment.tip_amount.clone(),
            payment_method: appointment.payment_method.clone(),
            customer_id: appointment.customer_id.clone(),
            customer_name: customers.resolve(&appointment.customer_id).to_string(),
            employee_id: appointment.employee_id.clone(),
            employee_name: employees.resolve(&appointment.employee_id).to_string(),
        });
    }

    enrichment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(id: &str, customer_id: &str, employee_id: &str) -> AppointmentRecord {
        AppointmentRecord {
            appointment_id: id.to_string(),
            customer_id: customer_id.to_string(),
            employee_id: employee_id.to_string(),
            service_name: "Beard Trim".to_string(),
            appointment_start: "2024-01-01 09:00".to_string(),
            appointment_end: "2024-01-01 09:30".to_string(),
            duration_minutes: "30".to_string(),
            status: "Completed".to_string(),
            service_price: "25.00".to_string(),
            payment_method: "cash".to_string(),
            tip_amount: "3.00".to_string(),
        }
    }

    #[test]
    fn test_enrich_attaches_names() {
        let mut employees = NameLookup::new(UNKNOWN_EMPLOYEE);
        employees.insert("E1", "Ana Diaz");
        let mut customers = NameLookup::new(UNKNOWN_CUSTOMER);
        customers.insert("C1", "Bo Lee");

        let result = enrich_appointments(&[appointment("A1", "C1", "E1")], &employees, &customers);

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].customer_name, "Bo Lee");
        assert_eq!(result.rows[0].employee_name, "Ana Diaz");
        assert_eq!(result.rows[0].service_price, "25.00");
        assert_eq!(result.lookup_misses(), 0);
    }

    #[test]
    fn test_unknown_customer_uses_sentinel() {
        let mut employees = NameLookup::new(UNKNOWN_EMPLOYEE);
        employees.insert("E1", "Ana Diaz");
        let customers = NameLookup::new(UNKNOWN_CUSTOMER);

        let result = enrich_appointments(
            &[appointment("A1", "C404", "E1"), appointment("A2", "C1", "E404")],
            &employees,
            &customers,
        );

        assert_eq!(result.rows[0].customer_name, "Unknown Customer");
        assert_eq!(result.rows[1].employee_name, "Unknown Employee");
        assert_eq!(result.customer_misses, 2);
        assert_eq!(result.employee_misses, 1);
    }

    #[test]
    fn test_lookup_last_duplicate_wins() {
        let rows = vec![
            RawRow::from_pairs(2, [("employee_id", "E1"), ("full_name", "First Name")]),
            RawRow::from_pairs(3, [("employee_id", "E1"), ("full_name", "Second Name")]),
        ];

        let lookup = NameLookup::from_rows(&rows, "employee_id", "full_name", UNKNOWN_EMPLOYEE).unwrap();

        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.resolve("E1"), "Second Name");
        assert_eq!(lookup.resolve("E2"), UNKNOWN_EMPLOYEE);
    }

    #[test]
    fn test_lookup_requires_id_column() {
        let rows = vec![RawRow::from_pairs(2, [("id", "E1"), ("full_name", "Ana")])];
        assert!(NameLookup::from_rows(&rows, "employee_id", "full_name", UNKNOWN_EMPLOYEE).is_err());
    }
}
