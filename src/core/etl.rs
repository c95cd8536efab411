use crate::adapters::csv_io::{parse_raw_rows, parse_records, render_records};
use crate::config::EtlPaths;
use crate::core::enrich::{enrich_appointments, NameLookup, UNKNOWN_CUSTOMER, UNKNOWN_EMPLOYEE};
use crate::core::summary::summarize_daily;
use crate::core::transform::{
    transform_rows, AppointmentTransformer, CustomerTransformer, EmployeeTransformer,
};
use crate::core::{CsvRecord, RowTransformer, Storage};
use crate::domain::model::{AppointmentRecord, EnrichedAppointment, RawRow};
use crate::utils::error::{EtlError, Result};
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Employees,
    Customers,
    Appointments,
    Enrichment,
    DailySummary,
}

impl Stage {
    /// Execution order; later stages read the outputs of earlier ones.
    pub const ALL: [Stage; 5] = [
        Stage::Employees,
        Stage::Customers,
        Stage::Appointments,
        Stage::Enrichment,
        Stage::DailySummary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Employees => "employees",
            Stage::Customers => "customers",
            Stage::Appointments => "appointments",
            Stage::Enrichment => "enrichment",
            Stage::DailySummary => "daily_summary",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage 執行結果
#[derive(Debug, Clone)]
pub struct StageResult {
    pub stage: Stage,
    pub output_path: String,
    pub records: usize,
    pub lookup_misses: usize,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedInput {
    pub path: String,
    /// Stage that writes this file during the run, `None` for raw exports.
    pub produced_by: Option<Stage>,
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    pub stage: Stage,
    pub inputs: Vec<PlannedInput>,
    pub output: String,
}

pub struct EtlEngine<S: Storage> {
    storage: S,
    paths: EtlPaths,
}

impl<S: Storage> EtlEngine<S> {
    pub fn new(storage: S, paths: EtlPaths) -> Self {
        Self { storage, paths }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn paths(&self) -> &EtlPaths {
        &self.paths
    }

    /// Runs every stage in order and stops at the first failure.
    pub fn run(&self) -> Result<Vec<StageResult>> {
        tracing::info!("🚀 Starting ETL run ({} stages)", Stage::ALL.len());

        let mut results = Vec::with_capacity(Stage::ALL.len());
        for stage in Stage::ALL {
            let result = self.run_stage(stage).map_err(|e| {
                tracing::error!("❌ Stage '{}' failed: {}", stage, e);
                e.in_stage(stage.as_str())
            })?;

            tracing::info!(
                "✅ Stage executed: {} (records: {}, duration: {:?})",
                result.stage,
                result.records,
                result.duration
            );
            results.push(result);
        }

        Ok(results)
    }

    pub fn run_stage(&self, stage: Stage) -> Result<StageResult> {
        let paths = &self.paths;
        match stage {
            Stage::Employees => self.run_single_etl(
                stage,
                &paths.employee_source,
                &paths.employee_output,
                &EmployeeTransformer,
            ),
            Stage::Customers => self.run_single_etl(
                stage,
                &paths.customer_source,
                &paths.customer_output,
                &CustomerTransformer,
            ),
            Stage::Appointments => self.run_single_etl(
                stage,
                &paths.appointment_source,
                &paths.appointment_output,
                &AppointmentTransformer,
            ),
            Stage::Enrichment => self.run_appointment_enrichment(),
            Stage::DailySummary => self.run_daily_summary(),
        }
    }

    pub fn run_single_etl<T: RowTransformer>(
        &self,
        stage: Stage,
        source: &str,
        output: &str,
        transformer: &T,
    ) -> Result<StageResult> {
        let started = Instant::now();
        self.require_files(&[source])?;

        // Extract
        let rows = self.read_raw_rows(source)?;
        tracing::debug!("📥 {}: extracted {} rows from {}", stage, rows.len(), source);

        // Transform
        let records = transform_rows(transformer, &rows)?;
        tracing::debug!("🔄 {}: transformed {} rows", stage, records.len());

        // Load
        self.write_output(output, &records)?;

        Ok(StageResult {
            stage,
            output_path: self.storage.locate(output),
            records: records.len(),
            lookup_misses: 0,
            duration: started.elapsed(),
        })
    }

    pub fn run_appointment_enrichment(&self) -> Result<StageResult> {
        let started = Instant::now();
        let paths = &self.paths;
        self.require_files(&[
            paths.employee_output.as_str(),
            paths.customer_output.as_str(),
            paths.appointment_output.as_str(),
        ])?;

        let employees = NameLookup::from_rows(
            &self.read_raw_rows(&paths.employee_output)?,
            "employee_id",
            "full_name",
            UNKNOWN_EMPLOYEE,
        )?;
        let customers = NameLookup::from_rows(
            &self.read_raw_rows(&paths.customer_output)?,
            "customer_id",
            "full_name",
            UNKNOWN_CUSTOMER,
        )?;
        let appointments: Vec<AppointmentRecord> =
            parse_records(&self.storage.read_file(&paths.appointment_output)?)?;

        tracing::debug!(
            "🔗 Joining {} appointments with {} employees and {} customers",
            appointments.len(),
            employees.len(),
            customers.len()
        );

        let enrichment = enrich_appointments(&appointments, &employees, &customers);
        if enrichment.lookup_misses() > 0 {
            tracing::warn!(
                "⚠️ {} customer and {} employee references could not be resolved",
                enrichment.customer_misses,
                enrichment.employee_misses
            );
        }

        self.write_output(&paths.enriched_output, &enrichment.rows)?;

        Ok(StageResult {
            stage: Stage::Enrichment,
            output_path: self.storage.locate(&paths.enriched_output),
            records: enrichment.rows.len(),
            lookup_misses: enrichment.lookup_misses(),
            duration: started.elapsed(),
        })
    }

    pub fn run_daily_summary(&self) -> Result<StageResult> {
        let started = Instant::now();
        let paths = &self.paths;
        self.require_files(&[paths.enriched_output.as_str()])?;

        let appointments: Vec<EnrichedAppointment> =
            parse_records(&self.storage.read_file(&paths.enriched_output)?)?;
        let summary = summarize_daily(&appointments)?;

        self.write_output(&paths.daily_summary_output, &summary)?;

        Ok(StageResult {
            stage: Stage::DailySummary,
            output_path: self.storage.locate(&paths.daily_summary_output),
            records: summary.len(),
            lookup_misses: 0,
            duration: started.elapsed(),
        })
    }

    /// Inputs and output of every stage. Files produced by an earlier stage
    /// are reported with `produced_by` set.
    pub fn plan(&self) -> Vec<StagePlan> {
        let paths = &self.paths;
        let external = |path: &str| PlannedInput {
            path: path.to_string(),
            produced_by: None,
            exists: self.storage.exists(path),
        };
        let produced = |path: &str, stage: Stage| PlannedInput {
            path: path.to_string(),
            produced_by: Some(stage),
            exists: self.storage.exists(path),
        };

        vec![
            StagePlan {
                stage: Stage::Employees,
                inputs: vec![external(&paths.employee_source)],
                output: paths.employee_output.clone(),
            },
            StagePlan {
                stage: Stage::Customers,
                inputs: vec![external(&paths.customer_source)],
                output: paths.customer_output.clone(),
            },
            StagePlan {
                stage: Stage::Appointments,
                inputs: vec![external(&paths.appointment_source)],
                output: paths.appointment_output.clone(),
            },
            StagePlan {
                stage: Stage::Enrichment,
                inputs: vec![
                    produced(&paths.employee_output, Stage::Employees),
                    produced(&paths.customer_output, Stage::Customers),
                    produced(&paths.appointment_output, Stage::Appointments),
                ],
                output: paths.enriched_output.clone(),
            },
            StagePlan {
                stage: Stage::DailySummary,
                inputs: vec![produced(&paths.enriched_output, Stage::Enrichment)],
                output: paths.daily_summary_output.clone(),
            },
        ]
    }

    fn require_files(&self, files: &[&str]) -> Result<()> {
        for file in files {
            if !self.storage.exists(file) {
                return Err(EtlError::MissingFileError {
                    path: self.storage.locate(file),
                });
            }
        }
        Ok(())
    }

    fn read_raw_rows(&self, path: &str) -> Result<Vec<RawRow>> {
        parse_raw_rows(&self.storage.read_file(path)?)
    }

    fn write_output<T: CsvRecord>(&self, output: &str, records: &[T]) -> Result<()> {
        let data = render_records(records)?;
        self.storage.write_file(output, &data)?;

        let file_name = Path::new(output)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(output);

        tracing::info!("💾 Wrote {} records to {}", records.len(), self.storage.locate(output));
        println!("ETL complete. Output file created: {}", file_name);
        Ok(())
    }
}

/// 取得執行摘要
pub fn execution_summary(results: &[StageResult]) -> serde_json::Value {
    let total_records: usize = results.iter().map(|r| r.records).sum();
    let total_misses: usize = results.iter().map(|r| r.lookup_misses).sum();
    let total_duration: Duration = results.iter().map(|r| r.duration).sum();

    let stages: Vec<serde_json::Value> = results
        .iter()
        .map(|r| {
            serde_json::json!({
                "stage": r.stage.as_str(),
                "output_path": r.output_path,
                "records": r.records,
                "lookup_misses": r.lookup_misses,
                "duration_ms": r.duration.as_millis() as u64,
            })
        })
        .collect();

    serde_json::json!({
        "total_stages": results.len(),
        "total_records": total_records,
        "total_lookup_misses": total_misses,
        "total_duration_ms": total_duration.as_millis() as u64,
        "stages": stages,
    })
}
