use anyhow::Result;
use stylz_etl::core::ConfigProvider;
use stylz_etl::{EtlEngine, EtlError, EtlPaths, LocalStorage, Stage, TomlConfig};
use tempfile::TempDir;

const EMPLOYEES: &str = include_str!("../data/employees_source.csv");
const CUSTOMERS: &str = include_str!("../data/customers_source.csv");
const APPOINTMENTS: &str = include_str!("../data/appointments_source.csv");

fn seed_sources(dir: &TempDir) -> Result<()> {
    std::fs::write(dir.path().join("employees_source.csv"), EMPLOYEES)?;
    std::fs::write(dir.path().join("customers_source.csv"), CUSTOMERS)?;
    std::fs::write(dir.path().join("appointments_source.csv"), APPOINTMENTS)?;
    Ok(())
}

fn read_lines(dir: &TempDir, file: &str) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(dir.path().join(file))?;
    Ok(content.lines().map(str::to_string).collect())
}

#[test]
fn test_end_to_end_with_sample_data() -> Result<()> {
    let temp_dir = TempDir::new()?;
    seed_sources(&temp_dir)?;

    let engine = EtlEngine::new(LocalStorage::new(temp_dir.path()), EtlPaths::default());
    let results = engine.run()?;

    assert_eq!(results.len(), 5);
    assert_eq!(results[3].stage, Stage::Enrichment);
    assert_eq!(results[3].lookup_misses, 1);

    let employees = read_lines(&temp_dir, "employees.csv")?;
    assert_eq!(
        employees,
        vec![
            "employee_id,full_name,email,phone,role,hire_date,status,hourly_rate,commission_rate,specialty",
            "E001,Maria Gonzalez,maria.gonzalez@lostylz.com,(212) 555-0147,Senior Stylist,2019-04-15,Active,32.00,0.15,Color",
            "E002,Deshawn O'Neil,deshawn@lostylz.com,555-0199,Barber,2021-08-02,Active,24.50,0.10,Fades",
            "E003,Kim Park,kim.park@lostylz.com,(212) 555-0188,Nail Technician,2022-01-10,Inactive,19.00,0.08,Gel Extensions",
        ]
    );

    let customers = read_lines(&temp_dir, "customers.csv")?;
    assert_eq!(
        customers[1],
        "C001,Jordan Lee,jordan.lee@mail.com,(917) 555-0111,2022-03-03,120,Yes,email"
    );
    assert_eq!(
        customers[3],
        "C003,Sam Rivera,sam.r@mail.com,+44 20 7946 0958,2024-01-05,0,Yes,phone"
    );

    let appointments = read_lines(&temp_dir, "appointments.csv")?;
    assert_eq!(
        appointments[1],
        "A1001,C001,E001,Full Color,2024-03-01 09:00,2024-03-01 11:15,135,Completed,145.00,card,25.00"
    );
    assert_eq!(
        appointments[4],
        "A1004,C004,E002,Beard Trim,2024-03-01 15:00,2024-03-01 15:20,20,No Show,15.00,card,0.00"
    );

    let enriched = read_lines(&temp_dir, "appointments_enriched.csv")?;
    assert_eq!(
        enriched[4],
        "A1004,2024-03-01 15:00,2024-03-01 15:20,20,No Show,Beard Trim,15.00,0.00,card,C004,Unknown Customer,E002,Deshawn O'Neil"
    );

    let summary = read_lines(&temp_dir, "daily_summary.csv")?;
    assert_eq!(
        summary,
        vec![
            "appointment_date,employee_id,employee_name,appointments_count,completed_appointments,service_revenue,tip_revenue,total_revenue",
            "2024-03-01,E001,Maria Gonzalez,2,1,145.00,25.00,170.00",
            "2024-03-01,E002,Deshawn O'Neil,2,1,35.00,5.00,40.00",
            "2024-03-02,E003,Kim Park,1,0,0.00,0.00,0.00",
        ]
    );

    Ok(())
}

#[test]
fn test_missing_source_halts_later_stages() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("employees_source.csv"), EMPLOYEES)?;
    std::fs::write(temp_dir.path().join("appointments_source.csv"), APPOINTMENTS)?;

    let engine = EtlEngine::new(LocalStorage::new(temp_dir.path()), EtlPaths::default());
    let err = engine.run().unwrap_err();

    assert!(matches!(err.root(), EtlError::MissingFileError { path } if path.ends_with("customers_source.csv")));
    assert!(temp_dir.path().join("employees.csv").exists());
    assert!(!temp_dir.path().join("customers.csv").exists());
    assert!(!temp_dir.path().join("appointments.csv").exists());
    assert!(!temp_dir.path().join("appointments_enriched.csv").exists());
    assert!(!temp_dir.path().join("daily_summary.csv").exists());

    Ok(())
}

#[test]
fn test_rerun_gives_identical_outputs() -> Result<()> {
    let temp_dir = TempDir::new()?;
    seed_sources(&temp_dir)?;

    let engine = EtlEngine::new(LocalStorage::new(temp_dir.path()), EtlPaths::default());
    engine.run()?;
    let first = std::fs::read(temp_dir.path().join("daily_summary.csv"))?;

    engine.run()?;
    let second = std::fs::read(temp_dir.path().join("daily_summary.csv"))?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_toml_config_with_custom_paths() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_dir = temp_dir.path().join("exports");
    std::fs::create_dir(&data_dir)?;
    std::fs::write(data_dir.join("staff.csv"), EMPLOYEES)?;
    std::fs::write(data_dir.join("customers_source.csv"), CUSTOMERS)?;
    std::fs::write(data_dir.join("appointments_source.csv"), APPOINTMENTS)?;

    let config = TomlConfig::from_toml_str(&format!(
        r#"
[pipeline]
name = "custom-paths"

[paths]
data_dir = "{}"
employee_source = "staff.csv"
daily_summary_output = "reports/daily.csv"
"#,
        data_dir.display().to_string().replace('\\', "/")
    ))?;

    let engine = EtlEngine::new(LocalStorage::new(config.data_dir()), config.paths().clone());
    engine.run()?;

    assert!(data_dir.join("employees.csv").exists());
    assert!(data_dir.join("reports").join("daily.csv").exists());
    Ok(())
}

#[test]
fn test_sources_without_rows_give_header_only_outputs() -> Result<()> {
    let temp_dir = TempDir::new()?;
    for (file, content) in [
        ("employees_source.csv", EMPLOYEES),
        ("customers_source.csv", CUSTOMERS),
        ("appointments_source.csv", APPOINTMENTS),
    ] {
        let header = content.lines().next().unwrap_or_default();
        std::fs::write(temp_dir.path().join(file), format!("{}\n", header))?;
    }

    let engine = EtlEngine::new(LocalStorage::new(temp_dir.path()), EtlPaths::default());
    let results = engine.run()?;

    assert!(results.iter().all(|r| r.records == 0));
    let summary = read_lines(&temp_dir, "daily_summary.csv")?;
    assert_eq!(summary.len(), 1);
    assert!(summary[0].starts_with("appointment_date,"));
    Ok(())
}
