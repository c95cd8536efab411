use anyhow::Context;
use clap::Parser;
use stylz_etl::core::etl::StagePlan;
use stylz_etl::core::{ConfigProvider, Storage};
use stylz_etl::utils::error::ErrorSeverity;
use stylz_etl::utils::{logger, validation::Validate};
use stylz_etl::{execution_summary, CliConfig, EtlEngine, LocalStorage, LogFormat, TomlConfig};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置（有指定 --config 時）
    let toml_config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(mut config) => {
                if let Some(data_dir) = &cli.data_dir {
                    config.paths.data_dir = data_dir.clone();
                }
                Some(config)
            }
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(exit_code(ErrorSeverity::Medium));
            }
        },
        None => None,
    };

    // 初始化日誌
    let verbose = cli.verbose || toml_config.as_ref().is_some_and(TomlConfig::verbose);
    let log_format = cli
        .log_format
        .or_else(|| toml_config.as_ref().and_then(TomlConfig::log_format))
        .unwrap_or_default();
    match log_format {
        LogFormat::Compact => logger::init_cli_logger(verbose),
        LogFormat::Json => logger::init_json_logger(verbose),
    }

    tracing::info!("Starting stylz-etl");
    if verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    let validation = match &toml_config {
        Some(config) => {
            tracing::info!("📁 Using configuration '{}'", config.pipeline_name());
            config.validate()
        }
        None => cli.validate(),
    };
    if let Err(e) = validation {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(e.severity()));
    }

    let provider: &dyn ConfigProvider = match &toml_config {
        Some(config) => config,
        None => &cli,
    };

    let storage = LocalStorage::new(provider.data_dir());
    let engine = EtlEngine::new(storage, provider.paths().clone());

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        display_plan(&engine.plan(), engine.storage());
        return Ok(());
    }

    match engine.run() {
        Ok(results) => {
            let summary = execution_summary(&results);
            tracing::info!("✅ ETL process completed successfully!");
            tracing::debug!("📊 Execution summary: {}", summary);

            if let Some(report) = &cli.report {
                let content = serde_json::to_string_pretty(&summary)?;
                std::fs::write(report, content)
                    .with_context(|| format!("failed to write report to {}", report))?;
                tracing::info!("📁 Report saved to: {}", report);
            }
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            std::process::exit(exit_code(e.severity()));
        }
    }

    Ok(())
}

// 根據錯誤嚴重程度決定退出碼
fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Medium => 2, // 配置錯誤
        ErrorSeverity::High => 1,   // 輸入/資料錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    }
}

fn display_plan(plan: &[StagePlan], storage: &LocalStorage) {
    println!("📋 Stage Plan (data dir: {}):", storage.base_path().display());

    for (index, stage) in plan.iter().enumerate() {
        println!("  {}. {}", index + 1, stage.stage);
        for input in &stage.inputs {
            let status = match (input.produced_by, input.exists) {
                (None, true) => "found".to_string(),
                (None, false) => "MISSING".to_string(),
                (Some(producer), _) => format!("produced by {}", producer),
            };
            println!("     ← {} ({})", input.path, status);
        }
        println!("     → {}", storage.locate(&stage.output));
    }

    let missing = plan
        .iter()
        .flat_map(|stage| &stage.inputs)
        .filter(|input| input.produced_by.is_none() && !input.exists)
        .count();

    println!();
    if missing == 0 {
        println!("✅ All source files are present.");
    } else {
        println!("❌ {} source file(s) missing; the run would stop at the first one.", missing);
    }
}
