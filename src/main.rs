//! resume-scanner: score resumes against curated job profiles

use clap::Parser;
use log::{error, info, warn};
use resume_scanner::cli::{self, Cli, Commands, ConfigAction};
use resume_scanner::config::{Config, OutputFormat};
use resume_scanner::error::{Result, ResumeScannerError};
use resume_scanner::input::InputManager;
use resume_scanner::output::{save_report_to_file, ReportGenerator, ReportPaths, ScanReport};
use resume_scanner::processing::{ResumeAnalyzer, SkillCatalog};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_or_init(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            files,
            output,
            save,
            detailed,
            catalog,
            no_stage,
        } => {
            let format = match output {
                Some(name) => cli::parse_output_format(&name).map_err(ResumeScannerError::InvalidInput)?,
                None => config.output.format,
            };

            let catalog_path = catalog.or_else(|| config.analysis.catalog_path.clone());
            let skill_catalog = SkillCatalog::load_or_embedded(catalog_path.as_deref())?;
            info!("Loaded {} job profiles", skill_catalog.profiles.len());

            let analyzer = Arc::new(ResumeAnalyzer::from_config(skill_catalog, &config.analysis)?);

            let mut manager = InputManager::from_config(&config.input);
            if no_stage {
                manager = manager.without_staging();
            }
            let manager = Arc::new(manager);

            let mut handles = Vec::with_capacity(files.len());
            for path in &files {
                let manager = Arc::clone(&manager);
                let analyzer = Arc::clone(&analyzer);
                let path = path.clone();
                handles.push(tokio::spawn(async move { scan_file(&manager, analyzer, &path).await }));
            }

            let generator = ReportGenerator::with_options(
                config.output.color_output,
                detailed || config.output.detailed,
                true,
                true,
                true,
            );

            let mut report_paths = save.as_ref().map(|target| ReportPaths::new(target, files.len()));

            let mut failures = 0;
            for (path, handle) in files.iter().zip(handles) {
                let result = handle
                    .await
                    .map_err(|e| ResumeScannerError::Processing(format!("Analysis task failed: {}", e)))
                    .and_then(|result| result);

                let delivered = result
                    .and_then(|report| deliver_report(&generator, &report, &format, report_paths.as_mut()));

                if let Err(e) = delivered {
                    error!("{}: {}", path.display(), e);
                    failures += 1;
                }
            }

            if failures > 0 {
                return Err(ResumeScannerError::Processing(format!(
                    "{} of {} resumes could not be analyzed",
                    failures,
                    files.len()
                )));
            }
        }

        Commands::Profiles { id, catalog } => {
            let catalog_path = catalog.or_else(|| config.analysis.catalog_path.clone());
            let skill_catalog = SkillCatalog::load_or_embedded(catalog_path.as_deref())?;

            match id {
                Some(id) => {
                    let profile = skill_catalog
                        .profiles
                        .get(&id)
                        .ok_or_else(|| ResumeScannerError::InvalidInput(format!("Unknown profile: {}", id)))?;
                    println!("{} ({})", profile.title, profile.id);
                    for skill in &profile.required_skills {
                        println!("  • {}", skill);
                    }
                }
                None => {
                    println!("Job profiles\n");
                    for profile in skill_catalog.profiles.iter() {
                        println!(
                            "  • {:<20} {} ({} skills)",
                            profile.id,
                            profile.title,
                            profile.required_skills.len()
                        );
                    }
                    println!("\n{} synonyms, {} stopwords", skill_catalog.synonyms.len(), skill_catalog.stopwords.len());
                }
            }
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| ResumeScannerError::Configuration(e.to_string()))?;
                println!("# {}\n", config_path.display());
                println!("{}", content);
            }
            ConfigAction::Reset => {
                Config::default().save_to(config_path)?;
                println!("Configuration reset to defaults: {}", config_path.display());
            }
            ConfigAction::Path => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}

/// Load one resume and analyse it on the blocking pool.
async fn scan_file(manager: &InputManager, analyzer: Arc<ResumeAnalyzer>, path: &Path) -> Result<ScanReport> {
    let start = Instant::now();
    let document = manager.load(path).await?;

    let file_name = document.file_name.clone();
    let bytes = document.bytes.clone();
    let analysis = tokio::task::spawn_blocking(move || analyzer.analyze_document(&file_name, &bytes))
        .await
        .map_err(|e| ResumeScannerError::Processing(format!("Analysis task failed: {}", e)))??;

    let elapsed = start.elapsed().as_millis() as u64;
    if analysis.token_count == 0 {
        warn!("No text could be extracted from {}", path.display());
    }
    Ok(ScanReport::new(&document, analysis, elapsed))
}

/// Render one report, then save it or print it to stdout.
fn deliver_report(
    generator: &ReportGenerator,
    report: &ScanReport,
    format: &OutputFormat,
    paths: Option<&mut ReportPaths>,
) -> Result<()> {
    let content = generator.generate_report(report, format)?;
    match paths {
        Some(paths) => {
            let file_path = paths.path_for(format, &report.resume_name());
            save_report_to_file(&content, &file_path)?;
            println!("Saved report for {} to {}", report.resume_name(), file_path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
