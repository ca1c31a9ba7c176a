// src/main.rs

use bugsnag2csv::{
    deliver, events_path, fetch_all, find_project, AppError, BugsnagHttpClient, CommandLineInput,
    CsvComposer, CsvDelivery, CsvDocument, CsvExporter, DeliveryReport, DeliveryTarget,
    ExportConfig, RecordSource, LOG_FILE_NAME,
};
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use serde_json::Value;

/// Sets up logging configuration.
///
/// Console output goes to stderr because stdout may carry the CSV.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join(LOG_FILE_NAME);

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("stderr", Box::new(stderr_appender)),
        )
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Executes the three-stage export: fetch → compose → deliver.
async fn execute_pipeline(config: &ExportConfig) -> Result<(), AppError> {
    let pipeline = EventsToCsv::new(config);

    let records = pipeline.fetch().await?;
    let document = pipeline.compose(&records)?;
    let report = pipeline.deliver(&document)?;
    pipeline.report_completion(&document, &report);

    Ok(())
}

/// Orchestrates retrieval, CSV rendering and delivery of one project's events.
struct EventsToCsv<'a> {
    config: &'a ExportConfig,
}

impl<'a> EventsToCsv<'a> {
    fn new(config: &'a ExportConfig) -> Self {
        Self { config }
    }

    /// Reports completion on stderr; stdout may be the CSV itself.
    fn report_completion(&self, document: &CsvDocument, report: &DeliveryReport) {
        let summary = document.summary();

        if !summary.collisions.is_empty() {
            log::warn!(
                "{} flattened key(s) were produced by more than one path; last value kept",
                summary.collisions.len()
            );
        }

        if let DeliveryTarget::WriteFile { path } = &report.target {
            eprintln!(
                "✓ {} events × {} columns saved to {}",
                summary.rows,
                summary.columns,
                path.display()
            );
        }
    }
}

#[async_trait::async_trait]
impl RecordSource for EventsToCsv<'_> {
    async fn fetch(&self) -> Result<Vec<Value>, AppError> {
        let client = BugsnagHttpClient::with_base_url(
            self.config.base_url.clone(),
            self.config.credentials.clone(),
        )?;

        let project_id = find_project(&client, &self.config.account, &self.config.project).await?;
        let start_path = events_path(&project_id, &self.config.window);

        let fetched = fetch_all(&client, &start_path, self.config.limit).await?;
        log::info!(
            "Retrieved {} event(s) in {} page(s) for {}/{}",
            fetched.records.len(),
            fetched.pages_fetched,
            self.config.account,
            self.config.project
        );
        Ok(fetched.records)
    }
}

impl CsvComposer for EventsToCsv<'_> {
    fn compose(&self, records: &[Value]) -> Result<CsvDocument, AppError> {
        CsvExporter::new(self.config.schema_policy).export(records)
    }
}

impl CsvDelivery for EventsToCsv<'_> {
    fn deliver(&self, document: &CsvDocument) -> Result<DeliveryReport, AppError> {
        deliver(document, DeliveryTarget::from_save_path(self.config.save.clone()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = ExportConfig::resolve(cli)?;
    log::debug!("Resolved configuration: {:?}", config);

    execute_pipeline(&config).await?;

    Ok(())
}
