//! Batch entry point: recomputes and re-caches every stored assessment and
//! prints a JSON report to stdout.

use std::sync::Arc;

use tracing::info;

use procurement_risk::adapters::storage::{
    FileAnswerStore, FileAssessmentRepository, FileConnectionRepository, InMemoryAnswerStore,
    InMemoryAssessmentRepository, InMemoryConnectionRepository,
};
use procurement_risk::application::{AssessmentEvaluator, AssessmentLocks, RefreshAllHandler};
use procurement_risk::config::{AppConfig, StorageBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    config.logging.init_tracing();

    let evaluator = match config.storage.backend {
        StorageBackend::Memory => AssessmentEvaluator::new(
            Arc::new(InMemoryAssessmentRepository::new()),
            Arc::new(InMemoryAnswerStore::new()),
            Arc::new(InMemoryConnectionRepository::new()),
        ),
        StorageBackend::File => {
            let dir = &config.storage.data_dir;
            AssessmentEvaluator::new(
                Arc::new(FileAssessmentRepository::new(dir)),
                Arc::new(FileAnswerStore::new(dir)),
                Arc::new(FileConnectionRepository::new(dir)),
            )
        }
    };

    info!(backend = ?config.storage.backend, "Refreshing assessments");

    let handler = RefreshAllHandler::new(Arc::new(evaluator), Arc::new(AssessmentLocks::new()));
    let report = handler.handle().await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.failed.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
