//! Service initialization for the grading dispatcher.

use std::sync::Arc;

use actors::{DispatcherMessage, global_registry, start_dispatcher};
use grader::{GraderConfig, LlmGrader};
use grading_core::{DispatcherConfig, Grader};

/// Initialize the grading service with configuration from the
/// environment.
///
/// Call once at server startup before handling requests. Calling it
/// again is safe: a later call finds the installed dispatcher and leaves
/// it in place, so the concurrency cap stays a single counter for the
/// whole process.
pub async fn init_grading_service() -> Result<(), Box<dyn std::error::Error>> {
    let grader = Arc::new(LlmGrader::new(GraderConfig::from_env()));
    init_grading_service_with(DispatcherConfig::default(), grader).await
}

/// Initialize with an explicit dispatcher config and grader.
pub async fn init_grading_service_with(
    config: DispatcherConfig,
    grader: Arc<dyn Grader>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Initializing grading service...");

    if global_registry().get().is_some() {
        tracing::info!("Grading dispatcher already running, keeping it");
        return Ok(());
    }

    let (dispatcher, _handle) = start_dispatcher(config, grader).await?;

    if !global_registry().install(dispatcher.clone()) {
        // Lost an installation race; the winner keeps the slot.
        tracing::warn!("Grading dispatcher already installed, dropping the duplicate");
        let _ = dispatcher.send_message(DispatcherMessage::Shutdown);
        return Ok(());
    }

    tracing::info!("Grading service initialized");
    Ok(())
}

/// Shut down the dispatcher and release the registry slot.
pub fn shutdown_grading_service() {
    if let Some(dispatcher) = global_registry().get() {
        let _ = dispatcher.send_message(DispatcherMessage::Shutdown);
    }
    global_registry().uninstall();
}
