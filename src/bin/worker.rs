use dotenvy::dotenv;
use dropfolder::config::settings::WorkerConfig;
use dropfolder::modules::ingest::handler;
use dropfolder::state::WorkerState;
use dropfolder::telemetry;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv().ok();
    telemetry::init();

    info!("Starting worker...");

    let config = WorkerConfig::from_env()?;
    let state = WorkerState::new(config).await?;
    let submitter = &state.submitter;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler::handle_event(submitter, event).await
    }))
    .await
}
