use dotenvy::dotenv;
use dropfolder::config::settings::ConsumerConfig;
use dropfolder::modules::dispatch::handler;
use dropfolder::state::ConsumerState;
use dropfolder::telemetry;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv().ok();
    telemetry::init();

    info!("Starting consumer...");

    let config = ConsumerConfig::from_env()?;
    let state = ConsumerState::new(config).await;
    let dispatcher = &state.dispatcher;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler::handle_event(dispatcher, event).await
    }))
    .await
}
