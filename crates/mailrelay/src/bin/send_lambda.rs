use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use mailrelay::{handle_contact_event, ApiGatewayResponse, HttpMailer, Letterhead, RelayConfig};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

struct Relay {
    letterhead: Letterhead,
    mailer: HttpMailer,
}

async fn handle_request(
    relay: &Relay,
    event: LambdaEvent<Value>,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_contact_event(event.payload, &relay.letterhead, &relay.mailer).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .init();

    let config = RelayConfig::from_env()?;
    tracing::info!(api_url = %config.api_url, "mail relay starting");
    let relay = Arc::new(Relay {
        letterhead: config.letterhead(),
        mailer: HttpMailer::new(config),
    });

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let relay = Arc::clone(&relay);
        async move { handle_request(&relay, event).await }
    }))
    .await
}
