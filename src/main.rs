use newsletter_hub::config::get_configuration;
use newsletter_hub::startup::Application;
use newsletter_hub::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber(
        String::from("newsletter_hub"),
        String::from("info"),
        std::io::stdout,
    );

    init_subscriber(subscriber);

    let config = get_configuration().expect("Missing configuration file.");
    let application = Application::build(config.clone()).await?;

    tracing::info!("Server listening on {}", config.get_address());

    application.run_until_stop().await
}
