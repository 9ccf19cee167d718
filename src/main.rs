use reservationservice::configuration::get_configuration;
use reservationservice::startup::Application;
use reservationservice::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("reservationservice".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration()?;
    let application = Application::build(configuration).await?;
    tracing::info!(port = application.port(), "Reservation service listening");
    application.run_until_stopped().await?;
    Ok(())
}
