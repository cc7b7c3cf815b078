use telemetry::custom_subscriber::TelemetrySubscriber;

fn main() -> anyhow::Result<()> {
    TelemetrySubscriber::init(std::io::stderr)?;

    cli::run()?;

    Ok(())
}
