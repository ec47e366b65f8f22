use crate::agent::{CalendarAgent, Dispatcher};
use crate::components::completion::provider_from_config;
use crate::components::GoogleCalendarHandle;
use crate::config::Config;
use crate::error::Error;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Wire the completion provider and the Google Calendar actor into an agent.
/// Must be called inside a Tokio runtime since the calendar actor is spawned.
pub fn build_agent(config: &Config) -> miette::Result<CalendarAgent<GoogleCalendarHandle>> {
    let completion = provider_from_config(config)?;
    info!("Using {} for completions", completion.name());

    let calendar = GoogleCalendarHandle::new(config);
    info!("Operating on calendar {}", config.google_calendar_id);

    Ok(CalendarAgent::new(
        completion,
        Dispatcher::from_config(calendar, config),
        config.tz()?,
    ))
}
