use tracing_subscriber::EnvFilter;

use crate::config::LogSettings;

/// Install the global fmt subscriber. Logs go to stderr so stdout stays
/// clean for command output.
pub fn init_tracing(log: &LogSettings) {
    let env_filter = EnvFilter::try_new(&log.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let result = if log.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(err) = result {
        eprintln!("landingkit: tracing already initialised: {err}");
    }
}
