use crate::alert::{Alerter, EscalationSink};
use crate::cli::AlertArgs;
use crate::config::Config;
use tracing::{info, warn};

pub fn execute(args: AlertArgs) -> anyhow::Result<()> {
    let config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        warn!("{:?} not found, using default alert settings", args.config);
        Config::default()
    };

    let alerter = Alerter::from_config(&config.alert, config.retry.max_attempts);
    info!(
        "Sending test alert via: {}",
        alerter.channel_names().join(", ")
    );
    alerter.escalate(&args.message)?;
    Ok(())
}
