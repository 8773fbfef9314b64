use crate::alert::{Alerter, EscalationSink, NoopSink};
use crate::browser::WebDriverLauncher;
use crate::cli::RunArgs;
use crate::config::Config;
use crate::report::{format_date, report_date, ReportFetcher};
use crate::runner::{Orchestrator, RetryPolicy};
use chrono::Local;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    // Load and validate config
    info!("Loading config from {:?}", args.config);
    let mut config = Config::load(&args.config)?;

    // Apply CLI overrides
    if let Some(output_folder) = args.output_folder {
        config.output_folder = output_folder;
    }
    if args.headless {
        config.headless = true;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.retry.max_attempts = max_attempts;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.retry.delay_ms = delay_ms;
    }
    if let Some(email) = args.email {
        config.email = email;
    }
    if let Some(password) = args.password {
        config.password = password;
    }
    if let Some(webdriver_url) = args.webdriver_url {
        config.browser.webdriver_url = webdriver_url;
    }

    config.validate()?;

    let policy = RetryPolicy::from(&config.retry);
    let alerter = Alerter::from_config(&config.alert, policy.max_attempts());

    if args.dry_run {
        info!("DRY RUN - no browser will be launched");
        print_execution_plan(&config, &policy, &alerter.channel_names(), args.no_alert)?;
        return Ok(());
    }

    let output_dir = config.prepare_output_dir()?;
    info!("Reports will be written to {:?}", output_dir);

    let sink: Arc<dyn EscalationSink> = if args.no_alert {
        Arc::new(NoopSink)
    } else {
        Arc::new(alerter)
    };

    let launcher = Arc::new(WebDriverLauncher::new(
        &config.browser.webdriver_url,
        config.browser.kind,
    ));
    let fetcher = ReportFetcher::new(config, launcher, output_dir);
    let orchestrator = Orchestrator::new(policy, sink);

    let outcome = orchestrator.run(|| fetcher.fetch()).await;

    if !outcome.succeeded {
        error!("Automation failed: {}", outcome.last_error);
        std::process::exit(outcome.exit_code());
    }

    info!("Automation completed successfully.");
    Ok(())
}

fn print_execution_plan(
    config: &Config,
    policy: &RetryPolicy,
    channels: &[&str],
    no_alert: bool,
) -> anyhow::Result<()> {
    let date = report_date(Local::now().date_naive(), config.report.day_offset)?;
    let output = config
        .output_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf());

    println!("\n=== Execution Plan ===\n");
    println!("Report URL: {}", config.report_url);
    println!("Login: {}", config.email);
    println!(
        "Browser: {} via {} (headless: {})",
        config.browser.kind, config.browser.webdriver_url, config.headless
    );
    println!(
        "Report date: {}",
        format_date(date, &config.report.date_format)?
    );
    println!("Output folder: {}", output.display());
    println!("Filter dropdowns: {}", config.report.filters.len());
    println!(
        "Attempts: {} ({:?} apart)",
        policy.max_attempts(),
        policy.delay()
    );

    if no_alert || channels.is_empty() {
        println!("Alerts: none");
    } else {
        println!("Alerts: {}", channels.join(", "));
    }
    println!();
    Ok(())
}
