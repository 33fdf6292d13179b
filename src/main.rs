use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use logroll::config::config_file_path;
use logroll::{Config, Level, Logger};

fn main() -> Result<()> {
    init_tracing();

    // Optional config path as the first argument
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(config_file_path);
    let config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    tracing::info!("Config file: {}", config_path.display());

    let logger = Logger::new(config).context("Failed to create logger")?;

    // Clean up old logs
    match logger.clean_old_logs() {
        Ok(count) if count > 0 => tracing::info!("Cleaned up {} old log files", count),
        Ok(_) => {}
        Err(e) => tracing::warn!("Log cleanup failed: {}", e),
    }

    logger.set_live_logging(true);
    logger.hooks().set(
        Level::Error,
        Some(Arc::new(|subsystem: &str, message: &str| {
            eprintln!("error hook: [{}] {}", subsystem, message);
        })),
    );

    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.user_event("User pressed the demo button");
    logger.performance("Demo started in 3ms");
    logger.success("Demo initialized");
    logger.notice("This is a notice");
    logger.warning("This is a warning");
    logger.error("This is an error");
    logger.critical("This is a critical message");
    logger.fault("This is a fault");

    let workers: Vec<_> = (0..4)
        .map(|n| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                let subsystem = format!("Worker{}", n);
                for i in 0..25 {
                    logger.log(Level::Info, &subsystem, &format!("step {}", i));
                }
            })
        })
        .collect();
    for worker in workers {
        if worker.join().is_err() {
            tracing::warn!("A demo worker panicked");
        }
    }

    let path = logger
        .save_current_session()
        .context("Failed to save session")?;
    println!("Session {} saved to {}", logger.session_id(), path.display());
    println!(
        "{} live entries, {} alerts",
        logger.live().len(),
        logger.live().alerts().len()
    );

    Ok(())
}

/// Install a stderr subscriber filtered by `RUST_LOG`
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "logroll=info".into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
