//! CLI argument parsing and release execution

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use plugin_publish::output::{emoji, OutputConfig};
use plugin_publish::release::{self, ReleaseOptions};

/// Prepare package.json manifests for every plugin and publish the selected packages to npm
#[derive(Parser, Debug)]
#[command(name = "plugin-publish")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project root containing package.json and the plugin sources
    #[arg(long, value_name = "PATH", env = "PLUGIN_PUBLISH_ROOT")]
    root: Option<PathBuf>,

    /// Release configuration file (defaults to <root>/.plugin-publish.yaml)
    #[arg(short, long, value_name = "PATH", env = "PLUGIN_PUBLISH_CONFIG")]
    config: Option<PathBuf>,

    /// Package to publish; repeat to publish several (replaces the configured list)
    #[arg(short, long = "package", value_name = "NAME")]
    packages: Vec<String>,

    /// npm executable used for publishing
    #[arg(long, value_name = "PROGRAM", env = "PLUGIN_PUBLISH_NPM", default_value = "npm")]
    npm: String,

    /// Treat every publish failure as a warning
    #[arg(long)]
    ignore_errors: bool,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Extra flags passed to every `npm publish`, e.g. `-- --tag beta`
    #[arg(last = true, value_name = "FLAGS")]
    publish_flags: Vec<String>,
}

impl Cli {
    /// Run the release and map its outcome to an exit status
    pub fn execute(self) -> Result<ExitCode> {
        let output = OutputConfig::from_env_and_flag(&self.color);
        init_logging(&self.log_level, &output);

        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir().context("Failed to get current directory")?,
        };

        let options = ReleaseOptions {
            root,
            config_path: self.config,
            packages: self.packages,
            npm: self.npm,
            publish_flags: self.publish_flags,
            ignore_errors: self.ignore_errors,
        };

        let start_time = Instant::now();
        let summary = release::run(&options)?;
        let report = &summary.report;
        let duration = start_time.elapsed();

        if summary.is_success() {
            eprintln!(
                "{} Published {}, skipped {} already published, ignored {} in {:.2}s",
                emoji(&output, "✅", "[OK]"),
                report.published(),
                report.skipped(),
                report.ignored(),
                duration.as_secs_f64()
            );
            Ok(ExitCode::SUCCESS)
        } else {
            let failed = report.failures().count();
            error!("{} of {} package(s) failed to publish", failed, report.outcomes.len());
            eprintln!(
                "{} Release completed with {} failure(s)",
                emoji(&output, "❌", "[FAIL]"),
                failed
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

/// `RUST_LOG` takes precedence over `--log-level` when set
fn init_logging(level: &str, output: &OutputConfig) {
    let env = env_logger::Env::default().default_filter_or(level);
    env_logger::Builder::from_env(env)
        .write_style(output.log_style())
        .format_timestamp(None)
        .init();
}
