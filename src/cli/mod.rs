//! CLI command handlers.
//!
//! Testable handlers invoked by main.rs. Each returns the process exit code
//! it wants; the caller is responsible for calling `std::process::exit()`.

mod blueprint;
mod diff;
mod flows;

pub use blueprint::run_blueprint;
pub use diff::{run_diff, run_three_way};
pub use flows::run_flows;

use crate::config::AppConfig;
use crate::pipeline::{OutputTarget, should_use_color, write_output};
use crate::reports::{ReportConfig, ReportError, ReportGenerator, create_reporter_with_options};
use anyhow::{Context, Result};

/// Render a report with the configured format and write it out.
fn emit<F>(config: &AppConfig, render: F) -> Result<()>
where
    F: FnOnce(&dyn ReportGenerator, &ReportConfig) -> Result<String, ReportError>,
{
    let target = OutputTarget::from_option(config.output.file.clone());
    let use_color = should_use_color(config.output.no_color, &target);
    let reporter = create_reporter_with_options(config.output.format, use_color);
    let report = render(reporter.as_ref(), &config.report_config())
        .with_context(|| format!("Failed to generate {} report", reporter.format()))?;
    write_output(&report, &target, config.behavior.quiet)
}
