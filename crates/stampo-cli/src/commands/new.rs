use console::style;
use miette::Result;

use stampo_core::archive::ExtractionOutcome;
use stampo_core::error::StampoError;
use stampo_core::runner::ScriptStatus;
use stampo_core::{generate, GenerateOptions};

use crate::cli::Cli;

pub fn run(cli: Cli) -> Result<()> {
    let template = cli.template.expect("clap requires a template unless --list");

    let report = generate(GenerateOptions {
        template,
        output: cli.output,
        search_paths: cli.search_paths,
        make_output_dir: cli.mkdir,
        skip_archive: cli.skip_generator,
        skip_runners: cli.skip_runners,
    })?;

    match &report.extraction {
        Some(ExtractionOutcome::Success { written, skipped }) => {
            println!(
                "\n{} Project generated at {}",
                style("✓").green().bold(),
                style(report.output_dir.display()).cyan()
            );
            if *skipped > 0 {
                println!(
                    "  {} files written, {} entries skipped",
                    written,
                    style(skipped).yellow()
                );
            } else {
                println!("  {written} files written");
            }
        }
        Some(ExtractionOutcome::PartialFailure { written, reason }) => {
            eprintln!(
                "{} extraction aborted after {} files: {}",
                style("error:").red().bold(),
                written,
                reason
            );
            return Err(StampoError::ExtractionAborted {
                path: report.output_dir.clone(),
                reason: reason.clone(),
            }
            .into());
        }
        // FatalOpenFailure is promoted to an error inside generate()
        Some(ExtractionOutcome::FatalOpenFailure { .. }) | None => {}
    }

    let failed = report
        .scripts
        .iter()
        .filter(|s| !s.status.is_success())
        .count();
    for outcome in &report.scripts {
        match &outcome.status {
            ScriptStatus::Success => {
                println!(
                    "  {} runner {}",
                    style("✓").green(),
                    outcome.script.display()
                );
            }
            ScriptStatus::NotFound => {
                println!(
                    "  {} runner {} not found",
                    style("✗").red(),
                    outcome.script.display()
                );
            }
            ScriptStatus::Failed { message } => {
                println!(
                    "  {} runner {} failed: {}",
                    style("✗").red(),
                    outcome.script.display(),
                    message
                );
            }
        }
    }
    if failed > 0 {
        println!(
            "{} {failed} of {} runners failed",
            style("warning:").yellow().bold(),
            report.scripts.len()
        );
    }

    Ok(())
}
