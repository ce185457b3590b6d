//! `kb check` command implementation.

use clap::Args;
use kb_config::{CliSettings, Config};
use kb_site::{SubjectLoader, Violation, validate};

use super::{ContentArgs, content_storage};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub content: ContentArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if metadata cannot be loaded or any violation is found.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.content.load(CliSettings::default())?;

        output.heading(&format!(
            "Checking {}",
            config
                .content_resolved
                .data_dir
                .join(&config.content_resolved.metadata_file)
                .display()
        ));

        let violations = check(&config)?;
        if violations.is_empty() {
            output.success("No problems found");
            return Ok(());
        }

        for violation in &violations {
            output.error(&format!("  {violation}"));
        }
        Err(CliError::Validation(format!(
            "{} problem(s) found",
            violations.len()
        )))
    }
}

fn check(config: &Config) -> Result<Vec<Violation>, CliError> {
    let loader = SubjectLoader::new(content_storage(config));
    let metadata = loader.load_metadata(&config.content_resolved.metadata_file)?;
    Ok(validate(&metadata, &loader))
}
