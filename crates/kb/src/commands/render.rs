//! `kb render` command implementation.
//!
//! Boots a viewer against the configured content, navigates to a location
//! fragment and prints the resulting markup to stdout.

use std::sync::Arc;

use clap::Args;
use console::Term;
use kb_config::{CliSettings, Config};
use kb_site::{Event, NoopTypesetter, View, Viewer};
use kb_store::MemoryStore;

use super::{ContentArgs, content_storage};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    pub content: ContentArgs,

    /// Location fragment to open, e.g. `#subject/circuits`.
    fragment: Option<String>,

    /// Open this chapter (1-based) of the subject the fragment selects.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    chapter: Option<u32>,

    /// Print the sidebar instead of the main region.
    #[arg(long)]
    sidebar: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or metadata cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.content.load(CliSettings::default())?;

        let view = render(
            &config,
            self.fragment.as_deref().unwrap_or_default(),
            self.chapter,
        )?;
        if let Some(failure) = &view.error {
            output.warning(&format!("Cannot load {}: {}", failure.path, failure.message));
        }

        let markup = if self.sidebar { &view.sidebar } else { &view.main };
        Term::stdout().write_line(markup)?;
        Ok(())
    }
}

/// Open `fragment` in a fresh viewer, then `chapter` if given.
///
/// Progress is kept in memory so rendering never touches the durable store.
fn render(config: &Config, fragment: &str, chapter: Option<u32>) -> Result<View, CliError> {
    let mut viewer = Viewer::start(
        content_storage(config),
        Arc::new(MemoryStore::new()),
        Arc::new(NoopTypesetter),
        &config.content_resolved.metadata_file,
    )?;
    viewer.handle(Event::FragmentChanged {
        fragment: fragment.to_owned(),
    });
    if let Some(number) = chapter {
        viewer.handle(Event::OpenChapter {
            index: number.saturating_sub(1) as usize,
        });
    }
    Ok(viewer.view().clone())
}
