//! Rubric subcommands

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum RubricCommands {
    /// Store a rubric from a YAML or JSON file
    Add {
        /// Rubric file (.yaml, .yml or .json)
        file: PathBuf,

        /// Replace an existing rubric; the file must carry a higher version
        #[arg(long)]
        update: bool,
    },

    /// List stored rubrics
    List,

    /// Show a rubric and its criteria
    Show {
        /// Rubric ID (stored or built-in template)
        id: String,
    },

    /// Check a rubric file without storing it
    Validate {
        /// Rubric file (.yaml, .yml or .json)
        file: PathBuf,
    },

    /// List available templates
    Templates,

    /// Copy a rubric or template under a new ID
    Clone {
        /// Source rubric ID
        id: String,

        /// ID for the copy
        new_id: String,

        /// Scope the copy to an event
        #[arg(long, conflicts_with = "group")]
        event: Option<String>,

        /// Scope the copy to a group of events
        #[arg(long)]
        group: Option<String>,

        /// Display name for the copy
        #[arg(long)]
        name: Option<String>,
    },
}
