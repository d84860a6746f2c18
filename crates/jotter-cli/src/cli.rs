use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jotter")]
#[command(about = "Open, edit and file notes from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the local notes database
    #[arg(long, global = true, value_name = "PATH")]
    pub data_path: Option<PathBuf>,

    /// Path to a JSON page config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Open the note as if it was picked from the notes list
    #[arg(long, global = true)]
    pub from_list: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note content (read from stdin when omitted)
        content: Vec<String>,
    },
    /// List notes, pinned first
    List {
        /// Include archived notes
        #[arg(long)]
        archived: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Open a note page and print it
    Show {
        /// Note ID or unique ID prefix
        id: String,
        /// Output the note as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change the text of a note and save it
    Edit {
        /// Note ID or unique ID prefix
        id: String,
        /// Replace the text
        #[arg(long, conflicts_with = "append", required_unless_present = "append")]
        text: Option<String>,
        /// Append to the current text
        #[arg(long)]
        append: Option<String>,
    },
    /// Pin or unpin a note
    Pin {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Archive a note
    Archive {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Delete a note
    Delete {
        /// Note ID or unique ID prefix
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
