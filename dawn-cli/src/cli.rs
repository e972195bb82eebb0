use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dwn", about = "Inspect and convert DWNSCENE scene files", version)]
pub struct Cli {
    /// Log decoder progress (repeat for trace output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the header, chunk table and record counts of a scene file
    Inspect {
        /// Path to the .dwn file
        file: PathBuf,
        /// Also print the transform tree with world positions
        #[arg(long)]
        tree: bool,
    },
    /// Write each mesh as packed surface vertices and indices
    Transcode {
        /// Path to the .dwn file
        file: PathBuf,
        /// Directory to write mesh_<i>.vtx and mesh_<i>.idx into
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Upload every mesh to a headless GPU device
    Upload {
        /// Path to the .dwn file
        file: PathBuf,
    },
    /// Write a one-triangle sample scene
    Sample {
        /// Output file path
        file: PathBuf,
    },
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
