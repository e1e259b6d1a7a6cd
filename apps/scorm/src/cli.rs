//! Command line interface definition

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use scorm_types::ColorChoice;
use std::path::PathBuf;

/// scorm - SCORM package ingestion and learner runtime
#[derive(Parser)]
#[command(name = "scorm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "SCORM package ingestion and learner runtime")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to scorm-data/logs/
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Save block settings and optionally ingest a package archive
    Submit {
        /// Organization of the course
        #[arg(long)]
        org: String,

        /// Course identifier
        #[arg(long)]
        course: String,

        /// Block type segment of the storage path
        #[arg(long, default_value = "scorm")]
        block_type: String,

        /// Block identifier
        #[arg(long)]
        block_id: String,

        /// Package archive to upload
        #[arg(short, long, value_name = "ZIP")]
        file: Option<PathBuf>,

        /// Title shown to learners
        #[arg(long)]
        display_name: Option<String>,

        /// Points the block is worth
        #[arg(long)]
        weight: Option<u32>,

        /// Whether the block reports a grade
        #[arg(long)]
        has_score: Option<bool>,

        /// Frame width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Frame height in pixels
        #[arg(long)]
        height: Option<u32>,
    },

    /// Read a CMI element for a learner
    Get {
        block_id: String,
        learner_id: String,
        /// CMI element name, e.g. cmi.core.score.raw
        name: String,
    },

    /// Write a CMI element for a learner
    Set {
        block_id: String,
        learner_id: String,
        /// CMI element name, e.g. cmi.core.lesson_status
        name: String,
        /// JSON value; bare words are taken as strings
        value: Option<String>,
    },

    /// Rescore a learner from raw earned points
    Rescore {
        block_id: String,
        learner_id: String,
        raw_earned: f64,
    },

    /// Fetch an extracted asset through the content proxy
    Proxy {
        block_id: String,

        /// Package content hash; omit for the legacy layout
        #[arg(long)]
        hash: Option<String>,

        /// Path of the asset inside the package
        file: String,

        /// Write the body to this file instead of discarding it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show what a learner sees for a block
    View { block_id: String, learner_id: String },

    /// Show the author-facing summary of a block
    Author { block_id: String },

    /// Set or clear the due date of a block
    Schedule {
        block_id: String,

        /// Due date in RFC 3339, e.g. 2026-01-31T23:59:00Z
        #[arg(long)]
        due: Option<DateTime<Utc>>,

        /// Seconds of grace after the due date
        #[arg(long)]
        grace_seconds: Option<i64>,
    },
}
