//! Command definitions for the islet CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ============================================================================
// CLI Structure
// ============================================================================

/// Islet - Dynamic Island overlay core
#[derive(Parser, Debug)]
#[command(
    name = "islet",
    version,
    about = "Dynamic Island overlay core: focus timer, media session and overlay state machine",
    long_about = "Runs the headless overlay core: the focus timer engine, the media\n\
                  session adapter and the overlay state machine, wired over an\n\
                  in-process event bus with best-effort persistence.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the overlay core until interrupted
    Run(RunArgs),

    /// Run a short scripted session and exit
    Demo(DemoArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Default focus timer duration in minutes (1-120)
    #[arg(
        short,
        long,
        default_value = "25",
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    pub minutes: u32,

    /// Media poll interval in milliseconds (100-10000)
    #[arg(
        short,
        long,
        default_value = "1000",
        value_parser = clap::value_parser!(u64).range(100..=10_000)
    )]
    pub poll_interval: u64,

    /// Disable the completion chime
    #[arg(long)]
    pub no_sound: bool,

    /// Treat an AI API key as configured (affects overlay sizing)
    #[arg(long)]
    pub api_key: bool,

    /// State file path (defaults to ~/.islet/state.json)
    #[arg(long)]
    pub state_file: Option<PathBuf>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            minutes: 25,
            poll_interval: 1000,
            no_sound: false,
            api_key: false,
            state_file: None,
        }
    }
}

// ============================================================================
// Demo Command Arguments
// ============================================================================

/// Arguments for the demo command
#[derive(Args, Debug, Clone)]
pub struct DemoArgs {
    /// How long the scripted session runs, in seconds (1-60)
    #[arg(
        short,
        long,
        default_value = "3",
        value_parser = clap::value_parser!(u64).range(1..=60)
    )]
    pub seconds: u64,

    /// Disable the completion chime
    #[arg(long)]
    pub no_sound: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            seconds: 3,
            no_sound: false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
