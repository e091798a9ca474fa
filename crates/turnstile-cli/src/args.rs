use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "turnstile",
    version,
    about = "Session/role route guard for the workload dashboard"
)]
pub struct Cli {
    /// Credential string, bypassing the jar
    #[arg(long, global = true, conflicts_with = "token_file")]
    pub token: Option<String>,

    /// File holding the credential string
    #[arg(long, global = true)]
    pub token_file: Option<PathBuf>,

    /// Credential jar location (default: ~/.turnstile/auth_token)
    #[arg(long, global = true, env = "TURNSTILE_JAR")]
    pub jar: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decode the credential's claims (no signature verification)
    Decode {
        /// Emit the claims as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run one guard pass for a path and report the verdict
    Check {
        /// Route path to evaluate, e.g. /task-lists/E1
        #[arg(long)]
        path: String,
    },
    /// Manage the file-backed credential jar
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum SessionAction {
    /// Store a credential in the jar
    Store { credential: String },
    /// Print the stored credential
    Show,
    /// Remove the stored credential
    Clear,
}
