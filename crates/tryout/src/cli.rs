use clap::{Parser, Subcommand};

/// Terminal client for timed audio auditions.
#[derive(Debug, Parser)]
#[command(name = "tryout", version, about)]
pub struct Cli {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List opportunities open for auditions.
    Opportunities,
    /// Show your submitted auditions and their review status.
    Submissions,
    /// Run the practice interview to check your setup.
    Demo,
    /// Record and submit a real audition for an opportunity.
    Audition {
        /// Opportunity to audition for.
        opportunity_id: String,
    },
}
