//! CLI help and command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name string for log spans (e.g. "check_inclusion").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Build { .. } => "build",
        Commands::Verify { .. } => "verify",
        Commands::Prove { .. } => "prove",
        Commands::CheckInclusion { .. } => "check_inclusion",
        Commands::Consistency { .. } => "consistency",
        Commands::Trace { .. } => "trace",
        Commands::Audit { .. } => "audit",
        Commands::Register { .. } => "register",
        Commands::Deprecate { .. } => "deprecate",
        Commands::Check { .. } => "check",
        Commands::List { .. } => "list",
        Commands::Config => "config",
    }
}
