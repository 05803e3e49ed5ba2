//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to engine and registry.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_audit_trail_text, format_build_text, format_check_text, format_consistency_text,
    format_json, format_record_list_text, format_registration_text, format_verify_text,
};
pub use route::RunContext;
