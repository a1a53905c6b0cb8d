//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to the snapshot API.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{
    format_compare_json, format_report_json, format_report_text, format_scan_json,
    format_scan_text, format_section_heading, format_snapshot_json, format_snapshot_list_json,
    format_snapshot_list_text, format_snapshot_text, format_tree,
};
pub use route::{ConfigOverrides, RunContext};
