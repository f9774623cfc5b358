use std::path::PathBuf;

use anyhow::{bail, Result};

/// Options for one sync invocation.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub config_path: Option<PathBuf>,
    pub close_missing: bool,
    pub mirror_comments: bool,
    pub help: bool,
}

/// Parse the raw arguments (everything after the binary name).
///
/// Supported forms:
///   ghcu-sync
///   ghcu-sync --config ./maps.json
///   ghcu-sync --close-missing --mirror-comments
pub fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                if i < args.len() {
                    options.config_path = Some(PathBuf::from(&args[i]));
                } else {
                    bail!("Missing value for -c/--config flag");
                }
            }
            "--close-missing" => options.close_missing = true,
            "--mirror-comments" => options.mirror_comments = true,
            "-h" | "--help" => options.help = true,
            other => {
                bail!("Unknown argument: {other}\n\nRun ghcu-sync --help for usage");
            }
        }
        i += 1;
    }

    Ok(options)
}

pub fn print_help() {
    println!("ghcu-sync — mirror GitHub issues into a ClickUp list\n");
    println!("USAGE:");
    println!("  ghcu-sync [FLAGS]      Run one sync pass and exit");
    println!();
    println!("FLAGS:");
    println!("  -c, --config <path>    JSON file overriding the label maps");
    println!("                         (default: ~/.ghcu-sync/config.json when present)");
    println!("      --close-missing    Mark tasks complete when their issue is gone");
    println!("      --mirror-comments  Copy GitHub issue comments onto tasks");
    println!("  -h, --help             Show this help");
    println!();
    println!("ENVIRONMENT:");
    println!("  github_personal_access_token, github_owner, github_repo,");
    println!("  clickup_api_key, clickup_list_id, clickup_space_id,");
    println!("  request_type_custom_field_id, slack_webhook_url");
}
