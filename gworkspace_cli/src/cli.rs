use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gworkspace_core::config::{CREDENTIALS_PATH_ENV, TOKEN_PATH_ENV};

#[derive(Parser)]
#[command(name = "gworkspace")]
#[command(about = "Google Workspace MCP - authorize, inspect and call the Slides/Sheets/Drive tools")]
#[command(version)]
#[command(after_help = "\x1b[1;36mQuick Start:\x1b[0m
  gworkspace setup                        Authorize with Google and write token.json
  gworkspace check                        Verify (and refresh) the stored token
  gworkspace tools                        List every tool the MCP server exposes
  gworkspace call drive_search_files query=report

\x1b[1;36mFiles:\x1b[0m
  --credentials / GOOGLE_CREDENTIALS_PATH OAuth client secret (default ./credentials.json)
  --token / GOOGLE_TOKEN_PATH             Token file written by setup (default ./token.json)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// OAuth client-secret file downloaded from the Google Cloud console
    #[arg(long, global = true, env = CREDENTIALS_PATH_ENV, default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// Token file (written by `setup`, read by the server)
    #[arg(long, global = true, env = TOKEN_PATH_ENV, default_value = "token.json")]
    pub token: PathBuf,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the OAuth consent flow and save the resulting token
    ///
    /// Starts a one-shot local HTTP server that receives Google's redirect,
    /// exchanges the code for tokens, writes the token file and smoke-tests it.
    #[command(alias = "init")]
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  gworkspace setup
  gworkspace setup --port 8080
  gworkspace setup --token /secrets/token.json")]
    Setup {
        /// Local port for the OAuth callback (redirect URI http://localhost:<port>/oauth2callback)
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Skip the post-setup API call
        #[arg(long)]
        skip_test: bool,
    },

    /// Load credentials and token, refreshing the access token if needed
    Check,

    /// List tool descriptors
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  gworkspace tools
  gworkspace tools sheets
  gworkspace tools --output json")]
    Tools {
        /// Only show tools of this service (slides, sheets, drive)
        service: Option<String>,
    },

    /// Call one tool through the same registry the MCP server uses
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  gworkspace call slides_list_presentations maxResults=5
  gworkspace call sheets_read_sheet_values --args '{\"spreadsheetId\":\"abc\",\"range\":\"Sheet1!A1:C5\"}'")]
    Call {
        /// Tool name (e.g., drive_list_items)
        tool: String,
        /// JSON arguments (e.g., '{"query": "report"}')
        #[arg(long, conflicts_with = "params")]
        args: Option<String>,
        /// key=value arguments, typed by the tool's schema
        #[arg(trailing_var_arg = true)]
        params: Vec<String>,
    },
}

#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Plain text output
    Text,
}
