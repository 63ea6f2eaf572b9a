use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::Parser;
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

use edris::core::config::{ThemeColor, THEME_COLORS};
use edris::ui::chat_loop::{run_chat, ChatOptions};

const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

#[derive(Parser)]
#[command(name = "edris")]
#[command(about = "A terminal chat client for the Edris assistant backend")]
#[command(
    long_about = "Edris is a full-screen terminal chat client for the Edris assistant backend. \
It forwards your prompts to the server's /query endpoint and renders the replies, with \
per-message RTL detection for Persian text.\n\n\
Environment Variables:\n\
  EDRIS_SERVER_URL  Backend base URL (defaults to http://localhost:8000)\n\
  EDRIS_LOG         Diagnostic log filter (tracing env-filter syntax)\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Up/Down/Mouse     Scroll through chat history\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /help             List slash commands (modes, stacks, theme, logging)"
)]
struct Args {
    /// Backend base URL (overrides EDRIS_SERVER_URL)
    #[arg(short = 's', long, value_name = "URL")]
    server_url: Option<String>,

    /// Enable transcript logging to the specified file
    #[arg(short = 'l', long, value_name = "FILE")]
    log: Option<String>,

    /// Start in dark mode, overriding the stored preference
    #[arg(short = 'd', long)]
    dark: bool,

    /// Accent color, overriding the stored preference
    #[arg(short = 't', long, value_name = "COLOR", value_parser = parse_theme)]
    theme: Option<ThemeColor>,
}

fn parse_theme(name: &str) -> Result<ThemeColor, String> {
    ThemeColor::from_name(name).ok_or_else(|| {
        let palette: Vec<&str> = THEME_COLORS.iter().map(|c| c.as_str()).collect();
        format!("unknown color '{name}' (expected one of: {})", palette.join(", "))
    })
}

/// Diagnostics go to a file in the platform data directory; writing to
/// stderr would corrupt the alternate screen.
fn init_tracing() {
    let Some(dirs) = ProjectDirs::from("org", "edris", "edris") else {
        return;
    };
    let log_dir = dirs.data_dir();
    if std::fs::create_dir_all(log_dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("edris.log"))
    else {
        return;
    };

    let filter =
        EnvFilter::try_from_env("EDRIS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing();

    let server_url = args
        .server_url
        .or_else(|| std::env::var("EDRIS_SERVER_URL").ok())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    let options = ChatOptions {
        server_url,
        log_file: args.log,
        dark: args.dark,
        theme: args.theme,
    };

    if let Err(e) = run_chat(options).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appearance_flags_parse() {
        let args = Args::try_parse_from(["edris", "--dark", "--theme", "rose"]).expect("args");
        assert!(args.dark);
        assert_eq!(args.theme, Some(ThemeColor::Rose));

        let args = Args::try_parse_from(["edris"]).expect("args");
        assert!(!args.dark);
        assert_eq!(args.theme, None);
    }

    #[test]
    fn unknown_theme_colors_are_rejected() {
        assert!(Args::try_parse_from(["edris", "--theme", "chartreuse"]).is_err());
    }
}
