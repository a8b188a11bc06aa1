use browser_scout::core::config::output_dir_from_env;
use browser_scout::{ScoutConfig, ScriptRunner};
use clap::{Arg, ArgAction, Command};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("browser-scout")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scripted browser errands that always leave screenshot evidence behind")
        .arg(
            Arg::new("script-id")
                .long("script-id")
                .help("Prefix for the screenshot filename (defaults to the binary name)")
                .global(true),
        )
        .arg(
            Arg::new("headed")
                .long("headed")
                .help("Run the browser with a visible window")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("search")
                .about("Search DuckDuckGo for a term")
                .arg(Arg::new("term").required(true)),
        )
        .subcommand(
            Command::new("visit")
                .about("Navigate to a URL")
                .arg(Arg::new("url").required(true)),
        )
}

fn default_script_id() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "browser-scout".to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let matches = cli().get_matches();

    let output_dir = output_dir_from_env()?;
    let script_id = matches
        .get_one::<String>("script-id")
        .cloned()
        .unwrap_or_else(default_script_id);

    let mut config = ScoutConfig::default();
    config.browser.headless = !matches.get_flag("headed");

    let runner = ScriptRunner::launch_chrome(&config, &output_dir, script_id).await?;

    let result = match matches.subcommand() {
        Some(("search", sub)) => {
            let term = sub.get_one::<String>("term").cloned().unwrap_or_default();
            runner.search(&term).await
        }
        Some(("visit", sub)) => {
            let url = sub.get_one::<String>("url").cloned().unwrap_or_default();
            runner.visit(&url).await
        }
        _ => unreachable!("subcommand is required"),
    };

    match result {
        Ok(()) => {
            info!("Run completed, evidence in {}", output_dir.display());
            Ok(())
        }
        Err(e) => {
            error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
