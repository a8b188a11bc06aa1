use browser_scout::{ScoutConfig, ScriptRunner};
use clap::{Arg, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("Search Demo")
        .version("1.0")
        .about("Runs the scripted search and leaves a screenshot behind")
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory the screenshot is written to")
                .default_value("/tmp"),
        )
        .arg(
            Arg::new("term")
                .help("Search term")
                .default_value("rust programming"),
        )
        .arg(
            Arg::new("headed")
                .long("headed")
                .help("Run browser with a visible window")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let output_dir = matches.get_one::<String>("output-dir").cloned().unwrap();
    let term = matches.get_one::<String>("term").cloned().unwrap();

    println!("🚀 Search Demo");

    let mut config = ScoutConfig::default();
    config.browser.headless = !matches.get_flag("headed");

    let runner = ScriptRunner::launch_chrome(&config, &output_dir, "search_demo").await?;

    match runner.search(&term).await {
        Ok(()) => println!("✅ Search for '{}' completed, evidence in {}", term, output_dir),
        Err(e) => println!("❌ Search failed ({}), evidence still in {}", e, output_dir),
    }

    println!("👋 Demo completed!");
    Ok(())
}
