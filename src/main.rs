// src/main.rs
// =============================================================================
// This is the entry point of the wcag-guardian CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so JSON on stdout stays clean)
// 3. Build an Engine and dispatch to the subcommand handler
// 4. Exit with proper code (0 = all clean, 1 = needs attention, 2 = error)
//
// All the real work lives in the library; this file only prints.
// =============================================================================

mod cli;

use anyhow::{anyhow, Result};
use clap::Parser;
use cli::{Cli, Commands};
use log::{debug, LevelFilter};
use wcag_guardian::{registry, Engine, ExternalTool, Report, Status, ToolResult};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every report is TESTED/SAFE, or the tool produced output
//   Ok(1) = something needs review, testing, or errored
//   Err   = bad arguments or the engine could not be built
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let engine = Engine::new(cli.timeouts.to_config())?;
    debug!("Engine configuration: {:?}", engine.config());

    match cli.command {
        Commands::Check { checker, url, json } => handle_check(&engine, &checker, &url, json).await,
        Commands::Audit { url, json } => handle_audit(&engine, &url, json).await,
        Commands::Tool { name, url } => handle_tool(&engine, &name, &url).await,
        Commands::Tree { url } => {
            let result = engine.accessibility_tree(&url).await;
            print_tool_result(&result)
        }
        Commands::Assess { url } => {
            println!("{}", serde_json::to_string_pretty(&engine.assess(&url))?);
            Ok(0)
        }
        Commands::List => {
            print_checker_list();
            Ok(0)
        }
    }
}

// RUST_LOG wins when set; otherwise warn, or debug with --verbose
fn init_logging(verbose: bool) {
    let default = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(default)
        .parse_default_env()
        .init();
}

async fn handle_check(engine: &Engine, checker: &str, url: &str, json: bool) -> Result<i32> {
    if wcag_guardian::find(checker).is_none() {
        return Err(anyhow!(
            "unknown checker '{}'. Run `wcag-guardian list` to see the available checkers",
            checker
        ));
    }

    if !json {
        println!("🔍 Running {} on {}\n", checker, url);
    }

    let report = engine.check(checker, url).await?;
    let reports = [report];
    print_reports(&reports, json)?;
    Ok(exit_code(&reports))
}

async fn handle_audit(engine: &Engine, url: &str, json: bool) -> Result<i32> {
    if !json {
        println!("🔍 Auditing {} with {} checkers\n", url, registry().len());
    }

    let reports = engine.audit(url).await;
    print_reports(&reports, json)?;
    Ok(exit_code(&reports))
}

async fn handle_tool(engine: &Engine, name: &str, url: &str) -> Result<i32> {
    let tool = ExternalTool::parse(name).ok_or_else(|| {
        let known: Vec<_> = ExternalTool::ALL.iter().map(|t| t.name()).collect();
        anyhow!("unknown tool '{}'. Expected one of: {}", name, known.join(", "))
    })?;

    let result = engine.run_tool(tool, url).await;
    print_tool_result(&result)
}

fn exit_code(reports: &[Report]) -> i32 {
    if reports.iter().all(Report::is_clean) {
        0
    } else {
        1
    }
}

fn print_reports(reports: &[Report], json: bool) -> Result<()> {
    if json {
        // A single check prints its report, an audit prints the list
        let json_output = match reports {
            [single] => serde_json::to_string_pretty(single)?,
            _ => serde_json::to_string_pretty(reports)?,
        };
        println!("{}", json_output);
    } else {
        for report in reports {
            print_table(report);
        }
        print_summary(reports);
    }
    Ok(())
}

// Tool payloads are third-party JSON; there is no useful table form
fn print_tool_result(result: &ToolResult) -> Result<i32> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(if result.is_ok() { 0 } else { 1 })
}

// Prints one report as a human-readable table
fn print_table(report: &Report) {
    println!(
        "{}  [{}]  {}",
        format_status(report.status),
        report.criteria.join(", "),
        report.url
    );
    println!("{:<30} {:<70}", "CHECK", "RESULT");
    println!("{}", "=".repeat(100));

    for (check, verdict) in report.results.keys().zip(report.results.values()) {
        println!("{:<30} {:<70}", check, verdict);
    }

    if !report.recommendations.is_empty() {
        println!("\n💡 Recommendations:");
        for recommendation in &report.recommendations {
            println!("   - {}", recommendation);
        }
    }
    println!();
}

fn print_summary(reports: &[Report]) {
    let count = |status: Status| reports.iter().filter(|r| r.status == status).count();

    println!("📊 Summary:");
    println!("   ✅ Tested: {}", count(Status::Tested));
    println!("   🛡️  Safe: {}", count(Status::Safe));
    println!("   👀 Needs review: {}", count(Status::NeedsReview));
    println!("   🧪 Needs testing: {}", count(Status::NeedsTesting));
    println!("   ❌ Error: {}", count(Status::Error));
    println!("   📋 Total: {}", reports.len());
}

fn format_status(status: Status) -> String {
    let icon = match status {
        Status::Tested => "✅",
        Status::Safe => "🛡️ ",
        Status::NeedsReview => "👀",
        Status::NeedsTesting => "🧪",
        Status::Error => "❌",
    };
    format!("{} {}", icon, status.as_str())
}

fn print_checker_list() {
    println!("{:<26} {:<34} {}", "CHECKER", "CRITERIA", "DESCRIPTION");
    println!("{}", "=".repeat(110));
    for checker in registry() {
        println!(
            "{:<26} {:<34} {}",
            checker.name,
            checker.criteria.join(", "),
            checker.description
        );
    }
}
