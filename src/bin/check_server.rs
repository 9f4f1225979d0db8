// Check that the Blipp server is up and its database is readable.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use blipp_backend::diagnostics::{inspect_database_file, CheckError, Checker, DEFAULT_BASE_URL};

#[derive(Parser)]
#[command(name = "check-server", about = "Verify Blipp server and database health")]
struct Cli {
    /// Base URL of the running server.
    #[arg(long, env = "BLIPP_SERVER_URL", default_value = DEFAULT_BASE_URL)]
    url: String,
    /// SQLite file to inspect directly.
    #[arg(long)]
    database: Option<PathBuf>,
    /// Also exercise the robot state and inventory endpoints.
    #[arg(long)]
    full: bool,
    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = 3000)]
    timeout_ms: u64,
}

fn header(text: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{text:^60}");
    println!("{}\n", "=".repeat(60));
}

fn success(text: &str) {
    println!("[SUCCESS] {text}");
}

fn failure(text: &str) {
    println!("[ERROR] {text}");
}

fn info(text: &str) {
    println!("[INFO] {text}");
}

fn warning(text: &str) {
    println!("[WARNING] {text}");
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    blipp_backend::init_tracing();
    let cli = Cli::parse();
    let checker = Checker::new(&cli.url, Duration::from_millis(cli.timeout_ms))?;

    header("DATABASE SERVER CHECK");
    info(&format!("Testing server at: {}", checker.base_url()));
    info(&format!("Time: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")));

    let healthy = match checker.health().await {
        Ok(report) => {
            success(&format!(
                "Connection successful! Response time: {:.2}ms",
                report.response_time.as_secs_f64() * 1000.0
            ));
            info(&format!("Server status: {}", report.response.status));
            true
        }
        Err(e) => {
            failure(&e.to_string());
            if matches!(e, CheckError::Connect { .. }) {
                info("Make sure the server is running with `blipp-backend`");
            }
            false
        }
    };

    if healthy {
        header("SERVER STATUS");
        match checker.server_status().await {
            Ok(status) => {
                success("Server status check successful!");
                info(&format!("Status: {}", status.status));
                info(&format!("Uptime: {}", status.uptime));
                info(&format!("Request count: {}", status.request_count));
                match status.database_error() {
                    Some(err) => warning(&format!("Database error: {err}")),
                    None => {
                        info(&format!(
                            "Robot state entries: {}",
                            status.database_count("robot_state_entries")
                        ));
                        info(&format!(
                            "Inventory items: {}",
                            status.database_count("inventory_items")
                        ));
                        info(&format!(
                            "Item templates: {}",
                            status.database_count("item_templates")
                        ));
                    }
                }
            }
            Err(e) => failure(&format!("Error checking server status: {e}")),
        }

        if cli.full {
            header("ENDPOINT CHECKS");
            for check in checker.smoke_test().await {
                match check.outcome {
                    Ok(detail) => success(&format!("{} is working ({detail})", check.name)),
                    Err(e) => failure(&format!("{} failed: {e}", check.name)),
                }
            }
        }
    }

    if let Some(path) = &cli.database {
        header("DATABASE FILE");
        match inspect_database_file(path).await {
            Ok(report) => {
                success(&format!("Database file exists: {}", report.path.display()));
                info(&format!("Size: {:.2} KB", report.size_bytes as f64 / 1024.0));
                if let Some(modified) = report.modified {
                    info(&format!("Last modified: {}", modified.format("%Y-%m-%d %H:%M:%S")));
                }
                info(&format!("Tables found: {}", report.tables.len()));
                for (table, count) in &report.tables {
                    info(&format!("Table '{table}': {count} rows"));
                }
            }
            Err(e) => failure(&e.to_string()),
        }
    }

    header("SUMMARY");
    if healthy {
        success("Database server is running and responding to requests");
        Ok(ExitCode::SUCCESS)
    } else {
        failure("Could not connect to the database server");
        Ok(ExitCode::FAILURE)
    }
}
