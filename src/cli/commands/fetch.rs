//! Fetch command - download charts into the archive cache

use crate::cache::{format_bytes, ArtifactRecord};
use crate::cli::args::{FetchArgs, OutputFormat};
use crate::client::PackageClient;
use crate::error::{SkegError, SkegResult};
use crate::repo::PackageCoordinates;
use console::style;
use tracing::info;

/// Execute the fetch command
pub async fn execute(args: FetchArgs, client: &PackageClient) -> SkegResult<()> {
    let coords = args
        .charts
        .iter()
        .map(|chart| PackageCoordinates::parse(chart, args.version.as_deref()))
        .collect::<SkegResult<Vec<_>>>()?;

    info!("Fetching {} chart(s)", coords.len());
    let results = client.fetch_all(&coords).await;

    let mut fetched = Vec::new();
    let mut failed = 0;
    for (coord, result) in coords.iter().zip(results) {
        match result {
            Ok(record) => fetched.push(record),
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", style("✗").red(), coord, e);
            }
        }
    }

    match args.format {
        OutputFormat::Table => print_table(&fetched),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&fetched)?),
        OutputFormat::Plain => {
            for record in &fetched {
                println!("{}", record.local_path.display());
            }
        }
    }

    if failed > 0 {
        return Err(SkegError::User(format!(
            "{} of {} chart(s) failed to fetch",
            failed,
            coords.len()
        )));
    }
    Ok(())
}

fn print_table(records: &[ArtifactRecord]) {
    if records.is_empty() {
        return;
    }

    println!(
        "{:<30} {:<12} {:<10} {:<14} {}",
        style("CHART").bold(),
        style("VERSION").bold(),
        style("SIZE").bold(),
        style("SHA256").bold(),
        style("PATH").bold()
    );
    println!("{}", "-".repeat(90));

    for record in records {
        println!(
            "{:<30} {:<12} {:<10} {:<14} {}",
            record.key.package_name,
            record.key.exact_version,
            format_bytes(record.size_bytes),
            &record.content_digest[..12.min(record.content_digest.len())],
            record.local_path.display()
        );
    }

    println!();
    println!("{} {} chart(s) ready", style("✓").green(), records.len());
}
