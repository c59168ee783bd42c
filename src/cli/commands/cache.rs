//! Cache command - inspect the archive cache

use crate::cache::{format_bytes, StoredArchive};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::client::PackageClient;
use crate::error::SkegResult;
use console::style;

/// Execute the cache command
pub async fn execute(args: CacheArgs, client: &PackageClient) -> SkegResult<()> {
    match args.action {
        CacheAction::List { format } => list_archives(client, format).await,
        CacheAction::Path => {
            println!("{}", client.store().root().display());
            Ok(())
        }
    }
}

/// List stored archives
async fn list_archives(client: &PackageClient, format: OutputFormat) -> SkegResult<()> {
    let archives = client.store().list().await?;

    if archives.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => println!("No cached archives found."),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_archive_table(&archives),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&archives)?),
        OutputFormat::Plain => {
            for archive in &archives {
                println!("{}", archive.file_name);
            }
        }
    }

    Ok(())
}

fn print_archive_table(archives: &[StoredArchive]) {
    println!(
        "{:<45} {:<10} {:<20}",
        style("ARCHIVE").bold(),
        style("SIZE").bold(),
        style("FETCHED").bold()
    );
    println!("{}", "-".repeat(77));

    for archive in archives {
        let fetched = archive
            .modified_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<45} {:<10} {:<20}",
            archive.file_name,
            format_bytes(archive.size_bytes),
            fetched
        );
    }

    let total: u64 = archives.iter().map(|a| a.size_bytes).sum();
    println!();
    println!("Total: {} archive(s), {}", archives.len(), format_bytes(total));
}
