//! Resolve command - show the pinned version for a reference

use crate::cli::args::{OutputFormat, ResolveArgs};
use crate::client::PackageClient;
use crate::error::SkegResult;
use crate::repo::PackageCoordinates;
use console::style;

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, client: &PackageClient) -> SkegResult<()> {
    let coords = PackageCoordinates::parse(&args.chart, args.version.as_deref())?;
    let key = client.resolve(&coords).await?;
    let cached = client.store().exists(&key).await;

    match args.format {
        OutputFormat::Json => {
            #[derive(serde::Serialize)]
            struct ResolvedJson<'a> {
                chart: &'a str,
                version: &'a str,
                url: &'a str,
                digest: Option<&'a str>,
                cached: bool,
            }

            let json = ResolvedJson {
                chart: &key.package_name,
                version: &key.exact_version,
                url: &key.source_url,
                digest: key.expected_digest.as_deref(),
                cached,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Plain => println!("{}", key.exact_version),
        OutputFormat::Table => {
            let state = if cached {
                style("cached").green()
            } else {
                style("not fetched").dim()
            };
            println!("{} -> {} [{}]", coords, key, state);
            println!("  {}", key.source_url);
            if let Some(digest) = &key.expected_digest {
                println!("  sha256 {}", digest);
            }
        }
    }

    Ok(())
}
