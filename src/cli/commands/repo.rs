//! Repo command - show configured repositories

use crate::cli::args::{OutputFormat, RepoAction, RepoArgs};
use crate::config::Config;
use crate::error::SkegResult;
use console::style;

/// Execute the repo command
pub async fn execute(args: RepoArgs, config: &Config) -> SkegResult<()> {
    match args.action {
        RepoAction::List { format } => list_repositories(config, format),
    }
}

fn list_repositories(config: &Config, format: OutputFormat) -> SkegResult<()> {
    if config.repositories.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => println!("No repositories configured."),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Table => {
            println!(
                "{:<20} {:<8} {:<6} {}",
                style("NAME").bold(),
                style("CHARTS").bold(),
                style("AUTH").bold(),
                style("URL").bold()
            );
            println!("{}", "-".repeat(77));
            for (name, repo) in &config.repositories {
                let auth = if repo.token.is_some() { "token" } else { "-" };
                println!(
                    "{:<20} {:<8} {:<6} {}",
                    name,
                    repo.charts.len(),
                    auth,
                    repo.url
                );
            }
        }
        OutputFormat::Json => {
            #[derive(serde::Serialize)]
            struct RepoJson<'a> {
                name: &'a str,
                url: &'a str,
                charts: usize,
                authenticated: bool,
            }

            let repos: Vec<RepoJson> = config
                .repositories
                .iter()
                .map(|(name, repo)| RepoJson {
                    name,
                    url: &repo.url,
                    charts: repo.charts.len(),
                    authenticated: repo.token.is_some(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&repos)?);
        }
        OutputFormat::Plain => {
            for name in config.repositories.keys() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}
