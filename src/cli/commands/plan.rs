//! Plan command - print prepared release operations as JSON

use crate::cli::args::{PlanAction, PlanArgs, SortKey};
use crate::client::PackageClient;
use crate::error::SkegResult;
use crate::release::{
    parse_status_filter, DeleteOptions, InstallRequest, ListOptions, ReleasePlan, SortBy,
    SortOrder, UpdateRequest,
};
use crate::repo::PackageCoordinates;

/// Execute the plan command
pub async fn execute(args: PlanArgs, client: &PackageClient) -> SkegResult<()> {
    let plan = match args.action {
        PlanAction::Install {
            chart,
            version,
            namespace,
            dry_run,
        } => {
            let coords = PackageCoordinates::parse(&chart, version.as_deref())?;
            let req = InstallRequest {
                repo_name: coords.repository_name,
                chart_name: coords.package_name,
                version: coords.version_constraint,
                namespace,
                dry_run,
            };
            ReleasePlan::install(client, &req).await?
        }
        PlanAction::Upgrade {
            release,
            chart,
            version,
            namespace,
            dry_run,
            timeout,
        } => {
            let coords = PackageCoordinates::parse(&chart, version.as_deref())?;
            let req = UpdateRequest {
                repo_name: coords.repository_name,
                chart_name: coords.package_name,
                version: coords.version_constraint,
                namespace,
                dry_run,
                timeout_secs: timeout,
            };
            ReleasePlan::update(client, &release, &req).await?
        }
        PlanAction::Delete {
            release,
            dry_run,
            disable_hooks,
            purge,
            timeout,
        } => ReleasePlan::delete(
            &release,
            DeleteOptions {
                dry_run,
                disable_hooks,
                purge,
                timeout_secs: timeout,
            },
        ),
        PlanAction::List {
            sort_by,
            desc,
            limit,
            offset,
            filter,
            namespace,
            status,
        } => {
            let mut options = ListOptions {
                sort_by: match sort_by {
                    SortKey::Name => SortBy::Name,
                    SortKey::LastReleased => SortBy::LastReleased,
                },
                sort_order: if desc { SortOrder::Desc } else { SortOrder::Asc },
                limit,
                offset,
                filter,
                namespace,
                ..Default::default()
            };
            if let Some(status) = status.filter(|s| !s.trim().is_empty()) {
                options.status_filter = parse_status_filter(&status);
            }
            ReleasePlan::list(options)
        }
    };

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
