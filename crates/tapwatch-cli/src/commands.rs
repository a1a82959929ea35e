//! Command handlers. Each runs one dashboard operation and prints the result.

use serde::Serialize;
use tapwatch_core::SchoolId;
use tapwatch_dashboard::{
    CategoryFilter, ConnectionQuery, Dashboard, SchoolQuery, SortConfig, SortDirection, SortKey,
};

use crate::args::{Command, SchoolView};

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolve a sort flag. Unknown fields leave the table unsorted.
fn parse_sort<K: SortKey>(
    field: Option<&str>,
    direction: SortDirection,
) -> Option<SortConfig<K>> {
    let field = field?;
    let sort = SortConfig::parse(field, direction);
    if sort.is_none() {
        let known: Vec<&str> = K::ALL.iter().map(|key| key.field()).collect();
        tracing::warn!(field, ?known, "Unknown sort field, leaving rows unsorted");
    }
    sort
}

/// Run a read command against the dashboard.
pub async fn run<D: Dashboard>(dashboard: &D, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Seed { .. } => anyhow::bail!("seeding needs the on-disk store, drop --seed-file"),

        Command::Stats => print_json(&dashboard.dashboard_stats().await?),

        Command::StatusCounts => print_json(&dashboard.connection_status_counts().await?),

        Command::ProjectCounts => print_json(&dashboard.project_status_counts().await?),

        Command::Schools {
            search,
            statuses,
            categories,
            sort,
            order,
        } => {
            let query = SchoolQuery {
                search,
                statuses: statuses.into_iter().collect::<CategoryFilter<_>>(),
                categories: categories.into_iter().collect(),
                sort: parse_sort(sort.as_deref(), order.into()),
            };
            print_json(&dashboard.schools(&query).await?)
        }

        Command::Connections {
            search,
            statuses,
            sources,
            sort,
            order,
        } => {
            let query = ConnectionQuery {
                search,
                statuses: statuses.into_iter().collect(),
                sources: sources.into_iter().collect(),
                sort: parse_sort(sort.as_deref(), order.into()),
            };
            print_json(&dashboard.connections(&query).await?)
        }

        Command::School { id, view } => {
            let school_id = SchoolId::new(id)?;
            match view {
                SchoolView::Detail => print_json(&dashboard.school_detail(&school_id).await?),
                SchoolView::Location => {
                    print_json(&dashboard.school_with_location(&school_id).await?)
                }
                SchoolView::Tap => {
                    print_json(&dashboard.school_with_tap_connection(&school_id).await?)
                }
            }
        }

        Command::Map => print_json(&dashboard.map_markers().await?),

        Command::Activity => print_json(&dashboard.recent_activities().await?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapwatch_dashboard::{ConnectionSortKey, SchoolSortKey};

    #[test]
    fn known_sort_field_parses() {
        let sort = parse_sort::<ConnectionSortKey>(Some("school.name"), SortDirection::Desc);
        assert_eq!(sort, Some(SortConfig::descending(ConnectionSortKey::SchoolName)));
    }

    #[test]
    fn unknown_or_absent_sort_field_is_unsorted() {
        assert!(parse_sort::<SchoolSortKey>(Some("colour"), SortDirection::Asc).is_none());
        assert!(parse_sort::<SchoolSortKey>(None, SortDirection::Asc).is_none());
    }
}
