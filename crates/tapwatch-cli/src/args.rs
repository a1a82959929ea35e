//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tapwatch_dashboard::{SortDirection, TapConnectionStatus};
use tapwatch_store::{SchoolCategory, WaterSourceType};

/// Tapwatch CLI - query the school water-tap dashboard.
#[derive(Parser, Debug)]
#[command(name = "tapwatch")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the RocksDB store.
    #[arg(long, env = "TAPWATCH_DATA_DIR", default_value = "tapwatch-data")]
    pub data_dir: PathBuf,

    /// JSON file with dashboard settings.
    #[arg(long, env = "TAPWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Answer from an in-memory store loaded from this seed file instead of
    /// the data directory.
    #[arg(long, env = "TAPWATCH_SEED_FILE", global = true)]
    pub seed_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Sort order flag shared by the table commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Order {
    /// Ascending, unknown values first.
    #[default]
    Asc,
    /// Descending, unknown values last.
    Desc,
}

impl From<Order> for SortDirection {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => Self::Asc,
            Order::Desc => Self::Desc,
        }
    }
}

/// Which view of a single school to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SchoolView {
    /// Everything on the details screen.
    #[default]
    Detail,
    /// The school and its location.
    Location,
    /// The school and its tap connection.
    Tap,
}

/// Dashboard commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a seed file into the data directory if it holds no schools.
    Seed {
        /// Seed file in the dashboard's JSON layout.
        #[arg(long)]
        file: PathBuf,
    },

    /// Headline counts.
    Stats,

    /// Schools per tap-connection status.
    StatusCounts,

    /// Projects per status.
    ProjectCounts,

    /// The schools table.
    Schools {
        /// Case-insensitive text over name, town and district.
        #[arg(long, default_value = "")]
        search: String,

        /// Keep schools with this tap status (repeatable).
        #[arg(long = "status")]
        statuses: Vec<TapConnectionStatus>,

        /// Keep schools in this category (repeatable).
        #[arg(long = "category")]
        categories: Vec<SchoolCategory>,

        /// Field to sort by, e.g. `name` or `location.townName`.
        #[arg(long)]
        sort: Option<String>,

        /// Sort direction.
        #[arg(long, value_enum, default_value_t)]
        order: Order,
    },

    /// The tap connections table.
    Connections {
        /// Case-insensitive text over school name, town and district.
        #[arg(long, default_value = "")]
        search: String,

        /// Keep connections with this status (repeatable).
        #[arg(long = "status")]
        statuses: Vec<TapConnectionStatus>,

        /// Keep connections with this water source (repeatable).
        #[arg(long = "source")]
        sources: Vec<WaterSourceType>,

        /// Field to sort by, e.g. `school.name` or `connectionDate`.
        #[arg(long)]
        sort: Option<String>,

        /// Sort direction.
        #[arg(long, value_enum, default_value_t)]
        order: Order,
    },

    /// One school.
    School {
        /// School id.
        id: String,

        /// Which view to show.
        #[arg(long, value_enum, default_value_t)]
        view: SchoolView,
    },

    /// Map markers for every geocoded school.
    Map,

    /// The recent activity feed.
    Activity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_schools_query() {
        let args = Args::try_parse_from([
            "tapwatch",
            "schools",
            "--search",
            "bangalore",
            "--status",
            "Connected",
            "--status",
            "not required",
            "--sort",
            "location.townName",
            "--order",
            "desc",
        ])
        .unwrap();

        match args.command {
            Command::Schools {
                search,
                statuses,
                sort,
                order,
                ..
            } => {
                assert_eq!(search, "bangalore");
                assert_eq!(
                    statuses,
                    [TapConnectionStatus::Connected, TapConnectionStatus::NotRequired]
                );
                assert_eq!(sort.as_deref(), Some("location.townName"));
                assert_eq!(order, Order::Desc);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_source() {
        let result = Args::try_parse_from(["tapwatch", "connections", "--source", "River"]);
        assert!(result.is_err());
    }

    #[test]
    fn school_view_defaults_to_detail() {
        let args = Args::try_parse_from(["tapwatch", "school", "school1"]).unwrap();
        assert!(matches!(
            args.command,
            Command::School {
                view: SchoolView::Detail,
                ..
            }
        ));
    }
}
