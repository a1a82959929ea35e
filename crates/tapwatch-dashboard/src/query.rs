//! Query engine: search, category filters and sort over joined views.
//!
//! Every query runs the same pipeline: free-text search, then the category
//! filters, then an optional stable sort. The input slice is never modified;
//! results borrow from it. Unknown sort keys and empty selections are not
//! errors, they just leave the rows unsorted or unfiltered.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tapwatch_store::{SchoolCategory, TapConnectionStatus, WaterSourceType};

use crate::views::{ConnectionRow, SchoolWithLocation};

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// A row that exposes text fields to free-text search.
pub trait Searchable {
    /// The fields a search term is matched against.
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for SchoolWithLocation {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.school.name.as_str(),
            self.location.town_name.as_str(),
            self.location.district_name.as_str(),
        ]
    }
}

impl Searchable for ConnectionRow {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.school.name.as_str(),
            self.school.location.town_name.as_str(),
            self.school.location.district_name.as_str(),
        ]
    }
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn search_fields(&self) -> Vec<&str> {
        (**self).search_fields()
    }
}

/// Whether `term` occurs in any of the record's search fields, ignoring case.
///
/// An empty term matches every record.
#[must_use]
pub fn matches_search<T: Searchable + ?Sized>(record: &T, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    contains_lowered(record, &needle)
}

fn contains_lowered<T: Searchable + ?Sized>(record: &T, needle: &str) -> bool {
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

// ---------------------------------------------------------------------------
// Category filters
// ---------------------------------------------------------------------------

/// An inclusive multi-value filter over one categorical field.
///
/// An empty selection places no constraint. A non-empty selection admits a
/// record only if its value is selected; a record with no value at all is
/// excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryFilter<T: Ord> {
    selected: BTreeSet<T>,
}

impl<T: Ord> Default for CategoryFilter<T> {
    fn default() -> Self {
        Self {
            selected: BTreeSet::new(),
        }
    }
}

impl<T: Ord> FromIterator<T> for CategoryFilter<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}

impl<T: Ord + Copy> CategoryFilter<T> {
    /// A filter with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip `value` in or out of the selection. Returns whether it is now
    /// selected.
    pub fn toggle(&mut self, value: T) -> bool {
        if self.selected.remove(&value) {
            false
        } else {
            self.selected.insert(value);
            true
        }
    }

    /// Add `value` to the selection.
    pub fn select(&mut self, value: T) {
        self.selected.insert(value);
    }

    /// Drop every selected value.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Whether `value` is selected.
    #[must_use]
    pub fn contains(&self, value: T) -> bool {
        self.selected.contains(&value)
    }

    /// The selected values in their natural order.
    pub fn selected(&self) -> impl Iterator<Item = T> + '_ {
        self.selected.iter().copied()
    }

    /// Whether a record carrying `value` passes the filter.
    #[must_use]
    pub fn matches(&self, value: T) -> bool {
        self.is_empty() || self.contains(value)
    }

    /// Like [`matches`](Self::matches) for a nullable field.
    #[must_use]
    pub fn matches_optional(&self, value: Option<T>) -> bool {
        match value {
            Some(value) => self.matches(value),
            None => self.is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first, nulls first.
    #[default]
    Asc,
    /// Largest first, nulls last.
    Desc,
}

impl SortDirection {
    /// The other direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(format!(
                "unknown sort direction '{other}': expected asc or desc"
            )),
        }
    }
}

/// The value a row exposes for one sort key.
///
/// Values of different kinds never meet under one key; if they do, they
/// compare equal and the stable sort keeps their input order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    /// No value. Orders before everything ascending, after everything
    /// descending. Two nulls compare equal.
    Null,
    /// Compared byte-wise, so case-sensitive.
    Text(&'a str),
    /// A calendar date.
    Date(NaiveDate),
    /// A count.
    Number(u64),
}

impl From<Option<NaiveDate>> for SortValue<'_> {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::Null, Self::Date)
    }
}

impl SortValue<'_> {
    /// Ascending order between two values.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Null, _) => Ordering::Less,
            (_, Self::Null) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// A named sortable field of one row type.
pub trait SortKey: Copy + Eq + fmt::Debug + 'static {
    /// The row type this key sorts.
    type Row;

    /// Every key, in display order.
    const ALL: &'static [Self];

    /// The dotted field path naming this key, e.g. `"school.name"`.
    fn field(self) -> &'static str;

    /// The row's value under this key.
    fn value(self, row: &Self::Row) -> SortValue<'_>;

    /// Parse a dotted field path. Unknown paths yield `None`.
    #[must_use]
    fn from_field(field: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.field() == field)
    }
}

/// The active sort: one key and a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig<K> {
    /// Field to sort by.
    pub key: K,
    /// Direction.
    pub direction: SortDirection,
}

impl<K: SortKey> SortConfig<K> {
    /// Ascending sort on `key`.
    #[must_use]
    pub const fn ascending(key: K) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on `key`.
    #[must_use]
    pub const fn descending(key: K) -> Self {
        Self {
            key,
            direction: SortDirection::Desc,
        }
    }

    /// Build a sort from a field path, or `None` if the field is unknown.
    #[must_use]
    pub fn parse(field: &str, direction: SortDirection) -> Option<Self> {
        K::from_field(field).map(|key| Self { key, direction })
    }

    /// The sort after a user picks `key`: the same key flips direction, a
    /// new key starts ascending.
    #[must_use]
    pub fn toggle(current: Option<Self>, key: K) -> Self {
        match current {
            Some(current) if current.key == key => Self {
                key,
                direction: current.direction.reversed(),
            },
            _ => Self::ascending(key),
        }
    }

    /// Compare two rows under this sort.
    #[must_use]
    pub fn compare(&self, a: &K::Row, b: &K::Row) -> Ordering {
        let ordering = self.key.value(a).compare(&self.key.value(b));
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Stable-sort `rows` in place.
    pub fn sort(&self, rows: &mut [&K::Row]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }
}

/// Sortable fields of the schools table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchoolSortKey {
    /// School id.
    Id,
    /// School name.
    Name,
    /// Town of the school's location.
    TownName,
    /// District of the school's location.
    DistrictName,
    /// Enrolled students.
    NumberOfStudents,
    /// Category label.
    Category,
    /// The school's own tap status label.
    TapConnectionStatus,
    /// Last modification date.
    UpdateDate,
}

impl SortKey for SchoolSortKey {
    type Row = SchoolWithLocation;

    const ALL: &'static [Self] = &[
        Self::Id,
        Self::Name,
        Self::TownName,
        Self::DistrictName,
        Self::NumberOfStudents,
        Self::Category,
        Self::TapConnectionStatus,
        Self::UpdateDate,
    ];

    fn field(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::TownName => "location.townName",
            Self::DistrictName => "location.districtName",
            Self::NumberOfStudents => "numberOfStudents",
            Self::Category => "category",
            Self::TapConnectionStatus => "tapConnectionStatus",
            Self::UpdateDate => "updateDate",
        }
    }

    fn value(self, row: &SchoolWithLocation) -> SortValue<'_> {
        let school = &row.school;
        match self {
            Self::Id => SortValue::Text(school.id.as_str()),
            Self::Name => SortValue::Text(&school.name),
            Self::TownName => SortValue::Text(&row.location.town_name),
            Self::DistrictName => SortValue::Text(&row.location.district_name),
            Self::NumberOfStudents => SortValue::Number(u64::from(school.number_of_students)),
            Self::Category => SortValue::Text(school.category.label()),
            Self::TapConnectionStatus => SortValue::Text(school.tap_connection_status.label()),
            Self::UpdateDate => SortValue::Date(school.update_date),
        }
    }
}

/// Sortable fields of the tap connections table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionSortKey {
    /// Connection id.
    Id,
    /// Name of the owning school.
    SchoolName,
    /// Town of the owning school.
    TownName,
    /// District of the owning school.
    DistrictName,
    /// Date the tap went live.
    ConnectionDate,
    /// The connection's own status label.
    Status,
    /// Water source label.
    WaterSourceType,
    /// Most recent inspection.
    LastInspectionDate,
}

impl SortKey for ConnectionSortKey {
    type Row = ConnectionRow;

    const ALL: &'static [Self] = &[
        Self::Id,
        Self::SchoolName,
        Self::TownName,
        Self::DistrictName,
        Self::ConnectionDate,
        Self::Status,
        Self::WaterSourceType,
        Self::LastInspectionDate,
    ];

    fn field(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::SchoolName => "school.name",
            Self::TownName => "school.location.townName",
            Self::DistrictName => "school.location.districtName",
            Self::ConnectionDate => "connectionDate",
            Self::Status => "status",
            Self::WaterSourceType => "waterSourceType",
            Self::LastInspectionDate => "lastInspectionDate",
        }
    }

    fn value(self, row: &ConnectionRow) -> SortValue<'_> {
        let connection = &row.connection;
        match self {
            Self::Id => SortValue::Text(connection.id.as_str()),
            Self::SchoolName => SortValue::Text(&row.school.name),
            Self::TownName => SortValue::Text(&row.school.location.town_name),
            Self::DistrictName => SortValue::Text(&row.school.location.district_name),
            Self::ConnectionDate => connection.connection_date.into(),
            Self::Status => SortValue::Text(connection.status.label()),
            Self::WaterSourceType => connection
                .water_source_type
                .map_or(SortValue::Null, |source| SortValue::Text(source.label())),
            Self::LastInspectionDate => connection.last_inspection_date.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

fn run<'a, K: SortKey>(
    rows: &'a [K::Row],
    search: &str,
    keep: impl Fn(&K::Row) -> bool,
    sort: Option<&SortConfig<K>>,
) -> Vec<&'a K::Row>
where
    K::Row: Searchable,
{
    let needle = search.to_lowercase();
    let mut matched: Vec<&K::Row> = rows
        .iter()
        .filter(|row| needle.is_empty() || contains_lowered(*row, &needle))
        .filter(|row| keep(*row))
        .collect();

    if let Some(sort) = sort {
        sort.sort(&mut matched);
    }
    matched
}

/// Search, filter and sort state of the schools table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchoolQuery {
    /// Free-text term over name, town and district.
    pub search: String,
    /// Filter on the school's own tap status.
    pub statuses: CategoryFilter<TapConnectionStatus>,
    /// Filter on the school category.
    pub categories: CategoryFilter<SchoolCategory>,
    /// Active sort, if any.
    pub sort: Option<SortConfig<SchoolSortKey>>,
}

impl SchoolQuery {
    /// Run the query over joined schools.
    #[must_use]
    pub fn apply<'a>(&self, rows: &'a [SchoolWithLocation]) -> Vec<&'a SchoolWithLocation> {
        run(
            rows,
            &self.search,
            |row| {
                self.statuses.matches(row.school.tap_connection_status)
                    && self.categories.matches(row.school.category)
            },
            self.sort.as_ref(),
        )
    }

    /// Pick a sort column, flipping direction if it is already active.
    pub fn toggle_sort(&mut self, key: SchoolSortKey) {
        self.sort = Some(SortConfig::toggle(self.sort, key));
    }

    /// Reset search, filters and sort.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Search, filter and sort state of the tap connections table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionQuery {
    /// Free-text term over school name, town and district.
    pub search: String,
    /// Filter on the connection's own status.
    pub statuses: CategoryFilter<TapConnectionStatus>,
    /// Filter on the water source. Connections without a source are
    /// excluded whenever any source is selected.
    pub sources: CategoryFilter<WaterSourceType>,
    /// Active sort, if any.
    pub sort: Option<SortConfig<ConnectionSortKey>>,
}

impl ConnectionQuery {
    /// Run the query over connection rows.
    #[must_use]
    pub fn apply<'a>(&self, rows: &'a [ConnectionRow]) -> Vec<&'a ConnectionRow> {
        run(
            rows,
            &self.search,
            |row| {
                self.statuses.matches(row.connection.status)
                    && self
                        .sources
                        .matches_optional(row.connection.water_source_type)
            },
            self.sort.as_ref(),
        )
    }

    /// Pick a sort column, flipping direction if it is already active.
    pub fn toggle_sort(&mut self, key: ConnectionSortKey) {
        self.sort = Some(SortConfig::toggle(self.sort, key));
    }

    /// Reset search, filters and sort.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{connection, date, location, school};
    use crate::views::{LocationSummary, SchoolSummary};

    fn joined(id: &str, name: &str, town: &str, district: &str) -> SchoolWithLocation {
        SchoolWithLocation {
            school: school(id, "loc", name, TapConnectionStatus::Connected),
            location: location("loc", town, district),
        }
    }

    fn row(id: &str, school_name: &str, connection_date: Option<&str>) -> ConnectionRow {
        ConnectionRow {
            connection: connection(id, "s1", TapConnectionStatus::Connected, connection_date),
            school: SchoolSummary {
                id: "s1".to_string(),
                name: school_name.to_string(),
                location: LocationSummary {
                    town_name: "Bangalore".to_string(),
                    district_name: "Bangalore Urban".to_string(),
                },
            },
        }
    }

    fn ids<'a, T>(rows: &[&'a T], id: impl Fn(&'a T) -> &'a str) -> Vec<&'a str> {
        rows.iter().map(|r| id(*r)).collect()
    }

    #[test]
    fn search_bangalore_returns_only_bangalore_school() {
        let rows = vec![
            joined("s1", "Alpha", "Bangalore", "Bangalore Urban"),
            joined("s2", "Beta", "Chennai", "Chennai"),
        ];
        let query = SchoolQuery {
            search: "bangalore".to_string(),
            ..SchoolQuery::default()
        };

        let result = query.apply(&rows);
        assert_eq!(ids(&result, |r| r.school.id.as_str()), ["s1"]);
    }

    #[test]
    fn search_matches_any_field_ignoring_case() {
        let record = joined("s1", "Government High School", "Adyar", "Chennai");
        assert!(matches_search(&record, "HIGH"));
        assert!(matches_search(&record, "adyar"));
        assert!(matches_search(&record, "chen"));
        assert!(!matches_search(&record, "mumbai"));
    }

    #[test]
    fn empty_search_passes_everything_through() {
        let rows = vec![
            joined("s2", "Beta", "Chennai", "Chennai"),
            joined("s1", "Alpha", "Bangalore", "Bangalore Urban"),
        ];
        let result = SchoolQuery::default().apply(&rows);
        assert_eq!(ids(&result, |r| r.school.id.as_str()), ["s2", "s1"]);
        assert!(matches_search(&rows[0], ""));
    }

    #[test]
    fn no_matches_is_an_empty_vec() {
        let rows = vec![joined("s1", "Alpha", "Bangalore", "Bangalore Urban")];
        let query = SchoolQuery {
            search: "zzz".to_string(),
            ..SchoolQuery::default()
        };
        assert!(query.apply(&rows).is_empty());
        assert!(SchoolQuery::default().apply(&[]).is_empty());
    }

    #[test]
    fn category_filter_toggle() {
        let mut filter = CategoryFilter::new();
        assert!(filter.matches(TapConnectionStatus::Rejected));

        assert!(filter.toggle(TapConnectionStatus::Connected));
        assert!(filter.matches(TapConnectionStatus::Connected));
        assert!(!filter.matches(TapConnectionStatus::Rejected));

        assert!(!filter.toggle(TapConnectionStatus::Connected));
        assert!(filter.is_empty());
    }

    #[test]
    fn empty_filter_equals_no_filter() {
        let mut rows = vec![
            joined("s1", "Alpha", "Bangalore", "Bangalore Urban"),
            joined("s2", "Beta", "Chennai", "Chennai"),
        ];
        rows[1].school.tap_connection_status = TapConnectionStatus::Pending;

        let mut query = SchoolQuery::default();
        query.statuses.toggle(TapConnectionStatus::Pending);
        query.statuses.toggle(TapConnectionStatus::Pending);
        assert_eq!(query.apply(&rows).len(), rows.len());

        query.statuses.select(TapConnectionStatus::Pending);
        assert_eq!(ids(&query.apply(&rows), |r| r.school.id.as_str()), ["s2"]);
    }

    #[test]
    fn source_filter_excludes_unknown_source() {
        let mut rows = vec![row("tap1", "Alpha", None), row("tap2", "Beta", None)];
        rows[1].connection.water_source_type = None;

        let mut query = ConnectionQuery::default();
        assert_eq!(query.apply(&rows).len(), 2);

        query.sources.select(WaterSourceType::Borewell);
        let result = query.apply(&rows);
        assert_eq!(ids(&result, |r| r.connection.id.as_str()), ["tap1"]);
    }

    #[test]
    fn connection_status_filter_uses_connection_status() {
        let mut rows = vec![row("tap1", "Alpha", None), row("tap2", "Beta", None)];
        rows[1].connection.status = TapConnectionStatus::Rejected;

        let query = ConnectionQuery {
            statuses: [TapConnectionStatus::Rejected].into_iter().collect(),
            ..ConnectionQuery::default()
        };
        let result = query.apply(&rows);
        assert_eq!(ids(&result, |r| r.connection.id.as_str()), ["tap2"]);
    }

    #[test]
    fn null_dates_sort_first_ascending_and_last_descending() {
        let rows = vec![
            row("a", "One", None),
            row("b", "Two", Some("2023-01-01")),
            row("c", "Three", None),
        ];
        let mut query = ConnectionQuery {
            sort: Some(SortConfig::ascending(ConnectionSortKey::ConnectionDate)),
            ..ConnectionQuery::default()
        };
        assert_eq!(
            ids(&query.apply(&rows), |r| r.connection.id.as_str()),
            ["a", "c", "b"]
        );

        query.sort = Some(SortConfig::descending(ConnectionSortKey::ConnectionDate));
        assert_eq!(
            ids(&query.apply(&rows), |r| r.connection.id.as_str()),
            ["b", "a", "c"]
        );
    }

    #[test]
    fn sort_is_stable_in_both_directions() {
        let rows = vec![
            row("a", "Same", Some("2023-05-01")),
            row("b", "Other", Some("2023-01-01")),
            row("c", "Same", Some("2023-02-01")),
        ];
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let query = ConnectionQuery {
                sort: Some(SortConfig {
                    key: ConnectionSortKey::SchoolName,
                    direction,
                }),
                ..ConnectionQuery::default()
            };
            let result = ids(&query.apply(&rows), |r| r.connection.id.as_str());
            let a = result.iter().position(|id| *id == "a").unwrap();
            let c = result.iter().position(|id| *id == "c").unwrap();
            assert!(a < c, "{direction}: {result:?}");
        }
    }

    #[test]
    fn sort_by_nested_field() {
        let rows = vec![
            joined("s1", "Alpha", "Mumbai", "Mumbai"),
            joined("s2", "Beta", "Bangalore", "Bangalore Urban"),
            joined("s3", "Gamma", "Chennai", "Chennai"),
        ];
        let mut query = SchoolQuery::default();
        query.toggle_sort(SchoolSortKey::TownName);
        assert_eq!(
            ids(&query.apply(&rows), |r| r.school.id.as_str()),
            ["s2", "s3", "s1"]
        );

        query.toggle_sort(SchoolSortKey::TownName);
        assert_eq!(
            ids(&query.apply(&rows), |r| r.school.id.as_str()),
            ["s1", "s3", "s2"]
        );
    }

    #[test]
    fn sort_toggle_semantics() {
        let first = SortConfig::toggle(None, ConnectionSortKey::SchoolName);
        assert_eq!(first.direction, SortDirection::Asc);

        let flipped = SortConfig::toggle(Some(first), ConnectionSortKey::SchoolName);
        assert_eq!(flipped.direction, SortDirection::Desc);

        let other = SortConfig::toggle(Some(flipped), ConnectionSortKey::Status);
        assert_eq!(other, SortConfig::ascending(ConnectionSortKey::Status));
    }

    #[test]
    fn sort_keys_parse_from_field_paths() {
        assert_eq!(
            ConnectionSortKey::from_field("school.name"),
            Some(ConnectionSortKey::SchoolName)
        );
        assert_eq!(
            ConnectionSortKey::from_field("school.location.townName"),
            Some(ConnectionSortKey::TownName)
        );
        assert_eq!(
            SchoolSortKey::from_field("location.districtName"),
            Some(SchoolSortKey::DistrictName)
        );
        assert_eq!(ConnectionSortKey::from_field("school.colour"), None);
        assert!(SortConfig::<SchoolSortKey>::parse("nope", SortDirection::Asc).is_none());

        for key in ConnectionSortKey::ALL {
            assert_eq!(ConnectionSortKey::from_field(key.field()), Some(*key));
        }
    }

    #[test]
    fn number_sort() {
        let mut rows = vec![
            joined("s1", "Alpha", "A", "A"),
            joined("s2", "Beta", "B", "B"),
        ];
        rows[0].school.number_of_students = 900;
        rows[1].school.number_of_students = 40;

        let query = SchoolQuery {
            sort: SortConfig::parse("numberOfStudents", SortDirection::Asc),
            ..SchoolQuery::default()
        };
        assert_eq!(
            ids(&query.apply(&rows), |r| r.school.id.as_str()),
            ["s2", "s1"]
        );
    }

    #[test]
    fn text_sort_is_case_sensitive() {
        let a = SortValue::Text("alpha");
        let b = SortValue::Text("Beta");
        assert_eq!(a.compare(&b), Ordering::Greater);
        assert_eq!(SortValue::Null.compare(&SortValue::Null), Ordering::Equal);
        assert_eq!(
            SortValue::Null.compare(&SortValue::Date(date("2023-01-01"))),
            Ordering::Less
        );
    }

    #[test]
    fn pipeline_does_not_mutate_input() {
        let rows = vec![row("b", "Beta", None), row("a", "Alpha", None)];
        let before = rows.clone();
        let query = ConnectionQuery {
            sort: SortConfig::parse("school.name", SortDirection::Asc),
            ..ConnectionQuery::default()
        };
        let result = query.apply(&rows);
        assert_eq!(ids(&result, |r| r.connection.id.as_str()), ["a", "b"]);
        assert_eq!(rows, before);
    }

    #[test]
    fn clear_resets_everything() {
        let mut query = SchoolQuery {
            search: "bang".to_string(),
            ..SchoolQuery::default()
        };
        query.categories.select(SchoolCategory::Secondary);
        query.toggle_sort(SchoolSortKey::Name);

        query.clear();
        assert_eq!(query, SchoolQuery::default());
    }

    #[test]
    fn direction_parses() {
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert_eq!("ascending".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
