//! Page and sort requests for the task list.
//!
//! These types carry everything the list view needs to ask the task
//! repository for one bounded, ordered slice of non-deleted tasks:
//! which page, how many rows, and in which order. [`Pager`] is the
//! navigation state the front end keeps between requests.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sitrack::db::tasks::Tasks;
//! use sitrack::libs::page::{Pager, SortColumn};
//!
//! let mut tasks = Tasks::new()?;
//! let mut pager = Pager::default();
//! pager.sort_by(SortColumn::Status);
//! let page = tasks.page(&pager.request())?;
//! pager.sync(&page);
//! println!("{}", page.label());
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::error::TrackerError;
use super::task::Task;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Page sizes offered to the user.
pub const PAGE_SIZE_CHOICES: [usize; 4] = [10, 25, 50, 100];

/// Ordering used when no sort column has been chosen.
const DEFAULT_ORDER_BY: &str = "t.creation_dt DESC, t.id DESC";

/// A visible task attribute the list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Id,
    Description,
    Details,
    Created,
    Completed,
    Status,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Id,
        SortColumn::Description,
        SortColumn::Details,
        SortColumn::Created,
        SortColumn::Completed,
        SortColumn::Status,
    ];

    /// Column expression in the joined list query (`tasks t JOIN status s`).
    ///
    /// Status sorts by the display name, not by the foreign key.
    pub fn storage_column(&self) -> &'static str {
        match self {
            SortColumn::Id => "t.id",
            SortColumn::Description => "t.description",
            SortColumn::Details => "t.details",
            SortColumn::Created => "t.creation_dt",
            SortColumn::Completed => "t.completion_dt",
            SortColumn::Status => "s.name",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Description => "description",
            SortColumn::Details => "details",
            SortColumn::Created => "created",
            SortColumn::Completed => "completed",
            SortColumn::Status => "status",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        SortColumn::ALL
            .into_iter()
            .find(|column| column.as_str() == needle)
            .ok_or_else(|| TrackerError::UnknownSortColumn(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Active sort target. `column == None` means the default ordering
/// (newest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self {
            column: Some(column),
            direction,
        }
    }

    /// Applies a click on a column header: the same column flips direction,
    /// a different column starts ascending.
    pub fn click(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.direction = self.direction.toggle();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Asc;
        }
    }

    pub fn reset(&mut self) {
        *self = SortState::default();
    }

    /// ORDER BY clause body. Rows are always tie-broken by id in the same
    /// direction so the ordering is total and pages never overlap.
    pub fn order_by(&self) -> String {
        match self.column {
            None => DEFAULT_ORDER_BY.to_string(),
            Some(SortColumn::Id) => format!("t.id {}", self.direction.as_sql()),
            Some(column) => {
                let dir = self.direction.as_sql();
                format!("{} {dir}, t.id {dir}", column.storage_column())
            }
        }
    }
}

/// Rows per page, restricted to [`PAGE_SIZE_CHOICES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(usize);

impl PageSize {
    pub fn new(size: usize) -> Result<Self, TrackerError> {
        if PAGE_SIZE_CHOICES.contains(&size) {
            Ok(PageSize(size))
        } else {
            let choices = PAGE_SIZE_CHOICES.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ");
            Err(TrackerError::InvalidPageSize(size, choices))
        }
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(PAGE_SIZE_CHOICES[0])
    }
}

impl TryFrom<usize> for PageSize {
    type Error = TrackerError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        PageSize::new(size)
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    /// Zero-based; out-of-range values are clamped by the query.
    pub page_index: i64,
    pub page_size: PageSize,
    pub sort: SortState,
}

impl PageRequest {
    pub fn new(page_index: i64, page_size: PageSize, sort: SortState) -> Self {
        Self {
            page_index,
            page_size,
            sort,
        }
    }
}

/// One page of the task list.
#[derive(Debug, Clone)]
pub struct Page {
    pub tasks: Vec<Task>,
    /// Number of non-deleted tasks across all pages.
    pub total: i64,
    /// Zero-based index actually served, after clamping.
    pub page_index: i64,
    /// Always at least 1, even when there are no tasks.
    pub page_count: i64,
    pub page_size: PageSize,
}

impl Page {
    pub fn page_count_for(total: i64, page_size: PageSize) -> i64 {
        let size = page_size.get() as i64;
        ((total + size - 1) / size).max(1)
    }

    /// Clamps a requested index into `[0, page_count - 1]`.
    pub fn clamp_index(page_index: i64, page_count: i64) -> i64 {
        page_index.clamp(0, (page_count - 1).max(0))
    }

    pub fn offset(page_index: i64, page_size: PageSize) -> i64 {
        page_index * page_size.get() as i64
    }

    pub fn is_first(&self) -> bool {
        self.page_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.page_index + 1 >= self.page_count
    }

    /// Footer text, e.g. `page 1 of 3 (23)`.
    pub fn label(&self) -> String {
        format!("page {} of {} ({})", self.page_index + 1, self.page_count, self.total)
    }
}

/// List navigation state kept by the front end between queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pager {
    pub page_index: i64,
    pub page_size: PageSize,
    pub sort: SortState,
}

impl Pager {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page_index, self.page_size, self.sort)
    }

    pub fn next(&mut self) {
        self.page_index = self.page_index.saturating_add(1);
    }

    pub fn prev(&mut self) {
        self.page_index = self.page_index.saturating_sub(1).max(0);
    }

    pub fn go_to(&mut self, page_index: i64) {
        self.page_index = page_index.max(0);
    }

    /// Changing the page size always returns to the first page.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page_index = 0;
    }

    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort.click(column);
    }

    /// Adopts the index the query actually served.
    pub fn sync(&mut self, page: &Page) {
        self.page_index = page.page_index;
    }
}
