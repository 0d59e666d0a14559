//! Jobs list filtering and sorting.
//!
//! The filter is a case-insensitive substring match on the title. Sorting is
//! stable, so postings that tie keep their creation order.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Deserialize;

use crate::models::job::JobRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    TitleAsc,
    TitleDesc,
    Location,
    WorkType,
    SalaryAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::TitleAsc,
        SortKey::TitleDesc,
        SortKey::Location,
        SortKey::WorkType,
        SortKey::SalaryAsc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::TitleAsc => "title-asc",
            SortKey::TitleDesc => "title-desc",
            SortKey::Location => "location",
            SortKey::WorkType => "work-type",
            SortKey::SalaryAsc => "salary-asc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::TitleAsc => "Title (A-Z)",
            SortKey::TitleDesc => "Title (Z-A)",
            SortKey::Location => "Location",
            SortKey::WorkType => "Work Type",
            SortKey::SalaryAsc => "Salary (Low to High)",
        }
    }
}

impl FromStr for SortKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or(())
    }
}

/// Query string of `GET /partials/jobs/listings`.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
}

impl ListingQuery {
    /// Unknown sort keys fall back to the default order.
    pub fn sort_key(&self) -> SortKey {
        self.sort
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn search(&self) -> &str {
        self.q.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Returns the first number in a salary string: the first run of digits,
/// commas inside the run ignored, a trailing `k` meaning thousands.
/// Figures too large for a `u64` count as unparsable.
pub fn first_salary_figure(salary: &str) -> Option<u64> {
    let mut chars = salary.chars().skip_while(|c| !c.is_ascii_digit()).peekable();
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if c != ',' {
            break;
        }
        chars.next();
    }
    let value = digits.parse::<u64>().ok()?;
    match chars.peek() {
        Some('k') | Some('K') => value.checked_mul(1000),
        _ => Some(value),
    }
}

/// Orders present values before missing ones.
fn cmp_present_first<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn folded(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

pub fn filter_and_sort(jobs: Vec<JobRow>, search: &str, sort: SortKey) -> Vec<JobRow> {
    let needle = search.trim().to_lowercase();
    let mut jobs: Vec<JobRow> = jobs
        .into_iter()
        .filter(|job| needle.is_empty() || job.title.to_lowercase().contains(&needle))
        .collect();

    match sort {
        SortKey::TitleAsc => jobs.sort_by_key(|j| j.title.to_lowercase()),
        SortKey::TitleDesc => {
            jobs.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()))
        }
        SortKey::Location => {
            jobs.sort_by(|a, b| cmp_present_first(folded(&a.location), folded(&b.location)))
        }
        SortKey::WorkType => {
            jobs.sort_by(|a, b| cmp_present_first(folded(&a.work_type), folded(&b.work_type)))
        }
        SortKey::SalaryAsc => jobs.sort_by(|a, b| {
            cmp_present_first(
                a.salary_range.as_deref().and_then(first_salary_figure),
                b.salary_range.as_deref().and_then(first_salary_figure),
            )
        }),
    }
    jobs
}
