use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::queue::row::{JobRow, JOBID_IDX};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// The full queue listing at a point in time
///
/// A snapshot is replaced wholesale by the next successful fetch; a failed
/// fetch leaves the previous snapshot in place. There is no incremental
/// diffing.
#[derive(Debug, Clone)]
pub struct QueueSnapshot {
    rows: Vec<JobRow>,
    fetched_at: DateTime<Utc>,
}

impl QueueSnapshot {
    pub fn new(rows: Vec<JobRow>) -> QueueSnapshot {
        QueueSnapshot {
            rows,
            fetched_at: Utc::now(),
        }
    }

    pub fn empty() -> QueueSnapshot {
        QueueSnapshot::new(Vec::new())
    }

    pub fn rows(&self) -> &[JobRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Rows matching a case-insensitive substring query in any field
    pub fn filtered(&self, query: &str) -> Vec<&JobRow> {
        self.rows
            .iter()
            .filter(|row| row.matches_filter(query))
            .collect()
    }

    /// Rows owned by the given user, per the configured USER column
    pub fn user_rows(&self, user: &str, user_idx: usize) -> Vec<&JobRow> {
        self.rows
            .iter()
            .filter(|row| row.field(user_idx) == Some(user))
            .collect()
    }

    /// Rows sorted by one column
    ///
    /// Values that both parse as numbers compare numerically. The job id
    /// column gets a special weight so job-array ids like `123_4` or `123[4]`
    /// still order sensibly next to plain ids.
    pub fn sorted_by(&self, col: usize, direction: SortDirection) -> Vec<&JobRow> {
        let mut rows: Vec<&JobRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| {
            let ordering = compare_fields(a.field(col), b.field(col), col == JOBID_IDX);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        rows
    }

    /// One page of rows; pages are zero-indexed
    pub fn page(&self, items_per_page: usize, page_idx: usize) -> &[JobRow] {
        if items_per_page == 0 {
            return &self.rows;
        }
        let start = page_idx * items_per_page;
        if start >= self.rows.len() {
            return &[];
        }
        let end = (start + items_per_page).min(self.rows.len());
        &self.rows[start..end]
    }

    pub fn num_pages(&self, items_per_page: usize) -> usize {
        if items_per_page == 0 {
            1
        } else {
            (self.rows.len() + items_per_page - 1) / items_per_page
        }
    }
}

fn compare_fields(a: Option<&str>, b: Option<&str>, job_id_col: bool) -> Ordering {
    let a = a.unwrap_or("");
    let b = b.unwrap_or("");
    if let (Ok(na), Ok(nb)) = (a.parse::<f64>(), b.parse::<f64>()) {
        return na.partial_cmp(&nb).unwrap_or(Ordering::Equal);
    }
    if job_id_col {
        return job_id_weight(a).cmp(&job_id_weight(b));
    }
    a.cmp(b)
}

/// Sum the numeric fragments of a job-array id (`123_4`, `123-4`, `123[4]`)
fn job_id_weight(id: &str) -> u64 {
    id.split(|c| matches!(c, '-' | '_' | '[' | ']'))
        .filter_map(|part| part.parse::<u64>().ok())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> QueueSnapshot {
        QueueSnapshot::new(vec![
            JobRow::from(vec!["101", "debug", "job1", "alice", "R", "0:10", "1", "node01"]),
            JobRow::from(vec!["99", "debug", "job2", "bob", "PD", "0:00", "1", "(Priority)"]),
            JobRow::from(vec!["103_2", "gpu", "job3", "alice", "R", "1:42", "2", "node[02-03]"]),
        ])
    }

    #[test]
    fn filter_matches_any_field() {
        let snap = snapshot();
        assert_eq!(snap.filtered("gpu").len(), 1);
        assert_eq!(snap.filtered("alice").len(), 2);
        assert_eq!(snap.filtered("").len(), 3);
    }

    #[test]
    fn user_rows_match_user_column() {
        let snap = snapshot();
        let rows = snap.user_rows("alice", 3);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.field(3) == Some("alice")));
        assert!(snap.user_rows("mallory", 3).is_empty());
    }

    #[test]
    fn job_ids_sort_numerically() {
        let snap = snapshot();
        let sorted = snap.sorted_by(JOBID_IDX, SortDirection::Asc);
        let ids: Vec<&str> = sorted.iter().map(|r| r.job_id()).collect();
        // 99 < 101 < 103_2 (weight 105)
        assert_eq!(ids, vec!["99", "101", "103_2"]);
    }

    #[test]
    fn sort_direction_reverses() {
        let snap = snapshot();
        let sorted = snap.sorted_by(JOBID_IDX, SortDirection::Desc);
        assert_eq!(sorted[0].job_id(), "103_2");
    }

    #[test]
    fn string_columns_sort_lexically() {
        let snap = snapshot();
        let sorted = snap.sorted_by(1, SortDirection::Asc);
        assert_eq!(sorted[0].field(1), Some("debug"));
        assert_eq!(sorted[2].field(1), Some("gpu"));
    }

    #[test]
    fn pagination_slices_rows() {
        let snap = snapshot();
        assert_eq!(snap.page(2, 0).len(), 2);
        assert_eq!(snap.page(2, 1).len(), 1);
        assert!(snap.page(2, 2).is_empty());
        assert_eq!(snap.num_pages(2), 2);
    }

    #[test]
    fn job_id_weight_sums_fragments() {
        assert_eq!(job_id_weight("123_4"), 127);
        assert_eq!(job_id_weight("123[4]"), 127);
        assert_eq!(job_id_weight("99"), 99);
    }
}
