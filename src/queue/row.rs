/// The column index of the job id, always first in the configured columns
pub const JOBID_IDX: usize = 0;

/// One queued job: ordered string fields, one per configured queue column
///
/// The job id is the primary key and assumed unique among currently-queued
/// jobs. Rows are produced wholesale by each snapshot fetch and never patched
/// in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRow {
    fields: Vec<String>,
}

impl JobRow {
    pub fn new(fields: Vec<String>) -> JobRow {
        JobRow { fields }
    }

    pub fn job_id(&self) -> &str {
        self.field(JOBID_IDX).unwrap_or("")
    }

    pub fn field(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Case-insensitive substring match against any field
    pub fn matches_filter(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.fields
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

impl From<Vec<&str>> for JobRow {
    fn from(fields: Vec<&str>) -> JobRow {
        JobRow::new(fields.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> JobRow {
        JobRow::from(vec!["101", "debug", "job1", "alice", "R", "0:10", "1", "node01"])
    }

    #[test]
    fn job_id_is_first_field() {
        assert_eq!(row().job_id(), "101");
    }

    #[test]
    fn filter_is_case_insensitive() {
        assert!(row().matches_filter("ALICE"));
        assert!(row().matches_filter("node"));
        assert!(!row().matches_filter("bob"));
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(row().matches_filter(""));
    }

    #[test]
    fn missing_field_is_none() {
        assert_eq!(row().field(20), None);
    }
}
