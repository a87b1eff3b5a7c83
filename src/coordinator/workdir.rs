/// Where submitted jobs write their output: the server root joined with the
/// browser-relative path
///
/// The server root is normalised to end in exactly one separator, so joining
/// never produces a doubled `//` and never loses a segment.
#[derive(Debug, Clone)]
pub struct WorkingDirectory {
    server_root: String,
    relative: String,
}

impl WorkingDirectory {
    pub fn new(server_root: impl Into<String>, relative: impl Into<String>) -> WorkingDirectory {
        WorkingDirectory {
            server_root: server_root.into(),
            relative: relative.into(),
        }
    }

    /// Absolute output directory for sbatch, before URL encoding
    pub fn output_dir(&self) -> String {
        let mut dir = self.server_root.clone();
        if !dir.ends_with('/') {
            dir.push('/');
        }
        dir.push_str(self.relative.trim_start_matches('/'));
        dir
    }

    /// Resolve a script path against the working directory; absolute paths
    /// pass through untouched
    pub fn resolve_input(&self, input: &str) -> String {
        if input.starts_with('/') {
            return input.to_string();
        }
        let mut path = self.output_dir();
        if !path.ends_with('/') {
            path.push('/');
        }
        path.push_str(input);
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_without_trailing_separator_gains_one() {
        let wd = WorkingDirectory::new("/home/alice", "notebooks");
        assert_eq!(wd.output_dir(), "/home/alice/notebooks");
    }

    #[test]
    fn root_with_trailing_separator_is_not_doubled() {
        let wd = WorkingDirectory::new("/home/alice/", "notebooks");
        assert_eq!(wd.output_dir(), "/home/alice/notebooks");
    }

    #[test]
    fn bare_root_stays_single_separator() {
        let wd = WorkingDirectory::new("/", "notebooks");
        assert_eq!(wd.output_dir(), "/notebooks");
    }

    #[test]
    fn empty_relative_path_keeps_trailing_separator() {
        let wd = WorkingDirectory::new("/home/alice", "");
        assert_eq!(wd.output_dir(), "/home/alice/");
    }

    #[test]
    fn relative_input_resolves_against_working_dir() {
        let wd = WorkingDirectory::new("/home/alice", "notebooks");
        assert_eq!(wd.resolve_input("run.sh"), "/home/alice/notebooks/run.sh");
    }

    #[test]
    fn absolute_input_passes_through() {
        let wd = WorkingDirectory::new("/home/alice", "notebooks");
        assert_eq!(wd.resolve_input("/scratch/run.sh"), "/scratch/run.sh");
    }
}
