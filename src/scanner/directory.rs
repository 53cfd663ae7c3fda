/// Directory names that are never entered while looking for repositories.
///
/// Grouped by the ecosystem that produces them. The set is fixed; it is not
/// read from configuration.
#[derive(Debug)]
pub struct SkippedDirectories {
    /// Node.js dependencies
    pub nodejs: &'static [&'static str],
    /// Python virtual environments and caches
    pub python: &'static [&'static str],
    /// Terraform provider/module cache
    pub terraform: &'static [&'static str],
    /// Vendored dependencies (Go, PHP, Ruby)
    pub vendored: &'static [&'static str],
}

pub const SKIPPED_DIRECTORIES: SkippedDirectories = SkippedDirectories {
    nodejs: &["node_modules"],
    python: &["venv", ".venv", "env", "__pycache__"],
    terraform: &[".terraform"],
    vendored: &["vendor"],
};

impl SkippedDirectories {
    pub fn all(&self) -> impl Iterator<Item = &'static str> {
        self.nodejs
            .iter()
            .chain(self.python)
            .chain(self.terraform)
            .chain(self.vendored)
            .copied()
    }

    /// Check if a directory base name should be skipped
    pub fn contains(&self, dir_name: &str) -> bool {
        self.all().any(|name| name == dir_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_directories() {
        for name in ["node_modules", "venv", ".venv", "env", "__pycache__", ".terraform", "vendor"] {
            assert!(SKIPPED_DIRECTORIES.contains(name), "{name} should be skipped");
        }

        assert!(!SKIPPED_DIRECTORIES.contains("src"));
        assert!(!SKIPPED_DIRECTORIES.contains("build"));
        assert!(!SKIPPED_DIRECTORIES.contains(".git"));
        assert!(!SKIPPED_DIRECTORIES.contains("Node_Modules"));
    }
}
