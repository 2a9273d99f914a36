//! Directory layout under the user's home directory

use std::path::{Path, PathBuf};

/// Name of the state directory inside the home directory
pub const STATE_DIR: &str = ".openclaw";

/// Locations the maintenance layer works on
///
/// All paths derive from a single home directory:
/// - markers: `<home>/.openclaw/agents`
/// - working state: `<home>/.openclaw/workspace/memory`
/// - backup: `<home>/.openclaw/.memory-backup`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardLayout {
    /// Root of the reservation marker tree
    pub agents_root: PathBuf,

    /// Working-state directory mirrored by the backup
    pub working_dir: PathBuf,

    /// Backup directory
    pub backup_dir: PathBuf,
}

impl GuardLayout {
    /// Build the layout rooted at the given home directory
    pub fn from_home(home: impl AsRef<Path>) -> Self {
        let state = home.as_ref().join(STATE_DIR);
        Self {
            agents_root: state.join("agents"),
            working_dir: state.join("workspace").join("memory"),
            backup_dir: state.join(".memory-backup"),
        }
    }

    /// The `.openclaw` directory containing everything else
    pub fn state_dir(&self) -> Option<&Path> {
        self.backup_dir.parent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_from_home() {
        let layout = GuardLayout::from_home("/home/agent");
        assert_eq!(layout.agents_root, PathBuf::from("/home/agent/.openclaw/agents"));
        assert_eq!(
            layout.working_dir,
            PathBuf::from("/home/agent/.openclaw/workspace/memory")
        );
        assert_eq!(
            layout.backup_dir,
            PathBuf::from("/home/agent/.openclaw/.memory-backup")
        );
        assert_eq!(layout.state_dir(), Some(Path::new("/home/agent/.openclaw")));
    }
}
