//! Per-installation environment
//!
//! The engine needs a handful of facts about the machine it runs on: the
//! user and host names feed the credential cipher key and the owner default,
//! the home directory seeds the working-directory defaults, and the process
//! working directory locates the portable preferences file.

use std::path::{Path, PathBuf};

/// Operating system family, used for a few platform-specific defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    MacOs,
    Linux,
}

impl OsFamily {
    /// The family of the running target
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            OsFamily::Windows
        } else if cfg!(target_os = "macos") {
            OsFamily::MacOs
        } else {
            OsFamily::Linux
        }
    }
}

/// Identity and location facts for one installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub user_name: String,
    pub host_name: String,
    pub home_dir: PathBuf,
    pub working_dir: PathBuf,
    pub os: OsFamily,
}

impl Environment {
    /// Detect the environment of the current process
    ///
    /// Never fails: every fact has a fallback so preferences remain usable in
    /// stripped-down containers.
    pub fn detect() -> Self {
        Self {
            user_name: detect_user_name(),
            host_name: detect_host_name(),
            home_dir: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            os: OsFamily::current(),
        }
    }

    /// Fixed environment rooted at `dir`, for tests and sandboxed runs
    pub fn isolated(user_name: &str, host_name: &str, dir: &Path) -> Self {
        Self {
            user_name: user_name.to_string(),
            host_name: host_name.to_string(),
            home_dir: dir.to_path_buf(),
            working_dir: dir.to_path_buf(),
            os: OsFamily::current(),
        }
    }
}

fn detect_user_name() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| "user".to_string())
}

fn detect_host_name() -> String {
    sysinfo::System::host_name()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_never_yields_blank_identity() {
        let env = Environment::detect();
        assert!(!env.user_name.trim().is_empty());
        assert!(!env.host_name.trim().is_empty());
    }

    #[test]
    fn test_host_name_comes_from_the_os() {
        std::env::set_var("HOSTNAME", "spoofed-box");
        std::env::set_var("COMPUTERNAME", "spoofed-box");
        let env = Environment::detect();
        let expected = sysinfo::System::host_name()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "localhost".to_string());
        assert_eq!(env.host_name, expected);
    }

    #[test]
    fn test_isolated_uses_given_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let env = Environment::isolated("alice", "box", dir.path());
        assert_eq!(env.home_dir, dir.path());
        assert_eq!(env.working_dir, dir.path());
        assert_eq!(env.user_name, "alice");
    }
}
