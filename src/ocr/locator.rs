use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

/// Finds a Tesseract executable on the host.
///
/// Probe order is the explicit override, then well-known install paths, then
/// the host's PATH lookup command. Nothing here is fatal: every failure just
/// means "not found".
#[derive(Debug, Clone)]
pub struct Locator {
    override_path: Option<PathBuf>,
    candidates: Vec<PathBuf>,
    path_lookup: bool,
}

impl Locator {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self {
            override_path: None,
            candidates,
            path_lookup: true,
        }
    }

    pub fn platform_default() -> Self {
        Self::new(default_candidates())
    }

    pub fn with_override(mut self, path: Option<PathBuf>) -> Self {
        self.override_path = path;
        self
    }

    pub fn without_path_lookup(mut self) -> Self {
        self.path_lookup = false;
        self
    }

    pub fn locate(&self) -> Option<PathBuf> {
        if let Some(path) = &self.override_path {
            if path.exists() {
                return Some(path.clone());
            }
            debug!(path = %path.display(), "tesseract override does not exist");
        }

        if let Some(path) = self.candidates.iter().find(|p| p.exists()) {
            return Some(path.clone());
        }

        if self.path_lookup {
            return lookup_in_path();
        }

        None
    }
}

#[cfg(windows)]
fn default_candidates() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from(r"C:\Program Files\Tesseract-OCR\tesseract.exe"),
        PathBuf::from(r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe"),
    ];
    if let Ok(user) = std::env::var("USERNAME") {
        paths.push(PathBuf::from(format!(
            r"C:\Users\{user}\AppData\Local\Tesseract-OCR\tesseract.exe"
        )));
    }
    paths
}

#[cfg(not(windows))]
fn default_candidates() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/usr/bin/tesseract"),
        PathBuf::from("/usr/local/bin/tesseract"),
        PathBuf::from("/opt/homebrew/bin/tesseract"),
    ]
}

fn lookup_in_path() -> Option<PathBuf> {
    let finder = if cfg!(windows) { "where" } else { "which" };
    let output = match Command::new(finder).arg("tesseract").output() {
        Ok(output) => output,
        Err(err) => {
            debug!("{finder} lookup failed: {err}");
            return None;
        }
    };

    if !output.status.success() {
        return None;
    }

    first_line(&String::from_utf8_lossy(&output.stdout))
}

fn first_line(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_existing_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        let second = dir.path().join("tesseract");
        std::fs::write(&second, b"").unwrap();

        let locator = Locator::new(vec![dir.path().join("missing"), second.clone()])
            .without_path_lookup();
        assert_eq!(locator.locate(), Some(second));
    }

    #[test]
    fn override_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let candidate = dir.path().join("candidate");
        let custom = dir.path().join("custom");
        std::fs::write(&candidate, b"").unwrap();
        std::fs::write(&custom, b"").unwrap();

        let locator = Locator::new(vec![candidate])
            .with_override(Some(custom.clone()))
            .without_path_lookup();
        assert_eq!(locator.locate(), Some(custom));
    }

    #[test]
    fn missing_override_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let candidate = dir.path().join("candidate");
        std::fs::write(&candidate, b"").unwrap();

        let locator = Locator::new(vec![candidate.clone()])
            .with_override(Some(dir.path().join("gone")))
            .without_path_lookup();
        assert_eq!(locator.locate(), Some(candidate));
    }

    #[test]
    fn nothing_found_is_none() {
        let locator = Locator::new(vec![PathBuf::from("/nonexistent/tesseract")])
            .without_path_lookup();
        assert_eq!(locator.locate(), None);
    }

    #[test]
    fn parses_first_non_empty_line() {
        assert_eq!(
            first_line("\r\nC:\\Tesseract\\tesseract.exe\r\nC:\\other.exe\r\n"),
            Some(PathBuf::from("C:\\Tesseract\\tesseract.exe"))
        );
        assert_eq!(first_line("   \n"), None);
    }
}
