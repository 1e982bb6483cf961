//! On-disk project layout
//!
//! ```text
//! <projects-dir>/<slug>/
//!     sitemap.json
//!     outline.html
//!     img/
//! ```

use crate::output::{OutputError, OutputResult};
use std::path::{Path, PathBuf};

const SITEMAP_FILE: &str = "sitemap.json";
const OUTLINE_FILE: &str = "outline.html";
const IMAGE_DIR: &str = "img";

/// Converts a project name to its directory name
///
/// Every character that is not an ASCII letter or digit becomes `-`, and the
/// result is lowercased: `"My Site!"` → `"my-site-"`.
pub fn project_slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

/// Paths of one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    image_dir: PathBuf,
}

impl ProjectLayout {
    /// Computes the layout without touching the filesystem
    ///
    /// # Returns
    ///
    /// * `Ok(ProjectLayout)` - Layout under `projects_dir`
    /// * `Err(OutputError::InvalidProject)` - The name has no letters or digits
    pub fn new(projects_dir: &Path, project_name: &str) -> OutputResult<Self> {
        if !project_name.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(OutputError::InvalidProject(project_name.to_string()));
        }

        let root = projects_dir.join(project_slug(project_name));
        let image_dir = root.join(IMAGE_DIR);
        Ok(Self { root, image_dir })
    }

    /// Creates the project and image directories; existing ones are reused
    pub fn create(&self) -> OutputResult<()> {
        if self.image_dir.is_dir() {
            tracing::info!("Using existing project directory {}", self.root.display());
        } else {
            std::fs::create_dir_all(&self.image_dir)?;
            tracing::info!("Created project directory {}", self.root.display());
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn sitemap_path(&self) -> PathBuf {
        self.root.join(SITEMAP_FILE)
    }

    pub fn outline_path(&self) -> PathBuf {
        self.root.join(OUTLINE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_project_slug() {
        assert_eq!(project_slug("Admissions"), "admissions");
        assert_eq!(project_slug("My Site 2"), "my-site-2");
        assert_eq!(project_slug("a/b..c"), "a-b--c");
        assert_eq!(project_slug("Café"), "caf-");
    }

    #[test]
    fn test_layout_paths() {
        let layout = ProjectLayout::new(Path::new("projects"), "Admissions Office").unwrap();
        assert_eq!(layout.root(), Path::new("projects/admissions-office"));
        assert_eq!(layout.image_dir(), Path::new("projects/admissions-office/img"));
        assert_eq!(
            layout.sitemap_path(),
            PathBuf::from("projects/admissions-office/sitemap.json")
        );
        assert_eq!(
            layout.outline_path(),
            PathBuf::from("projects/admissions-office/outline.html")
        );
    }

    #[test]
    fn test_name_without_alphanumerics_rejected() {
        let result = ProjectLayout::new(Path::new("projects"), " !! ");
        assert!(matches!(result, Err(OutputError::InvalidProject(_))));
    }

    #[test]
    fn test_create_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let layout = ProjectLayout::new(dir.path(), "Test").unwrap();

        layout.create().unwrap();
        assert!(layout.image_dir().is_dir());

        layout.create().unwrap();
        assert!(layout.image_dir().is_dir());
    }
}
