//! Capella Project Loading
//!
//! A project directory `<dir>` named `<name>` holds `<name>.afm` (plugin
//! registrations) and `<name>.aird` (representations).

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{ExtractError, Result};
use crate::xml::{Document, Element};

/// The two files of a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFiles {
    pub afm: PathBuf,
    pub aird: PathBuf,
}

impl ProjectFiles {
    /// Derive file paths from the project directory's own name
    pub fn locate(dir: &Path) -> Result<Self> {
        let dir = dir
            .canonicalize()
            .map_err(|_| ExtractError::InvalidProjectDir(dir.to_path_buf()))?;
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ExtractError::InvalidProjectDir(dir.clone()))?
            .to_string();

        Ok(Self {
            afm: dir.join(format!("{name}.afm")),
            aird: dir.join(format!("{name}.aird")),
        })
    }
}

/// Both documents of a project, parsed
#[derive(Debug, Clone)]
pub struct Project {
    pub files: ProjectFiles,
    pub afm: Document,
    pub aird: Document,
}

impl Project {
    /// Locate and parse both project files
    pub fn load(dir: &Path) -> Result<Self> {
        let files = ProjectFiles::locate(dir)?;
        let afm = Document::from_file(&files.afm)?;
        let aird = Document::from_file(&files.aird)?;
        info!(aird = %files.aird.display(), "loaded project");
        Ok(Self { files, afm, aird })
    }

    /// The `DAnalysis` element of the representation file
    pub fn analysis_root(&self) -> &Element {
        analysis_root(self.aird.root())
    }
}

/// First `DAnalysis` child of the document root, else its first child,
/// else the root itself (a file without an XMI wrapper)
pub fn analysis_root(root: &Element) -> &Element {
    if root.name() == "DAnalysis" {
        return root;
    }
    root.children()
        .iter()
        .find(|c| c.name() == "DAnalysis")
        .or_else(|| root.children().first())
        .unwrap_or(root)
}

/// Fail unless every `required` viewpoint id is registered in the AFM document
pub fn check_required_plugins(afm_root: &Element, required: &[String]) -> Result<()> {
    let found: BTreeSet<&str> = std::iter::once(afm_root)
        .chain(afm_root.descendants())
        .filter(|e| e.name() == "viewpointReferences")
        .filter_map(|e| e.attr("vpId"))
        .filter(|id| !id.is_empty())
        .collect();

    let missing: BTreeSet<&str> = required
        .iter()
        .map(String::as_str)
        .filter(|id| !found.contains(id))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ExtractError::MissingPlugins(
            missing.into_iter().map(String::from).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const AFM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata:Metadata xmlns:metadata="http://www.polarsys.org/kitalpha/ad/metadata/1.0.0">
  <viewpointReferences vpId="org.polarsys.capella.core.viewpoint" version="6.0.0"/>
  <viewpointReferences vpId="com.thalesgroup.mde.capella.stpa" version="1.0.0"/>
</metadata:Metadata>"#;

    fn required() -> Vec<String> {
        vec![
            "com.thalesgroup.mde.capella.stpa".to_string(),
            "org.polarsys.capella.cybersecurity".to_string(),
        ]
    }

    #[test]
    fn test_missing_plugin_is_named() {
        let doc = Document::parse(AFM).unwrap();
        let err = check_required_plugins(doc.root(), &required()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required plugin(s): org.polarsys.capella.cybersecurity"
        );
    }

    #[test]
    fn test_all_plugins_present() {
        let doc = Document::parse(AFM).unwrap();
        assert!(check_required_plugins(doc.root(), &required()[..1]).is_ok());
        assert!(check_required_plugins(doc.root(), &[]).is_ok());
    }

    #[test]
    fn test_missing_plugins_sorted() {
        let root = Element::new("Metadata");
        let err = check_required_plugins(&root, &["z.plugin".to_string(), "a.plugin".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "Missing required plugin(s): a.plugin, z.plugin");
    }

    #[test]
    fn test_locate_uses_directory_name() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("Drone");
        fs::create_dir(&project).unwrap();

        let files = ProjectFiles::locate(&project).unwrap();
        assert!(files.afm.ends_with("Drone/Drone.afm"));
        assert!(files.aird.ends_with("Drone/Drone.aird"));
    }

    #[test]
    fn test_locate_missing_directory() {
        let err = ProjectFiles::locate(Path::new("/nonexistent/Drone")).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidProjectDir(_)));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("Drone");
        fs::create_dir(&project).unwrap();
        fs::write(project.join("Drone.afm"), AFM).unwrap();

        let err = Project::load(&project).unwrap_err();
        match err {
            ExtractError::ProjectFileNotFound { path } => assert!(path.ends_with("Drone.aird")),
            other => panic!("Expected ProjectFileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_analysis_root_selection() {
        let wrapped = Element::new("XMI")
            .with_child(Element::new("DSemanticDiagram"))
            .with_child(Element::new("DAnalysis").with_attr("uid", "_a"));
        assert_eq!(analysis_root(&wrapped).attr("uid"), Some("_a"));

        let bare = Element::new("DAnalysis").with_attr("uid", "_b");
        assert_eq!(analysis_root(&bare).attr("uid"), Some("_b"));

        let unknown = Element::new("XMI").with_child(Element::new("First"));
        assert_eq!(analysis_root(&unknown).name(), "First");
    }
}
