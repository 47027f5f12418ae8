//! Target directory discovery.
//!
//! Exactly one strategy runs, in priority order: an Atlantis project file,
//! a recursive search for `*.tf` files, or the explicit `working-dir` list.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{CoreError, CoreResult};
use crate::inputs::ActionConfig;

/// Strategy used to build the worklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum DirectoryStrategy {
    /// Projects listed in an Atlantis manifest (path relative to the workspace).
    Atlantis { file: PathBuf },
    /// Every directory containing a `*.tf` file below `root`.
    Find { root: PathBuf },
    /// Comma-separated list from `working-dir`.
    Explicit { dirs: String },
}

impl DirectoryStrategy {
    /// Pick the strategy for a configuration.
    pub fn select(config: &ActionConfig, workspace: &Path) -> Self {
        if let Some(file) = &config.atlantis_file {
            if workspace.join(file).is_file() {
                return Self::Atlantis { file: file.clone() };
            }
            debug!("Atlantis file {} not found, ignoring", file.display());
        }

        if let Some(root) = &config.find_dir {
            return Self::Find { root: root.clone() };
        }

        Self::Explicit {
            dirs: config.working_dir.clone(),
        }
    }

    /// Produce the ordered worklist.
    pub fn resolve(&self, workspace: &Path) -> CoreResult<Vec<PathBuf>> {
        let dirs = match self {
            Self::Atlantis { file } => atlantis_dirs(&workspace.join(file))?,
            Self::Find { root } => find_terraform_dirs(workspace, root)?,
            Self::Explicit { dirs } => split_working_dirs(dirs),
        };
        info!("Resolved {} director(ies) using {}", dirs.len(), self);
        Ok(dirs)
    }
}

impl fmt::Display for DirectoryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atlantis { file } => write!(f, "atlantis file {}", file.display()),
            Self::Find { root } => write!(f, "find-dir {}", root.display()),
            Self::Explicit { dirs } => write!(f, "working-dir {:?}", dirs),
        }
    }
}

/// Select and run the strategy in one step.
pub fn resolve_worklist(config: &ActionConfig, workspace: &Path) -> CoreResult<Vec<PathBuf>> {
    DirectoryStrategy::select(config, workspace).resolve(workspace)
}

#[derive(Debug, Deserialize)]
struct AtlantisManifest {
    #[serde(default)]
    projects: Vec<AtlantisProject>,
}

#[derive(Debug, Deserialize)]
struct AtlantisProject {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    dir: Option<String>,
}

/// Project directories from an Atlantis manifest, in file order.
pub fn atlantis_dirs(path: &Path) -> CoreResult<Vec<PathBuf>> {
    debug!("Reading Atlantis file {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_atlantis(&content).map_err(|source| CoreError::AtlantisFile {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_atlantis(content: &str) -> Result<Vec<PathBuf>, serde_yaml::Error> {
    let manifest: AtlantisManifest = serde_yaml::from_str(content)?;

    let mut dirs = Vec::new();
    for (index, project) in manifest.projects.into_iter().enumerate() {
        match project.dir {
            Some(dir) => {
                let dir = dir.strip_prefix("- ").unwrap_or(&dir).trim();
                if !dir.is_empty() {
                    dirs.push(PathBuf::from(dir));
                }
            }
            None => warn!(
                "Atlantis project {} has no dir, skipping",
                project.name.unwrap_or_else(|| format!("#{}", index))
            ),
        }
    }
    Ok(dirs)
}

/// Parent directories of every `*.tf` file below `workspace/root`,
/// expressed as `root/...`, first-seen order, no duplicates.
pub fn find_terraform_dirs(workspace: &Path, root: &Path) -> CoreResult<Vec<PathBuf>> {
    let search_root = workspace.join(root);
    let mut seen = HashSet::new();
    let mut dirs = Vec::new();

    for entry in WalkDir::new(&search_root).sort_by_file_name() {
        let entry = entry.map_err(|e| CoreError::FindDir {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if path.extension().map_or(true, |ext| ext != "tf") || !is_regular_file(&entry) {
            continue;
        }

        let relative = path.strip_prefix(&search_root).unwrap_or(path);
        let dir = match root.join(relative).parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if seen.insert(dir.clone()) {
            debug!("Found Terraform module {}", dir.display());
            dirs.push(dir);
        }
    }

    Ok(dirs)
}

/// Regular file, or a symlink that resolves to one.
fn is_regular_file(entry: &walkdir::DirEntry) -> bool {
    if entry.path_is_symlink() {
        fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file())
    } else {
        entry.file_type().is_file()
    }
}

/// Split `working-dir` on commas, trimming each segment and dropping empty ones.
pub fn split_working_dirs(value: &str) -> Vec<PathBuf> {
    value
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{InputKey, RawInputs};
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_split_working_dirs() {
        assert_eq!(
            split_working_dirs("a,b,c"),
            vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")]
        );
        assert_eq!(
            split_working_dirs(",modules/vpc,,modules/eks,"),
            vec![PathBuf::from("modules/vpc"), PathBuf::from("modules/eks")]
        );
        assert_eq!(split_working_dirs("a, b"), vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert!(split_working_dirs(",").is_empty());
    }

    #[test]
    fn test_split_working_dirs_keeps_spaces_in_names() {
        assert_eq!(
            split_working_dirs("my module,b"),
            vec![PathBuf::from("my module"), PathBuf::from("b")]
        );
        assert_eq!(
            split_working_dirs(" modules/shared vpc , "),
            vec![PathBuf::from("modules/shared vpc")]
        );
    }

    #[test]
    fn test_parse_atlantis() {
        let yaml = r#"
version: 3
projects:
  - name: network
    dir: terraform/network
  - name: legacy
    dir: "- terraform/legacy"
  - name: nodir
    workspace: staging
  - dir: .
"#;
        let dirs = parse_atlantis(yaml).unwrap();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("terraform/network"),
                PathBuf::from("terraform/legacy"),
                PathBuf::from("."),
            ]
        );
    }

    #[test]
    fn test_parse_atlantis_invalid() {
        assert!(parse_atlantis("projects: [unclosed").is_err());
        assert!(parse_atlantis("version: 3\n").unwrap().is_empty());
    }

    #[test]
    fn test_find_dedupes_in_first_seen_order() {
        let ws = tempdir().unwrap();
        touch(ws.path(), "infra/main.tf");
        touch(ws.path(), "infra/variables.tf");
        touch(ws.path(), "infra/modules/b/main.tf");
        touch(ws.path(), "infra/modules/a/main.tf");
        touch(ws.path(), "infra/modules/a/outputs.tf");
        touch(ws.path(), "infra/modules/c/README.md");

        let dirs = find_terraform_dirs(ws.path(), Path::new("infra")).unwrap();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("infra"),
                PathBuf::from("infra/modules/a"),
                PathBuf::from("infra/modules/b"),
            ]
        );
    }

    #[test]
    fn test_find_from_workspace_root() {
        let ws = tempdir().unwrap();
        touch(ws.path(), "main.tf");
        touch(ws.path(), "modules/x/main.tf");

        let dirs = find_terraform_dirs(ws.path(), Path::new(".")).unwrap();
        assert_eq!(dirs, vec![PathBuf::from("."), PathBuf::from("./modules/x")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_follows_symlinked_tf_files() {
        let ws = tempdir().unwrap();
        touch(ws.path(), "shared/providers.tf");
        fs::create_dir_all(ws.path().join("infra/linked")).unwrap();
        fs::create_dir_all(ws.path().join("infra/dangling")).unwrap();
        std::os::unix::fs::symlink(
            ws.path().join("shared/providers.tf"),
            ws.path().join("infra/linked/providers.tf"),
        )
        .unwrap();
        std::os::unix::fs::symlink(
            ws.path().join("shared/missing.tf"),
            ws.path().join("infra/dangling/missing.tf"),
        )
        .unwrap();

        let dirs = find_terraform_dirs(ws.path(), Path::new("infra")).unwrap();
        assert_eq!(dirs, vec![PathBuf::from("infra/linked")]);
    }

    #[test]
    fn test_find_missing_root_is_an_error() {
        let ws = tempdir().unwrap();
        let result = find_terraform_dirs(ws.path(), Path::new("nope"));
        assert!(matches!(result, Err(CoreError::FindDir { .. })));
    }

    #[test]
    fn test_strategy_priority() {
        let ws = tempdir().unwrap();
        touch(ws.path(), "tf/main.tf");
        fs::write(
            ws.path().join("atlantis.yaml"),
            "version: 3\nprojects:\n  - dir: from-atlantis\n",
        )
        .unwrap();

        let all = RawInputs::new()
            .with(InputKey::AtlantisFile, "atlantis.yaml")
            .with(InputKey::FindDir, "tf")
            .with(InputKey::WorkingDir, "explicit")
            .normalize();
        assert_eq!(
            resolve_worklist(&all, ws.path()).unwrap(),
            vec![PathBuf::from("from-atlantis")]
        );

        let no_atlantis = RawInputs::new()
            .with(InputKey::AtlantisFile, "missing.yaml")
            .with(InputKey::FindDir, "tf")
            .with(InputKey::WorkingDir, "explicit")
            .normalize();
        assert_eq!(
            DirectoryStrategy::select(&no_atlantis, ws.path()),
            DirectoryStrategy::Find {
                root: PathBuf::from("tf")
            }
        );
        assert_eq!(
            resolve_worklist(&no_atlantis, ws.path()).unwrap(),
            vec![PathBuf::from("tf")]
        );

        let explicit = RawInputs::new()
            .with(InputKey::FindDir, "disabled")
            .with(InputKey::WorkingDir, "explicit,other")
            .normalize();
        assert_eq!(
            resolve_worklist(&explicit, ws.path()).unwrap(),
            vec![PathBuf::from("explicit"), PathBuf::from("other")]
        );
    }
}
