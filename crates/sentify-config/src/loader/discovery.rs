//! Where config layers live on disk.

use super::{CONFIG_FILE_NAME, ConfigSearch, LayerOrigin, USER_CONFIG_DIR};
use crate::ConfigError;
use directories::BaseDirs;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[cfg(not(windows))]
const SYSTEM_CONFIG_FILE: &str = "/etc/sentify/sentify.json5";
#[cfg(windows)]
const SYSTEM_CONFIG_FILE: &str = "C:\\ProgramData\\sentify\\sentify.json5";

/// A file that may hold a layer.
pub(super) struct Candidate {
    pub(super) origin: LayerOrigin,
    pub(super) path: PathBuf,
}

pub(super) fn system_config_file() -> Option<PathBuf> {
    Some(PathBuf::from(SYSTEM_CONFIG_FILE))
}

/// `~/.sentify/sentify.json5` when a home directory is known.
pub(super) fn user_config_file() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(USER_CONFIG_DIR)
            .join(CONFIG_FILE_NAME)
    })
}

/// Candidate files in precedence order, lowest first.
pub(super) fn candidates(search: &ConfigSearch) -> Result<Vec<Candidate>, ConfigError> {
    let cwd = canonical_dir(&search.cwd)?;
    let mut found = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |origin: LayerOrigin, path: PathBuf| {
        if seen.insert(file_identity(&path)) {
            found.push(Candidate { origin, path });
        }
    };

    if let Some(path) = &search.system_file {
        push(LayerOrigin::System, path.clone());
    }
    if let Some(path) = &search.user_file {
        push(LayerOrigin::User, path.clone());
    }
    if let Some(root) = project_root(&cwd, &search.project_markers) {
        push(LayerOrigin::Project, root.join(CONFIG_FILE_NAME));
    }
    push(LayerOrigin::WorkingDir, cwd.join(CONFIG_FILE_NAME));

    found.extend(search.overrides.iter().map(|path| Candidate {
        origin: LayerOrigin::Override,
        path: path.clone(),
    }));
    Ok(found)
}

/// Nearest ancestor of `cwd`, itself included, holding any marker.
fn project_root(cwd: &Path, markers: &[String]) -> Option<PathBuf> {
    cwd.ancestors()
        .find(|dir| markers.iter().any(|marker| dir.join(marker).exists()))
        .map(Path::to_path_buf)
}

/// Resolve symlinks in `dir`; a directory that does not exist is kept as given.
fn canonical_dir(dir: &Path) -> Result<PathBuf, ConfigError> {
    match dir.canonicalize() {
        Ok(dir) => Ok(dir),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(dir.to_path_buf()),
        Err(err) => Err(ConfigError::read(dir, err)),
    }
}

fn file_identity(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::{LayerOrigin, candidates, project_root};
    use crate::ConfigSearch;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn project_root_is_the_nearest_marked_ancestor() {
        let temp = tempdir().expect("tmp");
        let outer = temp.path().join("outer");
        let inner = outer.join("inner");
        fs::create_dir_all(outer.join(".git")).expect("outer marker");
        fs::create_dir_all(inner.join("pkg").join("src")).expect("dirs");
        fs::write(inner.join("pkg").join(".git"), "gitdir: ../x").expect("inner marker");

        let markers = vec![".git".to_string()];
        assert_eq!(
            project_root(&inner.join("pkg").join("src"), &markers),
            Some(inner.join("pkg"))
        );
        assert_eq!(project_root(&inner, &markers), Some(outer));
    }

    #[test]
    fn cwd_at_project_root_yields_one_local_candidate() {
        let temp = tempdir().expect("tmp");
        fs::create_dir_all(temp.path().join(".git")).expect("marker");
        let search = ConfigSearch::new(temp.path())
            .local_only()
            .with_override(temp.path().join("extra.json5"));

        let origins: Vec<_> = candidates(&search)
            .expect("candidates")
            .into_iter()
            .map(|candidate| candidate.origin)
            .collect();
        assert_eq!(origins, vec![LayerOrigin::Project, LayerOrigin::Override]);
    }
}
