use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Outcome of looking up a recovered file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Found(PathBuf),
    /// Several candidates in the same folder; the host has to choose.
    Ambiguous(Vec<PathBuf>),
    Missing,
}

/// Turns a file name taken from an EDL comment into a path on disk.
pub trait MediaResolver {
    fn resolve(&self, filename: &str) -> Resolution;
}

/// Recursive, case-insensitive search over an ordered list of folders.
///
/// The first folder containing any match decides the result.
#[derive(Clone, Debug)]
pub struct DirectoryResolver {
    folders: Vec<PathBuf>,
    max_depth: usize,
}

impl DirectoryResolver {
    pub fn new(folders: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            folders: folders.into_iter().map(Into::into).collect(),
            max_depth: 16,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    fn search(&self, folder: &Path, wanted: &str) -> Vec<PathBuf> {
        let mut hits = Vec::new();
        for entry in WalkDir::new(folder)
            .max_depth(self.max_depth)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.eq_ignore_ascii_case(wanted))
            {
                hits.push(entry.into_path());
            }
        }
        hits
    }
}

impl MediaResolver for DirectoryResolver {
    #[tracing::instrument(skip(self))]
    fn resolve(&self, filename: &str) -> Resolution {
        let direct = Path::new(filename);
        if direct.is_absolute() && direct.is_file() {
            return Resolution::Found(direct.to_path_buf());
        }
        // Names may come from another OS, so split on both separators.
        let Some(wanted) = filename.rsplit(['/', '\\']).next().filter(|n| !n.is_empty()) else {
            return Resolution::Missing;
        };
        for folder in &self.folders {
            let mut hits = self.search(folder, wanted);
            match hits.len() {
                0 => continue,
                1 => return Resolution::Found(hits.remove(0)),
                n => {
                    tracing::debug!(folder = %folder.display(), candidates = n, "ambiguous media");
                    return Resolution::Ambiguous(hits);
                }
            }
        }
        Resolution::Missing
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/resolver.rs"]
mod tests;
