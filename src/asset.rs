//! # Assets and Path Classification
//!
//! The asset tree under the configured root is laid out at fixed depths:
//!
//! ```text
//! <root>/[<category>/][<project segment>/]<repository path>
//! ```
//!
//! - `<category>` is one of `all`, `code`, `test`, and only present when the
//!   [`Layout`] requires it.
//! - `<project segment>` is a directory whose name carries a lowercase
//!   `8-4-4-4-12` hex token. Files below it are scoped to the one repository
//!   of that exact name. Without it, a file is shared by every repository.
//! - `<repository path>` is kept verbatim, nested directories included.
//!
//! Classification works on path components alone and never touches the disk.
//! The root is removed component-wise, so `./assets/input`, `assets//input`
//! and `assets/input/` all name the same tree. A path only fails to classify
//! when it is not below the root, names the root itself, or misses a required
//! category directory. A file directly below the root is simply shared.
//!
//! [`AssetCatalog::discover`] walks the root with `glob` and classifies each
//! file once; files that do not fit the layout are logged and left out.

use crate::error::{Error, Result};
use log::{error, info, warn};
use regex::Regex;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

// Literal pattern, compiled on first use; the classification tests exercise it.
static PROJECT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[^0-9a-f])[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}(?:[^0-9a-f]|$)",
    )
    .expect("static pattern")
});

/// Whether a path segment names a project directory.
pub fn is_project_segment(segment: &str) -> bool {
    PROJECT_TOKEN.is_match(segment)
}

/// Top-level category directory of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    All,
    Code,
    Test,
}

impl AssetCategory {
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "all" => Some(AssetCategory::All),
            "code" => Some(AssetCategory::Code),
            "test" => Some(AssetCategory::Test),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetCategory::All => "all",
            AssetCategory::Code => "code",
            AssetCategory::Test => "test",
        }
    }
}

/// Root and fixed depths of the local asset tree for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    require_category: bool,
}

impl Layout {
    /// Layout for files discovered below `root`.
    pub fn new(root: &Path, require_category: bool) -> Self {
        Self {
            root: clean(root),
            require_category,
        }
    }

    /// The root with `.` components and doubled separators removed.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of components the root strips from every asset path.
    pub fn root_depth(&self) -> usize {
        self.root.components().count()
    }

    pub fn require_category(&self) -> bool {
        self.require_category
    }
}

/// One classified local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    local_path: PathBuf,
    repo_path: String,
    project_id: Option<String>,
    category: Option<AssetCategory>,
}

impl Asset {
    /// Classify a local path according to `layout`.
    pub fn classify(path: impl AsRef<Path>, layout: &Layout) -> Result<Self> {
        let local_path = path.as_ref();
        let normalized = normalize(&local_path.to_string_lossy());
        let fail = |message: String| Error::Classification {
            path: normalized.clone(),
            message,
        };
        if normalized.ends_with('/') {
            return Err(fail("no file name below the asset root".to_string()));
        }

        let cleaned = clean(local_path);
        let outside = || fail(format!("not below the asset root {}", layout.root.display()));
        let relative = cleaned.strip_prefix(&layout.root).map_err(|_| outside())?;
        let segments = relative
            .components()
            .map(|component| match component {
                Component::Normal(name) => Ok(name.to_string_lossy().into_owned()),
                _ => Err(outside()),
            })
            .collect::<Result<Vec<String>>>()?;
        if segments.is_empty() {
            return Err(fail("no file name below the asset root".to_string()));
        }

        let mut depth = 0;
        let category = if layout.require_category {
            let category = AssetCategory::from_segment(&segments[0])
                .filter(|_| segments.len() > 1)
                .ok_or_else(|| {
                    fail("files may only be placed in the subdirectories all, code and test".to_string())
                })?;
            depth += 1;
            Some(category)
        } else {
            None
        };

        // The last segment is the file name and never a project directory.
        let project_id = match segments.get(depth) {
            Some(segment) if depth + 1 < segments.len() && is_project_segment(segment) => {
                depth += 1;
                Some(segment.clone())
            }
            _ => None,
        };

        Ok(Self {
            local_path: local_path.to_path_buf(),
            repo_path: segments[depth..].join("/"),
            project_id,
            category,
        })
    }

    /// Where the file's bytes live locally.
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Where the file goes inside a target repository.
    pub fn repo_path(&self) -> &str {
        &self.repo_path
    }

    /// Name of the one repository this asset is scoped to, if any.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn category(&self) -> Option<AssetCategory> {
        self.category
    }

    pub fn is_shared(&self) -> bool {
        self.project_id.is_none()
    }

    /// Shared assets apply everywhere; scoped ones only to the exact repository name.
    pub fn applies_to(&self, repository_name: &str) -> bool {
        match &self.project_id {
            None => true,
            Some(project) => project == repository_name,
        }
    }

    /// Read the file's current bytes.
    pub fn read_content(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.local_path)?)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.project_id {
            Some(project) => write!(f, "{} [{}]", self.repo_path, project),
            None => write!(f, "{} [shared]", self.repo_path),
        }
    }
}

/// All classified assets of one run, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
}

impl AssetCatalog {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self { assets }
    }

    /// Classify each path once, logging and skipping the ones that do not fit.
    pub fn from_paths<I, P>(paths: I, layout: &Layout) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let assets = paths
            .into_iter()
            .filter_map(|path| match Asset::classify(path, layout) {
                Ok(asset) => Some(asset),
                Err(e) => {
                    error!("{}", e);
                    None
                }
            })
            .collect();
        Self { assets }
    }

    /// Find every regular file below `root` and classify it.
    pub fn discover(root: &Path, require_category: bool) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("asset root {} is not a directory", root.display()),
            )));
        }

        let layout = Layout::new(root, require_category);
        let base = glob::Pattern::escape(&layout.root().to_string_lossy());
        let pattern = if base.is_empty() {
            "**/*".to_string()
        } else if base.ends_with('/') {
            format!("{}**/*", base)
        } else {
            format!("{}/**/*", base)
        };
        let mut paths = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = entry?;
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        info!("found {} assets below {}", paths.len(), root.display());

        let catalog = Self::from_paths(paths, &layout);
        if catalog.is_empty() {
            warn!("Assets are empty!");
        }
        Ok(catalog)
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// The assets to write into the repository called `repository_name`, in catalog order.
    pub fn applicable_to<'a>(&'a self, repository_name: &'a str) -> impl Iterator<Item = &'a Asset> + 'a {
        self.assets
            .iter()
            .filter(move |asset| asset.applies_to(repository_name))
    }
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

/// `path` with backslashes unified and `.` components dropped.
fn clean(path: &Path) -> PathBuf {
    let normalized = normalize(&path.to_string_lossy());
    Path::new(&normalized)
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
