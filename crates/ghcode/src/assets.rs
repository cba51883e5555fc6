//! Stylesheet and copy-button script for rendered code blocks.
//!
//! Both files are compiled into the library and bind to the class names
//! emitted by [`crate::render`]. Hosts either serve them via [`get`] or copy
//! them next to generated pages with [`write_assets`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory, relative to the site root, that assets are written under.
pub const ASSET_DIR: &str = "assets/github-code";

/// Bundled asset: path relative to [`ASSET_DIR`] and contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Asset {
    pub path: &'static str,
    pub contents: &'static str,
}

pub const STYLESHEET: Asset = Asset {
    path: "css/github-code.css",
    contents: include_str!("../assets/css/github-code.css"),
};

pub const SCRIPT: Asset = Asset {
    path: "js/github-code.js",
    contents: include_str!("../assets/js/github-code.js"),
};

const ASSETS: [Asset; 2] = [STYLESHEET, SCRIPT];

/// Iterate the bundled assets.
pub fn iter() -> impl Iterator<Item = Asset> {
    ASSETS.into_iter()
}

/// Get a bundled asset by path relative to [`ASSET_DIR`].
pub fn get(path: &str) -> Option<Asset> {
    iter().find(|asset| asset.path == path)
}

/// Write every bundled asset under `<dest>/assets/github-code/`, creating
/// directories as needed. Existing files are overwritten.
///
/// Returns the written paths.
pub fn write_assets(dest: &Path) -> io::Result<Vec<PathBuf>> {
    let root = dest.join(ASSET_DIR);
    iter()
        .map(|asset| {
            let path = root.join(asset.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, asset.contents)?;
            tracing::debug!(path = %path.display(), "Wrote asset");
            Ok(path)
        })
        .collect()
}
