use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use url::Url;

use crate::domain::{ExtractRequest, OSM_PBF_EXT, strip_osm_ext};
use crate::error::OsmprjError;

#[derive(Debug, Clone)]
pub struct CacheStore {
    cache_root: Utf8PathBuf,
}

impl CacheStore {
    pub fn new() -> Result<Self, OsmprjError> {
        let cache_root = BaseDirs::new()
            .and_then(|dirs| {
                Utf8PathBuf::from_path_buf(dirs.home_dir().join(".cache").join("osmprj")).ok()
            })
            .ok_or_else(|| {
                OsmprjError::Filesystem("unable to resolve cache directory".to_string())
            })?;

        Ok(Self { cache_root })
    }

    pub fn new_with_root(cache_root: Utf8PathBuf) -> Self {
        Self { cache_root }
    }

    pub fn cache_root(&self) -> &Utf8Path {
        &self.cache_root
    }

    pub fn cache_file_for_url(&self, url: &Url) -> Result<Utf8PathBuf, OsmprjError> {
        let relative = Utf8PathBuf::from(url.path().trim_start_matches('/'));
        if relative.file_name().is_none() {
            return Err(OsmprjError::Filesystem(format!(
                "URL has no file name: {url}"
            )));
        }
        Ok(self.cache_root.join(relative))
    }

    pub fn extract_cache_dir(&self, base_file: &Utf8Path) -> Result<Utf8PathBuf, OsmprjError> {
        let name = base_file.file_name().ok_or_else(|| {
            OsmprjError::Filesystem(format!("base file has no file name: {base_file}"))
        })?;
        Ok(match base_file.parent() {
            Some(parent) => parent.join(strip_osm_ext(name)),
            None => Utf8PathBuf::from(strip_osm_ext(name)),
        })
    }

    pub fn extract_cache_path(
        &self,
        base_file: &Utf8Path,
        request: &ExtractRequest,
    ) -> Result<Utf8PathBuf, OsmprjError> {
        let dir = self.extract_cache_dir(base_file)?;
        Ok(dir.join(format!(
            "{}-{}{}",
            request.output_stem(),
            request.bbox.file_token(),
            OSM_PBF_EXT
        )))
    }
}

pub fn ensure_dir(path: &Utf8Path) -> Result<(), OsmprjError> {
    fs::create_dir_all(path.as_std_path()).map_err(|err| OsmprjError::CacheDirectory {
        path: path.as_std_path().to_path_buf(),
        message: err.to_string(),
    })
}
