use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use url::Url;

use crate::domain::{ExtractRequest, RegionDesc};
use crate::error::OsmprjError;
use crate::http::{self, HttpFetcher};
use crate::osm;
use crate::runner::CommandRunner;
use crate::store::{CacheStore, ensure_dir};

#[derive(Debug, Clone, Copy, Default)]
pub struct PrepareOptions {
    pub dry_run: bool,
    pub silent: bool,
}

pub struct App<H: HttpFetcher, R: CommandRunner> {
    store: CacheStore,
    http: H,
    runner: R,
}

impl<H: HttpFetcher, R: CommandRunner> App<H, R> {
    pub fn new(store: CacheStore, http: H, runner: R) -> Self {
        Self {
            store,
            http,
            runner,
        }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn ensure_local(
        &self,
        url: &Url,
        dry_run: bool,
        silent: bool,
    ) -> Result<Utf8PathBuf, OsmprjError> {
        let cache_file = self.store.cache_file_for_url(url)?;
        if cache_file.as_std_path().exists() {
            tracing::info!(path = %cache_file, "using cached download");
            return Ok(cache_file);
        }

        if dry_run {
            let yellow = "\x1b[33m";
            let reset = "\x1b[0m";
            println!("{yellow}Dry run:  downloading {url} to {cache_file}{reset}");
            return Ok(cache_file);
        }

        if !self.http.probe(url)? {
            return Err(OsmprjError::ResourceInvalid(url.to_string()));
        }

        let parent = cache_file
            .parent()
            .ok_or_else(|| OsmprjError::Filesystem("invalid cache path".to_string()))?;
        ensure_dir(parent)?;

        tracing::info!(url = %url, path = %cache_file, "downloading");
        self.http.download(url, &cache_file, !silent)?;
        Ok(cache_file)
    }

    pub fn prepare(
        &self,
        region: &RegionDesc,
        output: &Utf8Path,
        extracts: &[ExtractRequest],
        options: PrepareOptions,
    ) -> Result<(), OsmprjError> {
        let url = http::build_url(region)?;
        let base_file = self.ensure_local(&url, options.dry_run, options.silent)?;

        if extracts.is_empty() {
            if options.dry_run {
                let yellow = "\x1b[33m";
                let reset = "\x1b[0m";
                println!("{yellow}Dry run:  copying {base_file} to {output}{reset}");
                return Ok(());
            }
            fs::copy(base_file.as_std_path(), output.as_std_path())
                .map_err(|err| OsmprjError::Filesystem(err.to_string()))?;
            return Ok(());
        }

        osm::extract_and_merge(
            &self.store,
            &self.runner,
            &base_file,
            extracts,
            output,
            options.dry_run,
            options.silent,
        )
    }
}
