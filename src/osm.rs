use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::ExtractRequest;
use crate::error::OsmprjError;
use crate::runner::{CommandRunner, CommandSpec};
use crate::store::{CacheStore, ensure_dir};

pub const BBOX_BUFFER: f64 = 0.05;

#[derive(Debug, Clone)]
pub struct PlannedExtract {
    pub request: ExtractRequest,
    pub cache_path: Utf8PathBuf,
    pub needs_run: bool,
}

pub fn extract_command(
    base_file: &Utf8Path,
    output: &Utf8Path,
    request: &ExtractRequest,
) -> CommandSpec {
    let bbox = request.bbox.padded(BBOX_BUFFER).arg_string();
    CommandSpec::new([
        "osmium",
        "extract",
        "--overwrite",
        "--bbox",
        bbox.as_str(),
        "--output",
        output.as_str(),
        base_file.as_str(),
    ])
}

pub fn merge_command(extract_files: &[Utf8PathBuf], output: &Utf8Path) -> CommandSpec {
    let mut tokens = vec!["osmium".to_string(), "merge".to_string()];
    tokens.extend(extract_files.iter().map(|path| path.to_string()));
    tokens.extend([
        "--overwrite".to_string(),
        "--output".to_string(),
        output.to_string(),
    ]);
    CommandSpec::new(tokens)
}

pub fn plan(
    store: &CacheStore,
    base_file: &Utf8Path,
    requests: &[ExtractRequest],
) -> Result<Vec<PlannedExtract>, OsmprjError> {
    let mut planned = Vec::with_capacity(requests.len());
    let mut seen = HashSet::new();
    for request in requests {
        let cache_path = store.extract_cache_path(base_file, request)?;
        let needs_run = !cache_path.as_std_path().exists() && seen.insert(cache_path.clone());
        planned.push(PlannedExtract {
            request: request.clone(),
            cache_path,
            needs_run,
        });
    }
    Ok(planned)
}

pub fn extract_and_merge(
    store: &CacheStore,
    runner: &dyn CommandRunner,
    base_file: &Utf8Path,
    requests: &[ExtractRequest],
    output: &Utf8Path,
    dry_run: bool,
    silent: bool,
) -> Result<(), OsmprjError> {
    let planned = plan(store, base_file, requests)?;
    let missing = planned.iter().filter(|entry| entry.needs_run).count();
    tracing::info!(
        extracts = planned.len(),
        missing,
        cached = planned.len() - missing,
        "extraction plan ready"
    );

    if !dry_run && missing > 0 {
        ensure_dir(&store.extract_cache_dir(base_file)?)?;
    }

    for entry in planned.iter().filter(|entry| entry.needs_run) {
        let command = extract_command(base_file, &entry.cache_path, &entry.request);
        runner.run(&command, dry_run, silent)?;
    }

    let extract_files: Vec<Utf8PathBuf> = planned
        .into_iter()
        .map(|entry| entry.cache_path)
        .collect();
    runner.run(&merge_command(&extract_files, output), dry_run, silent)
}
