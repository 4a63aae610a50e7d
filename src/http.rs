use std::io::{Read, Write};
use std::time::Duration;

use camino::Utf8Path;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use url::Url;

use crate::domain::{OSM_PBF_EXT, RegionDesc};
use crate::error::OsmprjError;

pub const GEOFABRIK_BASE: &str = "https://download.geofabrik.de";

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub fn build_url(region: &RegionDesc) -> Result<Url, OsmprjError> {
    Url::parse(&format!(
        "{GEOFABRIK_BASE}/{}-latest{OSM_PBF_EXT}",
        region.as_str()
    ))
    .map_err(|err| OsmprjError::Http(err.to_string()))
}

pub trait HttpFetcher: Send + Sync {
    fn probe(&self, url: &Url) -> Result<bool, OsmprjError>;
    fn download(
        &self,
        url: &Url,
        destination: &Utf8Path,
        show_progress: bool,
    ) -> Result<(), OsmprjError>;
}

#[derive(Clone)]
pub struct GeofabrikClient {
    client: Client,
}

impl GeofabrikClient {
    pub fn new() -> Result<Self, OsmprjError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("osmprj/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| OsmprjError::Http(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| OsmprjError::Http(err.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpFetcher for GeofabrikClient {
    fn probe(&self, url: &Url) -> Result<bool, OsmprjError> {
        let response = self
            .client
            .head(url.clone())
            .timeout(PROBE_TIMEOUT)
            .send()
            .map_err(|err| {
                if err.is_timeout() {
                    OsmprjError::ResourceTimeout(url.to_string())
                } else {
                    OsmprjError::Http(err.to_string())
                }
            })?;
        let status = response.status().as_u16();
        Ok((200..400).contains(&status))
    }

    fn download(
        &self,
        url: &Url,
        destination: &Utf8Path,
        show_progress: bool,
    ) -> Result<(), OsmprjError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|err| OsmprjError::Http(err.to_string()))?;
        if !response.status().is_success() {
            return Err(OsmprjError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let total = response.content_length().unwrap_or(0);
        let parent = destination
            .parent()
            .ok_or_else(|| OsmprjError::Filesystem("invalid destination path".to_string()))?;

        let mut temp = tempfile::Builder::new()
            .prefix("osmprj-download")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| OsmprjError::Filesystem(err.to_string()))?;

        let mut reader = response;
        let mut buf = [0u8; 64 * 1024];
        let mut downloaded = 0u64;
        let mut last_percent = u64::MAX;
        loop {
            let n = reader
                .read(&mut buf)
                .map_err(|err| OsmprjError::Http(err.to_string()))?;
            if n == 0 {
                break;
            }
            temp.write_all(&buf[..n])
                .map_err(|err| OsmprjError::Filesystem(err.to_string()))?;
            downloaded += n as u64;
            if show_progress && total > 0 {
                let percent = downloaded * 100 / total;
                if percent != last_percent {
                    eprint!("\rDownloading... {percent}%");
                    last_percent = percent;
                }
            }
        }
        if show_progress && total > 0 {
            eprintln!();
        }
        tracing::debug!(url = %url, bytes = downloaded, "download complete");

        temp.persist(destination.as_std_path())
            .map_err(|err| OsmprjError::Filesystem(err.to_string()))?;
        Ok(())
    }
}
