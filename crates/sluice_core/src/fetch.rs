//! Downloads remote code bundles to local temp files.

use std::fs::File;
use std::path::PathBuf;

use chrono::Utc;
use reqwest::blocking::{Client, Response};
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::Url;

/// Matches the default hop cap of mainstream HTTP clients.
const MAX_REDIRECT_HOPS: usize = 10;

use crate::error::ProvisionError;

/// Fetches the bundle at `url` into a fresh temp file and returns its path.
///
/// Redirects are followed by hand with the client's own redirect handling
/// disabled: each hop's target is taken verbatim from the `Location` header,
/// so percent-encoded path segments published by download hosts survive the
/// hop instead of being re-interpreted. The temp file name is seeded with the
/// current timestamp, which keeps runs within one process apart but not
/// concurrent processes started in the same second. Any network, temp-file or
/// stream-copy error is fatal; nothing is retried.
pub fn download_bundle(raw_url: &str) -> Result<PathBuf, ProvisionError> {
    let client = Client::builder()
        .redirect(Policy::none())
        .build()
        .map_err(|err| ProvisionError::Fetch(err.to_string()))?;

    let mut url = Url::parse(raw_url)
        .map_err(|err| ProvisionError::Fetch(format!("invalid bundle URL {raw_url}: {err}")))?;

    for _ in 0..=MAX_REDIRECT_HOPS {
        let response = client
            .get(url.clone())
            .send()
            .map_err(|err| ProvisionError::Fetch(err.to_string()))?;

        if response.status().is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| {
                    ProvisionError::Fetch(format!("redirect from {url} without a location header"))
                })?;
            url = redirect_target(&url, location)?;
            log::debug!("following redirect to {url}");
            continue;
        }

        let response = response
            .error_for_status()
            .map_err(|err| ProvisionError::Fetch(err.to_string()))?;
        return write_to_temp_file(response);
    }

    Err(ProvisionError::Fetch(format!(
        "too many redirects fetching {raw_url}"
    )))
}

/// Resolves one redirect hop. Absolute targets replace the URL wholesale,
/// relative ones resolve against the current hop; percent-encoding in the
/// target path is preserved either way.
fn redirect_target(current: &Url, location: &str) -> Result<Url, ProvisionError> {
    current.join(location).map_err(|err| {
        ProvisionError::Fetch(format!("invalid redirect target {location}: {err}"))
    })
}

fn write_to_temp_file(mut response: Response) -> Result<PathBuf, ProvisionError> {
    let path = std::env::temp_dir().join(format!("sluice-{}.zip", Utc::now().timestamp()));
    let mut file = File::create(&path)?;
    std::io::copy(&mut response, &mut file)
        .map_err(|err| ProvisionError::Fetch(err.to_string()))?;
    log::debug!("bundle downloaded to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_redirects_replace_the_url() {
        let base = Url::parse("https://example.com/releases/latest").expect("url");
        let target = redirect_target(&base, "https://cdn.example.net/dl/bundle.zip").expect("hop");
        assert_eq!(target.as_str(), "https://cdn.example.net/dl/bundle.zip");
    }

    #[test]
    fn relative_redirects_resolve_against_the_current_hop() {
        let base = Url::parse("https://example.com/releases/latest").expect("url");
        let target = redirect_target(&base, "/dl/bundle.zip").expect("hop");
        assert_eq!(target.as_str(), "https://example.com/dl/bundle.zip");
    }

    #[test]
    fn percent_encoded_paths_survive_the_hop() {
        // Download hosts publish signed paths whose encoding must not be
        // re-interpreted while following the redirect.
        let base = Url::parse("https://example.com/releases/latest").expect("url");
        let target =
            redirect_target(&base, "https://cdn.example.net/dl/my%2Bbundle%20v1.zip").expect("hop");
        assert_eq!(target.path(), "/dl/my%2Bbundle%20v1.zip");
    }

    #[test]
    fn garbage_redirect_targets_are_fatal() {
        let base = Url::parse("https://example.com/releases/latest").expect("url");
        let err = redirect_target(&base, "https://").expect_err("unparsable target");
        assert!(matches!(err, ProvisionError::Fetch(_)));
    }
}
