//! Bounded-concurrency HTTP importer (spec §4.D): one worker per shard
//! prefix, admitted through a counting semaphore, honoring conditional-GET
//! and retrying transport errors with exponential backoff.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use exponential_backoff::Backoff;
use pcc_store::{HashFamily, Prefix, ShardStore, PREFIX_COUNT};
use reqwest::{Client, StatusCode};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::ImportError;
use crate::progress::ProgressSink;

const MAX_RETRIES: u32 = 10;
const USER_AGENT: &str = "CompromisedPasswordsImporter";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ApiImporterConfig {
    pub base_url: String,
    pub family: HashFamily,
    pub force_rewrite: bool,
    pub fail_fast: bool,
}

/// Runs §4.D over every prefix of `config.family`, reporting progress via
/// `progress`. Fails iff at least one worker fails. By default every
/// already-dispatched worker still runs to completion (matching the
/// original's error fan-in behavior); with `config.fail_fast` a shared
/// `CancellationToken` is tripped on the first worker error, and the
/// dispatch loop stops handing out new prefixes once it observes the
/// token cancelled (workers already in flight are not aborted mid-request).
pub async fn import_from_api(
    store: &ShardStore,
    config: ApiImporterConfig,
    progress: Arc<dyn ProgressSink>,
) -> Result<(), ImportError> {
    store.ensure_family_dir(config.family)?;

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("reqwest client configuration is static and always valid");

    let worker_count = (8 * num_cpus::get()).min(64);
    let semaphore = Arc::new(Semaphore::new(worker_count));
    let client = Arc::new(client);
    let base_url = Arc::new(config.base_url.clone());
    let cancel = CancellationToken::new();
    let fail_fast = config.fail_fast;

    progress.set_len(PREFIX_COUNT as u64);

    let mut tasks = JoinSet::new();
    let mut dispatched = 0u32;
    for index in 0..PREFIX_COUNT {
        if fail_fast && cancel.is_cancelled() {
            break;
        }
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore is never closed");
        let store = store.clone();
        let client = client.clone();
        let base_url = base_url.clone();
        let progress = progress.clone();
        let cancel = cancel.clone();
        let family = config.family;
        let force_rewrite = config.force_rewrite;
        dispatched += 1;

        tasks.spawn(async move {
            let _permit = permit;
            let prefix = Prefix::from_index(index);
            let result = fetch_one(&client, &base_url, family, prefix, force_rewrite, &store).await;
            if fail_fast && result.is_err() {
                cancel.cancel();
            }
            progress.inc();
            result
        });
    }

    let mut failed = 0usize;
    while let Some(joined) = tasks.join_next().await {
        if joined.expect("importer worker task panicked").is_err() {
            failed += 1;
        }
    }

    progress.finish();
    tracing::info!(
        family = %config.family,
        failed,
        dispatched,
        total = PREFIX_COUNT,
        "api import finished"
    );

    if failed > 0 {
        return Err(ImportError::PartialImport {
            family: config.family,
            failed,
            total: PREFIX_COUNT as usize,
        });
    }
    Ok(())
}

async fn fetch_one(
    client: &Client,
    base_url: &str,
    family: HashFamily,
    prefix: Prefix,
    force_rewrite: bool,
    store: &ShardStore,
) -> Result<(), ImportError> {
    let url = build_url(base_url, family, prefix);
    let path = store.path_of(family, prefix);

    let existing_etag = if force_rewrite {
        None
    } else {
        store.get_etag(&path)?
    };

    let backoff = Backoff::new(MAX_RETRIES, Duration::from_millis(200), Some(Duration::from_secs(10)));
    let mut attempt = 0u32;

    loop {
        let mut request = client.get(&url);
        if let Some(etag) = &existing_etag {
            if let Ok(value) = std::str::from_utf8(etag) {
                request = request.header(reqwest::header::IF_NONE_MATCH, value);
            }
        }

        match request.send().await {
            Ok(response) => return handle_response(response, &url, &path, store).await,
            Err(source) => {
                attempt += 1;
                match backoff.next(attempt) {
                    Some(delay) => tokio::time::sleep(delay).await,
                    None => return Err(ImportError::Fetch { url, source }),
                }
            }
        }
    }
}

async fn handle_response(
    response: reqwest::Response,
    url: &str,
    path: &Path,
    store: &ShardStore,
) -> Result<(), ImportError> {
    match response.status() {
        StatusCode::NOT_MODIFIED => Ok(()),
        status if status.is_success() => {
            let etag = response
                .headers()
                .get(reqwest::header::ETAG)
                .map(|v| v.as_bytes().to_vec());
            let last_modified = response
                .headers()
                .get(reqwest::header::LAST_MODIFIED)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| httpdate::parse_http_date(s).ok());

            let body = response.bytes().await.map_err(|source| ImportError::Fetch {
                url: url.to_string(),
                source,
            })?;

            store.create_or_overwrite(path, &body)?;
            store.set_mtime(path, last_modified.unwrap_or_else(SystemTime::now))?;
            if let Some(etag) = etag {
                store.set_etag(path, &etag)?;
            }
            Ok(())
        }
        status => Err(ImportError::UnexpectedStatus {
            url: url.to_string(),
            status,
        }),
    }
}

fn build_url(base_url: &str, family: HashFamily, prefix: Prefix) -> String {
    let mut url = format!("{base_url}{prefix}");
    if family == HashFamily::Ntlm {
        url.push_str("?mode=ntlm");
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ntlm_mode_is_appended_as_query_param() {
        let prefix = Prefix::from_index(0xABCDE);
        assert_eq!(
            build_url("https://example.test/range/", HashFamily::Ntlm, prefix),
            "https://example.test/range/ABCDE?mode=ntlm"
        );
        assert_eq!(
            build_url("https://example.test/range/", HashFamily::Sha1, prefix),
            "https://example.test/range/ABCDE"
        );
    }
}
