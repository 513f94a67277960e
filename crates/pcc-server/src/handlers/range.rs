//! Range Handler (spec §4.F): conditional-GET shard serving with optional
//! traffic-analysis padding.

use std::sync::Arc;
use std::time::SystemTime;

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use rand::Rng;

use pcc_store::{HashFamily, Prefix};

use crate::error::{shard_lookup_error, ApiError};
use crate::handlers::{require_supported, validate_mode, ModeQuery};
use crate::state::{PaddingPolicy, ServerContext};

pub async fn range_handler(
    State(ctx): State<Arc<ServerContext>>,
    Path(prefix_raw): Path<String>,
    Query(query): Query<ModeQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let prefix = Prefix::parse(&prefix_raw.to_uppercase()).map_err(|_| ApiError::ShardNotAvailable)?;
    let family = validate_mode(query.mode.as_deref())?;
    require_supported(&ctx, family)?;

    let path = ctx.store.path_of(family, prefix);
    ctx.store
        .open_for_read(&path)
        .map_err(shard_lookup_error)?;

    let mtime = ctx.store.mtime(&path)?;
    let etag = ctx.store.get_etag(&path)?;

    if is_cache_hit(&headers, mtime, etag.as_deref()) {
        let mut builder = Response::builder().status(StatusCode::NOT_MODIFIED);
        builder = apply_cache_headers(builder, mtime, etag.as_deref());
        return Ok(builder.body(Body::empty()).unwrap());
    }

    let contents = ctx.store.read_to_string(&path)?;
    let add_padding = headers
        .get("Add-Padding")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let body = if add_padding {
        pad_shard(contents, family, ctx.padding)
    } else {
        contents
    };

    let mut builder = Response::builder().status(StatusCode::OK);
    builder = apply_cache_headers(builder, mtime, etag.as_deref());
    Ok(builder.body(Body::from(body)).unwrap())
}

fn is_cache_hit(headers: &HeaderMap, mtime: SystemTime, etag: Option<&[u8]>) -> bool {
    if let (Some(if_none_match), Some(stored)) = (
        headers.get(header::IF_NONE_MATCH).and_then(|v| v.to_str().ok()),
        etag,
    ) {
        if if_none_match.as_bytes() == stored {
            return true;
        }
    }

    if let Some(if_modified_since) = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|v| v.to_str().ok())
    {
        if let Ok(since) = httpdate::parse_http_date(if_modified_since) {
            if mtime <= since {
                return true;
            }
        }
    }

    false
}

fn apply_cache_headers(
    mut builder: axum::http::response::Builder,
    mtime: SystemTime,
    etag: Option<&[u8]>,
) -> axum::http::response::Builder {
    if mtime != SystemTime::UNIX_EPOCH {
        builder = builder.header(header::LAST_MODIFIED, httpdate::fmt_http_date(mtime));
    }
    if let Some(etag) = etag {
        if let Ok(value) = HeaderValue::from_bytes(etag) {
            builder = builder.header(header::ETAG, value);
        }
    }
    builder
}

/// Pads `contents` up to `floor + U(0, jitter)` lines with synthetic
/// `000…0:0` entries sized for `family`'s suffix length, leaving shards
/// already at or above the floor untouched.
fn pad_shard(contents: String, family: HashFamily, policy: PaddingPolicy) -> String {
    let real_lines = contents.lines().filter(|line| !line.is_empty()).count();
    if real_lines >= policy.floor as usize {
        return contents;
    }

    let jitter = if policy.jitter == 0 {
        0
    } else {
        rand::thread_rng().gen_range(0..=policy.jitter)
    };
    let target = policy.floor as usize + jitter as usize;
    let needed = target - real_lines;

    let mut out = contents;
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    let synthetic = format!("{}:0\n", "0".repeat(family.suffix_len()));
    out.reserve(needed * synthetic.len());
    for _ in 0..needed {
        out.push_str(&synthetic);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_is_a_noop_above_the_floor() {
        let lines: String = (0..1300)
            .map(|i| format!("{i:035}:1\n"))
            .collect();
        let policy = PaddingPolicy { floor: 1300, jitter: 200 };
        let padded = pad_shard(lines.clone(), HashFamily::Sha1, policy);
        assert_eq!(padded, lines);
    }

    #[test]
    fn padding_brings_small_shards_into_the_target_range() {
        let policy = PaddingPolicy { floor: 1300, jitter: 200 };
        let padded = pad_shard(
            "AAA0000000000000000000000000000000:1\n".to_string(),
            HashFamily::Sha1,
            policy,
        );
        let line_count = padded.lines().count();
        assert!(line_count >= 1300 && line_count <= 1500);
        assert!(padded.starts_with("AAA0000000000000000000000000000000:1\n"));
    }

    #[test]
    fn synthetic_lines_match_family_suffix_length() {
        let policy = PaddingPolicy { floor: 2, jitter: 0 };
        let padded = pad_shard(String::new(), HashFamily::Ntlm, policy);
        let lines: Vec<&str> = padded.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let (suffix, count) = line.split_once(':').unwrap();
            assert_eq!(suffix.len(), HashFamily::Ntlm.suffix_len());
            assert_eq!(count, "0");
        }
    }
}
