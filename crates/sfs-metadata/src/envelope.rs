//! C7: RequestEnvelope. Wraps a single outgoing metadata-store request
//! with the enforcement spec.md §4.7 asks for: shard-success (I5),
//! exception→absent mapping for benign conflicts (I6), and propagation
//! of every other failure to the caller. In this Tokio-based rendition
//! "completion on the caller's execution context" (§5) is just `.await`
//! on the spawned future — there is no separate context object to
//! trampoline back onto.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use sfs_protocol::action::{ActionResponse, ErrorResponse};

use crate::error::MetadataError;

/// Sends `request`, decodes the body as `ActionResponse<T>` on success,
/// and applies I5/I6. Returns:
/// - `Ok(Some(result))` on a successful, shard-complete response.
/// - `Ok(None)` when the store reports a benign conflict (document
///   already exists / version conflict) — the I6 absence channel.
/// - `Err(_)` for shard-incomplete responses, index-not-found, and any
///   transport/decode failure.
pub async fn execute<T>(
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<Option<T>, MetadataError>
where
    T: DeserializeOwned,
{
    let response = request.timeout(timeout).send().await?;
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        let body: ActionResponse<T> = serde_json::from_slice(&bytes)?;
        if let Some(shards) = &body.shards {
            if !shards.is_complete() {
                warn!(
                    successful = shards.successful,
                    total = shards.total,
                    "action reported incomplete shard success"
                );
                return Err(MetadataError::ShardIncomplete(
                    shards.successful,
                    shards.total,
                ));
            }
        }
        return Ok(Some(body.result));
    }

    if let Ok(err) = serde_json::from_slice::<ErrorResponse>(&bytes) {
        if err.error.is_document_already_exists()
            || err.error.is_version_conflict()
            || err.error.is_resource_already_exists()
        {
            debug!(reason = %err.error.reason, "benign conflict mapped to absent");
            return Ok(None);
        }
        if err.error.is_index_not_found() {
            return Err(MetadataError::IndexAbsent(err.error.reason));
        }
    }

    Err(MetadataError::Http(
        status,
        String::from_utf8_lossy(&bytes).into_owned(),
    ))
}
