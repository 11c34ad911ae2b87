//! Supplemental orchestration (SPEC_FULL.md §9): the scrub loop is not a
//! core component, it is the minimal driver the distilled spec implies
//! but never specifies ("callers (repair, scrub) can batch-aggregate").
//! On a configurable interval it refreshes the cluster directory from
//! the current service-def documents, then walks every object reachable
//! from the configured container indices, verifying each blob reference
//! and logging an aggregate pass/fail count.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use sfs_directory::NodeDirectory;
use sfs_metadata::{catalog, MetadataStore};

use crate::config::ScrubConfig;

pub struct Handle {
    task: JoinHandle<()>,
    shutdown: oneshot::Sender<()>,
}

impl Handle {
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
    }
}

pub fn spawn(metadata: Arc<MetadataStore>, directory: Arc<NodeDirectory>, cfg: ScrubConfig) -> Handle {
    let (shutdown, mut stop_rx) = oneshot::channel();
    let interval = Duration::from_secs(cfg.interval_seconds);

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = &mut stop_rx => break,
                _ = tokio::time::sleep(interval) => {
                    run_pass(&metadata, &directory, &cfg.containers).await;
                }
            }
        }
    });

    Handle { task, shutdown }
}

async fn run_pass(metadata: &MetadataStore, directory: &NodeDirectory, containers: &[String]) -> (u64, u64) {
    match metadata.search_service_defs().await {
        Ok(defs) => directory.refresh(&defs).await,
        Err(e) => {
            tracing::warn!(error = %e, "failed to refresh cluster directory from service-defs, skipping pass");
            return (0, 0);
        }
    }

    let mut passed = 0u64;
    let mut failed = 0u64;

    for container in containers {
        let index = catalog::object(container);
        let objects = match metadata.search_objects(&index).await {
            Ok(objects) => objects,
            Err(e) => {
                tracing::warn!(%index, error = %e, "failed to list objects for scrub pass");
                continue;
            }
        };

        for object in &objects {
            for (path, segment, reference) in object.iter_references() {
                if sfs_verify::verify(directory, segment, reference).await {
                    passed += 1;
                } else {
                    failed += 1;
                    tracing::warn!(
                        account = %path.object.account_id,
                        container = %path.object.container_id,
                        object = %path.object.object_id,
                        version = path.version_id,
                        segment = path.segment_index,
                        reference = path.reference_index,
                        "blob reference failed verification"
                    );
                }
            }
        }
    }

    tracing::info!(passed, failed, "scrub pass complete");
    (passed, failed)
}
