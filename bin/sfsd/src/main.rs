mod config;
mod scrub;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;

use sfs_directory::NodeDirectory;
use sfs_metadata::MetadataStore;
use sfs_node_client::HttpNodeClient;
use sfs_xecute::{Daemon, DaemonProcess};

use config::AppConfig;

struct SfsDaemon {
    handle: Option<scrub::Handle>,
}

#[async_trait]
impl Daemon for SfsDaemon {
    type Config = AppConfig;

    fn load_config(&self, path_maybe: &Option<PathBuf>) -> Result<Self::Config> {
        AppConfig::load(path_maybe)
    }

    async fn start(&mut self, cfg: Self::Config) -> Result<()> {
        let base_url = cfg
            .elasticsearch
            .metadata_store_config()
            .discovery_hosts
            .first()
            .map(|host| format!("http://{host}"))
            .ok_or_else(|| anyhow::anyhow!("elasticsearch.discovery.zen.ping.unicast.hosts must not be empty"))?;

        let metadata = Arc::new(MetadataStore::new(
            Url::parse(&base_url)?,
            cfg.elasticsearch.metadata_store_config(),
        ));

        metadata.start(cfg.is_master).await?;

        let directory = Arc::new(NodeDirectory::with_forget_duration(
            Arc::new(|def: &sfs_core::ServiceDef| -> Arc<dyn sfs_core::NodeClient> {
                let url = Url::parse(&format!("http://{}", def.endpoint))
                    .unwrap_or_else(|_| Url::parse("http://invalid.invalid").unwrap());
                Arc::new(HttpNodeClient::new(url))
            }),
            time::Duration::seconds(cfg.cluster_directory.node_forget_seconds),
        ));

        let handle = scrub::spawn(metadata, directory, cfg.scrub);
        self.handle = Some(handle);

        tracing::info!("sfsd started");
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(handle) = self.handle.take() {
            handle.stop().await;
        }
        tracing::info!("sfsd stopped");
        Ok(())
    }
}

fn main() {
    DaemonProcess::start(
        "sfsd",
        "SFS cluster-directory daemon: metadata-store bootstrap and blob-reference verification",
        SfsDaemon { handle: None },
    );
}
