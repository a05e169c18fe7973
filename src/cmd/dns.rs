use clap::Args;
use relay_altname::{Dispatcher, NamingScheme, PlaceholderResolver};
use relay_balancer::{LoadBalancer, UdpTransport};
use relay_blocklist::BlocklistTrie;
use relay_cache::TieredCache;
use relay_server::UdpServer;
use std::sync::Arc;
use std::time::Duration;

const HEALTH_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Starts the DNS server, the core of the machine
#[derive(Args, Debug)]
pub struct Command;

async fn build_blocklist(config: &crate::config::BlocklistConfig) -> BlocklistTrie {
    let loader = relay_blocklist::BlocklistLoader;
    let mut trie = BlocklistTrie::new();

    for (name, source) in &config.sources {
        match loader.load(&source.url, source.kind).await {
            Ok(result) => {
                tracing::info!("loaded blocklist {name:?} with {} domains", result.entries.len());
                for entry in result.entries {
                    trie.insert(&entry);
                }
            }
            Err(error) => tracing::warn!("unable to load blocklist {name:?}: {error:?}"),
        }
    }

    trie
}

fn build_altname(config: crate::config::AltNameConfig) -> Dispatcher {
    Dispatcher::new()
        .with_resolver(Box::new(PlaceholderResolver::new(
            NamingScheme::Ens,
            config.ens.address,
            config.ens.ttl,
        )))
        .with_resolver(Box::new(PlaceholderResolver::new(
            NamingScheme::Uns,
            config.uns.address,
            config.uns.ttl,
        )))
        .with_resolver(Box::new(PlaceholderResolver::new(
            NamingScheme::Zns,
            config.zns.address,
            config.zns.ttl,
        )))
        .with_resolver(Box::new(PlaceholderResolver::new(
            NamingScheme::Cns,
            config.cns.address,
            config.cns.ttl,
        )))
}

impl Command {
    pub async fn run(&self, config: crate::config::Config) {
        tracing::info!("preparing dns server");

        let cache = TieredCache::new(config.cache.build());
        let blocklist = build_blocklist(&config.blocklist).await;
        let altname = build_altname(config.altname);

        let upstreams = config
            .upstreams
            .into_iter()
            .enumerate()
            .map(|(id, upstream)| upstream.build(id))
            .collect();
        let balancer = Arc::new(LoadBalancer::new(upstreams, config.strategy, config.max_retries, Box::new(UdpTransport)));

        let health_balancer = balancer.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(HEALTH_REFRESH_INTERVAL);
            loop {
                ticker.tick().await;
                health_balancer.refresh_health().await;
            }
        });

        let handler = crate::dns::Pipeline::new(cache, blocklist, altname, balancer);

        let address = config.server.address();
        tracing::info!("starting dns server on {address:?}");
        UdpServer::new(address, handler)
            .run()
            .await
            .expect("unable to run udp server")
    }
}
