use super::error::HandleError;
use relay_altname::Dispatcher;
use relay_balancer::{LoadBalancer, QueryContext};
use relay_blocklist::BlocklistTrie;
use relay_cache::{CacheEntry, Fingerprint, TieredCache};
use relay_proto::{build_a_record_response, build_nxdomain_in_place, build_servfail_in_place, rewrite_id, QueryView};
use relay_server::prelude::Message;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default TTL assigned to a freshly synthesised alt-naming-free, non-cached
/// upstream response before [`TieredCache::adjust_ttl`] scales it by
/// observed query frequency.
const DEFAULT_TTL: u32 = 300;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs()
}

/// Binds the tiered cache, blocklist trie, alt-naming dispatcher, and load
/// balancer into the resolver's five-step pipeline: parse, alt-naming
/// dispatch, blocklist check, cache lookup, upstream query.
pub struct Pipeline {
    cache: TieredCache,
    blocklist: BlocklistTrie,
    altname: Dispatcher,
    balancer: Arc<LoadBalancer>,
}

impl Pipeline {
    pub fn new(cache: TieredCache, blocklist: BlocklistTrie, altname: Dispatcher, balancer: Arc<LoadBalancer>) -> Self {
        Self {
            cache,
            blocklist,
            altname,
            balancer,
        }
    }

    async fn try_handle(&self, query_bytes: &[u8]) -> Result<Vec<u8>, HandleError> {
        let view = QueryView::parse(query_bytes)?;

        if let Some(resolution) = self.altname.dispatch(&view.qname).await {
            tracing::debug!(qname = %view.qname, scheme = ?resolution.kind, "resolved via alt-naming dispatch");
            let addr = match resolution.addresses.first() {
                Some(addr) => *addr,
                None => {
                    let mut buf = query_bytes.to_vec();
                    build_servfail_in_place(&mut buf);
                    return Ok(buf);
                }
            };

            let response = build_a_record_response(query_bytes, addr, resolution.ttl);

            let now = now_secs();
            let fingerprint = Fingerprint::new(&view.qname, view.qtype, view.qclass);
            self.cache
                .put(fingerprint, CacheEntry::new(response.clone(), now, resolution.ttl), now)
                .await;

            return Ok(response);
        }

        if self.blocklist.contains(&view.qname) {
            tracing::info!(qname = %view.qname, "blocked by blocklist");
            let mut buf = query_bytes.to_vec();
            build_nxdomain_in_place(&mut buf);
            return Ok(buf);
        }

        let now = now_secs();
        let fingerprint = Fingerprint::new(&view.qname, view.qtype, view.qclass);

        if let Some(entry) = self.cache.get(&fingerprint, now).await {
            tracing::debug!(qname = %view.qname, "served from cache");
            let mut bytes = entry.bytes;
            rewrite_id(&mut bytes, view.id);
            return Ok(bytes);
        }

        let ctx = QueryContext::new(view.qtype);
        let response = self.balancer.execute(&ctx, query_bytes, now).await?;

        let ttl = self.cache.adjust_ttl(&fingerprint, DEFAULT_TTL);
        self.cache
            .put(fingerprint, CacheEntry::new(response.clone(), now, ttl), now)
            .await;

        Ok(response)
    }

    #[cfg(test)]
    fn cache(&self) -> &TieredCache {
        &self.cache
    }
}

#[async_trait::async_trait]
impl relay_server::Handler for Pipeline {
    #[tracing::instrument(skip_all, fields(origin = ?message.address))]
    async fn handle(&self, message: Message) -> Option<Message> {
        let Message { address, buffer, size } = message;
        let query = &buffer[0..size];

        let response = match self.try_handle(query).await {
            Ok(bytes) => bytes,
            Err(HandleError::Parse(error)) => {
                tracing::warn!("dropping malformed query: {error}");
                return None;
            }
            Err(error @ HandleError::Upstream(_)) => {
                tracing::warn!("unable to resolve query: {error}");
                let mut fallback = query.to_vec();
                if fallback.len() < relay_proto::query::HEADER_LEN {
                    fallback.resize(relay_proto::query::HEADER_LEN, 0);
                }
                build_servfail_in_place(&mut fallback);
                fallback
            }
        };

        let mut out = [0u8; 512];
        let len = response.len().min(out.len());
        out[..len].copy_from_slice(&response[..len]);

        Some(Message {
            address,
            buffer: out,
            size: len,
        })
    }
}
