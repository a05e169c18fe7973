use std::collections::{BTreeMap, HashSet};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub blocklist: BlocklistConfig,
    #[serde(default)]
    pub upstreams: Vec<UpstreamConfig>,
    #[serde(default)]
    pub strategy: relay_balancer::SelectionStrategy,
    #[serde(default = "Config::default_max_retries")]
    pub max_retries: usize,
    #[serde(default)]
    pub altname: AltNameConfig,
}

impl Config {
    fn default_max_retries() -> usize {
        3
    }

    pub fn load(path: &Path) -> Self {
        let conf = ::config::Config::builder()
            .add_source(::config::File::from(path).required(true))
            .add_source(::config::Environment::default().separator("_"))
            .build()
            .expect("unable to locate configuration file");
        conf.try_deserialize()
            .expect("configuration format invalid")
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: IpAddr,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl ServerConfig {
    fn default_host() -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
    }

    fn default_port() -> u16 {
        53
    }

    pub fn address(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct CacheConfig {
    #[serde(default = "CacheConfig::default_total")]
    pub total_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            total_capacity: Self::default_total(),
        }
    }
}

impl CacheConfig {
    fn default_total() -> u64 {
        1_000
    }

    pub fn build(self) -> relay_cache::CacheConfig {
        relay_cache::CacheConfig::from_total(self.total_capacity)
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct BlocklistSource {
    pub url: String,
    pub kind: relay_blocklist::BlocklistKind,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct BlocklistConfig {
    #[serde(flatten)]
    pub sources: BTreeMap<String, BlocklistSource>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct UpstreamConfig {
    pub name: String,
    pub address: SocketAddr,
    #[serde(default = "UpstreamConfig::default_protocol")]
    pub protocol: String,
    #[serde(default = "UpstreamConfig::default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub location: Option<(f64, f64)>,
    #[serde(default)]
    pub specialisations: HashSet<u16>,
    #[serde(default = "UpstreamConfig::default_capacity")]
    pub capacity: u32,
}

impl UpstreamConfig {
    fn default_protocol() -> String {
        "udp".to_string()
    }

    fn default_weight() -> f64 {
        1.0
    }

    fn default_capacity() -> u32 {
        100
    }

    pub fn build(self, id: relay_balancer::UpstreamId) -> relay_balancer::UpstreamSpec {
        relay_balancer::UpstreamSpec {
            id,
            name: self.name,
            address: self.address,
            protocol: self.protocol,
            weight: self.weight,
            location: self.location,
            specialisations: self.specialisations,
            capacity: self.capacity,
        }
    }
}

#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct PlaceholderConfig {
    #[serde(default = "PlaceholderConfig::default_address")]
    pub address: Ipv4Addr,
    #[serde(default = "PlaceholderConfig::default_ttl")]
    pub ttl: u32,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            address: Self::default_address(),
            ttl: Self::default_ttl(),
        }
    }
}

impl PlaceholderConfig {
    fn default_address() -> Ipv4Addr {
        Ipv4Addr::new(127, 0, 0, 1)
    }

    fn default_ttl() -> u32 {
        300
    }
}

/// Opaque per-scheme endpoints for the alt-naming resolvers. Each scheme's
/// real resolution mechanism is out of scope; these only parameterise the
/// placeholder resolver's fixed answer.
#[derive(Debug, Default, Clone, Copy, serde::Deserialize)]
pub struct AltNameConfig {
    #[serde(default)]
    pub ens: PlaceholderConfig,
    #[serde(default)]
    pub uns: PlaceholderConfig,
    #[serde(default)]
    pub zns: PlaceholderConfig,
    #[serde(default)]
    pub cns: PlaceholderConfig,
}
