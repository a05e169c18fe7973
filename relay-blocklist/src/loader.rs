use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Format of a fetched blocklist source. Only the hosts-file convention
/// (`0.0.0.0 domain.tld [alias ...]`) is supported today, matching what
/// the common public lists (StevenBlack, AdGuard's hosts mirror) publish.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum BlocklistKind {
    EtcHosts,
}

impl BlocklistKind {
    fn parse(self, input: &str) -> HashSet<String> {
        match self {
            Self::EtcHosts => parse_hostfile(input),
        }
    }
}

fn parse_hostfile(input: &str) -> HashSet<String> {
    input
        .split('\n')
        .flat_map(|line| {
            line.split_whitespace()
                .take_while(|item| !item.starts_with('#'))
                .enumerate()
                .filter_map(|(idx, item)| if idx > 0 { Some(item) } else { None })
                .map(|item| item.to_string())
        })
        .collect()
}

fn hash(input: &str) -> String {
    let result = Sha256::new().chain_update(input).finalize();
    base16ct::lower::encode_string(&result)
}

/// A fetched and parsed blocklist: the set of domain patterns to feed into
/// [`crate::BlocklistTrie::insert`], plus a content hash so re-fetching an
/// unchanged source is a cheap no-op for the caller.
#[derive(Debug)]
pub struct Blocklist {
    pub hash: String,
    pub entries: HashSet<String>,
}

impl Blocklist {
    pub fn from_text(value: &str, kind: BlocklistKind) -> Self {
        Self {
            hash: hash(value),
            entries: kind.parse(value),
        }
    }
}

/// Fetches a blocklist source over HTTP and parses it.
#[derive(Debug, Default)]
pub struct BlocklistLoader;

impl BlocklistLoader {
    pub async fn load(&self, url: &str, kind: BlocklistKind) -> Result<Blocklist, reqwest::Error> {
        tracing::debug!("loading blocklist from {url:?}");
        let text = reqwest::get(url).await?.text().await?;
        Ok(Blocklist::from_text(&text, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::{hash, parse_hostfile, Blocklist, BlocklistKind};

    #[test]
    fn parses_complex_hostfile() {
        let result = Blocklist::from_text(
            r#"# nope
0.0.0.0 this.is.blocked
0.0.0.0 this.is.also.blocked blocked.again
0.0.0.0 this.is.also.blocked #Youwon'tgetthis
0.0.0.0 this.is.also.blocked # or this"#,
            BlocklistKind::EtcHosts,
        );
        assert!(result.entries.contains("this.is.blocked"));
        assert!(result.entries.contains("this.is.also.blocked"));
        assert!(result.entries.contains("blocked.again"));
        assert!(!result.entries.contains("nope"));
        assert!(!result.entries.contains("Youwon'tgetthis"));
    }

    #[test]
    fn same_content_yields_same_hash() {
        let a = hash("0.0.0.0 a.com\n");
        let b = hash("0.0.0.0 a.com\n");
        assert_eq!(a, b);
        let c = hash("0.0.0.0 b.com\n");
        assert_ne!(a, c);
    }

    #[test]
    fn skips_comment_only_lines() {
        let result = parse_hostfile("# just a comment\n\n0.0.0.0 a.com\n");
        assert_eq!(result.len(), 1);
        assert!(result.contains("a.com"));
    }
}
