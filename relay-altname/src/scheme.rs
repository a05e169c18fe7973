/// A non-ICANN "blockchain" naming scheme, dispatched on TLD ahead of the
/// conventional blocklist/cache/upstream path.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NamingScheme {
    Ens,
    Uns,
    Zns,
    Cns,
}

/// Classifies a qname's TLD against the fixed scheme table. A non-match
/// yields `None` and the query falls through to the conventional path.
pub fn classify(qname: &str) -> Option<NamingScheme> {
    let tld = qname.rsplit('.').next()?.to_lowercase();
    match tld.as_str() {
        "eth" => Some(NamingScheme::Ens),
        "crypto" | "nft" | "blockchain" | "bitcoin" | "wallet" | "888" | "dao" | "x" => {
            Some(NamingScheme::Uns)
        }
        "ghost" | "zns" => Some(NamingScheme::Zns),
        "cns" => Some(NamingScheme::Cns),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_tlds() {
        assert_eq!(classify("vitalik.eth"), Some(NamingScheme::Ens));
        assert_eq!(classify("brad.crypto"), Some(NamingScheme::Uns));
        assert_eq!(classify("someone.wallet"), Some(NamingScheme::Uns));
        assert_eq!(classify("spooky.ghost"), Some(NamingScheme::Zns));
        assert_eq!(classify("name.cns"), Some(NamingScheme::Cns));
    }

    #[test]
    fn falls_through_on_conventional_tld() {
        assert_eq!(classify("example.com"), None);
        assert_eq!(classify("example.net"), None);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("VITALIK.ETH"), Some(NamingScheme::Ens));
    }
}
