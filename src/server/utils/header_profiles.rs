// the two identities the relay can present upstream. they're plain data, nothing here looks at the
// target url, the fallback service decides which one gets used and when

/// a fixed set of outbound headers impersonating one referring site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderProfile {
    pub name: &'static str,
    pub headers: &'static [(&'static str, &'static str)],
}

impl HeaderProfile {
    pub fn get(&self, name: &str) -> Option<&'static str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }
}

const FIREFOX_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:122.0) Gecko/20100101 Firefox/122.0";

// accept-encoding is pinned to identity so segment bytes come back exactly as stored and can be
// passed through without re-encoding
pub const DEFAULT_SITE: HeaderProfile = HeaderProfile {
    name: "default-site",
    headers: &[
        ("Referer", "https://hianime.to/"),
        ("Origin", "https://hianime.to"),
        ("User-Agent", FIREFOX_UA),
        ("Accept", "*/*"),
        ("Accept-Language", "en-US,en;q=0.5"),
        ("Accept-Encoding", "identity"),
    ],
};

// what the cdn sees when the player is embedded, only tried after the default got a 403
pub const EMBED_SITE: HeaderProfile = HeaderProfile {
    name: "embed-site",
    headers: &[
        ("Referer", "https://megacloud.blog/"),
        ("Origin", "https://megacloud.blog"),
        ("User-Agent", FIREFOX_UA),
        ("Accept", "*/*"),
        ("Accept-Language", "en-US,en;q=0.5"),
        ("Accept-Encoding", "identity"),
        ("Sec-Fetch-Dest", "empty"),
        ("Sec-Fetch-Mode", "cors"),
        ("Sec-Fetch-Site", "cross-site"),
    ],
};

/// ordered profiles, the primary is always tried first and the fallback at most once after it
#[derive(Debug, Clone, Copy)]
pub struct ProfileChain {
    pub primary: HeaderProfile,
    pub fallback: HeaderProfile,
}

impl ProfileChain {
    pub fn new(primary: HeaderProfile, fallback: HeaderProfile) -> Self {
        Self { primary, fallback }
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderProfile> {
        [&self.primary, &self.fallback].into_iter()
    }
}

impl Default for ProfileChain {
    fn default() -> Self {
        Self::new(DEFAULT_SITE, EMBED_SITE)
    }
}
