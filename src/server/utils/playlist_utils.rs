// hls playlists are line oriented so this is all line level, there's no real m3u8 parsing going
// on here
use tracing::{debug, error};

use crate::server::utils::url_utils::encode_param;

pub const PLAYLIST_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

const PLAYLIST_EXTENSIONS: [&str; 2] = [".m3u8", ".m3u"];

const PLAYLIST_MEDIA_TYPES: [&str; 4] = [
    "application/vnd.apple.mpegurl",
    "application/x-mpegurl",
    "audio/mpegurl",
    "audio/x-mpegurl",
];

const ABSOLUTE_PREFIXES: [&str; 2] = ["http://", "https://"];

/// one line of a playlist, minus its line terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistLine<'a> {
    /// `#EXTINF:...`, `#EXT-X-KEY:...` and friends, never touched
    Directive(&'a str),
    Blank(&'a str),
    /// a segment or sub-playlist, stored trimmed
    Reference(&'a str),
}

impl<'a> PlaylistLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            Self::Blank(line)
        } else if trimmed.starts_with('#') {
            Self::Directive(line)
        } else {
            Self::Reference(trimmed)
        }
    }
}

/// playlist if the path says so or the upstream content type does
pub fn is_playlist(target_url: &str, content_type: Option<&str>) -> bool {
    let by_extension = url::Url::parse(target_url)
        .map(|u| {
            let path = u.path().to_ascii_lowercase();
            PLAYLIST_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
        })
        .unwrap_or(false);

    let by_content_type = content_type
        .map(|ct| {
            let ct = ct.to_ascii_lowercase();
            PLAYLIST_MEDIA_TYPES.iter().any(|known| ct.contains(known))
        })
        .unwrap_or(false);

    by_extension || by_content_type
}

/// target url cut right after the last `/` of its path, query and fragment dropped
pub fn base_url(target_url: &str) -> String {
    let without_query = match url::Url::parse(target_url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => target_url
            .split(['?', '#'])
            .next()
            .unwrap_or(target_url)
            .to_string(),
    };

    match without_query.rfind('/') {
        Some(idx) => without_query[..=idx].to_string(),
        None => without_query,
    }
}

fn is_absolute(reference: &str) -> bool {
    let lower = reference.get(..8).unwrap_or(reference).to_ascii_lowercase();
    ABSOLUTE_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// absolute form of a playlist reference
pub fn resolve_reference(reference: &str, base: &str) -> String {
    if is_absolute(reference) {
        return reference.to_string();
    }

    // path relative references are pasted onto the base as written, no normalising
    if !reference.starts_with('/') {
        return format!("{}{}", base, reference);
    }

    // `/abs/seg.ts` and `//host/seg.ts` replace the base path or host, pasting would nest them
    // under the playlist directory
    match url::Url::parse(base).and_then(|b| b.join(reference)) {
        Ok(resolved) => resolved.to_string(),
        Err(e) => {
            error!("Failed to resolve {} against {}: {}", reference, base, e);
            format!("{}{}", base, reference)
        }
    }
}

/// the relay url that fetches `absolute_url`
pub fn proxied_reference(proxy_base: &str, absolute_url: &str) -> String {
    format!("{}?url={}", proxy_base, encode_param(absolute_url))
}

/// rewrite every reference line into a call back through the relay, everything else (and every
/// line terminator) comes out byte for byte
pub fn rewrite_playlist(text: &str, target_url: &str, proxy_base: &str) -> String {
    let base = base_url(target_url);
    let already_proxied = format!("{}?url=", proxy_base);

    let mut output = String::with_capacity(text.len() * 2);
    let mut rewritten = 0usize;

    for raw_line in text.split_inclusive('\n') {
        let (line, terminator) = split_terminator(raw_line);

        match PlaylistLine::classify(line) {
            PlaylistLine::Directive(l) | PlaylistLine::Blank(l) => output.push_str(l),
            PlaylistLine::Reference(reference) if reference.starts_with(&already_proxied) => {
                output.push_str(reference);
            }
            PlaylistLine::Reference(reference) => {
                let absolute = resolve_reference(reference, &base);
                output.push_str(&proxied_reference(proxy_base, &absolute));
                rewritten += 1;
            }
        }

        output.push_str(terminator);
    }

    debug!("Rewrote {} playlist references via {}", rewritten, base);
    output
}

fn split_terminator(raw_line: &str) -> (&str, &str) {
    if let Some(line) = raw_line.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = raw_line.strip_suffix('\n') {
        (line, "\n")
    } else {
        (raw_line, "")
    }
}
