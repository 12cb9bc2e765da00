//! Best-effort icon lookup for tool links.
//!
//! The page is fetched once and the icon is picked from a fixed priority list
//! of `<link>` / `<meta>` tags. Nothing here checks that the chosen icon
//! actually exists; the frontend falls back to its own SVG on a 404.

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;

use log::{debug, warn};
use regex::Regex;
use reqwest::Client;
use thiserror::Error;
use url::Url;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Icon sizes that count as "large enough" for the second lookup step.
const PREFERRED_SIZES: [&str; 4] = ["192", "180", "152", "144"];

#[derive(Error, Debug)]
pub enum FaviconError {
    #[error("invalid page url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("page url has no host: {0}")]
    NoOrigin(String),

    #[error("failed to fetch page: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Clone, Debug)]
pub struct FaviconResolver {
    client: Client,
}

impl FaviconResolver {
    pub fn new() -> Result<Self, FaviconError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Resolve an icon for `page_url`, or `None` when the page cannot be fetched.
    pub async fn resolve(&self, page_url: &str) -> Option<String> {
        match self.try_resolve(page_url).await {
            Ok(icon) => {
                debug!("Resolved favicon for {}: {}", page_url, icon);
                Some(icon)
            }
            Err(e) => {
                warn!("Favicon lookup failed for {}: {}", page_url, e);
                None
            }
        }
    }

    async fn try_resolve(&self, page_url: &str) -> Result<String, FaviconError> {
        let page = Url::parse(page_url.trim())?;
        if page.host_str().is_none() {
            return Err(FaviconError::NoOrigin(page_url.to_string()));
        }

        let html = self
            .client
            .get(page.as_str())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        select_icon(&html, &page)
    }
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?is)<(link|meta)\b([^>]*)>").expect("tag pattern is valid"))
}

fn attr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .expect("attribute pattern is valid")
    })
}

#[derive(Debug)]
struct Tag {
    name: String,
    attrs: HashMap<String, String>,
}

impl Tag {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str).filter(|v| !v.trim().is_empty())
    }

    fn rel_is(&self, wanted: &str) -> bool {
        self.name == "link"
            && self
                .attr("rel")
                .is_some_and(|rel| rel.trim().eq_ignore_ascii_case(wanted))
    }
}

fn scan_tags(html: &str) -> Vec<Tag> {
    tag_pattern()
        .captures_iter(html)
        .map(|caps| {
            let attrs = attr_pattern()
                .captures_iter(&caps[2])
                .map(|a| {
                    let value = a
                        .get(2)
                        .or_else(|| a.get(3))
                        .or_else(|| a.get(4))
                        .map(|m| m.as_str())
                        .unwrap_or_default();
                    (a[1].to_ascii_lowercase(), value.to_string())
                })
                .collect();
            Tag {
                name: caps[1].to_ascii_lowercase(),
                attrs,
            }
        })
        .collect()
}

/// Pick the best icon declared in `html`, resolved against the origin of `page`.
pub fn select_icon(html: &str, page: &Url) -> Result<String, FaviconError> {
    let origin = origin_of(page)?;
    let tags = scan_tags(html);

    let apple = tags.iter().find_map(|t| {
        (t.rel_is("apple-touch-icon") || t.rel_is("apple-touch-icon-precomposed"))
            .then(|| t.attr("href"))
            .flatten()
    });

    let sized = || {
        tags.iter().find_map(|t| {
            let large = t
                .attr("sizes")
                .is_some_and(|s| PREFERRED_SIZES.iter().any(|p| s.contains(p)));
            (t.rel_is("icon") && large).then(|| t.attr("href")).flatten()
        })
    };

    let og_image = || {
        tags.iter().find_map(|t| {
            let is_og = t.name == "meta"
                && t.attr("property")
                    .is_some_and(|p| p.eq_ignore_ascii_case("og:image"));
            is_og.then(|| t.attr("content")).flatten()
        })
    };

    let any_icon = || {
        tags.iter().find_map(|t| {
            (t.rel_is("icon") || t.rel_is("shortcut icon"))
                .then(|| t.attr("href"))
                .flatten()
        })
    };

    let icon = match apple.or_else(sized).or_else(og_image).or_else(any_icon) {
        Some(href) => absolutize(href.trim(), page.scheme(), &origin),
        None => format!("{}/favicon.ico", origin),
    };
    Ok(icon)
}

fn origin_of(page: &Url) -> Result<String, FaviconError> {
    let host = page
        .host_str()
        .ok_or_else(|| FaviconError::NoOrigin(page.to_string()))?;
    Ok(match page.port() {
        Some(port) => format!("{}://{}:{}", page.scheme(), host, port),
        None => format!("{}://{}", page.scheme(), host),
    })
}

fn absolutize(href: &str, scheme: &str, origin: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("{}://{}", scheme, rest)
    } else if href.starts_with('/') {
        format!("{}{}", origin, href)
    } else {
        format!("{}/{}", origin, href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://tools.example.com/some/page?x=1").unwrap()
    }

    #[test]
    fn apple_touch_icon_beats_sized_icon() {
        let html = r#"
            <head>
              <link rel="icon" sizes="192x192" href="/icon-192.png">
              <link rel="apple-touch-icon" href="/apple.png">
            </head>"#;
        assert_eq!(
            select_icon(html, &page()).unwrap(),
            "https://tools.example.com/apple.png"
        );
    }

    #[test]
    fn sized_icon_beats_og_image() {
        let html = r#"
            <meta property="og:image" content="https://cdn.example.com/og.png">
            <link rel="icon" sizes="16x16" href="/small.png">
            <link rel="icon" sizes="180x180" href="/large.png">"#;
        assert_eq!(
            select_icon(html, &page()).unwrap(),
            "https://tools.example.com/large.png"
        );
    }

    #[test]
    fn og_image_beats_plain_icon() {
        let html = r#"
            <link rel="shortcut icon" href="/favicon.png">
            <meta content="https://cdn.example.com/og.png" property="og:image" />"#;
        assert_eq!(
            select_icon(html, &page()).unwrap(),
            "https://cdn.example.com/og.png"
        );
    }

    #[test]
    fn plain_icon_with_single_quotes() {
        let html = "<LINK REL='Shortcut Icon' HREF='img/fav.png'>";
        assert_eq!(
            select_icon(html, &page()).unwrap(),
            "https://tools.example.com/img/fav.png"
        );
    }

    #[test]
    fn falls_back_to_favicon_ico() {
        let html = "<html><head><title>No icons</title></head></html>";
        assert_eq!(
            select_icon(html, &page()).unwrap(),
            "https://tools.example.com/favicon.ico"
        );
    }

    #[test]
    fn protocol_relative_href_uses_page_scheme() {
        let html = r#"<link rel="apple-touch-icon-precomposed" href="//cdn.example.com/a.png">"#;
        let page = Url::parse("http://example.com").unwrap();
        assert_eq!(select_icon(html, &page).unwrap(), "http://cdn.example.com/a.png");
    }

    #[test]
    fn keeps_port_in_origin() {
        let page = Url::parse("http://127.0.0.1:9000/x").unwrap();
        assert_eq!(
            select_icon("", &page).unwrap(),
            "http://127.0.0.1:9000/favicon.ico"
        );
    }

    #[test]
    fn empty_href_is_skipped() {
        let html = r#"<link rel="apple-touch-icon" href=""><link rel="icon" href="/f.png">"#;
        assert_eq!(
            select_icon(html, &page()).unwrap(),
            "https://tools.example.com/f.png"
        );
    }
}
