use regex::Regex;
use std::sync::OnceLock;

fn drive_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https?://drive\.google\.com/file/d/([A-Za-z0-9_-]+)")
            .expect("drive link pattern is valid")
    })
}

/// Turn a Google Drive "share" link into a direct download link.
///
/// Anything that is not a `drive.google.com/file/d/<id>` link is returned as is.
pub fn to_direct_download(link: &str) -> String {
    let link = link.trim();
    match drive_file_pattern().captures(link) {
        Some(caps) => format!("https://drive.google.com/uc?export=download&id={}", &caps[1]),
        None => link.to_string(),
    }
}

/// Same as [`to_direct_download`] for optional form fields.
pub fn convert_optional(link: Option<String>) -> Option<String> {
    link.map(|l| to_direct_download(&l))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_share_link() {
        assert_eq!(
            to_direct_download("https://drive.google.com/file/d/ABC123/view?usp=sharing"),
            "https://drive.google.com/uc?export=download&id=ABC123"
        );
    }

    #[test]
    fn keeps_link_without_view_suffix() {
        assert_eq!(
            to_direct_download("https://drive.google.com/file/d/1a-B_c"),
            "https://drive.google.com/uc?export=download&id=1a-B_c"
        );
    }

    #[test]
    fn leaves_other_urls_alone() {
        let url = "https://example.com/notes.pdf";
        assert_eq!(to_direct_download(url), url);
        let already = "https://drive.google.com/uc?export=download&id=ABC123";
        assert_eq!(to_direct_download(already), already);
    }

    #[test]
    fn optional_passes_none_through() {
        assert_eq!(convert_optional(None), None);
    }
}
