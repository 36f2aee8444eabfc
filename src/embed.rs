//! External video links to embeddable player URLs.

use regex::Regex;
use std::sync::LazyLock;

static YOUTUBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#)
        .expect("youtube pattern must compile")
});

static VIMEO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"vimeo\.com/(?:.*/)?(\d+)").expect("vimeo pattern must compile")
});

/// Player URL for a YouTube or Vimeo link; anything else is returned as is.
pub fn embed_url(link: &str) -> String {
    if let Some(id) = YOUTUBE.captures(link).and_then(|c| c.get(1)) {
        return format!("https://www.youtube.com/embed/{}", id.as_str());
    }
    if let Some(id) = VIMEO.captures(link).and_then(|c| c.get(1)) {
        return format!("https://player.vimeo.com/video/{}", id.as_str());
    }
    link.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_link_shapes() {
        let expected = "https://www.youtube.com/embed/dQw4w9WgXcQ";
        assert_eq!(embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), expected);
        assert_eq!(embed_url("https://youtu.be/dQw4w9WgXcQ"), expected);
        assert_eq!(embed_url("https://www.youtube.com/embed/dQw4w9WgXcQ"), expected);
        assert_eq!(
            embed_url("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            expected
        );
    }

    #[test]
    fn vimeo_links() {
        assert_eq!(
            embed_url("https://vimeo.com/76979871"),
            "https://player.vimeo.com/video/76979871"
        );
        assert_eq!(
            embed_url("https://vimeo.com/channels/staffpicks/76979871"),
            "https://player.vimeo.com/video/76979871"
        );
    }

    #[test]
    fn other_links_pass_through() {
        assert_eq!(embed_url("https://example.com/v.mp4"), "https://example.com/v.mp4");
        assert_eq!(embed_url(""), "");
    }
}
