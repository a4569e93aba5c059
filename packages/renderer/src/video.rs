use regex::Regex;
use std::sync::OnceLock;

fn youtube() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:https?://)?(?:www\.|m\.)?(?:youtube\.com/(?:watch\?(?:.*&)?v=|shorts/|embed/)|youtu\.be/)([A-Za-z0-9_-]{6,})",
        )
        .unwrap()
    })
}

fn vimeo() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:https?://)?(?:www\.)?vimeo\.com/(?:video/)?(\d+)").unwrap()
    })
}

/// Turn a video page URL into something an iframe can load. YouTube and
/// Vimeo page links map to their player URLs; anything else is used as-is.
pub fn embed_url(url: &str) -> String {
    let url = url.trim();

    if let Some(caps) = youtube().captures(url) {
        return format!("https://www.youtube.com/embed/{}", &caps[1]);
    }
    if let Some(caps) = vimeo().captures(url) {
        return format!("https://player.vimeo.com/video/{}", &caps[1]);
    }
    url.to_string()
}
