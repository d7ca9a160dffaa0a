// src/transcript/video_id.rs
//! Video identifier extraction from user-supplied YouTube links

use reqwest::Url;

const WATCH_HOSTS: [&str; 2] = ["www.youtube.com", "youtube.com"];
const SHORT_LINK_HOST: &str = "youtu.be";

/// Extract the video id from a YouTube URL.
///
/// Recognized shapes:
/// - `https://www.youtube.com/watch?v=ID` (also without `www.`), id taken from the `v` query parameter
/// - `https://youtu.be/ID`, id taken from the first path segment
///
/// Anything else, including a watch URL with a missing or blank `v`, yields `None`.
pub fn extract_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?;

    if WATCH_HOSTS.contains(&host) {
        return parsed
            .query_pairs()
            .find(|(key, value)| key == "v" && !value.is_empty())
            .map(|(_, value)| value.into_owned());
    }

    if host == SHORT_LINK_HOST {
        return parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string);
    }

    None
}
