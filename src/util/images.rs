use std::sync::LazyLock;

use regex::Regex;

static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://\S+\.(?:jpg|jpeg|png|gif)").expect("image url pattern is valid")
});

/// Collect every image URL embedded in an issue body.
pub fn extract_image_urls(body: &str) -> Vec<String> {
    IMAGE_URL
        .find_iter(body)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Final path segment of an image URL, used as the attachment file name.
pub fn file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
