//! Image response headers and refresh detection.

use base64::{Engine, engine::general_purpose::STANDARD};

/// Query parameter asking for a new code.
pub const REFRESH_PARAM: &str = "refresh";
/// Media type of rendered challenges.
pub const IMAGE_CONTENT_TYPE: &str = "image/png";

/// Headers that keep intermediaries from caching a challenge image.
#[must_use]
pub fn image_headers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Pragma", "public"),
        ("Expires", "0"),
        ("Cache-Control", "must-revalidate, post-check=0, pre-check=0"),
        ("Content-Transfer-Encoding", "binary"),
        ("Content-Type", IMAGE_CONTENT_TYPE),
    ]
}

/// Whether a raw query string carries the refresh parameter.
#[must_use]
pub fn wants_refresh(query: &str) -> bool {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split('=').next())
        .any(|key| key == REFRESH_PARAM)
}

/// A rendered challenge ready to be sent.
#[derive(Debug, Clone)]
pub struct ImageResponse {
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Vec<u8>,
}

impl ImageResponse {
    #[must_use]
    pub fn png(body: Vec<u8>) -> Self {
        Self {
            headers: image_headers(),
            body,
        }
    }

    /// Looks up a header value, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&'static str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }

    /// Encodes the body as a `data:` URI for inline embedding.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!("data:{IMAGE_CONTENT_TYPE};base64,{}", STANDARD.encode(&self.body))
    }
}
