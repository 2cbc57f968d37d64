//! HTTP framing for challenge images.

mod response;

pub use response::{IMAGE_CONTENT_TYPE, ImageResponse, REFRESH_PARAM, image_headers, wants_refresh};
