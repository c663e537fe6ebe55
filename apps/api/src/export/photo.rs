//! Profile photo resolution for the PDF exporter.
//!
//! This is the only network call in an export. Any failure (unreachable host, non-2xx,
//! oversized body, undecodable bytes) is logged and the photo is left out; the export
//! itself never fails because of the photo.

use image::GenericImageView;
use tracing::{debug, warn};

use super::pdf::EmbeddedImage;
use crate::config::Config;

/// Longest edge of the embedded bitmap. The photo prints at 60pt, so this is plenty.
const MAX_EDGE_PX: u32 = 240;

/// Where photos may be fetched from and how much of one may be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoSource {
    /// URL prefix of uploaded images. `None` disables fetching.
    pub allowed_prefix: Option<String>,
    pub max_bytes: usize,
}

impl PhotoSource {
    /// Only images the blob store handed out are fetched.
    pub fn from_config(config: &Config) -> Self {
        Self {
            allowed_prefix: config.s3.as_ref().map(|s3| s3.object_url_prefix()),
            max_bytes: config.max_image_bytes,
        }
    }

    fn allows(&self, url: &str) -> bool {
        let fetchable = url.starts_with("http://") || url.starts_with("https://");
        fetchable
            && self
                .allowed_prefix
                .as_deref()
                .is_some_and(|prefix| url.starts_with(prefix))
    }
}

pub async fn fetch_image(http: &reqwest::Client, url: &str, source: &PhotoSource) -> Option<EmbeddedImage> {
    if !source.allows(url) {
        debug!(url, "Photo URL is not an uploaded image; skipping");
        return None;
    }

    let mut response = match http.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(url, "Photo fetch failed: {e}");
            return None;
        }
    };
    if !response.status().is_success() {
        warn!(url, status = %response.status(), "Photo fetch returned an error status");
        return None;
    }
    if let Some(declared) = response.content_length() {
        if declared > source.max_bytes as u64 {
            warn!(url, size = declared, max_bytes = source.max_bytes, "Photo too large; skipping");
            return None;
        }
    }

    let mut body = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                if body.len() + chunk.len() > source.max_bytes {
                    warn!(url, max_bytes = source.max_bytes, "Photo body exceeds limit; skipping");
                    return None;
                }
                body.extend_from_slice(&chunk);
            }
            Ok(None) => break,
            Err(e) => {
                warn!(url, "Photo body read failed: {e}");
                return None;
            }
        }
    }

    decode_image(&body)
}

/// Decodes PNG/JPEG/GIF/WebP bytes into a downscaled RGB bitmap.
pub fn decode_image(bytes: &[u8]) -> Option<EmbeddedImage> {
    let decoded = match image::load_from_memory(bytes) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("Photo could not be decoded: {e}");
            return None;
        }
    };

    let (width, height) = decoded.dimensions();
    let scaled = if width > MAX_EDGE_PX || height > MAX_EDGE_PX {
        decoded.thumbnail(MAX_EDGE_PX, MAX_EDGE_PX)
    } else {
        decoded
    };

    let rgb = scaled.to_rgb8();
    let (width, height) = rgb.dimensions();
    Some(EmbeddedImage {
        width,
        height,
        rgb: rgb.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use crate::config::S3Config;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .expect("encode png");
        bytes
    }

    #[test]
    fn test_decode_small_png() {
        let image = decode_image(&png(4, 3)).expect("decodes");
        assert_eq!((image.width, image.height), (4, 3));
        assert_eq!(image.rgb.len(), 4 * 3 * 3);
        assert_eq!(&image.rgb[..3], &[10, 20, 30]);
    }

    #[test]
    fn test_decode_downscales_large_image() {
        let image = decode_image(&png(960, 480)).expect("decodes");
        assert_eq!(image.width, MAX_EDGE_PX);
        assert!(image.height <= MAX_EDGE_PX / 2 + 1);
        assert_eq!(image.rgb.len(), (image.width * image.height * 3) as usize);
    }

    #[test]
    fn test_decode_garbage_is_none() {
        assert!(decode_image(b"not an image").is_none());
    }

    fn client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    fn source_for(prefix: &str, max_bytes: usize) -> PhotoSource {
        PhotoSource {
            allowed_prefix: Some(prefix.to_string()),
            max_bytes,
        }
    }

    /// Answers one request with `head` followed by `body`, then closes the connection.
    async fn serve_once(head: String, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request).await;
            let _ = stream.write_all(head.as_bytes()).await;
            let _ = stream.write_all(&body).await;
            let _ = stream.shutdown().await;
        });
        format!("http://{addr}/bucket/")
    }

    #[tokio::test]
    async fn test_non_http_url_is_skipped() {
        let source = source_for("memory://", 1024);
        assert!(fetch_image(&client(), "memory://profile/u1/a.png", &source).await.is_none());
        assert!(fetch_image(&client(), "", &source).await.is_none());
    }

    #[test]
    fn test_url_outside_upload_prefix_is_skipped() {
        let source = source_for("https://cdn.example.com/vitae/", 1024);
        assert!(!source.allows("http://169.254.169.254/latest/meta-data"));
        assert!(!source.allows("https://cdn.example.com/other/me.png"));
        assert!(!source.allows("https://cdn.example.com.evil.test/vitae/me.png"));
        assert!(source.allows("https://cdn.example.com/vitae/profile/u1/me.png"));

        let disabled = PhotoSource {
            allowed_prefix: None,
            max_bytes: 1024,
        };
        assert!(!disabled.allows("https://cdn.example.com/vitae/profile/u1/me.png"));
    }

    #[test]
    fn test_source_follows_blob_store_urls() {
        let mut config = Config {
            database_url: None,
            s3: None,
            jwt_secret: "secret".to_string(),
            anthropic_api_key: None,
            port: 0,
            rust_log: "info".to_string(),
            max_image_bytes: 2048,
        };
        assert_eq!(PhotoSource::from_config(&config).allowed_prefix, None);

        config.s3 = Some(S3Config {
            bucket: "vitae".to_string(),
            endpoint: "http://minio:9000".to_string(),
            public_url: "https://cdn.example.com/".to_string(),
            access_key_id: "key".to_string(),
            secret_access_key: "secret".to_string(),
        });
        let source = PhotoSource::from_config(&config);
        assert_eq!(source.allowed_prefix.as_deref(), Some("https://cdn.example.com/vitae/"));
        assert_eq!(source.max_bytes, 2048);
    }

    #[tokio::test]
    async fn test_fetches_uploaded_photo() {
        let image = png(8, 8);
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            image.len()
        );
        let base = serve_once(head, image).await;
        let source = source_for(&base, 64 * 1024);

        let fetched = fetch_image(&client(), &format!("{base}me.png"), &source).await;
        assert_eq!(fetched.map(|i| (i.width, i.height)), Some((8, 8)));
    }

    #[tokio::test]
    async fn test_declared_oversized_photo_is_skipped() {
        let image = png(8, 8);
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            image.len()
        );
        let max_bytes = image.len() - 1;
        let base = serve_once(head, image).await;

        let source = source_for(&base, max_bytes);
        assert!(fetch_image(&client(), &format!("{base}me.png"), &source).await.is_none());
    }

    #[tokio::test]
    async fn test_undeclared_body_is_capped_while_reading() {
        let image = png(8, 8);
        let head = "HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n".to_string();

        let base = serve_once(head.clone(), image.clone()).await;
        let source = source_for(&base, image.len() - 1);
        assert!(fetch_image(&client(), &format!("{base}me.png"), &source).await.is_none());

        let base = serve_once(head, image.clone()).await;
        let source = source_for(&base, image.len());
        assert!(fetch_image(&client(), &format!("{base}me.png"), &source).await.is_some());
    }
}
