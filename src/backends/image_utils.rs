// Image fetching for notification layouts
// Downloads remote images to local files and keeps them in a TTL cache keyed by URL

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::sync::OnceCell;
use url::Url;

use crate::components::constants::{EXTENSION_VERSION, defaults};
use crate::components::{CampaignError, CampaignResult, FetchedImage, ImageFetcher, ServiceFuture};

/// Limits for the image cache and downloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCacheConfig {
    pub ttl: Duration,
    pub max_entries: usize,
    /// Largest accepted image
    pub max_bytes: u64,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ImageCacheConfig {
    fn default() -> Self {
        Self {
            ttl: defaults::IMAGE_CACHE_TTL,
            max_entries: 100,
            max_bytes: 10 * 1024 * 1024,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedImage {
    path: PathBuf,
    cached_at: Instant,
}

/// `ImageFetcher` backed by reqwest and an on-disk cache
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    config: ImageCacheConfig,
    client: Arc<OnceCell<reqwest::Client>>,
    cache: Arc<DashMap<String, CachedImage>>,
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new(ImageCacheConfig::default())
    }
}

impl HttpImageFetcher {
    pub fn new(config: ImageCacheConfig) -> Self {
        Self {
            config,
            client: Arc::new(OnceCell::new()),
            cache: Arc::new(DashMap::new()),
        }
    }

    pub fn config(&self) -> &ImageCacheConfig {
        &self.config
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    async fn http_client(&self) -> CampaignResult<&reqwest::Client> {
        let request_timeout = self.config.request_timeout;
        let connect_timeout = self.config.connect_timeout;
        self.client
            .get_or_try_init(|| async move {
                reqwest::Client::builder()
                    .timeout(request_timeout)
                    .connect_timeout(connect_timeout)
                    .user_agent(format!("CampaignClassic/{}", EXTENSION_VERSION))
                    .build()
                    .map_err(|e| {
                        tracing::error!(error = %e, "Failed to create HTTP client for image downloads");
                        CampaignError::ServiceUnavailable {
                            service: "http client".to_string(),
                        }
                    })
            })
            .await
    }

    /// Fetch `url`, reusing a cached file when one is still fresh
    pub async fn fetch_image(&self, url: &str) -> CampaignResult<FetchedImage> {
        let parsed = Url::parse(url).map_err(|e| CampaignError::image(url, format!("Invalid image URL: {}", e)))?;

        match parsed.scheme() {
            "file" => {
                let path = parsed
                    .to_file_path()
                    .map_err(|_| CampaignError::image(url, "Invalid file URL"))?;
                if !path.exists() {
                    return Err(CampaignError::image(url, "Image file does not exist"));
                }
                Ok(FetchedImage {
                    url: url.to_string(),
                    path,
                })
            },
            "http" | "https" => self.download(&parsed).await,
            scheme => Err(CampaignError::image(
                url,
                format!("Unsupported URL scheme for image: {}", scheme),
            )),
        }
    }

    async fn download(&self, url: &Url) -> CampaignResult<FetchedImage> {
        let url_string = url.to_string();

        self.evict_stale_entries();
        if let Some(cached) = self.cache.get(&url_string) {
            if cached.path.exists() {
                tracing::trace!(url = %url_string, "Image cache hit");
                return Ok(FetchedImage {
                    url: url_string.clone(),
                    path: cached.path.clone(),
                });
            }
            drop(cached);
            self.cache.remove(&url_string);
        }

        let client = self.http_client().await?;
        let response = client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| CampaignError::image(&url_string, format!("Failed to download image: {}", e)))?;

        if !response.status().is_success() {
            return Err(CampaignError::image(
                &url_string,
                format!("HTTP {} downloading image", response.status()),
            ));
        }

        if let Some(size) = response.content_length()
            && size > self.config.max_bytes
        {
            return Err(CampaignError::image(
                &url_string,
                format!(
                    "Image too large: {} bytes exceeds {} byte limit",
                    size, self.config.max_bytes
                ),
            ));
        }

        let extension = determine_extension(url, response.headers());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CampaignError::image(&url_string, format!("Failed to read image bytes: {}", e)))?;

        if bytes.len() < 8 {
            return Err(CampaignError::image(
                &url_string,
                "Downloaded image is too small to be valid",
            ));
        }
        if bytes.len() as u64 > self.config.max_bytes {
            return Err(CampaignError::image(&url_string, "Image exceeds the size limit"));
        }

        let temp_file = NamedTempFile::with_suffix(format!(".{}", extension))
            .map_err(|e| CampaignError::image(&url_string, format!("Failed to create temp file: {}", e)))?;
        tokio::fs::write(temp_file.path(), &bytes)
            .await
            .map_err(|e| CampaignError::image(&url_string, format!("Failed to write temp file: {}", e)))?;
        let path = temp_file
            .into_temp_path()
            .keep()
            .map_err(|e| CampaignError::image(&url_string, format!("Failed to persist temp file: {}", e)))?;

        self.cache.insert(
            url_string.clone(),
            CachedImage {
                path: path.clone(),
                cached_at: Instant::now(),
            },
        );
        tracing::debug!(url = %url_string, path = ?path, "Downloaded image");

        Ok(FetchedImage {
            url: url_string,
            path,
        })
    }

    /// Drop expired entries, then the oldest ones while over capacity
    fn evict_stale_entries(&self) {
        let now = Instant::now();
        let ttl = self.config.ttl;

        self.cache.retain(|_, entry| {
            let fresh = now.duration_since(entry.cached_at) < ttl;
            if !fresh {
                let _ = std::fs::remove_file(&entry.path);
            }
            fresh
        });

        while self.cache.len() > self.config.max_entries {
            let oldest = self
                .cache
                .iter()
                .min_by_key(|entry| entry.cached_at)
                .map(|entry| entry.key().clone());

            let Some(key) = oldest else { break };
            if let Some((_, entry)) = self.cache.remove(&key) {
                let _ = std::fs::remove_file(&entry.path);
            }
        }
    }

    /// Remove every cached file
    pub fn clear_cache(&self) {
        for entry in self.cache.iter() {
            if let Err(e) = std::fs::remove_file(&entry.value().path) {
                tracing::debug!(path = ?entry.value().path, error = %e, "Failed to remove cached image");
            }
        }
        self.cache.clear();
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> ServiceFuture<'a, CampaignResult<FetchedImage>> {
        Box::pin(self.fetch_image(url))
    }
}

/// File extension from the URL path, else from Content-Type
fn determine_extension(url: &Url, headers: &reqwest::header::HeaderMap) -> String {
    if let Some(mut segments) = url.path_segments()
        && let Some(last) = segments.next_back()
        && let Some(dot) = last.rfind('.')
    {
        let ext = &last[dot + 1..];
        if !ext.is_empty() && ext.len() <= 4 {
            return ext.to_lowercase();
        }
    }

    if let Some(content_type) = headers.get(reqwest::header::CONTENT_TYPE)
        && let Ok(ct) = content_type.to_str()
    {
        return match ct {
            ct if ct.contains("image/png") => "png",
            ct if ct.contains("image/jpeg") || ct.contains("image/jpg") => "jpg",
            ct if ct.contains("image/gif") => "gif",
            ct if ct.contains("image/webp") => "webp",
            ct if ct.contains("image/bmp") => "bmp",
            _ => "png",
        }
        .to_string();
    }

    "png".to_string()
}
