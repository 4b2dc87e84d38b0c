//! Registry mapping URLs to platform downloaders
//!
//! Downloaders are registered as factories so each command can build one with
//! its own [`DownloadOptions`]. Lookup walks the registry in registration
//! order and picks the first downloader whose `can_handle` accepts the URL.

use tracing::debug;

use crate::client::ClientConfig;
use crate::downloader::Downloader;
use crate::error::{AbedlError, Result};
use crate::platforms::{CbnDownloader, KeysForKidsDownloader, YouTubeDownloader};
use crate::types::DownloadOptions;
use crate::ytdlp::YtDlp;

/// Builds a downloader for the given options
pub type Factory = Box<dyn Fn(&DownloadOptions) -> Result<Box<dyn Downloader>> + Send + Sync>;

/// Boxes a closure as a [`Factory`]
pub fn factory<F>(build: F) -> Factory
where
    F: Fn(&DownloadOptions) -> Result<Box<dyn Downloader>> + Send + Sync + 'static,
{
    Box::new(build)
}

/// Shared settings the built-in downloaders are constructed with
#[derive(Debug, Clone, Default)]
pub struct DownloaderContext {
    pub ytdlp: YtDlp,
    pub http: ClientConfig,
}

/// Ordered collection of downloader factories
#[derive(Default)]
pub struct Registry {
    entries: Vec<(String, Factory)>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with YouTube, CBN and Keys for Kids, in that order
    pub fn with_builtins(context: DownloaderContext) -> Self {
        let mut registry = Self::new();

        let ytdlp = context.ytdlp.clone();
        registry.register(
            "youtube",
            factory(move |options| {
                Ok(Box::new(YouTubeDownloader::new(options.clone(), ytdlp.clone())))
            }),
        );

        let ytdlp = context.ytdlp;
        registry.register(
            "cbn",
            factory(move |options| Ok(Box::new(CbnDownloader::new(options.clone(), ytdlp.clone())))),
        );

        let http = context.http;
        registry.register(
            "keysforkids",
            factory(move |options| {
                Ok(Box::new(KeysForKidsDownloader::new(options.clone(), http.clone())?))
            }),
        );

        registry
    }

    /// Adds a factory under `name`, replacing any existing one in place
    pub fn register(&mut self, name: impl Into<String>, factory: Factory) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = factory,
            None => self.entries.push((name, factory)),
        }
    }

    /// Removes `name`; returns whether it was registered
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| existing != name);
        self.entries.len() != before
    }

    /// Builds the first downloader that can handle `url`
    ///
    /// # Errors
    /// Returns `NoDownloader` when no registered platform accepts the URL
    pub fn downloader_for_url(&self, url: &str, options: &DownloadOptions) -> Result<Box<dyn Downloader>> {
        for (name, factory) in &self.entries {
            let downloader = factory(options)?;
            if downloader.can_handle(url) {
                debug!("Using {} downloader for {}", name, url);
                return Ok(downloader);
            }
        }
        Err(AbedlError::NoDownloader(url.to_string()))
    }

    /// Registered names in lookup order
    pub fn list_downloaders(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Each platform with its example URLs
    pub fn supported_platforms(&self) -> Result<Vec<(String, Vec<String>)>> {
        let options = DownloadOptions::default();
        self.entries
            .iter()
            .map(|(name, factory)| -> Result<(String, Vec<String>)> {
                let examples = factory(&options)?
                    .example_urls()
                    .iter()
                    .map(|url| url.to_string())
                    .collect();
                Ok((name.clone(), examples))
            })
            .collect()
    }
}
