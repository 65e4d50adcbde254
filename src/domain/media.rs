//! Media elements: visual sources whose pixels become readable after loading.
//!
//! The pipeline never decodes media itself. It consumes the [`MediaElement`]
//! capability, which reports whether a source is loaded and lets callers wait
//! until it is. [`LoadableMedia`] is the in-process implementation used for
//! decoded images, canvases and files opened from disk.

use crate::core::MediaLoadError;
use crate::utils::load_image;
use async_trait::async_trait;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// The kind of visual source behind a media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    /// A still image.
    Image,
    /// A video; readable once the current frame is available.
    Video,
    /// A drawing surface; always readable.
    Canvas,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
            MediaKind::Canvas => write!(f, "canvas"),
        }
    }
}

/// A visual source that may still be loading.
#[async_trait]
pub trait MediaElement: Send + Sync + fmt::Debug {
    /// Returns what kind of source this is.
    fn kind(&self) -> MediaKind;

    /// Returns true once pixel data can be read.
    fn is_loaded(&self) -> bool;

    /// Completes when the element has loaded, or fails if loading failed.
    ///
    /// Returns immediately when the element is already loaded.
    async fn wait_loaded(&self) -> Result<(), MediaLoadError>;

    /// Returns the decoded pixels, or `None` while the element is not loaded.
    fn pixels(&self) -> Option<Arc<RgbImage>>;
}

/// A shared reference to a media element.
pub type MediaHandle = Arc<dyn MediaElement>;

#[derive(Debug, Clone)]
enum LoadState {
    Loading,
    Loaded(Arc<RgbImage>),
    Failed(String),
}

/// A media element whose load state is driven by a [`MediaLoader`].
#[derive(Debug, Clone)]
pub struct LoadableMedia {
    kind: MediaKind,
    state: watch::Receiver<LoadState>,
}

/// Completes the load of a [`LoadableMedia`].
///
/// Dropping the loader without calling [`finish`](Self::finish) or
/// [`fail`](Self::fail) makes waiters fail with [`MediaLoadError::Abandoned`].
#[derive(Debug)]
pub struct MediaLoader {
    sender: watch::Sender<LoadState>,
}

impl LoadableMedia {
    /// Creates an element that is still loading, with the handle that completes it.
    pub fn loading(kind: MediaKind) -> (Self, MediaLoader) {
        let (sender, state) = watch::channel(LoadState::Loading);
        (Self { kind, state }, MediaLoader { sender })
    }

    /// Creates an already loaded image.
    pub fn from_image(image: RgbImage) -> Self {
        Self::loaded(MediaKind::Image, image)
    }

    /// Creates an already loaded source of the given kind.
    pub fn loaded(kind: MediaKind, image: RgbImage) -> Self {
        let (sender, state) = watch::channel(LoadState::Loaded(Arc::new(image)));
        // the final value stays readable after the sender is gone
        drop(sender);
        Self { kind, state }
    }

    /// Starts decoding the image at `path` on the blocking thread pool.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (media, loader) = Self::loading(MediaKind::Image);
        tokio::task::spawn_blocking(move || match load_image(&path) {
            Ok(image) => loader.finish(image),
            Err(err) => {
                tracing::debug!("failed to decode {}: {}", path.display(), err);
                loader.fail(format!("{}: {err}", path.display()))
            }
        });
        media
    }

    /// Wraps this element in a shareable [`MediaHandle`].
    pub fn into_handle(self) -> MediaHandle {
        Arc::new(self)
    }
}

impl MediaLoader {
    /// Marks the element as loaded with the decoded pixels.
    pub fn finish(self, image: RgbImage) {
        self.sender.send_replace(LoadState::Loaded(Arc::new(image)));
    }

    /// Marks the element as failed.
    pub fn fail(self, message: impl Into<String>) {
        self.sender.send_replace(LoadState::Failed(message.into()));
    }
}

#[async_trait]
impl MediaElement for LoadableMedia {
    fn kind(&self) -> MediaKind {
        self.kind
    }

    fn is_loaded(&self) -> bool {
        matches!(*self.state.borrow(), LoadState::Loaded(_))
    }

    async fn wait_loaded(&self) -> Result<(), MediaLoadError> {
        let mut state = self.state.clone();
        let settled = state
            .wait_for(|s| !matches!(s, LoadState::Loading))
            .await
            .map_err(|_| MediaLoadError::Abandoned)?;
        match &*settled {
            LoadState::Loaded(_) => Ok(()),
            LoadState::Failed(message) => Err(MediaLoadError::Failed {
                message: message.clone(),
            }),
            LoadState::Loading => Err(MediaLoadError::Abandoned),
        }
    }

    fn pixels(&self) -> Option<Arc<RgbImage>> {
        match &*self.state.borrow() {
            LoadState::Loaded(image) => Some(Arc::clone(image)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_loaded_media_is_ready() {
        let media = LoadableMedia::from_image(RgbImage::new(2, 2));
        assert!(media.is_loaded());
        assert_eq!(media.kind(), MediaKind::Image);
        assert!(media.wait_loaded().await.is_ok());
        assert_eq!(media.pixels().map(|p| p.dimensions()), Some((2, 2)));
    }

    #[tokio::test]
    async fn test_loader_finishes_waiters() {
        let (media, loader) = LoadableMedia::loading(MediaKind::Video);
        assert!(!media.is_loaded());
        assert!(media.pixels().is_none());

        let waiter = media.clone();
        let wait = tokio::spawn(async move { waiter.wait_loaded().await });
        loader.finish(RgbImage::new(1, 1));

        assert!(wait.await.unwrap().is_ok());
        assert!(media.is_loaded());
    }

    #[tokio::test]
    async fn test_loader_failure() {
        let (media, loader) = LoadableMedia::loading(MediaKind::Image);
        loader.fail("corrupt header");

        let err = media.wait_loaded().await.unwrap_err();
        assert_eq!(
            err,
            MediaLoadError::Failed {
                message: "corrupt header".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_dropped_loader_abandons() {
        let (media, loader) = LoadableMedia::loading(MediaKind::Image);
        drop(loader);
        assert_eq!(media.wait_loaded().await, Err(MediaLoadError::Abandoned));
    }

    #[tokio::test]
    async fn test_open_missing_file_fails() {
        let media = LoadableMedia::open("does/not/exist.png");
        assert!(matches!(
            media.wait_loaded().await,
            Err(MediaLoadError::Failed { .. })
        ));
    }

    #[tokio::test]
    async fn test_open_decodes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        RgbImage::from_pixel(3, 2, image::Rgb([9, 8, 7]))
            .save(&path)
            .unwrap();

        let media = LoadableMedia::open(&path);
        media.wait_loaded().await.unwrap();

        let pixels = media.pixels().unwrap();
        assert_eq!(pixels.dimensions(), (3, 2));
        assert_eq!(pixels.get_pixel(0, 0).0, [9, 8, 7]);
    }
}
