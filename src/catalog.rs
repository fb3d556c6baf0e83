//! The fixed, ordered list of bundled videos.

use crate::config::LibraryConfig;
use serde::Serialize;

/// Opaque reference to a bundled thumbnail image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThumbnailRef(Option<String>);

impl ThumbnailRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self(Some(name.into()))
    }

    /// Entry without artwork; rows render a placeholder.
    pub fn none() -> Self {
        Self(None)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// A playable entry. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoItem {
    title: String,
    thumbnail: ThumbnailRef,
    uri: String,
}

impl VideoItem {
    pub fn new(title: impl Into<String>, thumbnail: ThumbnailRef, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            thumbnail,
            uri: uri.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn thumbnail(&self) -> &ThumbnailRef {
        &self.thumbnail
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// Bundled entries: (title, thumbnail, media name under the resource base).
const BUNDLED: [(&str, &str, &str); 3] = [
    ("تطبيق ثمانية", "thumb1", "video1"),
    ("المقدمة الرسمية لكأس السوبر السعودي", "thumb2", "video2"),
    ("خارج التغطية", "thumb3", "video3"),
];

/// Ordered, read-only sequence of [`VideoItem`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<VideoItem>,
}

impl Catalog {
    /// Build the catalog from explicit items.
    pub fn new(items: Vec<VideoItem>) -> Self {
        Self { items }
    }

    /// The three bundled videos, located under `library.resource_base`.
    pub fn bundled(library: &LibraryConfig) -> Self {
        let base = library.resource_base.trim_end_matches('/');
        let items = BUNDLED
            .iter()
            .map(|(title, thumb, media)| {
                VideoItem::new(*title, ThumbnailRef::named(*thumb), format!("{base}/{media}"))
            })
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[VideoItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&VideoItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
