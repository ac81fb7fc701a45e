use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use log::debug;

use crate::error::PlotError;
use crate::render::{Renderer, CONTENT_TYPE_PNG};
use crate::series::PlotSeries;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// One published snapshot. Never mutated after it is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub bytes: Bytes,
    pub content_type: &'static str,
}

#[derive(Debug, Default)]
struct Slot {
    buffer: Option<Arc<ImageBuffer>>,
    version: u64,
}

/// Holds the single live image and the tag that goes into its address.
///
/// `redraw` renders outside the lock and only holds it for the swap, so a
/// concurrent `fetch` either sees the previous `Arc` or the new one.
#[derive(Debug)]
pub struct ImagePublisher {
    id: u64,
    renderer: Renderer,
    slot: Mutex<Slot>,
}

impl Default for ImagePublisher {
    fn default() -> Self {
        Self::new(Renderer::default())
    }
}

impl ImagePublisher {
    pub fn new(renderer: Renderer) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            renderer,
            slot: Mutex::new(Slot::default()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Render `series`, replace the live buffer and return the new version tag.
    pub fn redraw(&self, series: &PlotSeries) -> Result<u64, PlotError> {
        let bytes = self.renderer.render(series)?;
        Ok(self.publish(ImageBuffer {
            bytes: Bytes::from(bytes),
            content_type: CONTENT_TYPE_PNG,
        }))
    }

    /// Install an already encoded buffer.
    pub fn publish(&self, buffer: ImageBuffer) -> u64 {
        let mut slot = self.lock();
        // Strictly increasing even when the clock stalls or steps back.
        let version = now_micros().max(slot.version + 1);
        slot.buffer = Some(Arc::new(buffer));
        slot.version = version;
        drop(slot);
        debug!("publisher {} now serving version {version}", self.id);
        version
    }

    /// Latest buffer, or `None` before the first publish.
    ///
    /// The tag only exists to make each address unique for the browser;
    /// older versions are not retained.
    pub fn fetch(&self, _version: u64) -> Option<Arc<ImageBuffer>> {
        self.lock().buffer.clone()
    }

    pub fn version(&self) -> u64 {
        self.lock().version
    }

    pub fn image_src(&self) -> String {
        format!(
            "/{}/get_image_data?update_index={}",
            self.id,
            self.version()
        )
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // The slot is always left consistent, so a poisoned lock is still usable.
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> ImagePublisher {
        ImagePublisher::new(Renderer::new(64, 64))
    }

    #[test]
    fn empty_before_first_redraw() {
        let publisher = small();
        assert!(publisher.fetch(0).is_none());
        assert_eq!(publisher.version(), 0);
        assert_eq!(
            publisher.image_src(),
            format!("/{}/get_image_data?update_index=0", publisher.id())
        );
    }

    #[test]
    fn redraw_publishes_png() {
        let publisher = small();
        let version = publisher.redraw(&PlotSeries::new()).unwrap();
        let image = publisher.fetch(version).unwrap();
        assert_eq!(image.content_type, "image/png");
        assert!(!image.bytes.is_empty());
        assert!(publisher.image_src().ends_with(&format!("={version}")));
    }

    #[test]
    fn ids_are_distinct() {
        assert_ne!(small().id(), small().id());
    }

    #[test]
    fn publish_replaces_previous() {
        let publisher = small();
        let first = publisher.publish(ImageBuffer {
            bytes: Bytes::from_static(b"one"),
            content_type: CONTENT_TYPE_PNG,
        });
        let second = publisher.publish(ImageBuffer {
            bytes: Bytes::from_static(b"two"),
            content_type: CONTENT_TYPE_PNG,
        });
        assert!(second > first);
        assert_eq!(publisher.fetch(first).unwrap().bytes, "two");
    }
}
