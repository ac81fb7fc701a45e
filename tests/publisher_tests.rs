use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bytes::Bytes;
use plotserve::{ImageBuffer, ImagePublisher, PlotSeries, Renderer};

fn publisher() -> ImagePublisher {
    ImagePublisher::new(Renderer::new(96, 96))
}

#[test]
fn test_fetch_before_redraw_is_empty() {
    assert!(publisher().fetch(12345).is_none());
}

#[test]
fn test_redraw_serves_png() {
    let publisher = publisher();
    publisher.redraw(&PlotSeries::new()).unwrap();
    let image = publisher.fetch(0).unwrap();
    assert_eq!(image.content_type, "image/png");
    assert!(image.bytes.starts_with(b"\x89PNG"));
}

#[test]
fn test_versions_increase() {
    let publisher = publisher();
    let series = PlotSeries::new();
    let a = publisher.redraw(&series).unwrap();
    let b = publisher.redraw(&series).unwrap();
    assert!(b >= a);
    thread::sleep(Duration::from_millis(2));
    let c = publisher.redraw(&series).unwrap();
    assert!(c > b);
}

#[test]
fn test_old_tag_returns_latest_image() {
    let publisher = publisher();
    let old = publisher.redraw(&PlotSeries::new()).unwrap();

    let mut series = PlotSeries::new();
    for v in [1.0, 2.0, 1.0, 0.0, -1.0] {
        series.push(v);
    }
    let new = publisher.redraw(&series).unwrap();
    assert_ne!(old, new);
    assert_eq!(publisher.fetch(old), publisher.fetch(new));
}

#[test]
fn test_reset_series_renders_differently() {
    let publisher = publisher();
    let mut series = PlotSeries::new();
    for v in [1.0, 2.0, 3.0, 2.0] {
        series.push(v);
    }
    publisher.redraw(&series).unwrap();
    let walk = publisher.fetch(0).unwrap();

    series.reset();
    publisher.redraw(&series).unwrap();
    let single = publisher.fetch(0).unwrap();
    assert_ne!(walk.bytes, single.bytes);
}

#[test]
fn test_concurrent_fetch_sees_whole_buffers() {
    let publisher = Arc::new(publisher());
    let payloads: Vec<Bytes> = (0u8..8).map(|i| Bytes::from(vec![i; 4096])).collect();

    let writer = {
        let publisher = publisher.clone();
        let payloads = payloads.clone();
        thread::spawn(move || {
            for round in 0..200 {
                publisher.publish(ImageBuffer {
                    bytes: payloads[round % payloads.len()].clone(),
                    content_type: "image/png",
                });
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let publisher = publisher.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    if let Some(image) = publisher.fetch(0) {
                        let first = image.bytes[0];
                        assert!(image.bytes.iter().all(|b| *b == first));
                        assert_eq!(image.bytes.len(), 4096);
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
