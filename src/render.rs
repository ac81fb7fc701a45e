use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use log::debug;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;

use crate::error::PlotError;
use crate::series::PlotSeries;

pub const DEFAULT_SIZE: (u32, u32) = (400, 400);
pub const CONTENT_TYPE_PNG: &str = "image/png";

const HAS_FONTS: bool = cfg!(feature = "ttf");
const LABEL_AREA_SIZE: u32 = if HAS_FONTS { 30 } else { 0 };

/// Draws a [`PlotSeries`] into an RGB bitmap and encodes it as PNG.
#[derive(Debug, Clone)]
pub struct Renderer {
    width: u32,
    height: u32,
    caption: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE.0, DEFAULT_SIZE.1)
    }
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            caption: "test".into(),
        }
    }

    pub fn with_caption<S: Into<String>>(mut self, caption: S) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn render(&self, series: &PlotSeries) -> Result<Vec<u8>, PlotError> {
        if self.width == 0 || self.height == 0 {
            return Err(PlotError::render(format!(
                "invalid figure size {}x{}",
                self.width, self.height
            )));
        }
        let mut buf = vec![0u8; self.width as usize * self.height as usize * 3];
        self.draw(series, &mut buf)?;
        let png = encode_png(buf, self.width, self.height)?;
        debug!(
            "rendered {} samples into {} png bytes",
            series.len(),
            png.len()
        );
        Ok(png)
    }

    fn draw(&self, series: &PlotSeries, buf: &mut [u8]) -> Result<(), PlotError> {
        let root = BitMapBackend::with_buffer(buf, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let samples = series.samples();
        let x_max = samples.len().saturating_sub(1).max(1) as f64;
        let (y_min, y_max) = series.y_range();

        let mut builder = ChartBuilder::on(&root);
        builder
            .margin(10)
            .set_left_and_bottom_label_area_size(LABEL_AREA_SIZE);
        // Without a font backend plotters panics on any text, so the caption
        // and the label areas only exist when one is compiled in.
        if HAS_FONTS {
            builder.caption(&self.caption, ("sans-serif", 20));
        }
        let mut chart = builder.build_cartesian_2d(0.0..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .light_line_style(BLACK.mix(0.15))
            .max_light_lines(5)
            .draw()?;

        let points = samples.iter().enumerate().map(|(x, y)| (x as f64, *y));
        if samples.len() > 1 {
            chart.draw_series(LineSeries::new(points.clone(), &BLACK))?;
        }
        chart.draw_series(points.map(|p| Circle::new(p, 2, BLACK.filled())))?;

        root.present()?;
        Ok(())
    }
}

fn encode_png(buf: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, PlotError> {
    let image = RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| PlotError::encode("bitmap buffer does not match figure size"))?;
    let mut out = Vec::new();
    image.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlotErrorKind;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    #[test]
    fn renders_png() {
        let png = Renderer::new(120, 80).render(&PlotSeries::new()).unwrap();
        assert!(png.starts_with(PNG_MAGIC));
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 80));
    }

    #[test]
    fn renders_multi_sample_series() {
        let mut series = PlotSeries::new();
        for v in [1.0, 2.0, 1.0, 0.0, -1.0, -2.0] {
            series.push(v);
        }
        let png = Renderer::new(160, 160).render(&series).unwrap();
        assert!(png.starts_with(PNG_MAGIC));
        assert_ne!(png, Renderer::new(160, 160).render(&PlotSeries::new()).unwrap());
    }

    #[test]
    fn zero_size_is_rejected() {
        let err = Renderer::new(0, 10).render(&PlotSeries::new()).unwrap_err();
        assert_eq!(err.kind, PlotErrorKind::Render);
    }
}
