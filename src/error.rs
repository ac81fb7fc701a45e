use core::fmt;
use std::{error, io};

use plotters::drawing::DrawingAreaErrorKind;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlotErrorKind {
    Io,
    Render,
    Encode,
    Config,
}

#[derive(Debug)]
pub struct PlotError {
    pub kind: PlotErrorKind,
    pub message: String,
}

impl PlotError {
    pub fn new<S: Into<String>>(message: S, kind: PlotErrorKind) -> PlotError {
        PlotError {
            message: message.into(),
            kind,
        }
    }

    pub fn render<S: Into<String>>(message: S) -> PlotError {
        Self::new(message, PlotErrorKind::Render)
    }

    pub fn encode<S: Into<String>>(message: S) -> PlotError {
        Self::new(message, PlotErrorKind::Encode)
    }

    pub fn config<S: Into<String>>(message: S) -> PlotError {
        Self::new(message, PlotErrorKind::Config)
    }
}

impl error::Error for PlotError {}
impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plot Error {}", self.message)
    }
}

impl From<io::Error> for PlotError {
    fn from(error: io::Error) -> Self {
        Self::new(format!("I/O failure: {error}"), PlotErrorKind::Io)
    }
}

impl From<image::ImageError> for PlotError {
    fn from(error: image::ImageError) -> Self {
        Self::encode(format!("PNG encoding failed: {error}"))
    }
}

impl<E: error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(error: DrawingAreaErrorKind<E>) -> Self {
        Self::render(format!("Drawing failed: {error}"))
    }
}
