pub mod app;
pub mod config;
pub mod error;
pub mod publisher;
pub mod render;
pub mod series;
pub mod server;
pub mod timer;

pub use app::{Session, Snapshot};
pub use config::Config;
pub use error::{PlotError, PlotErrorKind};
pub use publisher::{ImageBuffer, ImagePublisher};
pub use render::Renderer;
pub use series::PlotSeries;
pub use timer::ElapsedTimer;
