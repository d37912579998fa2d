pub mod artifact;
pub mod loaders;
pub mod order;

pub use artifact::{DocumentArtifact, OrderReceipt, OutputLayout, ScreenshotArtifact};
pub use loaders::{download_orders_csv, load_orders_from_csv, parse_orders};
pub use order::Order;
