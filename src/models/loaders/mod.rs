pub mod csv_loader;

pub use csv_loader::{download_orders_csv, load_orders_from_csv, parse_orders};
