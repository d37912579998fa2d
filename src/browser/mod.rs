pub mod connection;
pub mod headless;

pub use connection::{connect_to_browser_and_page, open_blank_page};
pub use headless::launch_headless_browser;
