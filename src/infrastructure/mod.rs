//! 基础设施层：持有浏览器页面，只暴露页面操作和渲染能力

pub mod cancel;
pub mod chrome_driver;
pub mod renderer;
pub mod ui_driver;

pub use cancel::{CancelHandle, CancelSignal};
pub use chrome_driver::ChromeDriver;
pub use renderer::{ChromeRenderer, DocumentRenderer};
pub use ui_driver::UiDriver;
