//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 下载并加载订单 CSV
//! - 持有浏览器资源（Browser、ChromeDriver、ChromeRenderer）
//! - 监听 Ctrl-C 并发出取消信号
//!
//! ### `order_processor` - 订单批处理
//! - 准备干净的输出目录
//! - 逐个订单调用 `OrderFlow`，失败的订单单独记录后继续
//! - 所有订单结束后归档收据
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (资源 + 输入)
//!     ↓
//! order_processor (处理 Vec<Order>，归档)
//!     ↓
//! workflow::OrderFlow (处理单个 Order)
//!     ↓
//! services (能力层：表单 / 提交 / 采集 / 合成 / 归档)
//!     ↓
//! infrastructure (基础设施：UiDriver / DocumentRenderer)
//! ```

pub mod batch_processor;
pub mod order_processor;

pub use batch_processor::App;
pub use order_processor::{process_orders, FailedOrder, RunSummary};
