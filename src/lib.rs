//! # Robot Order
//!
//! 按 CSV 批量在 RobotSpareBin 网站上下单机器人，为每个订单生成带预览截图的
//! PDF 收据，最后把所有收据打包成一个 zip。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `UiDriver` / `ChromeDriver` - 页面操作
//! - `DocumentRenderer` / `ChromeRenderer` - HTML 打印为 PDF
//! - `CancelSignal` - Ctrl-C 取消信号
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个订单
//! - `FormFiller` - 填写表单
//! - `SubmissionController` - 提交并吸收临时校验错误（有上限）
//! - `ArtifactCapture` - 截图、渲染收据
//! - `ReceiptComposer` - 把截图追加为收据的最后一页
//! - `ArchiveManager` - 打包收据
//!
//! ### ③ 流程层（Workflow）
//! - `OrderFlow` - 一个订单的完整状态机
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 应用入口，管理浏览器资源
//! - `orchestrator/order_processor` - 串行处理订单，归档

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{RobotError, RobotResult};
pub use infrastructure::{CancelHandle, CancelSignal, DocumentRenderer, UiDriver};
pub use models::{Order, OrderReceipt, OutputLayout};
pub use orchestrator::{process_orders, App, RunSummary};
pub use workflow::{OrderCtx, OrderFailure, OrderFlow, OrderStage};
