//! 取消信号
//!
//! Ctrl-C 触发后，正在进行的订单在下一个检查点中止。

use tokio::sync::watch;

use crate::error::{RobotError, RobotResult};

/// 发送端，由编排层持有
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// 接收端，传给流程层
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelHandle {
    pub fn new() -> (Self, CancelSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, CancelSignal { rx })
    }

    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl CancelSignal {
    /// 永远不会被触发的信号
    pub fn never() -> Self {
        let (_handle, signal) = CancelHandle::new();
        signal
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// 已取消时返回 `RobotError::Cancelled`
    pub fn check(&self) -> RobotResult<()> {
        if self.is_cancelled() {
            Err(RobotError::Cancelled)
        } else {
            Ok(())
        }
    }
}
