//! 订单提交服务 - 业务能力层
//!
//! 点击下单后，服务端偶尔返回一个校验错误，原样重新提交即可成功。
//! 这里立即重试，直到错误提示消失或次数用尽。

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{RobotError, RobotResult};
use crate::infrastructure::{CancelSignal, UiDriver};

pub struct SubmissionController {
    submit_selector: String,
    error_selector: String,
    max_attempts: usize,
    settle_delay: Duration,
}

impl SubmissionController {
    pub fn new(config: &Config) -> Self {
        Self {
            submit_selector: config.selectors.submit.clone(),
            error_selector: config.selectors.error_alert.clone(),
            max_attempts: config.max_submit_attempts,
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        }
    }

    /// 提交订单，返回点击提交按钮的次数
    ///
    /// 每次点击后检查错误提示：不存在即成功；存在则视为
    /// `TransientValidationRejection` 并立即重新提交。超过
    /// `max_attempts` 次仍有错误时返回 `SubmissionExhausted`。
    pub async fn submit(&self, driver: &dyn UiDriver, cancel: &CancelSignal) -> RobotResult<usize> {
        for attempt in 1..=self.max_attempts {
            cancel.check()?;

            driver.click(&self.submit_selector).await?;
            if !self.settle_delay.is_zero() {
                sleep(self.settle_delay).await;
            }

            if !driver.query_optional(&self.error_selector).await? {
                debug!("提交成功 (第 {} 次)", attempt);
                return Ok(attempt);
            }

            let rejection = RobotError::TransientValidationRejection { attempt };
            warn!("{}，重新提交 ({}/{})", rejection, attempt, self.max_attempts);
        }

        Err(RobotError::SubmissionExhausted {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::infrastructure::CancelHandle;

    /// 前 `rejections` 次提交显示错误提示
    struct FlakySubmit {
        rejections: usize,
        clicks: Mutex<usize>,
    }

    impl FlakySubmit {
        fn new(rejections: usize) -> Self {
            Self {
                rejections,
                clicks: Mutex::new(0),
            }
        }

        fn clicks(&self) -> usize {
            *self.clicks.lock().unwrap()
        }
    }

    #[async_trait]
    impl UiDriver for FlakySubmit {
        async fn navigate(&self, _url: &str) -> RobotResult<()> {
            Ok(())
        }
        async fn click(&self, _selector: &str) -> RobotResult<()> {
            *self.clicks.lock().unwrap() += 1;
            Ok(())
        }
        async fn select_option(&self, _selector: &str, _value: &str) -> RobotResult<()> {
            Ok(())
        }
        async fn fill_text(&self, _selector: &str, _value: &str) -> RobotResult<()> {
            Ok(())
        }
        async fn screenshot(&self, _path: &Path) -> RobotResult<()> {
            Ok(())
        }
        async fn read_inner_markup(&self, _selector: &str) -> RobotResult<String> {
            Ok(String::new())
        }
        async fn query_optional(&self, _selector: &str) -> RobotResult<bool> {
            Ok(self.clicks() <= self.rejections)
        }
    }

    fn controller(max_attempts: usize) -> SubmissionController {
        let config = Config {
            max_submit_attempts: max_attempts,
            settle_delay_ms: 0,
            ..Config::default()
        };
        SubmissionController::new(&config)
    }

    #[tokio::test]
    async fn test_first_try_succeeds() {
        let driver = FlakySubmit::new(0);
        let attempts = assert_ok!(controller(5).submit(&driver, &CancelSignal::never()).await);
        assert_eq!(attempts, 1);
        assert_eq!(driver.clicks(), 1);
    }

    #[tokio::test]
    async fn test_retries_once_per_rejection() {
        let driver = FlakySubmit::new(3);
        let attempts = assert_ok!(controller(5).submit(&driver, &CancelSignal::never()).await);
        assert_eq!(attempts, 4);
        assert_eq!(driver.clicks(), 4);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let driver = FlakySubmit::new(usize::MAX);
        let err = assert_err!(controller(3).submit(&driver, &CancelSignal::never()).await);
        assert!(matches!(err, RobotError::SubmissionExhausted { attempts: 3 }));
        assert_eq!(driver.clicks(), 3);
    }

    #[tokio::test]
    async fn test_cancel_stops_before_clicking() {
        let driver = FlakySubmit::new(0);
        let (handle, signal) = CancelHandle::new();
        handle.cancel();

        let err = assert_err!(controller(3).submit(&driver, &signal).await);
        assert!(matches!(err, RobotError::Cancelled));
        assert_eq!(driver.clicks(), 0);
    }
}
