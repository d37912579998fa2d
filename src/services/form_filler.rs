//! 表单填写服务 - 业务能力层
//!
//! 只负责把一个订单的字段填到页面上，不关心流程顺序

use tracing::debug;

use crate::config::Selectors;
use crate::error::RobotResult;
use crate::infrastructure::UiDriver;
use crate::models::Order;

pub struct FormFiller {
    selectors: Selectors,
}

impl FormFiller {
    pub fn new(selectors: &Selectors) -> Self {
        Self {
            selectors: selectors.clone(),
        }
    }

    /// 关闭每次进入下单页都会弹出的提示框
    ///
    /// 返回是否真的点击了按钮；提示框不存在时直接跳过。
    pub async fn dismiss_modal(&self, driver: &dyn UiDriver) -> RobotResult<bool> {
        if !driver.query_optional(&self.selectors.modal_ok).await? {
            debug!("未出现提示框，跳过");
            return Ok(false);
        }
        driver.click(&self.selectors.modal_ok).await?;
        Ok(true)
    }

    /// 按订单填写机器人配置
    pub async fn fill(&self, driver: &dyn UiDriver, order: &Order) -> RobotResult<()> {
        driver
            .select_option(&self.selectors.head, &order.head)
            .await?;
        driver.click(&self.body_selector(&order.body)).await?;
        driver.fill_text(&self.selectors.legs, &order.legs).await?;
        driver
            .fill_text(&self.selectors.address, &order.address)
            .await?;
        Ok(())
    }

    fn body_selector(&self, body: &str) -> String {
        format!("{}{}", self.selectors.body_prefix, body)
    }
}
