//! 订单数据模型

use std::fmt::Display;

use serde::Deserialize;

/// 一行订单数据
///
/// Head / Body / Legs / Address 原样传给页面，不做内容校验。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Order {
    #[serde(rename = "Order number")]
    pub order_number: String,
    #[serde(rename = "Head")]
    pub head: String,
    #[serde(rename = "Body")]
    pub body: String,
    #[serde(rename = "Legs")]
    pub legs: String,
    #[serde(rename = "Address")]
    pub address: String,
}

impl Order {
    pub fn new(
        order_number: impl Into<String>,
        head: impl Into<String>,
        body: impl Into<String>,
        legs: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            order_number: order_number.into(),
            head: head.into(),
            body: body.into(),
            legs: legs.into(),
            address: address.into(),
        }
    }

    /// 返回第一个为空的字段名
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("Order number", &self.order_number),
            ("Head", &self.head),
            ("Body", &self.body),
            ("Legs", &self.legs),
            ("Address", &self.address),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    /// 订单号用于文件命名，只允许字母、数字、`-` 和 `_`
    pub fn has_valid_number(&self) -> bool {
        !self.order_number.is_empty()
            && self
                .order_number
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "订单 #{} (head={}, body={}, legs={})",
            self.order_number, self.head, self.body, self.legs
        )
    }
}
