//! 前端与预览服务器共享的领域模型和协议定义
//!
//! 此 crate 不依赖 DOM 或 wasm，所有逻辑都可以在宿主机上直接测试。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub mod cart;
pub mod env;
pub mod orders;
pub mod protocol;
pub mod stock;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 会话标记在 LocalStorage 中的键，存在即视为已登录
pub const STORAGE_USER_KEY: &str = "user";
/// 登录返回的 token 所在的键（导航守卫不读取）
pub const STORAGE_TOKEN_KEY: &str = "token";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub barcode: String,
    pub price: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_halal: bool,
    pub quantity: i32,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// 提取可编辑字段，用于编辑表单回填和更新请求
    pub fn to_draft(&self) -> ItemDraft {
        ItemDraft {
            name: self.name.clone(),
            barcode: self.barcode.clone(),
            price: self.price,
            location: self.location.clone(),
            is_halal: self.is_halal,
            quantity: self.quantity,
        }
    }
}

/// 新建或更新商品时提交的字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub barcode: String,
    pub price: f64,
    pub location: String,
    pub is_halal: bool,
    pub quantity: i32,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            barcode: String::new(),
            price: 0.0,
            location: String::new(),
            // 后端的默认值同样为 true
            is_halal: true,
            quantity: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// 后端以 UUID 存储用户，历史数据中也出现过数字 id
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOrder {
    pub id: i64,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub user_id: Option<String>,
    pub total_price: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<SalesOrderItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOrderItem {
    pub id: i64,
    #[serde(default)]
    pub sales_order_id: i64,
    pub item_id: i64,
    #[serde(default)]
    pub item_name: Option<String>,
    pub quantity: i32,
    pub price_at_sale: f64,
    #[serde(default)]
    pub is_fulfilled: bool,
}

impl SalesOrderItem {
    pub fn line_total(&self) -> f64 {
        self.price_at_sale * f64::from(self.quantity)
    }
}

// =========================================================
// 请求/响应 (DTOs)
// =========================================================

/// 登录与注册共用的凭据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// 缺省时后端写入 NULL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFulfillmentRequest {
    pub is_fulfilled: bool,
}

/// 价格统一保留两位小数显示
pub fn format_price(value: f64) -> String {
    format!("{:.2}", value)
}

// =========================================================
// serde 辅助
// =========================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.map(String::from).filter(|s| !s.is_empty()))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_parses_backend_json() {
        let json = r#"{
            "id": 7,
            "name": "Kurma",
            "barcode": "8991002101234",
            "price": 12.5,
            "location": "Rak A",
            "is_halal": true,
            "quantity": 40,
            "created_at": "2024-05-01T08:30:00.123456Z",
            "updated_at": "2024-05-02T08:30:00Z"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 7);
        assert_eq!(item.quantity, 40);
        assert_eq!(item.to_draft().barcode, "8991002101234");
    }

    #[test]
    fn user_id_accepts_uuid_or_number() {
        let uuid: User = serde_json::from_str(
            r#"{"id":"5b1f0c1e-0000-4000-8000-000000000001","username":"ana","role":"user"}"#,
        )
        .unwrap();
        assert_eq!(uuid.id, "5b1f0c1e-0000-4000-8000-000000000001");

        let numeric: User = serde_json::from_str(r#"{"id":12,"username":"bo"}"#).unwrap();
        assert_eq!(numeric.id, "12");
        assert_eq!(numeric.role, "");
    }

    #[test]
    fn order_without_items_or_user_parses() {
        let json = r#"{"id":3,"user_id":"","total_price":30,"status":"completed","items":null}"#;
        let order: SalesOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.user_id, None);
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(order.items.is_empty());

        let bare: SalesOrder = serde_json::from_str(r#"{"id":4,"total_price":1.5}"#).unwrap();
        assert_eq!(bare.status, OrderStatus::Pending);
    }

    #[test]
    fn unknown_order_status_is_rejected() {
        let json = r#"{"id":3,"total_price":30,"status":"shipped"}"#;
        assert!(serde_json::from_str::<SalesOrder>(json).is_err());
    }

    #[test]
    fn create_order_omits_missing_user() {
        let req = CreateOrderRequest {
            user_id: None,
            items: vec![OrderLine {
                item_id: 1,
                quantity: 2,
            }],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, serde_json::json!({"items":[{"item_id":1,"quantity":2}]}));
    }

    #[test]
    fn prices_render_with_two_decimals() {
        assert_eq!(format_price(3.0), "3.00");
        assert_eq!(format_price(12.346), "12.35");
    }
}
