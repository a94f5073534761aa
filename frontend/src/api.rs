use multi_inventory_shared::env::api_url;
use multi_inventory_shared::protocol::{
    ApiRequest, CreateItemRequest, DeleteItemRequest, GetItemRequest, GetOrderRequest,
    ListItemsRequest, ListOrdersRequest, LoginRequest, RegisterRequest, SetFulfillmentRequest,
    UpdateItemRequest,
};
use multi_inventory_shared::{
    CreateOrderRequest, Credentials, Item, ItemDraft, LoginResponse, RegisterResponse, SalesOrder,
    STORAGE_TOKEN_KEY,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config;
use crate::web::{HttpError, HttpRequestBuilder, LocalStorage};

#[derive(Debug, Error)]
pub enum ApiError {
    /// 后端返回非 2xx，message 为响应正文
    #[error("{message} ({status})")]
    Status { status: u16, message: String },
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("failed to encode request: {0}")]
    Encode(serde_json::Error),
    #[error("failed to decode response: {0}")]
    Decode(serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// 后端 API 客户端
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InventoryApi {
    base_url: &'static str,
}

impl Default for InventoryApi {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryApi {
    pub fn new() -> Self {
        Self {
            base_url: config::api_base(),
        }
    }

    /// 发送任意 [`ApiRequest`] 并按其协议解码响应
    pub async fn send<R>(&self, request: &R) -> Result<R::Response, ApiError>
    where
        R: ApiRequest,
        R::Response: DeserializeOwned,
    {
        let url = api_url(self.base_url, &request.path());
        let mut builder = HttpRequestBuilder::new(url, R::METHOD).header("Accept", "application/json");

        if let Some(token) = LocalStorage::get(STORAGE_TOKEN_KEY) {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }
        if let Some(body) = request.body() {
            builder = builder.json_body(body.map_err(ApiError::Encode)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        let ok = response.ok();
        let text = response.text().await?;

        if !ok {
            let message = text.trim();
            let message = if message.is_empty() {
                format!("request failed with status {}", status)
            } else {
                message.to_string()
            };
            tracing::warn!(status, path = %request.path(), %message, "api request failed");
            return Err(ApiError::Status { status, message });
        }

        R::decode(&text).map_err(ApiError::Decode)
    }

    // --- 认证 ---

    pub async fn register(&self, credentials: Credentials) -> Result<RegisterResponse, ApiError> {
        self.send(&RegisterRequest(credentials)).await
    }

    pub async fn login(&self, credentials: Credentials) -> Result<LoginResponse, ApiError> {
        self.send(&LoginRequest(credentials)).await
    }

    // --- 库存 ---

    pub async fn list_items(&self) -> Result<Vec<Item>, ApiError> {
        self.send(&ListItemsRequest).await
    }

    pub async fn get_item(&self, id: i64) -> Result<Item, ApiError> {
        self.send(&GetItemRequest { id }).await
    }

    pub async fn create_item(&self, draft: ItemDraft) -> Result<Item, ApiError> {
        self.send(&CreateItemRequest(draft)).await
    }

    pub async fn update_item(&self, id: i64, draft: ItemDraft) -> Result<Item, ApiError> {
        self.send(&UpdateItemRequest { id, draft }).await
    }

    pub async fn delete_item(&self, id: i64) -> Result<(), ApiError> {
        self.send(&DeleteItemRequest { id }).await
    }

    // --- 销售 ---

    pub async fn list_orders(&self) -> Result<Vec<SalesOrder>, ApiError> {
        self.send(&ListOrdersRequest).await
    }

    pub async fn get_order(&self, id: i64) -> Result<SalesOrder, ApiError> {
        self.send(&GetOrderRequest { id }).await
    }

    pub async fn create_order(&self, order: CreateOrderRequest) -> Result<SalesOrder, ApiError> {
        self.send(&order).await
    }

    pub async fn set_fulfillment(&self, order_item_id: i64, is_fulfilled: bool) -> Result<(), ApiError> {
        self.send(&SetFulfillmentRequest {
            order_item_id,
            is_fulfilled,
        })
        .await
    }
}
