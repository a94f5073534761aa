use crate::{
    CreateOrderRequest, Credentials, Item, ItemDraft, LoginResponse, RegisterResponse, SalesOrder,
    UpdateFulfillmentRequest,
};
use serde::{Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// The URL path, relative to the API base.
    fn path(&self) -> String;

    /// The JSON body, if the endpoint takes one.
    fn body(&self) -> Option<Result<String, serde_json::Error>> {
        None
    }

    /// Decode the raw response text.
    fn decode(text: &str) -> Result<Self::Response, serde_json::Error>
    where
        Self::Response: DeserializeOwned,
    {
        serde_json::from_str(text)
    }
}

fn json_body<T: Serialize>(value: &T) -> Option<Result<String, serde_json::Error>> {
    Some(serde_json::to_string(value))
}

/// Lists are encoded as `null` by the backend when empty.
fn decode_list<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, serde_json::Error> {
    Ok(serde_json::from_str::<Option<Vec<T>>>(text)?.unwrap_or_default())
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone)]
pub struct RegisterRequest(pub Credentials);

impl ApiRequest for RegisterRequest {
    type Response = RegisterResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/auth/register".to_string()
    }

    fn body(&self) -> Option<Result<String, serde_json::Error>> {
        json_body(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct LoginRequest(pub Credentials);

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/auth/login".to_string()
    }

    fn body(&self) -> Option<Result<String, serde_json::Error>> {
        json_body(&self.0)
    }
}

// =========================================================
// Inventory
// =========================================================

#[derive(Debug, Clone, Copy)]
pub struct ListItemsRequest;

impl ApiRequest for ListItemsRequest {
    type Response = Vec<Item>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/inventory".to_string()
    }

    fn decode(text: &str) -> Result<Vec<Item>, serde_json::Error> {
        decode_list(text)
    }
}

#[derive(Debug, Clone)]
pub struct CreateItemRequest(pub ItemDraft);

impl ApiRequest for CreateItemRequest {
    type Response = Item;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/inventory".to_string()
    }

    fn body(&self) -> Option<Result<String, serde_json::Error>> {
        json_body(&self.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetItemRequest {
    pub id: i64,
}

impl ApiRequest for GetItemRequest {
    type Response = Item;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/inventory/{}", self.id)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateItemRequest {
    pub id: i64,
    pub draft: ItemDraft,
}

impl ApiRequest for UpdateItemRequest {
    type Response = Item;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/api/inventory/{}", self.id)
    }

    fn body(&self) -> Option<Result<String, serde_json::Error>> {
        json_body(&self.draft)
    }
}

/// Responds with 204 and no body.
#[derive(Debug, Clone, Copy)]
pub struct DeleteItemRequest {
    pub id: i64,
}

impl ApiRequest for DeleteItemRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/api/inventory/{}", self.id)
    }

    fn decode(_text: &str) -> Result<(), serde_json::Error> {
        Ok(())
    }
}

// =========================================================
// Sales
// =========================================================

#[derive(Debug, Clone, Copy)]
pub struct ListOrdersRequest;

impl ApiRequest for ListOrdersRequest {
    type Response = Vec<SalesOrder>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/sales".to_string()
    }

    fn decode(text: &str) -> Result<Vec<SalesOrder>, serde_json::Error> {
        decode_list(text)
    }
}

impl ApiRequest for CreateOrderRequest {
    type Response = SalesOrder;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/sales".to_string()
    }

    fn body(&self) -> Option<Result<String, serde_json::Error>> {
        json_body(self)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetOrderRequest {
    pub id: i64,
}

impl ApiRequest for GetOrderRequest {
    type Response = SalesOrder;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/sales/{}", self.id)
    }
}

/// Toggle one order line; responds with 200 and an empty body.
#[derive(Debug, Clone, Copy)]
pub struct SetFulfillmentRequest {
    pub order_item_id: i64,
    pub is_fulfilled: bool,
}

impl ApiRequest for SetFulfillmentRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/api/sales/items/{}/fulfillment", self.order_item_id)
    }

    fn body(&self) -> Option<Result<String, serde_json::Error>> {
        json_body(&UpdateFulfillmentRequest {
            is_fulfilled: self.is_fulfilled,
        })
    }

    fn decode(_text: &str) -> Result<(), serde_json::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OrderLine;

    #[test]
    fn paths_follow_backend_routes() {
        assert_eq!(ListItemsRequest.path(), "/api/inventory");
        assert_eq!(GetItemRequest { id: 9 }.path(), "/api/inventory/9");
        assert_eq!(DeleteItemRequest { id: 9 }.path(), "/api/inventory/9");
        assert_eq!(GetOrderRequest { id: 2 }.path(), "/api/sales/2");
        assert_eq!(
            SetFulfillmentRequest {
                order_item_id: 15,
                is_fulfilled: true
            }
            .path(),
            "/api/sales/items/15/fulfillment"
        );
        assert_eq!(
            LoginRequest(Credentials::default()).path(),
            "/api/auth/login"
        );
    }

    #[test]
    fn methods_match_endpoints() {
        assert_eq!(UpdateItemRequest::METHOD, HttpMethod::Put);
        assert_eq!(DeleteItemRequest::METHOD, HttpMethod::Delete);
        assert_eq!(CreateOrderRequest::METHOD, HttpMethod::Post);
        assert_eq!(SetFulfillmentRequest::METHOD.as_str(), "PUT");
    }

    #[test]
    fn null_list_decodes_as_empty() {
        assert!(ListItemsRequest::decode("null").unwrap().is_empty());
        assert!(ListOrdersRequest::decode("[]").unwrap().is_empty());
    }

    #[test]
    fn empty_bodies_decode_as_unit() {
        assert!(DeleteItemRequest::decode("").is_ok());
        assert!(SetFulfillmentRequest::decode("").is_ok());
    }

    #[test]
    fn bodies_carry_json() {
        let body = SetFulfillmentRequest {
            order_item_id: 1,
            is_fulfilled: false,
        }
        .body()
        .unwrap()
        .unwrap();
        assert_eq!(body, r#"{"is_fulfilled":false}"#);

        let order = CreateOrderRequest {
            user_id: Some("u-1".into()),
            items: vec![OrderLine {
                item_id: 4,
                quantity: 1,
            }],
        };
        let body = order.body().unwrap().unwrap();
        assert_eq!(body, r#"{"user_id":"u-1","items":[{"item_id":4,"quantity":1}]}"#);

        assert!(ListItemsRequest.body().is_none());
    }
}
