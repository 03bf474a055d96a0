//! Order creation, lifecycle, and listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{OrderId, UserEmail};
use domain::{CartOp, CatalogLookup, OrderAction, OrderService};
use order_store::{Order, OrderStore};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore, C: CatalogLookup> {
    pub orders: OrderService<S, C>,
}

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_email: String,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    pub user_email: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub user_email: String,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
    pub created_at: String,
    pub confirmed_at: Option<String>,
    pub sent_at: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: String,
    pub quantity: u32,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            user_email: order.user_email.to_string(),
            status: order.status.to_string(),
            items: order
                .lines
                .iter()
                .map(|line| OrderItemResponse {
                    product_id: line.product_id.to_string(),
                    quantity: line.quantity,
                })
                .collect(),
            created_at: order.created_at.to_rfc3339(),
            confirmed_at: order.confirmed_at.map(|t| t.to_rfc3339()),
            sent_at: order.sent_at.map(|t| t.to_rfc3339()),
        }
    }
}

// -- Handlers --

/// POST /orders — submit a cart for order creation.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: OrderStore + 'static, C: CatalogLookup + 'static>(
    State(state): State<Arc<AppState<S, C>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    if req.user_email.is_empty() {
        return Err(ApiError::BadRequest("userEmail must not be empty".to_string()));
    }

    let ops: Vec<CartOp> = req
        .items
        .iter()
        .map(|item| CartOp::add(item.product_id.as_str(), item.quantity))
        .collect();

    let order = state
        .orders
        .create_order(UserEmail::new(req.user_email), ops)
        .await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}

/// GET /orders/:id — load an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + 'static, C: CatalogLookup + 'static>(
    State(state): State<Arc<AppState<S, C>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .orders
        .get_order(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(OrderResponse::from(&order)))
}

/// GET /orders — list orders, optionally restricted to one user.
///
/// Whether the caller may see other users' orders is enforced by the
/// surrounding auth layer, not here.
#[tracing::instrument(skip(state))]
pub async fn list<S: OrderStore + 'static, C: CatalogLookup + 'static>(
    State(state): State<Arc<AppState<S, C>>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = match query.user_email {
        Some(user_email) => {
            state
                .orders
                .orders_for_user(&UserEmail::new(user_email))
                .await?
        }
        None => state.orders.all_orders().await?,
    };

    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// PUT /orders/:id/process — confirm a pending order.
#[tracing::instrument(skip(state))]
pub async fn process<S: OrderStore + 'static, C: CatalogLookup + 'static>(
    State(state): State<Arc<AppState<S, C>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    transition(&state, &id, OrderAction::Process).await
}

/// PUT /orders/:id/ship — ship a confirmed order.
#[tracing::instrument(skip(state))]
pub async fn ship<S: OrderStore + 'static, C: CatalogLookup + 'static>(
    State(state): State<Arc<AppState<S, C>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    transition(&state, &id, OrderAction::Ship).await
}

/// PUT /orders/:id/cancel — cancel an order that hasn't shipped.
#[tracing::instrument(skip(state))]
pub async fn cancel<S: OrderStore + 'static, C: CatalogLookup + 'static>(
    State(state): State<Arc<AppState<S, C>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    transition(&state, &id, OrderAction::Cancel).await
}

async fn transition<S: OrderStore, C: CatalogLookup>(
    state: &AppState<S, C>,
    id: &str,
    action: OrderAction,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(id)?;
    let order = state.orders.transition(order_id, action).await?;
    Ok(Json(OrderResponse::from(&order)))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order ID: {e}")))?;
    Ok(OrderId::from(uuid))
}
