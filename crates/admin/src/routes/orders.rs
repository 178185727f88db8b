//! Order list and status updates.

use askama::Template;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Html,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use bazaar_core::{OrderId, OrderStatus};

use crate::{
    db::OrderRepository,
    error::{Result, render},
    filters,
    middleware::RequireAdminAuth,
    models::{AdminOrder, CurrentAdmin},
    state::AppState,
};

#[derive(Template)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub current_admin: Option<CurrentAdmin>,
    pub orders: Vec<AdminOrder>,
    pub statuses: [OrderStatus; 5],
    pub can_edit: bool,
}

/// GET /orders
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Html<String>> {
    let orders = OrderRepository::new(state.pool()).list(None).await?;
    let can_edit = admin.can_edit();

    render(&OrdersTemplate {
        current_admin: Some(admin),
        orders,
        statuses: OrderStatus::ALL,
        can_edit,
    })
}

/// Body of a status change request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub order_id: OrderId,
    pub status: String,
}

/// Result of a status change.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub message: String,
}

type StatusReply = (StatusCode, Json<StatusUpdateResponse>);

fn reply(status: StatusCode, success: bool, message: impl Into<String>) -> StatusReply {
    (
        status,
        Json(StatusUpdateResponse {
            success,
            message: message.into(),
        }),
    )
}

/// Parse a status name, or explain which names are accepted.
fn parse_status(raw: &str) -> std::result::Result<OrderStatus, String> {
    raw.parse().map_err(|_| {
        let valid: Vec<&str> = OrderStatus::ALL.iter().map(OrderStatus::label).collect();
        format!("Invalid status. Valid statuses: {}", valid.join(", "))
    })
}

/// POST /orders/update-status
#[instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    body: std::result::Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<StatusReply> {
    if !admin.can_edit() {
        tracing::warn!(role = admin.role.as_str(), "Status change blocked for read-only admin");
        return Ok(reply(
            StatusCode::FORBIDDEN,
            false,
            "Your role cannot change order status",
        ));
    }

    let Json(update) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return Ok(reply(StatusCode::BAD_REQUEST, false, rejection.body_text()));
        }
    };

    let status = match parse_status(&update.status) {
        Ok(status) => status,
        Err(message) => return Ok(reply(StatusCode::BAD_REQUEST, false, message)),
    };

    let found = OrderRepository::new(state.pool())
        .update_status(update.order_id, status)
        .await?;

    if !found {
        return Ok(reply(StatusCode::NOT_FOUND, false, "Order not found"));
    }

    tracing::info!(order_id = %update.order_id, status = status.label(), "Order status updated");
    Ok(reply(
        StatusCode::OK,
        true,
        format!("Order {} marked {}", update.order_id.number(), status.label()),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_accepts_any_case() {
        assert_eq!(parse_status("shipped"), Ok(OrderStatus::Shipped));
        assert_eq!(parse_status("Cancelled"), Ok(OrderStatus::Cancelled));
    }

    #[test]
    fn test_parse_status_lists_valid_values() {
        let message = parse_status("lost").unwrap_err();
        assert_eq!(
            message,
            "Invalid status. Valid statuses: Pending, Processing, Shipped, Delivered, Cancelled"
        );
    }

    #[test]
    fn test_camel_case_body() {
        let update: StatusUpdate =
            serde_json::from_str(r#"{"orderId": 12, "status": "Delivered"}"#).unwrap();
        assert_eq!(update.order_id, OrderId::new(12));
        assert_eq!(update.status, "Delivered");
    }
}
