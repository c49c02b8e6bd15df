//! Server-rendered inventory pages.
//!
//! Same store as the JSON API, rendered with Tera templates embedded in the
//! binary. A rejected form is re-rendered with its values and messages.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use crate::store::{InventoryItem, InventoryStore, NewInventoryItem, StoreError};

const TPL_BASE: &str = include_str!("templates/base.html");
const TPL_INVENTORY_INDEX: &str = include_str!("templates/inventory_index.html");

const INDEX_PATH: &str = "/ui/inventory";

/// Compiled page templates.
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template("base.html", TPL_BASE)?;
        tera.add_raw_template("inventory_index.html", TPL_INVENTORY_INDEX)?;
        Ok(Self { tera })
    }

    /// Render the inventory page with the given form state.
    pub fn inventory_index(
        &self,
        items: &[InventoryItem],
        form: &InventoryForm,
        errors: &[String],
    ) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("items", items);
        context.insert("form", form);
        context.insert("errors", errors);
        self.tera.render("inventory_index.html", &context)
    }
}

#[derive(Clone)]
pub struct WebState {
    store: Arc<dyn InventoryStore>,
    views: Arc<Views>,
}

impl WebState {
    pub fn new(store: Arc<dyn InventoryStore>) -> Result<Self, tera::Error> {
        Ok(Self {
            store,
            views: Arc::new(Views::new()?),
        })
    }
}

/// Raw form fields, kept as text so rejected input can be echoed back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryForm {
    pub name: String,
    pub quantity: String,
    pub price: String,
}

impl InventoryForm {
    /// Convert to a new item, or every message describing what is wrong.
    pub fn parse(&self) -> Result<NewInventoryItem, Vec<String>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("Name is required.".to_string());
        }

        let quantity = match self.quantity.trim() {
            "" => Some(0),
            raw => raw.parse::<i32>().ok(),
        };
        if quantity.is_none() {
            errors.push("Quantity must be a whole number.".to_string());
        }

        let price = match self.price.trim() {
            "" => Some(Decimal::ZERO),
            raw => Decimal::from_str(raw).ok(),
        };
        if price.is_none() {
            errors.push("Price must be a number.".to_string());
        }

        match (quantity, price) {
            (Some(quantity), Some(price)) if errors.is_empty() => Ok(NewInventoryItem {
                name: name.to_string(),
                quantity,
                price,
            }),
            _ => Err(errors),
        }
    }
}

pub fn router(state: WebState) -> Router {
    Router::new()
        .route(INDEX_PATH, get(index))
        .route("/ui/inventory/add", post(add))
        .with_state(state)
}

async fn index(State(state): State<WebState>) -> Response {
    render_index(&state, StatusCode::OK, &InventoryForm::default(), &[]).await
}

async fn add(State(state): State<WebState>, Form(form): Form<InventoryForm>) -> Response {
    let item = match form.parse() {
        Ok(item) => item,
        Err(errors) => {
            return render_index(&state, StatusCode::BAD_REQUEST, &form, &errors).await;
        }
    };

    match state.store.create_item(item).await {
        Ok(created) => {
            tracing::info!(id = created.id, name = %created.name, "Inventory item added from form");
            Redirect::to(INDEX_PATH).into_response()
        }
        Err(err) => store_failure(err),
    }
}

async fn render_index(
    state: &WebState,
    status: StatusCode,
    form: &InventoryForm,
    errors: &[String],
) -> Response {
    let items = match state.store.list_items().await {
        Ok(items) => items,
        Err(err) => return store_failure(err),
    };

    match state.views.inventory_index(&items, form, errors) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Template error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

fn store_failure(err: StoreError) -> Response {
    tracing::error!(error = %err, "Inventory page store failure");
    let status = match err.kind() {
        crate::store::FailureKind::Retryable => StatusCode::SERVICE_UNAVAILABLE,
        crate::store::FailureKind::Fatal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Html("<h1>Inventory is unavailable</h1>")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, quantity: &str, price: &str) -> InventoryForm {
        InventoryForm {
            name: name.into(),
            quantity: quantity.into(),
            price: price.into(),
        }
    }

    #[test]
    fn test_parse_valid_form() {
        let item = form(" Widget ", "3", "2.50").parse().unwrap();
        assert_eq!(item.name, "Widget");
        assert_eq!(item.quantity, 3);
        assert_eq!(item.price, Decimal::new(250, 2));
    }

    #[test]
    fn test_blank_numbers_default_to_zero() {
        let item = form("Widget", "", "").parse().unwrap();
        assert_eq!(item.quantity, 0);
        assert_eq!(item.price, Decimal::ZERO);
    }

    #[test]
    fn test_parse_collects_all_messages() {
        let errors = form("", "many", "cheap").parse().unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Name is required.",
                "Quantity must be a whole number.",
                "Price must be a number."
            ]
        );
    }

    #[test]
    fn test_render_escapes_input() {
        let views = Views::new().unwrap();
        let html = views
            .inventory_index(&[], &form("<b>x</b>", "", ""), &["Name is required.".into()])
            .unwrap();
        assert!(html.contains("No items yet."));
        assert!(html.contains("&lt;b&gt;x&lt;&#x2F;b&gt;"));
        assert!(html.contains("Name is required."));
    }

    #[test]
    fn test_render_items() {
        let views = Views::new().unwrap();
        let items = vec![InventoryItem {
            id: 7,
            name: "Gadget".into(),
            quantity: 4,
            price: Decimal::new(1999, 2),
        }];
        let html = views
            .inventory_index(&items, &InventoryForm::default(), &[])
            .unwrap();
        assert!(html.contains("<td>Gadget</td>"));
        assert!(html.contains("<td>19.99</td>"));
    }
}
