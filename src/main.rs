//! Casalogy Storefront - catalog, cart and back-office API

use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::{get, post, put, delete}, Json, Router};
use casalogy_storefront::{CartStore, ColorVariant, Customization, JsonFileCartRepository, Money, Product, VariantSelector};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: Uuid, pub name: String, pub slug: String, pub description: Option<String>,
    pub price: i64, pub compare_at_price: Option<i64>, pub currency: String,
    pub category_id: Option<Uuid>, pub rating: f64, pub review_count: i32,
    pub colors: sqlx::types::Json<Vec<ColorVariant>>, pub status: String,
    pub created_at: DateTime<Utc>, pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id.to_string(),
            name: r.name,
            slug: r.slug,
            description: r.description.unwrap_or_default(),
            price: Money::from_cents(r.price, &r.currency),
            compare_at_price: r.compare_at_price.map(|c| Money::from_cents(c, &r.currency)),
            rating: r.rating as f32,
            review_count: r.review_count.max(0) as u32,
            colors: r.colors.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category { pub id: Uuid, pub name: String, pub slug: String, pub description: Option<String>, pub image_url: Option<String>, pub created_at: DateTime<Utc> }

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: Uuid, pub code: String, pub kind: String, pub value: i64,
    pub min_subtotal: Option<i64>, pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>, pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage { pub id: Uuid, pub name: String, pub email: String, pub subject: Option<String>, pub body: String, pub is_read: bool, pub created_at: DateTime<Utc> }

/// Session carts live in one JSON file each under `cart_dir`, the server-side
/// stand-in for the browser's storage key; they never touch Postgres. The
/// file is the authoritative store: nothing is cached per session, so the
/// process footprint does not grow with the number of session ids presented.
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub cart_dir: PathBuf,
    pub cart_lock: Arc<Mutex<()>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let db = PgPoolOptions::new().max_connections(10).connect(&std::env::var("DATABASE_URL")?).await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    let cart_dir = PathBuf::from(std::env::var("CART_DATA_DIR").unwrap_or_else(|_| "./data/carts".to_string()));
    let state = AppState { db, cart_dir, cart_lock: Arc::new(Mutex::new(())) };

    let app = Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "casalogy-storefront"})) }))
        .route("/api/products", get(list_products))
        .route("/api/products/:slug", get(get_product))
        .route("/api/products/category/:slug", get(category_products))
        .route("/api/cart/:session", get(get_cart).post(add_to_cart).delete(clear_cart))
        .route("/api/cart/:session/items/:id", put(update_cart_item).delete(remove_cart_item))
        .route("/api/coupons/validate", post(validate_coupon))
        .route("/api/messages", post(create_message))
        .route("/api/admin/categories", get(list_categories).post(create_category))
        .route("/api/admin/categories/:id", get(get_category).put(update_category).delete(delete_category))
        .route("/api/admin/coupons", get(list_coupons).post(create_coupon))
        .route("/api/admin/coupons/:id", delete(delete_coupon))
        .route("/api/admin/messages", get(list_messages))
        .route("/api/admin/messages/:id/read", put(mark_message_read))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8083".to_string());
    tracing::info!("Casalogy storefront listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams { pub page: Option<u32>, pub per_page: Option<u32>, pub search: Option<String> }

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> { pub data: Vec<T>, pub total: i64, pub page: u32 }

// Widen before multiplying: page is client-controlled and u32 arithmetic
// would overflow at large page numbers.
fn page_offset(page: u32, per_page: u32) -> i64 { (page as i64 - 1) * per_page as i64 }

async fn list_products(State(s): State<AppState>, Query(p): Query<ListParams>) -> Result<Json<PaginatedResponse<Product>>, (StatusCode, String)> {
    let page = p.page.unwrap_or(1).max(1); let per_page = p.per_page.unwrap_or(20).min(100);
    let pattern = p.search.map(|q| format!("%{}%", q));
    let (rows, total): (Vec<ProductRow>, (i64,)) = if let Some(ref pattern) = pattern {
        (sqlx::query_as("SELECT * FROM products WHERE status = 'active' AND name ILIKE $3 ORDER BY created_at DESC LIMIT $1 OFFSET $2")
            .bind(per_page as i64).bind(page_offset(page, per_page)).bind(pattern).fetch_all(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?,
         sqlx::query_as("SELECT COUNT(*) FROM products WHERE status = 'active' AND name ILIKE $1")
            .bind(pattern).fetch_one(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?)
    } else {
        (sqlx::query_as("SELECT * FROM products WHERE status = 'active' ORDER BY created_at DESC LIMIT $1 OFFSET $2")
            .bind(per_page as i64).bind(page_offset(page, per_page)).fetch_all(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?,
         sqlx::query_as("SELECT COUNT(*) FROM products WHERE status = 'active'")
            .fetch_one(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?)
    };
    Ok(Json(PaginatedResponse { data: rows.into_iter().map(Product::from).collect(), total: total.0, page }))
}

async fn fetch_product_by_slug(s: &AppState, slug: &str) -> Result<Option<ProductRow>, (StatusCode, String)> {
    sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE slug = $1 AND status = 'active'")
        .bind(slug).fetch_optional(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

async fn get_product(State(s): State<AppState>, Path(slug): Path<String>) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let row = fetch_product_by_slug(&s, &slug).await?.ok_or((StatusCode::NOT_FOUND, "Product not found".to_string()))?;
    Ok(Json(serde_json::json!({"product": Product::from(row)})))
}

async fn category_products(State(s): State<AppState>, Path(slug): Path<String>) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE slug = $1")
        .bind(&slug).fetch_optional(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::NOT_FOUND, "Category not found".to_string()))?;
    let rows = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE category_id = $1 AND status = 'active' ORDER BY created_at DESC")
        .bind(category.id).fetch_all(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let products: Vec<Product> = rows.into_iter().map(Product::from).collect();
    Ok(Json(serde_json::json!({"category": category, "products": products})))
}

// =============================================================================
// Session carts
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView { pub items: Vec<casalogy_storefront::CartLineItem>, pub item_count: u32, pub total_amount: Decimal }

impl CartView {
    fn of(cart: &CartStore) -> Self {
        Self { items: cart.items().to_vec(), item_count: cart.item_count(), total_amount: cart.display_total() }
    }
}

fn check_session(session: &str) -> Result<(), (StatusCode, String)> {
    if !session.is_empty() && session.len() <= 64 && session.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        Ok(())
    } else {
        Err((StatusCode::BAD_REQUEST, "Invalid session id".to_string()))
    }
}

// Hydrate-mutate-persist per request; the lock serializes concurrent writers
// against the same file tree.
fn with_cart<T>(s: &AppState, session: &str, f: impl FnOnce(&mut CartStore) -> T) -> T {
    let _guard = s.cart_lock.lock().unwrap();
    let mut cart = open_session_cart(&s.cart_dir, session);
    f(&mut cart)
}

fn open_session_cart(cart_dir: &std::path::Path, session: &str) -> CartStore {
    CartStore::open(Box::new(JsonFileCartRepository::new(cart_dir.join(format!("{}.json", session)))))
}

async fn get_cart(State(s): State<AppState>, Path(session): Path<String>) -> Result<Json<CartView>, (StatusCode, String)> {
    check_session(&session)?;
    Ok(Json(with_cart(&s, &session, |cart| CartView::of(cart))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_slug: String,
    pub color: String,
    pub size: String,
    pub quantity: u32,
    pub customization: Option<Customization>,
}

async fn add_to_cart(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<AddToCartRequest>) -> Result<(StatusCode, Json<CartView>), (StatusCode, String)> {
    check_session(&session)?;
    let row = fetch_product_by_slug(&s, &r.product_slug).await?.ok_or((StatusCode::NOT_FOUND, "Product not found".to_string()))?;

    // Live stock is re-checked here; stale quantities are rejected, not clamped.
    let mut selector = VariantSelector::new(Product::from(row));
    selector.change_color_named(&r.color).map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    selector.select_size(&r.size).map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    selector.set_customization(r.customization);
    let spec = selector.line_spec_for(r.quantity).map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let view = with_cart(&s, &session, |cart| { cart.add_item(spec); cart.take_events(); CartView::of(cart) });
    Ok((StatusCode::CREATED, Json(view)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest { pub quantity: u32 }

async fn update_cart_item(State(s): State<AppState>, Path((session, id)): Path<(String, String)>, Json(r): Json<UpdateQuantityRequest>) -> Result<Json<CartView>, (StatusCode, String)> {
    check_session(&session)?;
    Ok(Json(with_cart(&s, &session, |cart| { cart.update_quantity(&id, r.quantity); cart.take_events(); CartView::of(cart) })))
}

async fn remove_cart_item(State(s): State<AppState>, Path((session, id)): Path<(String, String)>) -> Result<Json<CartView>, (StatusCode, String)> {
    check_session(&session)?;
    Ok(Json(with_cart(&s, &session, |cart| { cart.remove_item(&id); cart.take_events(); CartView::of(cart) })))
}

async fn clear_cart(State(s): State<AppState>, Path(session): Path<String>) -> Result<StatusCode, (StatusCode, String)> {
    check_session(&session)?;
    with_cart(&s, &session, |cart| { cart.clear(); cart.take_events(); });
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Categories (admin)
// =============================================================================

async fn list_categories(State(s): State<AppState>) -> Result<Json<Vec<Category>>, (StatusCode, String)> {
    let cats = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name").fetch_all(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(cats))
}

async fn get_category(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Category>, (StatusCode, String)> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1").bind(id).fetch_optional(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?.map(Json).ok_or((StatusCode::NOT_FOUND, "Category not found".to_string()))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

// Slugs always derive from the current name; a rename re-slugs the category.
fn slugify(name: &str) -> String { name.to_lowercase().replace(' ', "-") }

async fn create_category(State(s): State<AppState>, Json(r): Json<CreateCategoryRequest>) -> Result<(StatusCode, Json<Category>), (StatusCode, String)> {
    r.validate().map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let slug = slugify(&r.name);
    let c = sqlx::query_as::<_, Category>("INSERT INTO categories (id, name, slug, description, image_url, created_at) VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING *")
        .bind(Uuid::now_v7()).bind(&r.name).bind(&slug).bind(&r.description).bind(&r.image_url)
        .fetch_one(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok((StatusCode::CREATED, Json(c)))
}

async fn update_category(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<CreateCategoryRequest>) -> Result<Json<Category>, (StatusCode, String)> {
    r.validate().map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let c = sqlx::query_as::<_, Category>("UPDATE categories SET name = $2, slug = $3, description = $4, image_url = $5 WHERE id = $1 RETURNING *")
        .bind(id).bind(&r.name).bind(slugify(&r.name)).bind(&r.description).bind(&r.image_url)
        .fetch_optional(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?.ok_or((StatusCode::NOT_FOUND, "Category not found".to_string()))?;
    Ok(Json(c))
}

async fn delete_category(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, (StatusCode, String)> {
    sqlx::query("DELETE FROM categories WHERE id = $1").bind(id).execute(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Coupons
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponRequest {
    #[validate(length(min = 3, max = 32))]
    pub code: Option<String>,
    /// "percent" or "fixed"
    pub kind: String,
    #[validate(range(min = 1))]
    pub value: i64,
    pub min_subtotal: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}

async fn list_coupons(State(s): State<AppState>) -> Result<Json<Vec<Coupon>>, (StatusCode, String)> {
    let coupons = sqlx::query_as::<_, Coupon>("SELECT * FROM coupons ORDER BY created_at DESC").fetch_all(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(coupons))
}

async fn create_coupon(State(s): State<AppState>, Json(r): Json<CreateCouponRequest>) -> Result<(StatusCode, Json<Coupon>), (StatusCode, String)> {
    r.validate().map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    if r.kind != "percent" && r.kind != "fixed" {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "Coupon kind must be 'percent' or 'fixed'".to_string()));
    }
    if r.kind == "percent" && r.value > 100 {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "Percent coupons cannot exceed 100".to_string()));
    }
    let code = r.code.map(|c| c.to_uppercase()).unwrap_or_else(|| format!("CAS-{:06}", rand::random::<u32>() % 1_000_000));
    let c = sqlx::query_as::<_, Coupon>("INSERT INTO coupons (id, code, kind, value, min_subtotal, is_active, expires_at, created_at) VALUES ($1, $2, $3, $4, $5, TRUE, $6, NOW()) RETURNING *")
        .bind(Uuid::now_v7()).bind(&code).bind(&r.kind).bind(r.value).bind(r.min_subtotal).bind(r.expires_at)
        .fetch_one(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok((StatusCode::CREATED, Json(c)))
}

async fn delete_coupon(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, (StatusCode, String)> {
    sqlx::query("UPDATE coupons SET is_active = FALSE WHERE id = $1").bind(id).execute(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponRequest { pub code: String, pub subtotal: Decimal }

async fn validate_coupon(State(s): State<AppState>, Json(r): Json<ValidateCouponRequest>) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let coupon = sqlx::query_as::<_, Coupon>("SELECT * FROM coupons WHERE code = $1")
        .bind(r.code.to_uppercase()).fetch_optional(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::NOT_FOUND, "Coupon not found".to_string()))?;
    if let Some(reason) = coupon_rejection(&coupon, r.subtotal) {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, reason));
    }
    let discount = coupon_discount(&coupon, r.subtotal);
    Ok(Json(serde_json::json!({"valid": true, "code": coupon.code, "discount": discount})))
}

fn coupon_rejection(coupon: &Coupon, subtotal: Decimal) -> Option<String> {
    if !coupon.is_active {
        return Some("Coupon is no longer active".to_string());
    }
    if coupon.expires_at.is_some_and(|at| at < Utc::now()) {
        return Some("Coupon has expired".to_string());
    }
    if let Some(min) = coupon.min_subtotal {
        let min = Decimal::new(min, 2);
        if subtotal < min {
            return Some(format!("Order subtotal must be at least {}", min));
        }
    }
    None
}

/// Discount never exceeds the subtotal; two decimals, display precision.
fn coupon_discount(coupon: &Coupon, subtotal: Decimal) -> Decimal {
    let raw = match coupon.kind.as_str() {
        "percent" => subtotal * Decimal::new(coupon.value, 0) / Decimal::new(100, 0),
        _ => Decimal::new(coupon.value, 2),
    };
    raw.min(subtotal).round_dp(2)
}

// =============================================================================
// Contact messages
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 200))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}

async fn create_message(State(s): State<AppState>, Json(r): Json<CreateMessageRequest>) -> Result<(StatusCode, Json<ContactMessage>), (StatusCode, String)> {
    r.validate().map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let m = sqlx::query_as::<_, ContactMessage>("INSERT INTO messages (id, name, email, subject, body, is_read, created_at) VALUES ($1, $2, $3, $4, $5, FALSE, NOW()) RETURNING *")
        .bind(Uuid::now_v7()).bind(&r.name).bind(&r.email).bind(&r.subject).bind(&r.body)
        .fetch_one(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok((StatusCode::CREATED, Json(m)))
}

async fn list_messages(State(s): State<AppState>) -> Result<Json<Vec<ContactMessage>>, (StatusCode, String)> {
    let messages = sqlx::query_as::<_, ContactMessage>("SELECT * FROM messages ORDER BY created_at DESC").fetch_all(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(messages))
}

async fn mark_message_read(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<ContactMessage>, (StatusCode, String)> {
    sqlx::query_as::<_, ContactMessage>("UPDATE messages SET is_read = TRUE WHERE id = $1 RETURNING *")
        .bind(id).fetch_optional(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?.map(Json).ok_or((StatusCode::NOT_FOUND, "Message not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use casalogy_storefront::{AddItemSpec, Money};

    fn scrub_spec() -> AddItemSpec {
        AddItemSpec {
            product_id: "P1".into(),
            product_name: "Classic Scrub Top".into(),
            product_slug: "classic-scrub-top".into(),
            price: Money::from_cents(4500, "USD"),
            color: "Navy".into(),
            size: "M".into(),
            quantity: 2,
            image: None,
            max_quantity: 5,
            customization: None,
        }
    }

    #[test]
    fn test_session_cart_state_lives_in_the_file_only() {
        let dir = tempfile::tempdir().unwrap();

        let mut cart = open_session_cart(dir.path(), "tab-a");
        cart.add_item(scrub_spec());
        drop(cart);

        // a fresh open per request sees the persisted lines
        let cart = open_session_cart(dir.path(), "tab-a");
        assert_eq!(cart.item_count(), 2);

        // the file is authoritative: once it is gone, so is the cart
        std::fs::remove_file(dir.path().join("tab-a.json")).unwrap();
        let cart = open_session_cart(dir.path(), "tab-a");
        assert!(cart.is_empty());

        // distinct sessions leave nothing behind but their own file
        open_session_cart(dir.path(), "tab-b");
        assert!(!dir.path().join("tab-b.json").exists());
    }

    #[test]
    fn test_page_offset_does_not_overflow() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
        assert_eq!(page_offset(u32::MAX, 100), (u32::MAX as i64 - 1) * 100);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Scrub Tops"), "scrub-tops");
        assert_eq!(slugify("Lab Coats & More"), "lab-coats-&-more");
    }

    fn coupon(kind: &str, value: i64, min_subtotal: Option<i64>, expires_at: Option<DateTime<Utc>>) -> Coupon {
        Coupon {
            id: Uuid::now_v7(), code: "CAS-WELCOME".into(), kind: kind.into(), value,
            min_subtotal, is_active: true, expires_at, created_at: Utc::now(),
        }
    }

    #[test]
    fn test_percent_discount() {
        let c = coupon("percent", 15, None, None);
        assert_eq!(coupon_discount(&c, Decimal::new(20000, 2)), Decimal::new(3000, 2));
    }

    #[test]
    fn test_fixed_discount_capped_at_subtotal() {
        let c = coupon("fixed", 5000, None, None);
        assert_eq!(coupon_discount(&c, Decimal::new(3000, 2)), Decimal::new(3000, 2));
    }

    #[test]
    fn test_expired_coupon_rejected() {
        let c = coupon("percent", 10, None, Some(Utc::now() - chrono::Duration::days(1)));
        assert!(coupon_rejection(&c, Decimal::new(10000, 2)).is_some());
    }

    #[test]
    fn test_minimum_subtotal_enforced() {
        let c = coupon("percent", 10, Some(5000), None);
        assert!(coupon_rejection(&c, Decimal::new(4999, 2)).is_some());
        assert!(coupon_rejection(&c, Decimal::new(5000, 2)).is_none());
    }

    #[test]
    fn test_session_id_check() {
        assert!(check_session("tab-a1B2_c3").is_ok());
        assert!(check_session("").is_err());
        assert!(check_session("../etc/passwd").is_err());
        assert!(check_session(&"x".repeat(65)).is_err());
    }
}
