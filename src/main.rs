use actix_cors::Cors;
use actix_web::{get, post, put, web, App, HttpResponse, HttpServer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod balance;
mod chores;
mod config;
mod dashboard;
mod error;
mod exchange;
mod money;
mod schemas;
mod store;

use crate::balance::compute_user_balance;
use crate::config::Config;
use crate::dashboard::build_dashboard;
use crate::error::ApiError;
use crate::exchange::{pairwise_debts, settlement_plan};
use crate::schemas::{Chore, Contribution, Expense, Note, User};
use crate::store::HouseStore;

type SharedStore = web::Data<RwLock<HouseStore>>;

#[derive(Deserialize, Serialize)]
struct DisplayNameJson {
    display_name: String,
}

#[derive(Deserialize)]
struct DashboardQuery {
    now: Option<DateTime<Utc>>,
}

#[put("/users/{id}")]
async fn put_user(
    store: SharedStore,
    id: web::Path<String>,
    json: web::Json<DisplayNameJson>,
) -> Result<HttpResponse, ApiError> {
    let user = User {
        id: id.into_inner(),
        display_name: json.into_inner().display_name,
    };
    let user_id = user.id.clone();
    let created = store.write().await.upsert_user(user).map_err(|err| {
        tracing::warn!(user = %user_id, "rejected user: {}", err);
        err
    })?;
    tracing::info!(user = %user_id, created, "user saved");
    if created {
        Ok(HttpResponse::Created().body("User added"))
    } else {
        Ok(HttpResponse::Ok().body("User updated"))
    }
}

#[get("/users/{id}/balance")]
async fn get_balance(store: SharedStore, id: web::Path<String>) -> HttpResponse {
    let store = store.read().await;
    let balance = compute_user_balance(store.user(&id), store.expenses(), store.contributions());
    HttpResponse::Ok().json(balance)
}

#[get("/users/{id}/dashboard")]
async fn get_dashboard(
    store: SharedStore,
    id: web::Path<String>,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, ApiError> {
    let now = query.now.unwrap_or_else(Utc::now);
    let store = store.read().await;
    let dashboard = build_dashboard(store.dashboard_inputs(&id), now)?;
    Ok(HttpResponse::Ok().json(dashboard))
}

#[post("/expenses")]
async fn add_expense(
    store: SharedStore,
    expense: web::Json<Expense>,
) -> Result<HttpResponse, ApiError> {
    let expense = expense.into_inner();
    let expense_id = expense.id.clone();
    store.write().await.add_expense(expense).map_err(|err| {
        tracing::warn!(expense = %expense_id, "rejected expense: {}", err);
        err
    })?;
    tracing::info!(expense = %expense_id, "expense added");
    Ok(HttpResponse::Created().body("Expense added"))
}

#[post("/contributions")]
async fn add_contribution(
    store: SharedStore,
    contribution: web::Json<Contribution>,
) -> Result<HttpResponse, ApiError> {
    let contribution = contribution.into_inner();
    let contribution_id = contribution.id.clone();
    store
        .write()
        .await
        .add_contribution(contribution)
        .map_err(|err| {
            tracing::warn!(contribution = %contribution_id, "rejected contribution: {}", err);
            err
        })?;
    tracing::info!(contribution = %contribution_id, "contribution added");
    Ok(HttpResponse::Created().body("Contribution added"))
}

#[post("/chores")]
async fn add_chore(store: SharedStore, chore: web::Json<Chore>) -> Result<HttpResponse, ApiError> {
    let chore = chore.into_inner();
    let chore_id = chore.id.clone();
    store.write().await.add_chore(chore).map_err(|err| {
        tracing::warn!(chore = %chore_id, "rejected chore: {}", err);
        err
    })?;
    tracing::info!(chore = %chore_id, "chore added");
    Ok(HttpResponse::Created().body("Chore added"))
}

#[post("/notes")]
async fn add_note(store: SharedStore, note: web::Json<Note>) -> Result<HttpResponse, ApiError> {
    let note = note.into_inner();
    let note_id = note.id.clone();
    store.write().await.add_note(note).map_err(|err| {
        tracing::warn!(note = %note_id, "rejected note: {}", err);
        err
    })?;
    tracing::info!(note = %note_id, "note added");
    Ok(HttpResponse::Created().body("Note added"))
}

#[get("/ledger/debts")]
async fn get_debts(store: SharedStore) -> HttpResponse {
    let store = store.read().await;
    HttpResponse::Ok().json(pairwise_debts(store.expenses(), store.contributions()))
}

#[get("/ledger/settlement")]
async fn get_settlement(store: SharedStore) -> HttpResponse {
    let store = store.read().await;
    HttpResponse::Ok().json(settlement_plan(store.expenses(), store.contributions()))
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(put_user)
        .service(get_balance)
        .service(get_dashboard)
        .service(add_expense)
        .service(add_contribution)
        .service(add_chore)
        .service(add_note)
        .service(get_debts)
        .service(get_settlement);
}

fn cors(origin: Option<&str>) -> Cors {
    match origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header(),
        None => Cors::permissive(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "housemate=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
    match &config.house {
        Some(house) => tracing::info!(house = %house.name, "serving house"),
        None => tracing::info!("no house configured, every user will be asked to create or join one"),
    }

    let store = web::Data::new(RwLock::new(HouseStore::new(config.house.clone())));
    let cors_origin = config.cors_origin.clone();

    tracing::info!("Listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(cors(cors_origin.as_deref()))
            .app_data(store.clone())
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
