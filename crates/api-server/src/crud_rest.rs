//! Pass-through CRUD endpoints for identity-keyed tables.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use custlysis_core::CustlysisError;
use custlysis_store::{Entity, Repository};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::rest::{store_error, ApiError};

/// A record exposed over REST under `/<base>` and `/<base>/:id`.
pub trait RestEntity: Entity<Key = i64> + Serialize + DeserializeOwned {}

impl<E> RestEntity for E where E: Entity<Key = i64> + Serialize + DeserializeOwned {}

type Repo<E> = State<Arc<Repository<E>>>;

/// GET list, POST create, GET/PUT/DELETE by id.
pub fn crud_router<E: RestEntity>(base: &str, repo: Arc<Repository<E>>) -> Router {
    Router::new()
        .route(base, get(list::<E>).post(create::<E>))
        .route(
            &format!("{base}/:id"),
            get(fetch::<E>).put(update::<E>).delete(remove::<E>),
        )
        .with_state(repo)
}

async fn list<E: RestEntity>(State(repo): Repo<E>) -> Json<Vec<E>> {
    Json(repo.find_all())
}

async fn fetch<E: RestEntity>(State(repo): Repo<E>, Path(id): Path<i64>) -> Result<Json<E>, StatusCode> {
    repo.find_by_id(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create<E: RestEntity>(
    State(repo): Repo<E>,
    Json(entity): Json<E>,
) -> Result<(StatusCode, Json<E>), ApiError> {
    let saved = repo.save(entity).map_err(store_error)?;
    metrics::counter!("store.records.created", "entity" => E::NAME).increment(1);
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update<E: RestEntity>(
    State(repo): Repo<E>,
    Path(id): Path<i64>,
    Json(entity): Json<E>,
) -> Result<Json<E>, ApiError> {
    match repo.update(&id, entity).map_err(store_error)? {
        Some(saved) => Ok(Json(saved)),
        None => Err(store_error(CustlysisError::NotFound {
            entity: E::NAME,
            key: id.to_string(),
        })),
    }
}

async fn remove<E: RestEntity>(State(repo): Repo<E>, Path(id): Path<i64>) -> StatusCode {
    if repo.delete_by_id(&id) {
        metrics::counter!("store.records.deleted", "entity" => E::NAME).increment(1);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
