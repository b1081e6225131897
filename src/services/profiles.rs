use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::{
    changed_fields, CustomerProfileUpdate, MechanicProfileUpdate, MECHANIC_PROFILES_TABLE,
    USERS_TABLE,
};
use crate::services::store::{DataStore, Query};

pub async fn get_mechanic_profile(store: &dyn DataStore, mechanic_id: &str) -> Result<Value, AppError> {
    fetch_one(store, MECHANIC_PROFILES_TABLE, "user_id", mechanic_id, "mechanic profile").await
}

pub async fn update_mechanic_profile(
    store: &dyn DataStore,
    update: &MechanicProfileUpdate,
) -> Result<Value, AppError> {
    apply_update(
        store,
        MECHANIC_PROFILES_TABLE,
        "user_id",
        &update.mechanic_id,
        update,
        "mechanic profile",
    )
    .await
}

pub async fn get_customer_profile(store: &dyn DataStore, user_id: &str) -> Result<Value, AppError> {
    fetch_one(store, USERS_TABLE, "id", user_id, "customer profile").await
}

pub async fn update_customer_profile(
    store: &dyn DataStore,
    update: &CustomerProfileUpdate,
) -> Result<Value, AppError> {
    apply_update(store, USERS_TABLE, "id", &update.user_id, update, "customer profile").await
}

async fn fetch_one(
    store: &dyn DataStore,
    table: &str,
    key: &str,
    id: &str,
    what: &str,
) -> Result<Value, AppError> {
    store
        .select(&Query::table(table).eq(key, id))
        .await
        .map_err(AppError::store)?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("{what} {id}")))
}

async fn apply_update<T: Serialize>(
    store: &dyn DataStore,
    table: &str,
    key: &str,
    id: &str,
    update: &T,
    what: &str,
) -> Result<Value, AppError> {
    let changes = changed_fields(update).map_err(|e| AppError::BadRequest(e.to_string()))?;
    if changes.is_empty() {
        return Err(AppError::BadRequest(format!("no {what} fields to update")));
    }

    tracing::info!(table, id, fields = ?changes.keys().collect::<Vec<_>>(), "updating profile");

    store
        .update(&Query::table(table).eq(key, id), Value::Object(changes))
        .await
        .map_err(AppError::store)?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("{what} {id}")))
}
