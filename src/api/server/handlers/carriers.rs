use axum::extract::{Extension, Json, Path};
use uuid::Uuid;

use crate::{
    api::interface::DynAPI,
    auth::User,
    entities::{Carrier, CarrierForm},
    error::Error,
};

pub async fn list(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<Vec<Carrier>>, Error> {
    let carriers = api.list_carriers(user).await?;

    Ok(carriers.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Carrier>, Error> {
    let carrier = api.find_carrier(user, id).await?;

    Ok(carrier.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(params): Json<CarrierForm>,
) -> Result<Json<Carrier>, Error> {
    let carrier = api.update_carrier(user, id, params).await?;

    Ok(carrier.into())
}

pub async fn remove(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, Error> {
    api.remove_carrier(user, id).await?;

    Ok(().into())
}
