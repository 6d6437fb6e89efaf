use axum::extract::{Extension, Json, Path};
use uuid::Uuid;

use crate::{
    api::interface::DynAPI,
    auth::User,
    entities::{Carrier, CarrierForm, Registration, RegistrationRequest},
    error::Error,
};

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(params): Json<RegistrationRequest>,
) -> Result<Json<Registration>, Error> {
    let registration = api.start_registration(user, params).await?;

    Ok(registration.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Registration>, Error> {
    let registration = api.find_registration(user, id).await?;

    Ok(registration.into())
}

pub async fn confirm(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(params): Json<CarrierForm>,
) -> Result<Json<Carrier>, Error> {
    let carrier = api.confirm_registration(user, id, params).await?;

    Ok(carrier.into())
}
