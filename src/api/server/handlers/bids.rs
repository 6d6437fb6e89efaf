use axum::extract::{Extension, Json, Path};
use uuid::Uuid;

use crate::{api::interface::DynAPI, auth::User, entities::Bid, error::Error};

pub async fn list(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Bid>>, Error> {
    let bids = api.list_bids(user, id).await?;

    Ok(bids.into())
}

pub async fn accept(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Bid>, Error> {
    let bid = api.accept_bid(user, id).await?;

    Ok(bid.into())
}

pub async fn accept_carrier(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path((rfp_id, carrier_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<Bid>>, Error> {
    let bids = api.accept_carrier_bids(user, rfp_id, carrier_id).await?;

    Ok(bids.into())
}
