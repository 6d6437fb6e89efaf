use axum::extract::{Extension, Json, Path};

use crate::{
    api::interface::{DynAPI, Tender},
    entities::{Bid, BidRow},
    error::Error,
};

// Public, unauthenticated surface: the access token in the path is the only
// credential.

pub async fn open(
    Extension(api): Extension<DynAPI>,
    Path(token): Path<String>,
) -> Result<Json<Tender>, Error> {
    let tender = api.open_tender(token).await?;

    Ok(tender.into())
}

pub async fn submit(
    Extension(api): Extension<DynAPI>,
    Path(token): Path<String>,
    Json(rows): Json<Vec<BidRow>>,
) -> Result<Json<Vec<Bid>>, Error> {
    let bids = api.submit_tender(token, rows).await?;

    Ok(bids.into())
}
