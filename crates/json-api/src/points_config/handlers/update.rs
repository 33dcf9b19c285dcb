//! Update Points Config Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use tracing::info;

use loyalty_app::domain::users::records::Role;

use crate::{
    extensions::*,
    points_config::{
        errors::into_status_error,
        models::{PointsConfigResponse, UpdatePointsConfigRequest, parse_region},
    },
    state::State,
};

/// Update Points Config Handler
///
/// Creates the region's configuration from defaults when it does not exist yet.
#[endpoint(
    tags("admin"),
    summary = "Update Points Configuration",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    region: PathParam<String>,
    json: JsonBody<UpdatePointsConfigRequest>,
    depot: &mut Depot,
) -> Result<Json<PointsConfigResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::RegionalAdmin)?;
    let region = parse_region(&region.into_inner())?;
    let update = json.into_inner().into_update()?;

    let config = state
        .app
        .points_config
        .update_config(principal, &region, update)
        .await
        .map_err(into_status_error)?;

    info!(region = %config.region, actor = %principal.user_uuid, "updated points configuration");

    Ok(Json(config.into()))
}
