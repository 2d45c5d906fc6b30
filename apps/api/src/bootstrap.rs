use artcc_application::RoleGrantInput;
use artcc_core::{AppError, AppResult};
use artcc_domain::{RoleId, RoleScope, User};
use tracing::info;

use crate::api_config::BootstrapDirector;
use crate::state::AppState;

/// Ensures the configured controller exists and holds the division director
/// role. Nobody can grant that role through the API, so it is seeded here.
pub async fn seed_division_director(
    app_state: &AppState,
    director: &BootstrapDirector,
) -> AppResult<()> {
    ensure_seed_user(app_state, director).await?;

    let seeded = app_state
        .role_assignment_service
        .seed_role(RoleGrantInput {
            cid: director.cid,
            role: RoleId::DivisionDirector,
            scope: RoleScope::Division,
        })
        .await;

    match seeded {
        Ok(_) => {
            info!(cid = %director.cid, "division director seeded");
            Ok(())
        }
        Err(AppError::Conflict(_)) => {
            info!(cid = %director.cid, "division director already seeded");
            Ok(())
        }
        Err(error) => Err(error),
    }
}

async fn ensure_seed_user(app_state: &AppState, director: &BootstrapDirector) -> AppResult<()> {
    match app_state.directory_service.find_user(director.cid).await {
        Ok(_) => Ok(()),
        Err(AppError::NotFound(_)) => {
            let user = User::new(
                director.cid,
                director.first_name.as_str(),
                director.last_name.as_str(),
                None,
            )?;
            app_state.directory_service.seed_user(user).await?;
            Ok(())
        }
        Err(error) => Err(error),
    }
}
