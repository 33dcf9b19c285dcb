//! App Router

use salvo::Router;

use crate::{
    auth, deals, points, points_config, redemptions, reports, rewards, support_tickets, users,
};

/// Everything under `/api`. Only the auth bootstrap routes skip bearer authentication.
pub(crate) fn api_router() -> Router {
    Router::with_path("api")
        .push(public_router())
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(member_router())
                .push(admin_router()),
        )
}

fn public_router() -> Router {
    Router::with_path("auth")
        .push(Router::with_path("register").post(auth::register::handler))
        .push(Router::with_path("login").post(auth::login::handler))
        .push(Router::with_path("invites/{token}").get(auth::invites::verify))
        .push(Router::with_path("register-with-token").post(auth::invites::register))
        .push(
            Router::with_path("password-reset")
                .post(auth::password_reset::request)
                .push(Router::with_path("confirm").post(auth::password_reset::confirm)),
        )
}

fn member_router() -> Router {
    Router::new()
        .push(Router::with_path("auth/logout").post(auth::logout::handler))
        .push(Router::with_path("auth/me").get(auth::me::handler))
        .push(
            Router::with_path("deals")
                .get(deals::index::handler)
                .post(deals::create::handler)
                .push(
                    Router::with_path("{deal}")
                        .get(deals::get::handler)
                        .put(deals::update::handler),
                ),
        )
        .push(
            Router::with_path("rewards")
                .get(rewards::index::handler)
                .push(
                    Router::with_path("{reward}")
                        .get(rewards::get::handler)
                        .push(Router::with_path("redeem").post(rewards::redeem::handler)),
                ),
        )
        .push(Router::with_path("redemptions").get(redemptions::index::handler))
        .push(
            Router::with_path("points")
                .get(points::balance::handler)
                .push(Router::with_path("history").get(points::history::handler)),
        )
        .push(
            Router::with_path("support-tickets")
                .get(support_tickets::index::handler)
                .post(support_tickets::create::handler),
        )
}

fn admin_router() -> Router {
    Router::with_path("admin")
        .push(
            Router::with_path("users")
                .get(users::index::handler)
                .push(Router::with_path("invite").post(users::invite::handler))
                .push(
                    Router::with_path("{user}")
                        .patch(users::update::handler)
                        .push(Router::with_path("approve").post(users::approve::handler))
                        .push(Router::with_path("reject").post(users::reject::handler)),
                ),
        )
        .push(
            Router::with_path("deals")
                .get(deals::admin_index::handler)
                .push(
                    Router::with_path("{deal}")
                        .push(Router::with_path("approve").post(deals::approve::handler))
                        .push(Router::with_path("reject").post(deals::reject::handler)),
                ),
        )
        .push(
            Router::with_path("rewards")
                .post(rewards::create::handler)
                .push(Router::with_path("{reward}").put(rewards::update::handler)),
        )
        .push(
            Router::with_path("redemptions")
                .get(redemptions::admin_index::handler)
                .push(Router::with_path("{redemption}").patch(redemptions::update::handler)),
        )
        .push(Router::with_path("points/adjustments").post(points::adjust::handler))
        .push(
            Router::with_path("points-config")
                .get(points_config::index::handler)
                .push(
                    Router::with_path("{region}")
                        .get(points_config::get::handler)
                        .patch(points_config::update::handler),
                ),
        )
        .push(
            Router::with_path("support-tickets")
                .get(support_tickets::admin_index::handler)
                .push(Router::with_path("{ticket}").patch(support_tickets::update::handler)),
        )
        .push(Router::with_path("reports/summary").get(reports::summary::handler))
}
