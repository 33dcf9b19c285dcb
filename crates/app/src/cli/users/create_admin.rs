use std::sync::Arc;

use clap::Args;
use loyalty_app::{
    auth::PlainPassword,
    database::{self, Db},
    domain::{
        regions::Region,
        users::{PgUsersService, UsersService, data::NewAccount, records::Role},
    },
    notifications::{DisabledMailer, Notifier},
};

#[derive(Debug, Args)]
pub(crate) struct CreateAdminArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Login email address
    #[arg(long)]
    email: String,

    /// Login username
    #[arg(long)]
    username: String,

    /// Initial password
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: String,

    /// One of `regional_admin`, `admin` or `super_admin`
    #[arg(long, default_value = "super_admin")]
    role: Role,

    /// Region, required for regional admins
    #[arg(long)]
    region: Option<Region>,
}

pub(crate) async fn run(args: CreateAdminArgs) -> Result<(), String> {
    if args.role == Role::User {
        return Err(format!("{} is not an admin role", args.role));
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgUsersService::new(Db::new(pool), Notifier::new(Arc::new(DisabledMailer), ""));

    let user = service
        .create_account(NewAccount {
            email: args.email,
            username: args.username,
            password: PlainPassword::from(args.password),
            role: args.role,
            region: args.region,
        })
        .await
        .map_err(|error| format!("failed to create admin: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("email: {}", user.email);
    println!("role: {}", user.role);
    if let Some(region) = user.region {
        println!("region: {region}");
    }

    Ok(())
}
