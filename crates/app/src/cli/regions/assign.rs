use std::{path::PathBuf, sync::Arc};

use clap::Args;
use loyalty_app::{
    database::{self, Db},
    domain::{
        regions::Region,
        users::{PgUsersService, UsersService, UsersServiceError},
    },
    notifications::{DisabledMailer, Notifier},
};
use rustc_hash::FxHashMap;

#[derive(Debug, Args)]
pub(crate) struct AssignRegionsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// JSON object mapping user email to region code
    #[arg(long)]
    map: PathBuf,
}

/// Outcome of one `email -> region` line.
#[derive(Debug, PartialEq, Eq)]
enum Assignment {
    Assigned,
    InvalidRegion(String),
    UnknownRegion,
    UnknownUser,
    Failed(String),
}

impl Assignment {
    fn describe(&self) -> String {
        match self {
            Self::Assigned => "assigned".to_string(),
            Self::InvalidRegion(reason) => format!("skipped, invalid region: {reason}"),
            Self::UnknownRegion => "skipped, region has no points configuration".to_string(),
            Self::UnknownUser => "skipped, no user with this email".to_string(),
            Self::Failed(reason) => format!("failed: {reason}"),
        }
    }
}

/// Parse the mapping file, returning entries in a stable order.
fn parse_map(raw: &str) -> Result<Vec<(String, String)>, String> {
    let map: FxHashMap<String, String> =
        serde_json::from_str(raw).map_err(|error| format!("invalid region map: {error}"))?;

    let mut entries: Vec<_> = map.into_iter().collect();
    entries.sort();

    Ok(entries)
}

async fn assign(service: &dyn UsersService, email: &str, raw_region: &str) -> Assignment {
    let region = match Region::parse(raw_region) {
        Ok(region) => region,
        Err(error) => return Assignment::InvalidRegion(error.to_string()),
    };

    match service.assign_region(email, &region).await {
        Ok(_) => Assignment::Assigned,
        Err(UsersServiceError::UnknownRegion) => Assignment::UnknownRegion,
        Err(UsersServiceError::NotFound) => Assignment::UnknownUser,
        Err(error) => Assignment::Failed(error.to_string()),
    }
}

pub(crate) async fn run(args: AssignRegionsArgs) -> Result<(), String> {
    let raw = tokio::fs::read_to_string(&args.map)
        .await
        .map_err(|error| format!("failed to read {}: {error}", args.map.display()))?;

    let entries = parse_map(&raw)?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgUsersService::new(Db::new(pool), Notifier::new(Arc::new(DisabledMailer), ""));

    let mut assigned = 0_usize;

    for (email, region) in &entries {
        let outcome = assign(&service, email, region).await;

        if outcome == Assignment::Assigned {
            assigned += 1;
        }

        println!("{email} -> {region}: {}", outcome.describe());
    }

    println!("{assigned} of {} users assigned", entries.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use loyalty_app::domain::users::{MockUsersService, records::UserRecord};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_map_sorts_entries() -> TestResult {
        let entries = parse_map(r#"{"b@example.com": "south", "a@example.com": "North"}"#)?;

        assert_eq!(
            entries,
            vec![
                ("a@example.com".to_string(), "North".to_string()),
                ("b@example.com".to_string(), "south".to_string()),
            ]
        );

        Ok(())
    }

    #[test]
    fn parse_map_rejects_non_objects() {
        assert!(parse_map("[1, 2]").is_err());
    }

    #[tokio::test]
    async fn invalid_regions_never_reach_the_service() {
        let mut service = MockUsersService::new();
        service.expect_assign_region().never();

        let outcome = assign(&service, "a@example.com", "latam/south").await;

        assert!(matches!(outcome, Assignment::InvalidRegion(_)));
    }

    #[tokio::test]
    async fn unknown_users_and_regions_are_reported() {
        let mut service = MockUsersService::new();
        service
            .expect_assign_region()
            .returning(|email, _| match email {
                "ghost@example.com" => Err(UsersServiceError::NotFound),
                _ => Err(UsersServiceError::UnknownRegion),
            });

        assert_eq!(
            assign(&service, "ghost@example.com", "north").await,
            Assignment::UnknownUser
        );
        assert_eq!(
            assign(&service, "a@example.com", "atlantis").await,
            Assignment::UnknownRegion
        );
    }

    #[tokio::test]
    async fn other_failures_are_reported() {
        let mut service = MockUsersService::new();
        service.expect_assign_region().returning(|_, _| {
            Err::<UserRecord, _>(UsersServiceError::MissingRequiredData)
        });

        assert!(matches!(
            assign(&service, "a@example.com", "north").await,
            Assignment::Failed(_)
        ));
    }
}
