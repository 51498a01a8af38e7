//! Minimal CLI parsing and the admin commands behind it.

use std::env;

use anyhow::{Context, Result, bail};
use chrono::Duration;

use crate::config::AppSecret;
use crate::db::Database;
use crate::graphql::issue_token;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Command {
    /// Run the HTTP server
    #[default]
    Serve,
    /// Print the GraphQL SDL and exit
    PrintSchema,
    /// Insert a user and print its id
    AddUser { name: String, email: String },
    /// Record a vote for a link
    AddVote { link_id: i32, user_id: i32 },
    /// Print a signed bearer token for a user
    IssueToken { user_id: i32, ttl_hours: Option<i64> },
}

impl Command {
    pub fn from_args() -> Result<Self> {
        Self::parse(env::args().skip(1))
    }

    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut command = Command::Serve;
        let mut ttl_hours = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--print-schema" => command = Command::PrintSchema,
                "--add-user" => {
                    let name = args.next().context("--add-user needs <name> <email>")?;
                    let email = args.next().context("--add-user needs <name> <email>")?;
                    command = Command::AddUser { name, email };
                }
                "--add-vote" => {
                    let link_id = args
                        .next()
                        .context("--add-vote needs <link-id> <user-id>")?
                        .parse()
                        .context("Invalid link id")?;
                    let user_id = args
                        .next()
                        .context("--add-vote needs <link-id> <user-id>")?
                        .parse()
                        .context("Invalid user id")?;
                    command = Command::AddVote { link_id, user_id };
                }
                "--issue-token" => {
                    let user_id = args
                        .next()
                        .context("--issue-token needs <user-id>")?
                        .parse()
                        .context("Invalid user id")?;
                    command = Command::IssueToken {
                        user_id,
                        ttl_hours: None,
                    };
                }
                "--ttl-hours" => {
                    let hours = args
                        .next()
                        .context("--ttl-hours needs <n>")?
                        .parse()
                        .context("Invalid --ttl-hours")?;
                    ttl_hours = Some(hours);
                }
                _ if arg.starts_with("--ttl-hours=") => {
                    let hours = arg
                        .split_once('=')
                        .map(|(_, v)| v)
                        .unwrap_or_default()
                        .parse()
                        .context("Invalid --ttl-hours")?;
                    ttl_hours = Some(hours);
                }
                other => bail!("Unknown argument: {}", other),
            }
        }

        if let Some(hours) = ttl_hours {
            match &mut command {
                Command::IssueToken { ttl_hours, .. } => *ttl_hours = Some(hours),
                _ => bail!("--ttl-hours only applies to --issue-token"),
            }
        }

        Ok(command)
    }
}

/// Sign a token for an existing user.
///
/// Fails if the user id is unknown, since every mutation made with such a
/// token would fail on the foreign key anyway.
pub async fn issue_user_token(
    db: &Database,
    secret: &AppSecret,
    user_id: i32,
    ttl_hours: Option<i64>,
) -> Result<String> {
    let user = db
        .users()
        .get_by_id(user_id)
        .await?
        .with_context(|| format!("No user with id {}", user_id))?;

    let token = issue_token(user.id, secret, ttl_hours.map(Duration::hours))
        .context("Failed to issue token")?;
    tracing::info!(user_id = user.id, "Token issued");

    Ok(token)
}
