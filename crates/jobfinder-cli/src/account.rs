//! Account commands: signup, login, logout, whoami and profile edits.

use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use jobfinder_api::{LoginRequest, ProfileUpdate, SignupRequest};
use jobfinder_app_state::{AppContext, AppError};

#[derive(Args, Debug)]
pub struct SignupArgs {
    #[arg(long)]
    email: String,

    #[arg(long, env = "JOBFINDER_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long)]
    zip_code: String,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    email: String,

    #[arg(long, env = "JOBFINDER_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Change profile fields; anything not given is kept
    Update(ProfileArgs),
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    summary: Option<String>,

    /// Replace the skill list (repeat for several)
    #[arg(long = "skill")]
    skills: Vec<String>,
}

impl From<ProfileArgs> for ProfileUpdate {
    fn from(args: ProfileArgs) -> Self {
        let skills = (!args.skills.is_empty()).then(|| args.skills.into_iter().collect::<BTreeSet<_>>());
        ProfileUpdate {
            first_name: args.first_name,
            last_name: args.last_name,
            title: args.title,
            location: args.location,
            phone: args.phone,
            summary: args.summary,
            skills,
            ..ProfileUpdate::default()
        }
    }
}

pub async fn signup(context: &AppContext, args: SignupArgs) -> Result<()> {
    let request = SignupRequest {
        email: args.email,
        password: args.password,
        zip_code: args.zip_code,
    };
    match context.signup(&request).await? {
        Some(user) => {
            context
                .notifications()
                .success(format!("Account created; logged in as {}", user.email));
        }
        None => {
            context
                .notifications()
                .success("Account created; run `jobfinder login` to sign in");
        }
    }
    Ok(())
}

pub async fn login(context: &AppContext, args: LoginArgs) -> Result<()> {
    let request = LoginRequest {
        email: args.email,
        password: args.password,
    };
    let user = context.login(&request).await?;

    let notifications = context.notifications();
    notifications.success(format!("Logged in as {}", user.email));
    if user.is_admin {
        notifications.info("Administrator account");
    }
    let subscription = context.subscription().current();
    if subscription.is_paid {
        notifications.info(format!("Plan: {}", subscription.plan));
    }
    Ok(())
}

pub fn logout(context: &AppContext) -> Result<()> {
    let was_logged_in = context.session().is_logged_in();
    context.logout();
    if was_logged_in {
        context.notifications().success("Logged out");
    } else {
        context.notifications().info("No active session");
    }
    Ok(())
}

pub fn whoami(context: &AppContext) -> Result<()> {
    let Some(user) = context.session().current() else {
        bail!(AppError::NotAuthenticated);
    };
    let rendered = serde_json::to_string_pretty(&user).context("failed to render user")?;
    println!("{rendered}");
    Ok(())
}

pub fn profile(context: &AppContext, command: ProfileCommands) -> Result<()> {
    match command {
        ProfileCommands::Update(args) => {
            let update = ProfileUpdate::from(args);
            if update.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            if !context.session().is_logged_in() {
                bail!(AppError::NotAuthenticated);
            }
            context.update_profile(update)?;
            context.notifications().success("Profile updated");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_args_map_to_partial_update() {
        let args = ProfileArgs {
            first_name: None,
            last_name: None,
            title: Some("Welder".into()),
            location: None,
            phone: None,
            summary: None,
            skills: vec!["tig".into(), "mig".into(), "tig".into()],
        };
        let update = ProfileUpdate::from(args);

        assert_eq!(update.title.as_deref(), Some("Welder"));
        assert_eq!(update.first_name, None);
        assert_eq!(
            update.skills,
            Some(BTreeSet::from(["mig".to_string(), "tig".to_string()]))
        );
    }

    #[test]
    fn no_flags_means_empty_update() {
        let args = ProfileArgs {
            first_name: None,
            last_name: None,
            title: None,
            location: None,
            phone: None,
            summary: None,
            skills: Vec::new(),
        };
        assert!(ProfileUpdate::from(args).is_empty());
    }
}
