use anyhow::{Context, Result, bail};
use clap::Subcommand;
use jobfinder_api::Plan;
use jobfinder_app_state::{AppContext, AppError};

#[derive(Subcommand, Debug)]
pub enum SubscriptionCommands {
    /// Refresh and show the current subscription
    Status,

    /// Start or change a paid plan
    Subscribe {
        /// monthly, quarterly or yearly
        #[arg(long)]
        plan: Plan,

        #[arg(long, default_value_t = 1)]
        months: u32,
    },
}

pub async fn run(context: &AppContext, command: SubscriptionCommands) -> Result<()> {
    if !context.session().is_logged_in() {
        bail!(AppError::NotAuthenticated);
    }
    match command {
        SubscriptionCommands::Status => status(context).await,
        SubscriptionCommands::Subscribe { plan, months } => subscribe(context, plan, months).await,
    }
}

async fn status(context: &AppContext) -> Result<()> {
    let is_paid = context.refresh_subscription().await;
    let subscription = context.subscription().current();
    let rendered =
        serde_json::to_string_pretty(&subscription).context("failed to render subscription")?;
    println!("{rendered}");

    if is_paid {
        context
            .notifications()
            .info(format!("Paid plan: {}", subscription.plan));
    } else {
        context.notifications().info("Free plan");
    }
    Ok(())
}

async fn subscribe(context: &AppContext, plan: Plan, months: u32) -> Result<()> {
    if plan == Plan::Free {
        bail!("choose a paid plan: monthly, quarterly or yearly");
    }
    if months == 0 {
        bail!("--months must be at least 1");
    }
    let subscription = context.subscribe(plan, months).await?;
    context.notifications().success(format!(
        "Subscribed to the {} plan ({:?})",
        subscription.plan, subscription.status
    ));
    Ok(())
}
