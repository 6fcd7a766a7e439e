//! RBAC audit tool for the merchant dashboard.
//!
//! Prints the compiled role/permission taxonomy and explains individual
//! authorization decisions as JSON, answering "why was this denied?" without
//! running the dashboard.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;

use merchantdesk_auth::{MerchantOwnership, Permission, RbacRegistry, ResourceCheck, Role, User, explain};
use merchantdesk_core::MerchantId;

#[derive(Parser, Debug)]
#[command(name = "merchantdesk-audit", version, about = "Inspect the merchant dashboard RBAC table")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List roles, most privileged first, with their effective permissions.
    Roles,

    /// List permissions with their scope and the roles granting them.
    Permissions,

    /// Explain whether a user with the given role holds a permission.
    Explain {
        #[arg(long)]
        role: Role,

        /// Dotted permission name, e.g. `orders.edit`.
        #[arg(long)]
        permission: Permission,

        /// Merchant the synthetic user acts for.
        #[arg(long, env = "MERCHANTDESK_MERCHANT_ID")]
        merchant: Option<MerchantId>,

        /// Resource to scope the check to.
        #[arg(long, requires = "owner")]
        resource: Option<String>,

        /// Merchant owning `--resource`.
        #[arg(long, requires = "resource")]
        owner: Option<MerchantId>,
    },
}

fn run(command: Commands) -> anyhow::Result<Value> {
    let output = match command {
        Commands::Roles => serde_json::to_value(RbacRegistry::build().roles)?,
        Commands::Permissions => serde_json::to_value(RbacRegistry::build().permissions)?,
        Commands::Explain {
            role,
            permission,
            merchant,
            resource,
            owner,
        } => {
            let mut user = User::new(role);
            if let Some(merchant) = merchant {
                user = user.with_merchant(merchant);
            }

            let mut ownership = MerchantOwnership::new();
            if let (Some(resource), Some(owner)) = (&resource, owner) {
                ownership.insert(resource.clone(), owner);
            }
            let check = resource.as_deref().map(|id| ResourceCheck::new(id, &ownership));

            tracing::info!(%role, %permission, resource = resource.as_deref(), "explaining decision");
            serde_json::to_value(explain(Some(&user), permission, check))?
        }
    };
    Ok(output)
}

fn main() -> anyhow::Result<()> {
    merchantdesk_observability::init();

    let cli = Cli::parse();
    let output = run(cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output).context("failed to render output")?);
    Ok(())
}
