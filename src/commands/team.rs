//! Team command - roster and membership changes.

use anyhow::Result;
use clap::{Args, Subcommand};

use expenseflow::access::role_label;
use expenseflow::store::Store;
use expenseflow::types::{MemberStatus, OrgRole};

use super::{open, print_org_header};

#[derive(Args)]
pub struct TeamCmd {
    #[command(subcommand)]
    pub command: Option<TeamSubCmd>,
}

#[derive(Subcommand)]
pub enum TeamSubCmd {
    /// List members (default)
    List,

    /// Invite someone by email
    Invite {
        email: String,
        #[arg(long, value_enum, default_value_t = OrgRole::Member)]
        role: OrgRole,
    },

    /// Change a member's role
    Role {
        user_id: String,
        #[arg(value_enum)]
        role: OrgRole,
    },

    /// Remove a member
    Remove { user_id: String },
}

impl TeamCmd {
    pub async fn run(&self, org: Option<&str>) -> Result<()> {
        let (_config, store) = open(org).await?;

        match self.command.as_ref().unwrap_or(&TeamSubCmd::List) {
            TeamSubCmd::List => list(&store),
            TeamSubCmd::Invite { email, role } => {
                let member = store.invite_member(email, *role).await?;
                println!("Invited {} as {}.", member.email, member.role);
            }
            TeamSubCmd::Role { user_id, role } => {
                let member = store.update_member_role(user_id, *role).await?;
                println!("{} is now {}.", member.name, member.role);
            }
            TeamSubCmd::Remove { user_id } => {
                store.remove_member(user_id).await?;
                println!("Removed {}.", user_id);
            }
        }

        Ok(())
    }
}

fn list(store: &Store) {
    print_org_header(store);

    store.with_state(|s| {
        println!("You are: {}", role_label(s.current_role()));
        println!();
        for m in s.orgs.members.iter() {
            let status = match m.status {
                MemberStatus::Active => "",
                MemberStatus::Invited => " [invited]",
            };
            println!(
                "{:<6} {:<20} {:<28} {:<7}{}",
                m.user_id,
                m.name,
                m.email,
                m.role.as_str(),
                status
            );
        }
    });
}
