//! Admin commands. These run on the consumer session, which must belong to
//! an admin.

use buzzgram_client::App;
use buzzgram_client::pages::{AdminApprovalsPage, AdminBusinesses, AdminDashboard};
use buzzgram_core::{ApprovalId, ApprovalStatus, BusinessId};
use clap::Subcommand;

use super::CliError;

#[derive(Subcommand)]
pub enum AdminAction {
    /// Show the dashboard counters and recent activity
    Stats,
    /// List approval requests
    Approvals {
        /// `pending`, `approved` or `rejected`
        #[arg(long, default_value = "pending")]
        status: ApprovalStatus,
    },
    /// Approve a pending request
    Approve {
        id: ApprovalId,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Reject a pending request
    Reject {
        id: ApprovalId,
        #[arg(long)]
        notes: String,
    },
    /// List every listing with its status
    Businesses,
    /// Flip a listing between active and pending
    ToggleStatus { id: i32 },
    /// Delete a listing
    DeleteBusiness { id: i32 },
}

pub async fn run(app: &App, action: AdminAction) -> Result<(), CliError> {
    let state = app.consumer.snapshot().await;
    if !state.is_authenticated() {
        return Err(CliError::NotSignedIn("buzzgram login"));
    }

    match action {
        AdminAction::Stats => stats(app).await?,
        AdminAction::Approvals { status } => {
            let mut page = AdminApprovalsPage::new(app);
            page.set_status(status).await?;
            if page.approvals().is_empty() {
                println!("No {} requests", status.as_str());
            }
            for approval in page.approvals() {
                let owner = approval.owner_name.as_deref().unwrap_or("unknown owner");
                println!(
                    "{}  {:?}  {}  {owner}  {}",
                    approval.id,
                    approval.kind,
                    approval.business.name,
                    approval.submission_date.format("%Y-%m-%d"),
                );
                if let Some(message) = &approval.verification_message {
                    println!("    {message}");
                }
            }
        }
        AdminAction::Approve { id, notes } => {
            let mut page = AdminApprovalsPage::new(app);
            page.load().await?;
            page.select(id);
            page.notes = notes.unwrap_or_default();
            page.approve().await?;
            println!("Approved {id}");
        }
        AdminAction::Reject { id, notes } => {
            let mut page = AdminApprovalsPage::new(app);
            page.load().await?;
            page.select(id);
            page.notes = notes;
            page.reject().await?;
            println!("Rejected {id}");
        }
        AdminAction::Businesses => {
            let mut page = AdminBusinesses::new(app);
            page.load().await?;
            for business in page.businesses() {
                println!(
                    "  {:>5}  {}  {}",
                    business.id,
                    business.effective_status(),
                    business.name
                );
            }
        }
        AdminAction::ToggleStatus { id } => {
            let mut page = AdminBusinesses::new(app);
            page.load().await?;
            match page.toggle_status(BusinessId::new(id)).await? {
                Some(status) => println!("Business {id} is now {status}"),
                None => {
                    return Err(CliError::InvalidArgument(format!(
                        "no business with id {id}"
                    )));
                }
            }
        }
        AdminAction::DeleteBusiness { id } => {
            let mut page = AdminBusinesses::new(app);
            page.delete(BusinessId::new(id)).await?;
            println!("Deleted business {id}");
        }
    }
    Ok(())
}

async fn stats(app: &App) -> Result<(), CliError> {
    let mut dashboard = AdminDashboard::new(app);
    dashboard.load().await?;

    let stats = &dashboard.stats;
    println!("Businesses:        {}", stats.total_businesses);
    println!("Users:             {}", stats.total_users);
    println!("Quote requests:    {}", stats.total_quotes);
    println!("Pending approvals: {}", stats.pending_approvals);

    println!("Recent general quotes:");
    for quote in dashboard.general_quotes.iter().take(5) {
        println!("  {:>5}  {} <{}>", quote.id, quote.name, quote.email);
    }
    println!("Recent business quotes:");
    for quote in dashboard.business_quotes.iter().take(5) {
        println!("  {:>5}  {} -> business {}", quote.id, quote.name, quote.business_id);
    }
    Ok(())
}
