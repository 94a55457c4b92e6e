//! Business-owner commands.

use buzzgram_client::App;
use buzzgram_client::pages::{
    ClaimBusinessFlow, CreateBusinessWizard, EditBusinessForm, OwnerDashboard,
};
use buzzgram_core::models::Business;
use buzzgram_core::{BusinessId, CategoryId, CityId, SubcategoryId};
use clap::Subcommand;
use secrecy::SecretString;

use super::CliError;

const LOGIN_HINT: &str = "buzzgram owner login";

#[derive(Subcommand)]
pub enum OwnerAction {
    /// Sign in to the business-owner account
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "BUZZGRAM_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a business-owner account
    Signup {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "BUZZGRAM_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Sign out of the business-owner account
    Logout,
    /// List your businesses by review state
    Businesses,
    /// Submit a new listing for review
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        city: i32,
        #[arg(long)]
        category: i32,
        #[arg(long)]
        subcategory: Option<i32>,
        #[arg(long)]
        instagram: Option<String>,
        #[arg(long)]
        description: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Update one of your listings; omitted fields keep their value
    Edit {
        id: i32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        instagram: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Search unclaimed listings, and claim one with `--claim <id>`
    Claim {
        name: String,
        #[arg(long)]
        city: Option<i32>,
        #[arg(long)]
        claim: Option<i32>,
        #[arg(long, default_value = "")]
        message: String,
    },
}

pub async fn run(app: &App, action: OwnerAction) -> Result<(), CliError> {
    match action {
        OwnerAction::Login { email, password } => {
            let owner = app
                .owner
                .login(&email, &SecretString::from(password))
                .await?;
            println!("Signed in as {} <{}>", owner.display_name(), owner.email);
        }
        OwnerAction::Signup {
            email,
            password,
            first_name,
            last_name,
        } => {
            let owner = app
                .owner
                .signup(&email, &SecretString::from(password), &first_name, &last_name)
                .await?;
            println!("Welcome, {}", owner.display_name());
        }
        OwnerAction::Logout => {
            app.owner.logout().await;
            println!("Signed out");
        }
        OwnerAction::Businesses => businesses(app).await?,
        OwnerAction::Create {
            name,
            city,
            category,
            subcategory,
            instagram,
            description,
            email,
            phone,
        } => {
            require_owner(app).await?;
            let mut wizard = CreateBusinessWizard::new(app);
            wizard.form.name = name;
            wizard.form.city_id = Some(CityId::new(city));
            wizard.select_category(Some(CategoryId::new(category)));
            wizard.form.subcategory_id = subcategory.map(SubcategoryId::new);
            wizard.form.instagram_handle = instagram.unwrap_or_default();
            wizard.form.description = description;
            wizard.form.email = email.unwrap_or_default();
            wizard.form.phone = phone.unwrap_or_default();

            wizard.next()?;
            wizard.next()?;
            let business = wizard.submit().await?;
            println!("Submitted {} (#{}) for review", business.name, business.id);
        }
        OwnerAction::Edit {
            id,
            name,
            description,
            instagram,
            email,
            phone,
        } => {
            require_owner(app).await?;
            let mut edit = EditBusinessForm::new(app, BusinessId::new(id));
            edit.load().await?;
            if let Some(message) = edit.error.take() {
                return Err(CliError::Client(message));
            }
            let form = &mut edit.form;
            for (field, value) in [
                (&mut form.name, name),
                (&mut form.description, description),
                (&mut form.instagram_handle, instagram),
                (&mut form.email, email),
                (&mut form.phone, phone),
            ] {
                if let Some(value) = value {
                    *field = value;
                }
            }
            let business = edit.submit().await?;
            println!("Updated {} (#{})", business.name, business.id);
        }
        OwnerAction::Claim {
            name,
            city,
            claim,
            message,
        } => {
            require_owner(app).await?;
            let mut flow = ClaimBusinessFlow::new(app);
            flow.search_name = name;
            flow.city_id = city.map(CityId::new);
            flow.search().await?;
            if let Some(notice) = &flow.notice {
                println!("{notice}");
                return Ok(());
            }
            for business in flow.results() {
                print_line(business);
            }

            if let Some(id) = claim {
                flow.select(BusinessId::new(id));
                flow.verification_message = message;
                if let Some(next) = flow.claim().await? {
                    println!("Claim submitted. Track it at {next}");
                } else {
                    return Err(CliError::InvalidArgument(format!(
                        "business {id} is not in the search results"
                    )));
                }
            }
        }
    }
    Ok(())
}

async fn require_owner(app: &App) -> Result<(), CliError> {
    if app.owner.owner().await.is_some() {
        Ok(())
    } else {
        Err(CliError::NotSignedIn(LOGIN_HINT))
    }
}

async fn businesses(app: &App) -> Result<(), CliError> {
    let mut dashboard = OwnerDashboard::new(app);
    dashboard
        .load()
        .await
        .map_err(|_| CliError::NotSignedIn(LOGIN_HINT))?;

    if let Some(name) = dashboard.greeting_name().await {
        println!("Welcome back, {name}");
    }
    if dashboard.is_empty() {
        println!("No businesses yet. Create one or claim an existing listing.");
        return Ok(());
    }

    let groups = dashboard.groups();
    for (title, list) in [
        ("Awaiting review", &groups.awaiting_review),
        ("Active", &groups.active),
        ("Rejected", &groups.rejected),
    ] {
        if list.is_empty() {
            continue;
        }
        println!("{title}:");
        for business in list {
            print_line(business);
            if let Some(notes) = &business.approval_notes {
                println!("         {notes}");
            }
        }
    }
    Ok(())
}

fn print_line(business: &Business) {
    let city = business.city.as_ref().map_or("", |c| c.name.as_str());
    println!("  {:>5}  {}  {city}", business.id, business.name);
}
