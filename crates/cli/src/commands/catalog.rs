//! Browsing commands: cities, businesses, favorites and quotes.

use std::sync::Arc;

use buzzgram_client::App;
use buzzgram_client::pages::{BusinessDetailPage, CityPage, CitySelector, QuotePage, UserDashboard};
use buzzgram_core::guard::GuardOutcome;
use buzzgram_core::models::Business;
use buzzgram_core::{BusinessId, CategoryId, CityId, SubcategoryId, routes};

use super::CliError;

pub async fn cities(app: &App) -> Result<(), CliError> {
    let cities = app.api.get_cities().await?;
    let selector = CitySelector::new(Arc::clone(&app.store));
    let last = selector.last_city();
    for city in &cities {
        let marker = if Some(city.id) == last { "*" } else { " " };
        println!("{marker} {:>4}  {}", city.id, city.name);
    }
    Ok(())
}

pub async fn city(
    app: &App,
    city_id: i32,
    category: Option<i32>,
    subcategory: Option<i32>,
    search: Option<String>,
) -> Result<(), CliError> {
    let mut page = CityPage::new(app, CityId::new(city_id), search.as_deref());
    page.load().await?;
    page.select_category(category.map(CategoryId::new));
    page.select_subcategory(subcategory.map(SubcategoryId::new));

    let name = page.city().map_or("Unknown city", |c| c.name.as_str());
    println!("{name}");
    if let Some(message) = page.empty_message() {
        println!("  {message}");
        return Ok(());
    }
    for business in page.businesses() {
        print_business_line(business);
    }
    Ok(())
}

fn print_business_line(business: &Business) {
    let handle = business.instagram_handle.as_deref().unwrap_or_default();
    let featured = if business.featured { " [featured]" } else { "" };
    println!("  {:>5}  {}  {handle}{featured}", business.id, business.name);
}

pub async fn business(app: &App, id: i32) -> Result<(), CliError> {
    let mut page = BusinessDetailPage::new(app, BusinessId::new(id));
    page.load().await?;
    let Some(business) = page.business() else {
        return Ok(());
    };

    println!("{} (#{})", business.name, business.id);
    if let Some(description) = &business.description {
        println!("  {description}");
    }
    for (label, value) in [
        ("Instagram", &business.instagram_handle),
        ("Website", &business.website),
        ("Phone", &business.phone),
        ("Email", &business.email),
    ] {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
    if let Some(favorited) = page.is_favorited() {
        println!("  Favorite: {}", if favorited { "yes" } else { "no" });
    }
    Ok(())
}

pub async fn favorites(app: &App, toggle: Option<i32>) -> Result<(), CliError> {
    if !app.consumer.snapshot().await.is_authenticated() {
        return Err(CliError::NotSignedIn("buzzgram login"));
    }

    if let Some(id) = toggle {
        let mut page = BusinessDetailPage::new(app, BusinessId::new(id));
        page.load().await?;
        let favorited = page.toggle_favorite().await?;
        println!(
            "{} favorites",
            if favorited { "Added to" } else { "Removed from" }
        );
        return Ok(());
    }

    let mut dashboard = UserDashboard::new(app);
    dashboard.load().await?;
    println!("Favorites:");
    for favorite in dashboard.favorites() {
        match &favorite.business {
            Some(business) => print_business_line(business),
            None => println!("  {:>5}", favorite.business_id),
        }
    }
    println!("Quote requests:");
    for quote in dashboard.quotes() {
        let business = quote.business.as_ref().map_or("", |b| b.name.as_str());
        let status = quote.status.as_deref().unwrap_or("pending");
        println!("  {:>5}  {business}  {status}", quote.id);
    }
    Ok(())
}

/// Arguments of `buzzgram quote`.
pub struct QuoteArgs {
    pub category: i32,
    pub subcategory: i32,
    pub city: Option<i32>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: String,
    pub budget: Option<String>,
}

pub async fn quote(app: &App, args: QuoteArgs) -> Result<(), CliError> {
    let mut page = QuotePage::new(app);
    page.load().await?;

    page.select_category(Some(CategoryId::new(args.category)));
    page.form.subcategory_id = Some(SubcategoryId::new(args.subcategory));
    page.form.city_id = args.city.map(CityId::new);
    if let Some(name) = args.name {
        page.form.name = name;
    }
    if let Some(email) = args.email {
        page.form.email = email;
    }
    page.form.phone = args.phone.unwrap_or_default();
    page.form.description = args.description;
    page.form.budget = args.budget.unwrap_or_default();

    let quote = page.submit().await?;
    println!("Quote request #{} sent", quote.id);
    Ok(())
}

pub async fn guard(app: &App, path: &str) {
    let requirement = routes::requirement_for(path);
    match app.guard(path).await {
        GuardOutcome::Render => println!("{path}: render ({requirement:?})"),
        GuardOutcome::Spinner => println!("{path}: loading ({requirement:?})"),
        GuardOutcome::Redirect(target) => {
            println!("{path}: redirect to {target} ({requirement:?})");
        }
    }
    if let Some(target) = CitySelector::new(Arc::clone(&app.store)).home_redirect(path) {
        println!("{path}: returning visitor goes to {target}");
    }
}

pub async fn health(app: &App) -> Result<(), CliError> {
    let health = app.api.health_check().await?;
    println!("{} {}", app.api.base_url(), health.status);
    Ok(())
}
