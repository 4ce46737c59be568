// src/main.rs

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mystore_admin::dashboard::AdminDashboard;
use mystore_admin::forms::{LoginForm, NewAdminForm};
use mystore_admin::storefront::{HOME_SECTION_LIMIT, load_home_feed};
use mystore_admin::transport::StagedFile;
use mystore_admin::{AuthContext, ClientConfig, ClientError, ShopApi};

#[derive(Parser, Debug)]
#[command(name = "mystore-admin")]
#[command(about = "MyStore storefront and admin client")]
#[command(version)]
struct Cli {
    /// Token sesji (nadpisuje MYSTORE_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all products
    Products,
    /// Products at or below the low-stock threshold
    LowStock,
    /// Storefront home feed (newest, best sellers, total)
    Home,
    /// Dashboard metrics and visitor analytics
    Overview {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// List admin accounts
    Admins,
    CreateAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    DeleteAdmin {
        id: i64,
    },
    DeleteProduct {
        id: i64,
    },
    CreateProduct {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        stock: String,
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    EditProduct {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        stock: Option<String>,
        #[arg(long = "remove-image")]
        remove_images: Vec<i64>,
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    /// Log in and print the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Inicjalizacja systemu logowania (tracing)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mystore_admin=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::load();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Polecenie zakończone błędem: {:?}", e);
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), ClientError> {
    let api = ShopApi::from_config(&config)?;
    let auth = AuthContext::from_optional(cli.token.or_else(|| config.session_token.clone()));
    let mut dashboard = AdminDashboard::new(api, auth, &config);

    match cli.command {
        Command::Products => {
            dashboard.refresh_products().await?;
            for p in dashboard.products() {
                println!("{:>6}  {:<40} {:>10.2} {:>6}", p.id, p.name, p.price, p.stock);
            }
        }
        Command::LowStock => {
            dashboard.refresh_products().await?;
            let low = dashboard.low_stock_products();
            if low.is_empty() {
                println!("No products at or below {} in stock.", config.low_stock_threshold);
            }
            for p in low {
                println!("{:>6}  {:<40} stock: {}", p.id, p.name, p.stock);
            }
        }
        Command::Home => {
            let feed = load_home_feed(dashboard.api(), HOME_SECTION_LIMIT).await?;
            if let Some(featured) = feed.featured() {
                println!("Featured: {}", featured.name);
            }
            println!("Just dropped:");
            for p in &feed.newest {
                println!("  {} (${:.2})", p.name, p.price);
            }
            println!("Popular right now:");
            for p in &feed.best_sellers {
                println!("  {} (${:.2})", p.name, p.price);
            }
            println!("Explore {} handpicked products", feed.total_count);
        }
        Command::Overview { days } => {
            let overview = dashboard.load_overview(days).await?;
            let m = &overview.metrics;
            println!("Total admins:    {}", m.total_admins);
            println!("Total products:  {}", m.total_products);
            println!("Total sales:     ${:.2}", m.total_sales);
            println!("Today's orders:  {}", m.todays_orders);
            let a = &overview.analytics;
            println!(
                "Visitors ({} days): {} visits, {} unique",
                a.days, a.total_visits, a.unique_visitors
            );
            for day in &a.daily {
                println!("  {}  {}", day.date, day.visits);
            }
        }
        Command::Admins => {
            dashboard.refresh_admins().await?;
            if dashboard.admins().is_empty() {
                println!("No admins yet.");
            }
            for a in dashboard.admins() {
                println!("{:>6}  {:<30} {}", a.id, a.name, a.email);
            }
        }
        Command::CreateAdmin {
            name,
            email,
            password,
        } => {
            let admin = dashboard
                .create_admin(NewAdminForm {
                    name,
                    email,
                    password,
                })
                .await?;
            println!("Created admin {} <{}>", admin.name, admin.email);
        }
        Command::DeleteAdmin { id } => {
            dashboard.delete_admin(id).await?;
            println!("Deleted admin {}", id);
        }
        Command::DeleteProduct { id } => {
            dashboard.delete_product(id).await?;
            println!("Deleted product {}", id);
        }
        Command::CreateProduct {
            name,
            description,
            price,
            stock,
            images,
        } => {
            let files = read_files(&images).await?;
            dashboard.start_create_product();
            let editor = dashboard.editor_mut();
            editor.set_name(name);
            editor.set_description(description);
            editor.set_price(price);
            editor.set_stock(stock);
            editor.attach_files(files);
            let outcome = dashboard.submit_product().await?;
            print_outcome(&outcome);
        }
        Command::EditProduct {
            id,
            name,
            description,
            price,
            stock,
            remove_images,
            images,
        } => {
            let files = read_files(&images).await?;
            dashboard.refresh_products().await?;
            dashboard.start_edit_product(id)?;
            let editor = dashboard.editor_mut();
            if let Some(name) = name {
                editor.set_name(name);
            }
            if let Some(description) = description {
                editor.set_description(description);
            }
            if let Some(price) = price {
                editor.set_price(price);
            }
            if let Some(stock) = stock {
                editor.set_stock(stock);
            }
            for image_id in remove_images {
                if !editor.mark_image_for_removal(image_id) {
                    tracing::warn!("Produkt {} nie ma obrazka {}", id, image_id);
                }
            }
            if !files.is_empty() {
                editor.attach_files(files);
            }
            let outcome = dashboard.submit_product().await?;
            print_outcome(&outcome);
        }
        Command::Login { email, password } => {
            let payload = LoginForm {
                email,
                password,
                remember_me: false,
            }
            .into_payload()?;
            let session = dashboard.api().login(&payload).await?;
            println!("{}", session.token);
        }
    }

    dashboard.tick(std::time::Instant::now());
    for note in dashboard.notifications().active() {
        tracing::info!("[{}] {}", note.kind, note.message);
    }
    Ok(())
}

async fn read_files(paths: &[PathBuf]) -> Result<Vec<StagedFile>, ClientError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(StagedFile::from_path(path).await?);
    }
    Ok(files)
}

fn print_outcome(outcome: &mystore_admin::editor::SubmitOutcome) {
    match &outcome.saved {
        Some(product) => println!("Saved product {} ({})", product.id, product.name),
        None => println!("Product saved"),
    }
    if let Some(products) = &outcome.products {
        println!("{} products in catalogue", products.len());
    }
}
