//! Oakline CLI - command-line client for the Oakline storefront backend.
//!
//! Drives the same session and API layer the storefront UI uses: sign in,
//! browse the catalog, inspect orders, and run admin console operations.
//! Credentials persist in the platform config directory between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::sync::Arc;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

use oakline_client::api::{AdminApi, OrderApi, ProductApi};
use oakline_client::config::ClientConfig;
use oakline_client::gateway::{Gateway, MemoryNavigator, TracingNotifier};
use oakline_client::models::{OrderStatus, ProductForm};
use oakline_client::session::{AdminSession, AuthSession, SessionState};
use oakline_client::store::{CredentialStore, FileStore};

#[derive(Parser)]
#[command(name = "oakline")]
#[command(about = "Command-line client for the Oakline storefront")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Register {
        /// Display name
        name: String,
        /// Account email
        email: String,
        /// Password (min 8 characters)
        #[arg(short, long)]
        password: String,
    },

    /// Sign in with email and password
    Login {
        /// Account email
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Sign out locally and clear the stored credential
    Logout,

    /// Show the signed-in user's profile
    Me,

    /// Request a password-reset code by email
    ForgotPassword {
        /// Account email
        email: String,
    },

    /// Check a password-reset code without consuming it
    VerifyOtp {
        /// Account email
        email: String,
        /// 6-digit code from the reset email
        otp: String,
    },

    /// Change the signed-in user's password
    ChangePassword {
        /// Current password
        #[arg(long)]
        current: String,
        /// New password (min 8 characters)
        #[arg(long)]
        new: String,
    },

    /// Reset the password with an emailed one-time code
    ResetPassword {
        /// Account email
        email: String,
        /// 6-digit code from the reset email
        otp: String,
        #[arg(short, long)]
        password: String,
    },

    /// Catalog operations
    #[command(subcommand)]
    Products(ProductsCommand),

    /// Order operations for the signed-in user
    #[command(subcommand)]
    Orders(OrdersCommand),

    /// Admin console operations
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand)]
enum ProductsCommand {
    /// List the catalog
    List,
    /// Show one product
    Show {
        /// Product id
        id: String,
    },
}

#[derive(Subcommand)]
enum OrdersCommand {
    /// List your orders
    List,
    /// Show one order
    Show {
        /// Order id
        id: String,
    },
    /// Cancel an order that has not shipped
    Cancel {
        /// Order id
        id: String,
        /// Cancellation reason
        #[arg(short, long)]
        reason: Option<String>,
    },
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Sign in to the admin console
    Login {
        /// Admin email
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Sign out of the admin console
    Logout,
    /// List every order in the store
    Orders,
    /// List registered users
    Users,
    /// Move an order to a new fulfillment status
    SetStatus {
        /// Order id
        id: String,
        /// One of: pending, confirmed, shipped, delivered, cancelled
        status: OrderStatus,
    },
    /// Catalog management
    #[command(subcommand)]
    Products(AdminProductsCommand),
}

#[derive(Subcommand)]
enum AdminProductsCommand {
    /// Add a product to the catalog
    Add {
        /// Product name
        name: String,
        /// Unit price
        #[arg(long)]
        price: Decimal,
        /// Catalog category
        #[arg(long)]
        category: String,
        /// Stock quantity (0 marks the product out of stock)
        #[arg(long, default_value = "0")]
        stock: u32,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Replace a product's details
    Update {
        /// Product id
        id: String,
        /// Product name
        name: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "0")]
        stock: u32,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Remove a product from the catalog
    Delete {
        /// Product id
        id: String,
    },
}

fn product_form(
    name: String,
    price: Decimal,
    category: String,
    stock: u32,
    description: Option<String>,
    image_url: Option<String>,
) -> ProductForm {
    let mut form = ProductForm::new(name, price, category, stock);
    form.description = description;
    form.image_url = image_url;
    form
}

/// Everything a command handler might need, built once at startup.
struct App {
    auth: AuthSession,
    admin: AdminSession,
    products: ProductApi,
    orders: OrderApi,
    admin_api: AdminApi,
}

impl App {
    fn build() -> Result<Self, Box<dyn std::error::Error>> {
        let config = ClientConfig::from_env()?;
        debug!(base_url = %config.api_base_url, "configuration loaded");

        let store: Arc<dyn CredentialStore> =
            Arc::new(FileStore::open(&config.credentials_path)?);
        let gateway = Gateway::new(
            &config,
            Arc::clone(&store),
            Arc::new(TracingNotifier),
            Arc::new(MemoryNavigator::at("/")),
        )?;

        Ok(Self {
            auth: AuthSession::new(gateway.clone(), Arc::clone(&store)),
            admin: AdminSession::new(gateway.clone(), Arc::clone(&store)),
            products: ProductApi::new(gateway.clone()),
            orders: OrderApi::new(gateway.clone()),
            admin_api: AdminApi::new(gateway),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "oakline=warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let app = App::build()?;

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
        } => {
            let user = app.auth.sign_up(&name, &email, &password, &password).await?;
            println!("Welcome, {}. You are signed in as {}.", user.name, user.email);
        }
        Commands::Login { email, password } => {
            let user = app.auth.sign_in(&email, &password).await?;
            println!("Signed in as {} ({}).", user.name, user.email);
        }
        Commands::Logout => {
            app.auth.sign_out();
            println!("Signed out.");
        }
        Commands::Me => {
            app.auth.restore().await;
            match app.auth.state() {
                SessionState::Authenticated(user) => {
                    println!("{} <{}>", user.name, user.email);
                    println!("role: {}", user.role);
                    for address in &user.addresses {
                        println!("address: {}, {}, {}", address.full_name, address.city, address.country);
                    }
                }
                SessionState::Unauthenticated | SessionState::Loading => {
                    println!("Not signed in.");
                }
            }
        }
        Commands::ForgotPassword { email } => {
            let message = app.auth.forgot_password(&email).await?;
            println!("{}", message.unwrap_or_else(|| "Reset code sent.".to_string()));
        }
        Commands::VerifyOtp { email, otp } => {
            app.auth.verify_otp(&email, &otp).await?;
            println!("Code accepted.");
        }
        Commands::ChangePassword { current, new } => {
            app.auth.change_password(&current, &new).await?;
            println!("Password changed.");
        }
        Commands::ResetPassword {
            email,
            otp,
            password,
        } => {
            app.auth
                .reset_password_with_otp(&email, &otp, &password, &password)
                .await?;
            println!("Password reset. You can sign in with the new password.");
        }
        Commands::Products(command) => run_products(&app, command).await?,
        Commands::Orders(command) => run_orders(&app, command).await?,
        Commands::Admin(command) => run_admin(&app, command).await?,
    }

    Ok(())
}

async fn run_products(app: &App, command: ProductsCommand) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        ProductsCommand::List => {
            let products = app.products.list().await?;
            for product in products.iter() {
                let stock = if product.in_stock { "" } else { "  [out of stock]" };
                println!("{}  {}  {}{stock}", product.id, product.name, product.price);
            }
        }
        ProductsCommand::Show { id } => {
            let product = app.products.get(&id.into()).await?;
            println!("{}", product.name);
            println!("price: {}", product.price);
            if let Some(original) = product.original_price {
                println!("was: {original}");
            }
            println!("category: {}", product.category);
            if let Some(description) = &product.description {
                println!("\n{description}");
            }
        }
    }
    Ok(())
}

async fn run_orders(app: &App, command: OrdersCommand) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        OrdersCommand::List => {
            for order in app.orders.my_orders().await? {
                println!(
                    "{}  {}  {}  {}",
                    order.id,
                    order.created_at.format("%Y-%m-%d"),
                    order.order_status,
                    order.pricing.total_price,
                );
            }
        }
        OrdersCommand::Show { id } => {
            let order = app.orders.get(&id.into()).await?;
            println!("order {}  ({})", order.id, order.order_status);
            for item in &order.order_items {
                println!("  {} x{}  {}", item.title, item.quantity, item.price);
            }
            println!("items:    {}", order.pricing.items_price);
            println!("shipping: {}", order.pricing.shipping_price);
            println!("tax:      {}", order.pricing.tax_price);
            println!("total:    {}", order.pricing.total_price);
        }
        OrdersCommand::Cancel { id, reason } => {
            let order = app.orders.cancel(&id.into(), reason.as_deref()).await?;
            println!("order {} is now {}", order.id, order.order_status);
        }
    }
    Ok(())
}

async fn run_admin(app: &App, command: AdminCommand) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        AdminCommand::Login { email, password } => {
            let admin = app.admin.login(&email, &password).await?;
            println!("Admin session opened for {}.", admin.admin_name);
        }
        AdminCommand::Logout => {
            app.admin.logout();
            println!("Admin session closed.");
        }
        AdminCommand::Orders => {
            for order in app.admin_api.list_orders().await? {
                println!(
                    "{}  {}  {}  {}",
                    order.id,
                    order.created_at.format("%Y-%m-%d"),
                    order.order_status,
                    order.pricing.total_price,
                );
            }
        }
        AdminCommand::Users => {
            for user in app.admin_api.list_users().await? {
                println!("{}  {}  <{}>  {}", user.id, user.name, user.email, user.role);
            }
        }
        AdminCommand::SetStatus { id, status } => {
            let order = app.admin_api.update_order_status(&id.into(), status).await?;
            println!("order {} is now {}", order.id, order.order_status);
        }
        AdminCommand::Products(command) => run_admin_products(app, command).await?,
    }
    Ok(())
}

async fn run_admin_products(
    app: &App,
    command: AdminProductsCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        AdminProductsCommand::Add {
            name,
            price,
            category,
            stock,
            description,
            image_url,
        } => {
            let form = product_form(name, price, category, stock, description, image_url);
            let product = app.admin_api.create_product(&form).await?;
            println!("created {}  {}", product.id, product.name);
        }
        AdminProductsCommand::Update {
            id,
            name,
            price,
            category,
            stock,
            description,
            image_url,
        } => {
            let form = product_form(name, price, category, stock, description, image_url);
            let product = app.admin_api.update_product(&id.into(), &form).await?;
            println!("updated {}  {}", product.id, product.name);
        }
        AdminProductsCommand::Delete { id } => {
            app.admin_api.delete_product(&id.as_str().into()).await?;
            println!("deleted {id}");
        }
    }
    // Catalog reads are cached; drop the cache so the console sees its own
    // writes immediately.
    app.products.invalidate();
    Ok(())
}
