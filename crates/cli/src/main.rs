//! Vitrina CLI - the storefront in a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Home page sections (two carousels per banner)
//! vitrina home --ratio 2
//!
//! # Browse and fill a guest cart
//! vitrina products list --search acuarela --limit 5
//! vitrina cart add 3f2a... --quantity 2
//!
//! # Sign in; the guest cart is merged into the account
//! VITRINA_PASSWORD=... vitrina login -e ana@example.com
//!
//! # Check out
//! vitrina checkout contact -n "Ana Gómez" -e ana@example.com -p "+54 11 5555-0000" -a "Av. Siempreviva 742"
//! vitrina checkout review
//! vitrina checkout confirm
//! ```
//!
//! Output is JSON on stdout; logs go to stderr. Sign-in and the guest session
//! id persist in `VITRINA_STATE_PATH` between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use vitrina_core::OrderStatus;
use vitrina_storefront::{AppError, AppState, VitrinaConfig, telemetry};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "vitrina")]
#[command(author, version, about = "Vitrina storefront in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the home page: carousels interleaved with slim banners
    Home {
        /// Carousels shown before each banner
        #[arg(long, default_value_t = 1)]
        ratio: usize,
    },
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Show categories
    Categories {
        /// Flat list instead of the tree
        #[arg(long)]
        flat: bool,
        /// Show a single category by slug
        #[arg(long, conflicts_with = "flat")]
        slug: Option<String>,
    },
    /// Show the storefront configuration (falls back to defaults)
    Storefront,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Sign in and merge the guest cart
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(long, env = "VITRINA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account, sign in and merge the guest cart
    Register {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Full name
        #[arg(short = 'n', long)]
        full_name: String,

        /// Account password
        #[arg(long, env = "VITRINA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out (the guest session id is kept)
    Logout,
    /// Show or change the signed-in account
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
    /// Order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Place an order from the cart
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,
        /// Category slug
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Show one product
    Show {
        /// Product id
        #[arg(required_unless_present = "sku")]
        id: Option<String>,
        /// Look up by SKU instead of id
        #[arg(long, conflicts_with = "id")]
        sku: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    PriceAsc,
    PriceDesc,
    Newest,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        /// Product id
        product_id: String,
        #[arg(short, long)]
        quantity: Option<u32>,
    },
    /// Set the quantity of a line
    Update {
        /// Cart line id
        item_id: String,
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Cart line id
        item_id: String,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show the account
    Show,
    /// Change name or email
    Update {
        #[arg(short = 'n', long)]
        full_name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Change the password
    Password {
        #[arg(long, env = "VITRINA_PASSWORD", hide_env_values = true)]
        current: String,
        #[arg(long, env = "VITRINA_NEW_PASSWORD", hide_env_values = true)]
        new: String,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// pending, confirmed, processing, shipped, delivered, cancelled
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Show one order
    Show {
        /// Order id
        #[arg(required_unless_present = "number")]
        id: Option<String>,
        /// Look up by order number instead of id
        #[arg(long, conflicts_with = "id")]
        number: Option<String>,
    },
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Save contact and delivery details
    Contact {
        #[arg(short = 'n', long)]
        full_name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        phone: String,
        #[arg(short, long)]
        address: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Review the order before placing it
    Review,
    /// Place the order
    Confirm,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match VitrinaConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            output::error(&AppError::from(e));
            return ExitCode::FAILURE;
        }
    };

    // Keep the guard alive until exit so Sentry flushes
    let _sentry_guard = telemetry::init(&config.sentry);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            output::error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: VitrinaConfig) -> Result<(), AppError> {
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Home { ratio } => commands::catalog::home(&state, ratio).await,
        Commands::Products { action } => match action {
            ProductsAction::List {
                page,
                limit,
                search,
                category,
                sort,
            } => {
                let filters = commands::catalog::product_filters(page, limit, search, category, sort);
                commands::catalog::list_products(&state, &filters).await
            }
            ProductsAction::Show { id, sku } => {
                commands::catalog::show_product(&state, id.as_deref(), sku.as_deref()).await
            }
        },
        Commands::Categories { flat, slug } => {
            commands::catalog::categories(&state, flat, slug.as_deref()).await
        }
        Commands::Storefront => commands::catalog::storefront(&state).await,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state).await,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&state, &product_id, quantity).await,
            CartAction::Update { item_id, quantity } => {
                commands::cart::update(&state, &item_id, quantity).await
            }
            CartAction::Remove { item_id } => commands::cart::remove(&state, &item_id).await,
            CartAction::Clear => commands::cart::clear(&state).await,
        },
        Commands::Login { email, password } => {
            commands::account::login(&state, &email, password).await
        }
        Commands::Register {
            email,
            full_name,
            password,
        } => commands::account::register(&state, &email, &full_name, password).await,
        Commands::Logout => commands::account::logout(&state).await,
        Commands::Profile { action } => match action.unwrap_or(ProfileAction::Show) {
            ProfileAction::Show => commands::account::profile(&state).await,
            ProfileAction::Update { full_name, email } => {
                commands::account::update_profile(&state, full_name, email.as_deref()).await
            }
            ProfileAction::Password { current, new } => {
                commands::account::change_password(&state, current, new).await
            }
        },
        Commands::Orders { action } => match action {
            OrdersAction::List {
                page,
                limit,
                status,
            } => commands::orders::list(&state, page, limit, status).await,
            OrdersAction::Show { id, number } => {
                commands::orders::show(&state, id.as_deref(), number.as_deref()).await
            }
        },
        Commands::Checkout { action } => match action {
            CheckoutAction::Contact {
                full_name,
                email,
                phone,
                address,
                notes,
            } => {
                commands::orders::checkout_contact(&state, full_name, email, phone, address, notes)
                    .await
            }
            CheckoutAction::Review => commands::orders::checkout_review(&state).await,
            CheckoutAction::Confirm => commands::orders::checkout_confirm(&state).await,
        },
    }
}
