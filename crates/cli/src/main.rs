//! Bakehouse CLI - drive the cart and checkout from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add a cake (each add is one unit)
//! bakehouse cart add --id c1 --name "Belgian Chocolate Truffle" --price 85 --image choc.jpg
//!
//! # Add a cake straight from catalog JSON
//! bakehouse cart add-json '{"_id":"c2","name":"Vanilla Dream","price":75,"image":"v.jpg"}'
//!
//! # Change or remove lines
//! bakehouse cart update c1 3
//! bakehouse cart remove c2
//!
//! # Review, pay, then confirm the order
//! bakehouse cart show
//! bakehouse checkout --name "Asha" --phone 9876543210 --address "12 Baker St" --city Pune --pincode 411001
//! bakehouse checkout --name "Asha" --phone 9876543210 --address "12 Baker St" --city Pune --pincode 411001 --paid
//!
//! # List past orders
//! bakehouse orders
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and edit the persisted cart
//! - `checkout` - Print the UPI payment link; with `--paid`, place the order
//! - `orders` - List the signed-in customer's orders

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "bakehouse")]
#[command(author, version, about = "Bakehouse cart and checkout")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Pay for the cart via UPI, then place the order with --paid
    Checkout {
        /// Full name for delivery
        #[arg(long)]
        name: String,

        /// 10-digit mobile number
        #[arg(long)]
        phone: String,

        /// Street address
        #[arg(long)]
        address: String,

        /// City
        #[arg(long)]
        city: String,

        /// Postal PIN code
        #[arg(long)]
        pincode: String,

        /// Notes for the bakery (message on cake, delivery time, ...)
        #[arg(long, default_value = "")]
        instructions: String,

        /// Confirm that the UPI payment has been made and place the order.
        /// Without it, only the payment details are shown
        #[arg(long)]
        paid: bool,
    },
    /// List your past orders
    Orders,
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart
    Show {
        /// Print the raw view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a cake
    Add {
        /// Cake ID
        #[arg(long)]
        id: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Unit price in rupees
        #[arg(long)]
        price: String,

        /// Image URL
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Add one unit of a cake given as catalog JSON
    AddJson {
        /// Product JSON (`{"_id", "name", "price", "image"}`)
        product: String,
    },
    /// Remove a cake from the cart
    Remove {
        /// Cake ID
        id: String,
    },
    /// Set the quantity of a cake (0 or less removes it)
    Update {
        /// Cake ID
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bakehouse_cli=info,bakehouse_cart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show { json } => commands::cart::show(&config, json)?,
            CartAction::Add {
                id,
                name,
                price,
                image,
            } => commands::cart::add(&config, &id, &name, &price, &image)?,
            CartAction::AddJson { product } => commands::cart::add_json(&config, &product)?,
            CartAction::Remove { id } => commands::cart::remove(&config, &id),
            CartAction::Update { id, quantity } => commands::cart::update(&config, &id, quantity),
            CartAction::Clear => commands::cart::clear(&config),
        },
        Commands::Checkout {
            name,
            phone,
            address,
            city,
            pincode,
            instructions,
            paid,
        } => {
            let details = bakehouse_cart::DeliveryDetails {
                name,
                phone,
                address,
                city,
                pincode,
                special_instructions: instructions,
            };
            commands::checkout::run(&config, details, paid).await?;
        }
        Commands::Orders => commands::orders::list(&config).await?,
    }
    Ok(())
}
