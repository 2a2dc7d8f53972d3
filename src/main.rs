use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::Result;
use mockshop::{AccountRepository, CartRepository, CatalogRepository, Config, ErrorKind, ShopError};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use tracing::Level;

#[derive(Parser)]
#[command(name = "mockshop")]
#[command(about = "MockShop CLI - catalog, carts, users and orders over flat JSON collections")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Directory holding the collection files (default: platform data dir)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL prepended to asset paths
    #[arg(long, global = true)]
    asset_base: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create empty collection files that don't exist yet
    Init,

    /// Catalog lookups
    #[command(subcommand)]
    Item(ItemCommands),

    /// Cart operations for one user
    Cart {
        /// User id
        #[arg(short, long)]
        uid: u64,

        #[command(subcommand)]
        command: CartCommands,
    },

    /// Check a username/password pair
    Login { username: String, password: String },

    /// Show a user's profile
    Address {
        #[arg(short, long)]
        uid: u64,
    },

    /// List a user's orders
    Orders {
        #[arg(short, long)]
        uid: u64,
    },
}

#[derive(Subcommand)]
enum ItemCommands {
    /// List all items
    List,
    /// Show one item, with its parent's titles
    Get { id: u64 },
}

#[derive(Subcommand)]
enum CartCommands {
    /// Show the cart with item details
    List,
    /// Add one of an item
    Add { item_id: u64 },
    /// Flip the checked flag of a cart entry
    Toggle { cart_id: u64 },
    /// Check or uncheck every entry
    ToggleAll {
        #[arg(action = clap::ArgAction::Set)]
        checked: bool,
    },
    /// Take one off an item's quantity (never below 1)
    Remove { item_id: u64 },
    /// Drop an item from the cart
    Clear { item_id: u64 },
    /// Drop every checked entry
    ClearChecked,
    /// Empty the cart
    ClearAll,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    match run(cli) {
        Ok(()) => {}
        Err(e) => {
            let code = match e.downcast_ref::<ShopError>() {
                Some(shop) => exit_code(shop.kind()),
                None => 1,
            };
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(code);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref(), cli.data_dir, cli.asset_base)?;

    match cli.command {
        Commands::Init => {
            let created = mockshop::init_collections(&config)?;
            if created.is_empty() {
                println!("All collections already exist in {}", config.data_dir.display());
            } else {
                println!(
                    "{} {} in {}",
                    "Created".green(),
                    created.join(", "),
                    config.data_dir.display()
                );
            }
        }
        Commands::Item(command) => {
            let catalog = CatalogRepository::new(&config);
            match command {
                ItemCommands::List => print_json(&catalog.list()?)?,
                ItemCommands::Get { id } => print_json(&catalog.get(id)?)?,
            }
        }
        Commands::Cart { uid, command } => {
            let cart = CartRepository::new(&config);
            match command {
                CartCommands::List => print_json(&cart.list(uid)?)?,
                CartCommands::Add { item_id } => print_json(&cart.add(uid, item_id)?)?,
                CartCommands::Toggle { cart_id } => print_json(&cart.toggle(uid, cart_id)?)?,
                CartCommands::ToggleAll { checked } => {
                    let count = cart.toggle_all(uid, checked)?;
                    println!("{} {} entries", "Updated".green(), count);
                }
                CartCommands::Remove { item_id } => print_json(&cart.decrement(uid, item_id)?)?,
                CartCommands::Clear { item_id } => {
                    let count = cart.clear_one(uid, item_id)?;
                    println!("{} {} entries", "Removed".green(), count);
                }
                CartCommands::ClearChecked => {
                    let count = cart.clear_checked(uid)?;
                    println!("{} {} entries", "Removed".green(), count);
                }
                CartCommands::ClearAll => {
                    let count = cart.clear_all(uid)?;
                    println!("{} {} entries", "Removed".green(), count);
                }
            }
        }
        Commands::Login { username, password } => {
            let accounts = AccountRepository::new(&config);
            print_json(&accounts.login(&username, &password)?)?;
        }
        Commands::Address { uid } => {
            let accounts = AccountRepository::new(&config);
            print_json(&accounts.address(uid)?)?;
        }
        Commands::Orders { uid } => {
            let accounts = AccountRepository::new(&config);
            print_json(&accounts.orders(uid)?)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Process exit status per condition
fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::MissingParameter => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::InvalidState => 4,
        ErrorKind::StoreUnavailable => 5,
        ErrorKind::Internal => 1,
    }
}
