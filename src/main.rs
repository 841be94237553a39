use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use course_shop_core::app::{MemoryPage, PageModel, ShopController};
use course_shop_core::client::NoWasmClient;
use course_shop_core::config::{ShopConfig, ENV_BASE_URL, ENV_COOKIE};
use course_shop_core::interface::{HttpClient, ShopApi};
use course_shop_core::model::dtos::format_amount;
use course_shop_core::model::structs::{CartItemId, CartRow, CourseId};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "course-shop")]
#[command(about = "Drive the course storefront cart and wishlist from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Storefront origin, e.g. http://127.0.0.1:8000
    #[arg(long, env = ENV_BASE_URL)]
    base_url: Option<String>,

    /// Cookie header to send (must contain sessionid and csrftoken)
    #[arg(long, env = ENV_COOKIE)]
    cookie: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a course to the wishlist, or take it out if it is already there
    Favorite { course: CourseId },

    /// Remove a course from the wishlist
    Unfavorite { course: CourseId },

    /// Put a course in the cart
    Add { course: CourseId },

    /// Remove a cart row
    Remove {
        item: CartItemId,

        /// Course held by the row; enables --undo
        #[arg(long)]
        course: Option<CourseId>,

        /// Display name of the row
        #[arg(long, default_value = "")]
        name: String,

        /// Restore the row right after removing it
        #[arg(long, requires = "course")]
        undo: bool,
    },

    /// Print the cart total
    Total,

    /// Print the hover-cart preview markup
    Snippet,
}

fn print_page(page: &PageModel) {
    println!("=====================================");
    if let Some(count) = page.wishlist_count {
        println!("wishlist: {count}");
    }
    if let Some(count) = page.cart_count {
        println!("cart: {count}");
    }
    if let Some(total) = &page.cart_total {
        println!("total: {total}");
    }
    if let Some(message) = &page.cart_message {
        println!("message: {message}");
    }
    if let Some(undo) = &page.undo {
        println!("undo: {undo}");
    }
    for toast in page.toasts.iter().chain(&page.remove_toasts) {
        println!("toast: {toast}");
    }
    println!("=====================================");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = ShopConfig::from_env();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    if let Some(cookie) = cli.cookie {
        config.cookie = Some(cookie);
    }

    let client = NoWasmClient::new(config)
        .await
        .context("Failed to build HTTP client")?;

    let mutating = !matches!(cli.command, Commands::Total | Commands::Snippet);
    if mutating && client.csrf_token().is_none() {
        bail!("the cookie must carry a csrftoken for this command (set --cookie or {ENV_COOKIE})");
    }

    match cli.command {
        Commands::Favorite { course } => {
            let controller = ShopController::new(client, MemoryPage::default());
            let status = controller.toggle_favorite(course).await?;
            println!("course {course}: {status:?}");
            print_page(&controller.page().snapshot());
        }
        Commands::Unfavorite { course } => {
            let page = MemoryPage::new(PageModel {
                favorite_rows: vec![course],
                ..PageModel::default()
            });
            let controller = ShopController::new(client, page);
            controller.remove_favorite(course).await?;
            print_page(&controller.page().snapshot());
        }
        Commands::Add { course } => {
            let controller = ShopController::new(client, MemoryPage::default());
            let outcome = controller.add_to_cart(course).await?;
            println!("course {course}: added={} count={}", outcome.added, outcome.count);
            print_page(&controller.page().snapshot());
        }
        Commands::Remove {
            item,
            course,
            name,
            undo,
        } => {
            let cart_rows = course
                .map(|course_id| CartRow {
                    id: item,
                    course_id,
                    name,
                    price: 0.0,
                    markup: String::new(),
                })
                .into_iter()
                .collect();
            let page = MemoryPage::new(PageModel {
                cart_rows,
                ..PageModel::default()
            });
            let controller = ShopController::new(client, page);
            controller.remove_from_cart(item).await?;
            if undo {
                let restored = controller.undo_last_removal().await?;
                println!("restored: {restored}");
            }
            print_page(&controller.page().snapshot());
        }
        Commands::Total => {
            let total = client.cart_total().await.context("Failed to fetch cart total")?;
            println!("{}", format_amount(total.total));
        }
        Commands::Snippet => {
            let snippet = client
                .load_cart_snippet()
                .await
                .context("Failed to fetch cart preview")?;
            println!("{}", snippet.html);
        }
    }

    Ok(())
}
