use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use productmanager_api::{
    client::{
        CatalogClient, CategoryForm, CreateCategoryDialog, CreateProductDialog,
        DeleteProductDialog, DialogResult, ProductForm, ProductTable, SortColumn, SortDirection,
        DEFAULT_PAGE_SIZE,
    },
    dto::{CategoryResponse, ProductResponse},
};
use serde::Serialize;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = CatalogClient::new(&cli.base_url)
        .with_context(|| format!("invalid --base-url {}", cli.base_url))?;

    match cli.command {
        Commands::Products(command) => handle_products_command(&client, command, cli.json).await,
        Commands::Categories(command) => {
            handle_categories_command(&client, command, cli.json).await
        }
    }
}

#[derive(Parser)]
#[command(name = "catalog-cli", about = "Manage catalog products and categories", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[arg(
        long,
        global = true,
        env = "CATALOG_API_URL",
        default_value = "http://localhost:8080",
        help = "Base URL of the catalog API"
    )]
    base_url: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Products(ProductsCommands),
    #[command(subcommand)]
    Categories(CategoriesCommands),
}

#[derive(Subcommand)]
enum ProductsCommands {
    List(ProductListArgs),
    Create(ProductCreateArgs),
    Delete(DeleteArgs),
}

#[derive(Subcommand)]
enum CategoriesCommands {
    List,
    Create(CategoryArgs),
    Update(CategoryUpdateArgs),
    Delete(DeleteArgs),
}

#[derive(Args)]
struct ProductListArgs {
    #[arg(long, help = "Case-insensitive text matched against every column")]
    filter: Option<String>,
    #[arg(long, value_enum, help = "Column to sort by")]
    sort: Option<SortArg>,
    #[arg(long, action = ArgAction::SetTrue, help = "Sort in descending order")]
    desc: bool,
    #[arg(long, default_value_t = 1, help = "Page number, starting at 1")]
    page: usize,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, help = "Rows per page")]
    page_size: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    Price,
    Description,
    Category,
}

impl From<SortArg> for SortColumn {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Name => SortColumn::Name,
            SortArg::Price => SortColumn::Price,
            SortArg::Description => SortColumn::Description,
            SortArg::Category => SortColumn::Category,
        }
    }
}

#[derive(Args)]
struct ProductCreateArgs {
    #[arg(long, help = "Product name")]
    name: String,
    #[arg(long, help = "Unit price, at least 0.01")]
    price: String,
    #[arg(long, default_value = "", help = "Free-form description")]
    description: String,
    #[arg(long, help = "Id of the owning category")]
    category_id: i32,
}

#[derive(Args)]
struct CategoryArgs {
    #[arg(long, help = "Category name")]
    name: String,
}

#[derive(Args)]
struct CategoryUpdateArgs {
    id: i32,
    #[arg(long, help = "New category name")]
    name: String,
}

#[derive(Args)]
struct DeleteArgs {
    id: i32,
    #[arg(long, action = ArgAction::SetTrue, help = "Skip the confirmation prompt")]
    yes: bool,
}

async fn handle_products_command(
    client: &CatalogClient,
    command: ProductsCommands,
    json: bool,
) -> Result<()> {
    match command {
        ProductsCommands::List(args) => {
            let products = client.list_products().await.map_err(|_| api_failure(client))?;
            let mut table = ProductTable::new(products);
            if let Some(filter) = &args.filter {
                table.apply_filter(filter);
            }
            if let Some(sort) = args.sort {
                let direction = if args.desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                table.set_sort(sort.into(), direction);
            }
            table.set_page_size(args.page_size);
            table.set_page(args.page.saturating_sub(1));

            let page = table.page();
            if json {
                print_json(&page)?;
            } else if page.is_empty() {
                println!("No products found");
            } else {
                page.iter().for_each(|product| render_product(product));
                println!(
                    "Page {} of {} ({} products)",
                    table.page_index() + 1,
                    table.page_count().max(1),
                    table.filtered_len()
                );
            }
        }
        ProductsCommands::Create(args) => {
            let mut dialog = CreateProductDialog::open(client).await;
            dialog.form = ProductForm {
                name: args.name,
                description: args.description,
                price: args.price,
                category_id: None,
            };
            if !dialog.select_category(args.category_id) {
                let load_errors = client.error_messages();
                if !load_errors.is_empty() {
                    return Err(messages_failure(load_errors));
                }
                bail!("category {} does not exist", args.category_id);
            }

            let result = dialog.submit(client).await.map_err(form_failure)?;
            let product = completed(result)?;
            if json {
                print_json(&product)?;
            } else {
                println!("Created product:");
                render_product(&product);
            }
        }
        ProductsCommands::Delete(args) => {
            let product = client
                .get_product(args.id)
                .await
                .map_err(|_| api_failure(client))?;
            let dialog = DeleteProductDialog::new(product);
            let result = if args.yes || confirm(&dialog.prompt())? {
                dialog.confirm(client).await
            } else {
                dialog.cancel()
            };

            match result {
                DialogResult::Completed(()) => println!("Product {} deleted", args.id),
                DialogResult::Cancelled => println!("Aborted"),
                DialogResult::Failed(messages) => return Err(messages_failure(messages)),
            }
        }
    }

    Ok(())
}

async fn handle_categories_command(
    client: &CatalogClient,
    command: CategoriesCommands,
    json: bool,
) -> Result<()> {
    match command {
        CategoriesCommands::List => {
            let categories = client
                .list_categories()
                .await
                .map_err(|_| api_failure(client))?;
            if json {
                print_json(&categories)?;
            } else if categories.is_empty() {
                println!("No categories found");
            } else {
                categories.iter().for_each(render_category);
            }
        }
        CategoriesCommands::Create(args) => {
            let mut dialog = CreateCategoryDialog::new();
            dialog.form = CategoryForm { name: args.name };
            let result = dialog.submit(client).await.map_err(form_failure)?;
            let category = completed(result)?;
            if json {
                print_json(&category)?;
            } else {
                println!("Created category:");
                render_category(&category);
            }
        }
        CategoriesCommands::Update(args) => {
            let input = CategoryForm { name: args.name }
                .submit()
                .map_err(form_failure)?;
            let category = client
                .update_category(args.id, &input)
                .await
                .map_err(|_| api_failure(client))?;
            if json {
                print_json(&category)?;
            } else {
                render_category(&category);
            }
        }
        CategoriesCommands::Delete(args) => {
            if !args.yes && !confirm(&format!("Delete category {}?", args.id))? {
                println!("Aborted");
                return Ok(());
            }
            client
                .delete_category(args.id)
                .await
                .map_err(|_| api_failure(client))?;
            println!("Category {} deleted", args.id);
        }
    }

    Ok(())
}

fn completed<T>(result: DialogResult<T>) -> Result<T> {
    match result {
        DialogResult::Completed(value) => Ok(value),
        DialogResult::Failed(messages) => Err(messages_failure(messages)),
        DialogResult::Cancelled => bail!("cancelled"),
    }
}

fn api_failure(client: &CatalogClient) -> anyhow::Error {
    messages_failure(client.error_messages())
}

fn form_failure(errors: Vec<String>) -> anyhow::Error {
    anyhow!("invalid input:\n  {}", errors.join("\n  "))
}

fn messages_failure(messages: Vec<String>) -> anyhow::Error {
    anyhow!("request failed:\n  {}", messages.join("\n  "))
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_product(product: &ProductResponse) {
    println!(
        "- #{} {} • {} • {} • {}",
        product.id,
        product.name,
        product.price.normalize(),
        product.category_name(),
        product.description.as_deref().unwrap_or_default()
    );
}

fn render_category(category: &CategoryResponse) {
    println!("- #{} {}", category.id, category.name);
}
