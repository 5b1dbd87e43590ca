mod aggregate;
mod db;
mod fetch;
mod ingest;

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pantry", about = "Pantry shopping list, recipes, and meal planner")]
struct Cli {
    /// SQLite database path
    #[arg(long, default_value = db::DEFAULT_DB_PATH, global = true)]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init,
    /// Import a recipe from a web page
    Import {
        url: String,
        /// Persist the imported recipe instead of only printing it
        #[arg(long)]
        save: bool,
        /// Category for the saved recipe
        #[arg(short, long)]
        category: Option<String>,
        /// Print the normalized record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a recipe by hand
    AddRecipe {
        #[arg(long)]
        name: String,
        /// Comma-separated ingredient list
        #[arg(long)]
        ingredients: String,
        /// Newline-separated steps
        #[arg(long)]
        instructions: String,
        #[arg(short, long)]
        category: Option<String>,
        /// Path to a local image of the dish
        #[arg(long)]
        image: Option<String>,
    },
    /// List stored recipes
    Recipes,
    /// Show one recipe in full
    Show { id: i64 },
    /// Delete a recipe (planned meals referencing it are left in place)
    RemoveRecipe { id: i64 },
    /// Plan a recipe into a (date, meal) slot, replacing what was there
    Plan {
        /// Calendar day, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Slot label, e.g. Breakfast, Lunch, Snack, Dinner
        #[arg(long)]
        meal: String,
        /// Recipe id
        #[arg(long)]
        recipe: i64,
    },
    /// Show the meal plan
    Meals,
    /// Clear one (date, meal) slot
    Unplan {
        #[arg(long)]
        date: String,
        #[arg(long)]
        meal: String,
    },
    /// Add every ingredient of the month's planned meals to the shopping list
    Shop {
        year: i32,
        month: u32,
        /// Print the tokens without inserting them
        #[arg(long)]
        dry_run: bool,
    },
    /// Add one recipe's ingredients to the shopping list
    ShopRecipe { id: i64 },
    /// Add a shopping list item by hand
    AddItem {
        #[arg(long)]
        name: String,
        #[arg(long)]
        quantity: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show the shopping list
    List,
    /// Mark a shopping list item as purchased
    Bought { id: i64 },
    /// Delete a shopping list item
    RemoveItem { id: i64 },
    /// Delete every purchased item
    ClearBought,
    /// Show table counts
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let conn = db::connect(&cli.db)?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Init => {
            println!("Initialized {}", cli.db.display());
            Ok(())
        }
        Commands::Import {
            url,
            save,
            category,
            json,
        } => {
            let recipe = match ingest::import_recipe(&url) {
                Ok(recipe) => recipe,
                Err(e) => bail!("{}. Check the URL and try again.", e),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&recipe)?);
            } else if recipe.is_empty() {
                println!("Fetched the page, but found no recipe data.");
                println!("Add the recipe manually with 'add-recipe'.");
            } else {
                print_recipe_record(&recipe);
            }

            if save {
                if recipe.is_empty() {
                    bail!("nothing to save: the page had no recipe data");
                }
                let id = db::insert_recipe(
                    &conn,
                    &recipe.name,
                    &recipe.ingredients_joined(),
                    &recipe.instructions_joined(),
                    category.as_deref(),
                    None,
                )?;
                println!("\nSaved as recipe {}.", id);
            }
            Ok(())
        }
        Commands::AddRecipe {
            name,
            ingredients,
            instructions,
            category,
            image,
        } => {
            let id = db::insert_recipe(
                &conn,
                &name,
                &ingredients,
                &instructions,
                category.as_deref(),
                image.as_deref(),
            )?;
            println!("Saved as recipe {}.", id);
            Ok(())
        }
        Commands::Recipes => {
            let rows = db::fetch_recipes(&conn)?;
            if rows.is_empty() {
                println!("No recipes stored.");
                return Ok(());
            }
            println!(
                "{:>4} | {:<30} | {:<12} | {}",
                "ID", "Name", "Category", "Ingredients"
            );
            println!("{}", "-".repeat(90));
            for r in &rows {
                println!(
                    "{:>4} | {:<30} | {:<12} | {}",
                    r.id,
                    truncate(&r.name, 30),
                    truncate(r.category.as_deref().unwrap_or("-"), 12),
                    truncate(&r.ingredients, 34),
                );
            }
            println!("\n{} recipes", rows.len());
            Ok(())
        }
        Commands::Show { id } => {
            let Some(r) = db::fetch_recipe(&conn, id)? else {
                bail!("no recipe with id {}", id);
            };
            println!("{} (id {})", r.name, r.id);
            if let Some(cat) = &r.category {
                println!("Category: {}", cat);
            }
            if let Some(path) = &r.image_path {
                println!("Image: {}", path);
            }
            println!("\nIngredients:");
            for token in aggregate::split_ingredients(&r.ingredients) {
                println!("  - {}", token);
            }
            println!("\nInstructions:");
            for (i, step) in r.instructions.lines().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
            Ok(())
        }
        Commands::RemoveRecipe { id } => {
            let removed = db::delete_recipe(&conn, id)?;
            if removed == 0 {
                println!("No recipe with id {}.", id);
            } else {
                println!("Removed recipe {}.", id);
            }
            Ok(())
        }
        Commands::Plan { date, meal, recipe } => {
            if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
                bail!("invalid date '{}': expected YYYY-MM-DD", date);
            }
            let Some(row) = db::fetch_recipe(&conn, recipe)? else {
                bail!("no recipe with id {}", recipe);
            };
            db::upsert_meal_plan(&conn, &date, &meal, recipe)?;
            println!("{} {}: {}", date, meal, row.name);
            Ok(())
        }
        Commands::Meals => {
            let rows = db::fetch_meal_plan(&conn)?;
            if rows.is_empty() {
                println!("No meals planned.");
                return Ok(());
            }
            println!("{:<12} | {:<10} | {}", "Date", "Meal", "Recipe");
            println!("{}", "-".repeat(60));
            for m in &rows {
                println!(
                    "{:<12} | {:<10} | {}",
                    m.date,
                    truncate(&m.meal_type, 10),
                    truncate(&m.recipe_name, 32)
                );
            }
            Ok(())
        }
        Commands::Unplan { date, meal } => {
            let removed = db::remove_meal_plan(&conn, &date, &meal)?;
            if removed == 0 {
                println!("Nothing planned for {} {}.", date, meal);
            } else {
                println!("Cleared {} {}.", date, meal);
            }
            Ok(())
        }
        Commands::Shop {
            year,
            month,
            dry_run,
        } => {
            if !(1..=12).contains(&month) {
                bail!("invalid month {}: expected 1-12", month);
            }
            let tokens = aggregate::month_ingredients(&conn, year, month)?;
            if tokens.is_empty() {
                println!(
                    "No meals planned for {:04}-{:02}; nothing to add.",
                    year, month
                );
                return Ok(());
            }
            for token in &tokens {
                println!("{}", token);
            }
            if dry_run {
                println!("\n{} ingredients (dry run, nothing inserted)", tokens.len());
            } else {
                let added = db::insert_shopping_tokens(&conn, &tokens)?;
                println!("\nAdded {} ingredients to the shopping list.", added);
            }
            Ok(())
        }
        Commands::ShopRecipe { id } => {
            if db::fetch_recipe(&conn, id)?.is_none() {
                bail!("no recipe with id {}", id);
            }
            let tokens = aggregate::recipe_ingredients(&conn, id)?;
            let added = db::insert_shopping_tokens(&conn, &tokens)?;
            println!("Added {} ingredients to the shopping list.", added);
            Ok(())
        }
        Commands::AddItem {
            name,
            quantity,
            brand,
            instructions,
            category,
        } => {
            db::insert_shopping_item(
                &conn,
                &name,
                quantity.as_deref(),
                brand.as_deref(),
                instructions.as_deref(),
                category.as_deref(),
            )?;
            println!("Added {}.", name);
            Ok(())
        }
        Commands::List => {
            let items = db::fetch_shopping_list(&conn)?;
            if items.is_empty() {
                println!("Shopping list is empty.");
                return Ok(());
            }
            println!(
                "{:>4} | {:<28} | {:<10} | {:<10} | {:<12} | {:<16} | {}",
                "ID", "Name", "Quantity", "Brand", "Category", "Notes", "Bought"
            );
            println!("{}", "-".repeat(100));
            for i in &items {
                println!(
                    "{:>4} | {:<28} | {:<10} | {:<10} | {:<12} | {:<16} | {}",
                    i.id,
                    truncate(&i.name, 28),
                    truncate(i.quantity.as_deref().unwrap_or("-"), 10),
                    truncate(i.brand.as_deref().unwrap_or("-"), 10),
                    truncate(i.category.as_deref().unwrap_or("-"), 12),
                    truncate(i.instructions.as_deref().unwrap_or("-"), 16),
                    if i.purchased { "yes" } else { "no" },
                );
            }
            println!("\n{} items", items.len());
            Ok(())
        }
        Commands::Bought { id } => {
            let updated = db::set_purchased(&conn, id, true)?;
            if updated == 0 {
                println!("No item with id {}.", id);
            } else {
                println!("Marked {} as purchased.", id);
            }
            Ok(())
        }
        Commands::RemoveItem { id } => {
            let removed = db::delete_shopping_item(&conn, id)?;
            if removed == 0 {
                println!("No item with id {}.", id);
            } else {
                println!("Removed item {}.", id);
            }
            Ok(())
        }
        Commands::ClearBought => {
            let removed = db::clear_purchased(&conn)?;
            println!("Removed {} purchased items.", removed);
            Ok(())
        }
        Commands::Stats => {
            let s = db::get_stats(&conn)?;
            println!("Recipes:        {}", s.recipes);
            println!("Planned meals:  {}", s.planned_meals);
            println!("Shopping items: {}", s.shopping_items);
            println!("Purchased:      {}", s.purchased);
            Ok(())
        }
    }
}

fn print_recipe_record(recipe: &ingest::NormalizedRecipe) {
    println!("Name: {}", recipe.name);
    println!("\nIngredients:");
    for ing in &recipe.ingredients {
        println!("  - {}", ing);
    }
    println!("\nInstructions:");
    for (i, step) in recipe.instructions.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
