use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;

pub const DEFAULT_DB_PATH: &str = "pantry.db";

/// Open a connection for the duration of one command. The handle is
/// passed explicitly everywhere; there is no ambient global.
///
/// Foreign key enforcement stays off: meal_plan rows are allowed to
/// outlive the recipe they reference, and readers skip the orphans.
pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS shopping_list (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            quantity     TEXT,
            brand        TEXT,
            instructions TEXT,
            category     TEXT,
            purchased    BOOLEAN NOT NULL CHECK (purchased IN (0, 1))
        );

        CREATE TABLE IF NOT EXISTS recipes (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            ingredients  TEXT NOT NULL,
            instructions TEXT NOT NULL,
            category     TEXT,
            image_path   TEXT
        );

        -- One row per (date, meal_type) is enforced by the upsert, not
        -- by a stored constraint.
        CREATE TABLE IF NOT EXISTS meal_plan (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            meal_type TEXT NOT NULL,
            recipe_id INTEGER,
            FOREIGN KEY (recipe_id) REFERENCES recipes (id)
        );
        CREATE INDEX IF NOT EXISTS idx_meal_plan_date ON meal_plan(date);
        ",
    )?;
    Ok(())
}

// ── Recipes ──

pub struct RecipeRow {
    pub id: i64,
    pub name: String,
    pub ingredients: String,
    pub instructions: String,
    pub category: Option<String>,
    pub image_path: Option<String>,
}

pub fn insert_recipe(
    conn: &Connection,
    name: &str,
    ingredients: &str,
    instructions: &str,
    category: Option<&str>,
    image_path: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO recipes (name, ingredients, instructions, category, image_path)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![name, ingredients, instructions, category, image_path],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn fetch_recipes(conn: &Connection) -> Result<Vec<RecipeRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, ingredients, instructions, category, image_path
         FROM recipes ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(RecipeRow {
                id: row.get(0)?,
                name: row.get(1)?,
                ingredients: row.get(2)?,
                instructions: row.get(3)?,
                category: row.get(4)?,
                image_path: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn fetch_recipe(conn: &Connection, id: i64) -> Result<Option<RecipeRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, ingredients, instructions, category, image_path
         FROM recipes WHERE id = ?1",
    )?;
    let mut rows = stmt.query_map([id], |row| {
        Ok(RecipeRow {
            id: row.get(0)?,
            name: row.get(1)?,
            ingredients: row.get(2)?,
            instructions: row.get(3)?,
            category: row.get(4)?,
            image_path: row.get(5)?,
        })
    })?;
    Ok(rows.next().transpose()?)
}

/// Deleting a recipe leaves any meal_plan rows pointing at it in
/// place; readers skip the orphaned references.
pub fn delete_recipe(conn: &Connection, id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?)
}

// ── Meal plan ──

pub struct PlannedMeal {
    pub date: String,
    pub meal_type: String,
    pub recipe_name: String,
}

/// Replace whatever is planned for this (date, meal_type) slot.
pub fn upsert_meal_plan(
    conn: &Connection,
    date: &str,
    meal_type: &str,
    recipe_id: i64,
) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM meal_plan WHERE date = ?1 AND meal_type = ?2",
        rusqlite::params![date, meal_type],
    )?;
    tx.execute(
        "INSERT INTO meal_plan (date, meal_type, recipe_id) VALUES (?1, ?2, ?3)",
        rusqlite::params![date, meal_type, recipe_id],
    )?;
    tx.commit()?;
    Ok(())
}

pub fn remove_meal_plan(conn: &Connection, date: &str, meal_type: &str) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM meal_plan WHERE date = ?1 AND meal_type = ?2",
        rusqlite::params![date, meal_type],
    )?)
}

/// Planned meals joined to their recipes, date order. Orphaned
/// recipe_ids drop out of the join.
pub fn fetch_meal_plan(conn: &Connection) -> Result<Vec<PlannedMeal>> {
    let mut stmt = conn.prepare(
        "SELECT mp.date, mp.meal_type, r.name
         FROM meal_plan mp
         JOIN recipes r ON r.id = mp.recipe_id
         ORDER BY mp.date, mp.meal_type",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(PlannedMeal {
                date: row.get(0)?,
                meal_type: row.get(1)?,
                recipe_name: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Shopping list ──

pub struct ShoppingItem {
    pub id: i64,
    pub name: String,
    pub quantity: Option<String>,
    pub brand: Option<String>,
    pub instructions: Option<String>,
    pub category: Option<String>,
    pub purchased: bool,
}

/// Manually entered item with optional metadata.
pub fn insert_shopping_item(
    conn: &Connection,
    name: &str,
    quantity: Option<&str>,
    brand: Option<&str>,
    instructions: Option<&str>,
    category: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO shopping_list (name, quantity, brand, instructions, category, purchased)
         VALUES (?1, ?2, ?3, ?4, ?5, 0)",
        rusqlite::params![name, quantity, brand, instructions, category],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Aggregator output: one row per ingredient token, name only.
/// Duplicate names are inserted as-is, never merged.
pub fn insert_shopping_tokens(conn: &Connection, tokens: &[String]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt =
            tx.prepare("INSERT INTO shopping_list (name, purchased) VALUES (?1, 0)")?;
        for token in tokens {
            count += stmt.execute([token])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

pub fn fetch_shopping_list(conn: &Connection) -> Result<Vec<ShoppingItem>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, quantity, brand, instructions, category, purchased
         FROM shopping_list ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ShoppingItem {
                id: row.get(0)?,
                name: row.get(1)?,
                quantity: row.get(2)?,
                brand: row.get(3)?,
                instructions: row.get(4)?,
                category: row.get(5)?,
                purchased: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn set_purchased(conn: &Connection, id: i64, purchased: bool) -> Result<usize> {
    Ok(conn.execute(
        "UPDATE shopping_list SET purchased = ?2 WHERE id = ?1",
        rusqlite::params![id, purchased],
    )?)
}

pub fn delete_shopping_item(conn: &Connection, id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM shopping_list WHERE id = ?1", [id])?)
}

pub fn clear_purchased(conn: &Connection) -> Result<usize> {
    Ok(conn.execute("DELETE FROM shopping_list WHERE purchased = 1", [])?)
}

// ── Stats ──

pub struct Stats {
    pub recipes: usize,
    pub planned_meals: usize,
    pub shopping_items: usize,
    pub purchased: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let recipes: usize = conn.query_row("SELECT COUNT(*) FROM recipes", [], |r| r.get(0))?;
    let planned_meals: usize =
        conn.query_row("SELECT COUNT(*) FROM meal_plan", [], |r| r.get(0))?;
    let shopping_items: usize =
        conn.query_row("SELECT COUNT(*) FROM shopping_list", [], |r| r.get(0))?;
    let purchased: usize = conn.query_row(
        "SELECT COUNT(*) FROM shopping_list WHERE purchased = 1",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        recipes,
        planned_meals,
        shopping_items,
        purchased,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn upsert_replaces_existing_slot() {
        let conn = test_conn();
        let eggs = insert_recipe(&conn, "Eggs", "egg, milk", "Whisk.", None, None).unwrap();
        let toast = insert_recipe(&conn, "Toast", "bread", "Toast it.", None, None).unwrap();

        upsert_meal_plan(&conn, "2026-08-25", "Breakfast", eggs).unwrap();
        upsert_meal_plan(&conn, "2026-08-25", "Breakfast", toast).unwrap();

        let plan = fetch_meal_plan(&conn).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].recipe_name, "Toast");
    }

    #[test]
    fn same_date_different_slots_coexist() {
        let conn = test_conn();
        let eggs = insert_recipe(&conn, "Eggs", "egg", "Whisk.", None, None).unwrap();
        upsert_meal_plan(&conn, "2026-08-25", "Breakfast", eggs).unwrap();
        upsert_meal_plan(&conn, "2026-08-25", "Dinner", eggs).unwrap();
        assert_eq!(fetch_meal_plan(&conn).unwrap().len(), 2);
    }

    #[test]
    fn deleting_recipe_orphans_plan_rows_quietly() {
        let conn = test_conn();
        let eggs = insert_recipe(&conn, "Eggs", "egg", "Whisk.", None, None).unwrap();
        upsert_meal_plan(&conn, "2026-08-25", "Breakfast", eggs).unwrap();
        delete_recipe(&conn, eggs).unwrap();

        // The row survives; the joined view just skips it.
        assert_eq!(get_stats(&conn).unwrap().planned_meals, 1);
        assert!(fetch_meal_plan(&conn).unwrap().is_empty());
    }

    #[test]
    fn duplicate_shopping_names_coexist() {
        let conn = test_conn();
        insert_shopping_tokens(&conn, &["milk".into(), "milk".into()]).unwrap();
        let items = fetch_shopping_list(&conn).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.name == "milk" && !i.purchased));
    }

    #[test]
    fn purchased_lifecycle() {
        let conn = test_conn();
        let id = insert_shopping_item(&conn, "flour", Some("1 kg"), None, None, None).unwrap();
        assert_eq!(set_purchased(&conn, id, true).unwrap(), 1);
        assert!(fetch_shopping_list(&conn).unwrap()[0].purchased);
        assert_eq!(clear_purchased(&conn).unwrap(), 1);
        assert!(fetch_shopping_list(&conn).unwrap().is_empty());
    }
}
