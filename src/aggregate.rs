use anyhow::Result;
use rusqlite::Connection;
use tracing::debug;

/// Split a persisted comma-joined ingredients string into trimmed
/// tokens. Ingredients are opaque text throughout: no quantity/unit
/// parsing, no dedup, no merging.
pub fn split_ingredients(ingredients: &str) -> Vec<String> {
    ingredients
        .split(',')
        .map(|token| token.trim().to_string())
        .collect()
}

/// Flat ingredient list for every meal planned in the given month:
/// plan rows joined to their recipes (orphaned recipe_ids drop out),
/// date order then slot order, each recipe's ingredients split and
/// appended in turn. Duplicates are intentional; an empty month is a
/// valid empty result.
pub fn month_ingredients(conn: &Connection, year: i32, month: u32) -> Result<Vec<String>> {
    let prefix = format!("{:04}-{:02}-%", year, month);
    ingredients_matching(conn, &prefix)
}

/// Date-range form of the aggregation, keyed on a SQL LIKE pattern
/// over the stored YYYY-MM-DD dates.
pub fn ingredients_matching(conn: &Connection, date_pattern: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT r.ingredients
         FROM meal_plan mp
         JOIN recipes r ON r.id = mp.recipe_id
         WHERE mp.date LIKE ?1
         ORDER BY mp.date, mp.meal_type",
    )?;
    let blobs = stmt
        .query_map([date_pattern], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut tokens = Vec::new();
    for blob in &blobs {
        tokens.extend(split_ingredients(blob));
    }
    debug!(
        "aggregated {} tokens from {} planned meals matching {}",
        tokens.len(),
        blobs.len(),
        date_pattern
    );
    Ok(tokens)
}

/// Ingredient tokens for one stored recipe, for adding a single recipe
/// to the shopping list. Unknown ids yield an empty list.
pub fn recipe_ingredients(conn: &Connection, recipe_id: i64) -> Result<Vec<String>> {
    let recipe = crate::db::fetch_recipe(conn, recipe_id)?;
    Ok(recipe
        .map(|r| split_ingredients(&r.ingredients))
        .unwrap_or_default())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn splits_and_trims_tokens() {
        assert_eq!(split_ingredients("egg, milk"), vec!["egg", "milk"]);
        assert_eq!(
            split_ingredients("  flour ,sugar,  salt"),
            vec!["flour", "sugar", "salt"]
        );
    }

    #[test]
    fn month_aggregation_keeps_duplicates_in_date_order() {
        let conn = test_conn();
        let pancakes =
            db::insert_recipe(&conn, "Pancakes", "egg, milk", "Mix.", None, None).unwrap();
        let bread = db::insert_recipe(&conn, "Bread", "milk, flour", "Knead.", None, None).unwrap();

        db::upsert_meal_plan(&conn, "2026-08-03", "Breakfast", pancakes).unwrap();
        db::upsert_meal_plan(&conn, "2026-08-10", "Dinner", bread).unwrap();

        let tokens = month_ingredients(&conn, 2026, 8).unwrap();
        assert_eq!(tokens, vec!["egg", "milk", "milk", "flour"]);
    }

    #[test]
    fn slots_order_within_a_date() {
        let conn = test_conn();
        let a = db::insert_recipe(&conn, "A", "apple", "-", None, None).unwrap();
        let b = db::insert_recipe(&conn, "B", "banana", "-", None, None).unwrap();

        // Inserted out of slot order; output follows slot label order.
        db::upsert_meal_plan(&conn, "2026-08-03", "Dinner", b).unwrap();
        db::upsert_meal_plan(&conn, "2026-08-03", "Breakfast", a).unwrap();

        let tokens = month_ingredients(&conn, 2026, 8).unwrap();
        assert_eq!(tokens, vec!["apple", "banana"]);
    }

    #[test]
    fn empty_month_aggregates_to_empty_list() {
        let conn = test_conn();
        let tokens = month_ingredients(&conn, 2026, 2).unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn other_months_are_excluded() {
        let conn = test_conn();
        let soup = db::insert_recipe(&conn, "Soup", "carrot", "Boil.", None, None).unwrap();
        db::upsert_meal_plan(&conn, "2026-07-31", "Dinner", soup).unwrap();
        db::upsert_meal_plan(&conn, "2026-08-01", "Dinner", soup).unwrap();

        assert_eq!(month_ingredients(&conn, 2026, 8).unwrap(), vec!["carrot"]);
    }

    #[test]
    fn orphaned_plan_rows_are_skipped() {
        let conn = test_conn();
        let soup = db::insert_recipe(&conn, "Soup", "carrot", "Boil.", None, None).unwrap();
        db::upsert_meal_plan(&conn, "2026-08-01", "Dinner", soup).unwrap();
        db::delete_recipe(&conn, soup).unwrap();

        assert!(month_ingredients(&conn, 2026, 8).unwrap().is_empty());
    }

    #[test]
    fn single_recipe_tokens() {
        let conn = test_conn();
        let soup = db::insert_recipe(&conn, "Soup", "carrot, onion", "Boil.", None, None).unwrap();
        assert_eq!(
            recipe_ingredients(&conn, soup).unwrap(),
            vec!["carrot", "onion"]
        );
        assert!(recipe_ingredients(&conn, 9999).unwrap().is_empty());
    }
}
