use serde_json::Value;

/// Sentinel name for recipes whose page carried no usable name.
pub const NAME_FALLBACK: &str = "N/A";

/// Un-normalized field values pulled out of a structured-data document.
#[derive(Debug, PartialEq)]
pub struct RawRecipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl RawRecipe {
    fn defaults() -> Self {
        RawRecipe {
            name: NAME_FALLBACK.to_string(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
        }
    }
}

/// Best-effort field extraction. Absent document or absent keys degrade
/// to defaults; a present key of the wrong shape downgrades the whole
/// result to defaults rather than erroring past this boundary.
pub fn extract_fields(document: Option<&Value>) -> RawRecipe {
    document
        .and_then(try_extract)
        .unwrap_or_else(RawRecipe::defaults)
}

/// None signals a structural mismatch somewhere in the document.
fn try_extract(doc: &Value) -> Option<RawRecipe> {
    let obj = doc.as_object()?;

    let name = match obj.get("name") {
        Some(v) => {
            let s = v.as_str()?.trim();
            if s.is_empty() {
                NAME_FALLBACK.to_string()
            } else {
                s.to_string()
            }
        }
        None => NAME_FALLBACK.to_string(),
    };

    let ingredients = match obj.get("recipeIngredient") {
        Some(v) => v
            .as_array()?
            .iter()
            .map(|e| e.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()?,
        None => Vec::new(),
    };

    // Steps are either plain strings or objects carrying a `text`
    // field; anything else is skipped rather than failing the page.
    let instructions = match obj.get("recipeInstructions") {
        Some(v) => v.as_array()?.iter().filter_map(step_text).collect(),
        None => Vec::new(),
    };

    Some(RawRecipe {
        name,
        ingredients,
        instructions,
    })
}

fn step_text(step: &Value) -> Option<String> {
    match step {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("text").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}
