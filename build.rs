use std::fs;

use toml::{Table, Value};

const CONFIG_PATH: &str = "src/default_config.toml";

fn main() {
    println!("cargo:rerun-if-changed={}", CONFIG_PATH);

    let content = fs::read_to_string(CONFIG_PATH).expect("Failed to read default_config.toml");
    let config = match content.parse::<Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    if let Err(e) = check_schema(&config) {
        panic!("Invalid default_config.toml: {}", e);
    }
}

/// Mirrors `Config` in src/config.rs. The bundled file must spell out every key.
fn check_schema(config: &Table) -> Result<(), String> {
    let font = section(config, "font")?;
    let size = integer(font, "font", "size")?;
    if !(6..=100).contains(&size) {
        return Err(format!("font.size must be within 6..=100, got {size}"));
    }
    string_list(font, "font", "normal")?;
    string_list(font, "font", "fixed")?;

    let layout = section(config, "layout")?;
    for key in ["indent_step", "preblock_margin"] {
        if integer(layout, "layout", key)? < 0 {
            return Err(format!("layout.{key} must not be negative"));
        }
    }

    let colors = section(config, "colors")?;
    for key in ["inline_code", "preblock"] {
        match colors.get(key) {
            Some(Value::String(color)) if color.starts_with('#') => {}
            Some(other) => {
                return Err(format!("colors.{key} must be a \"#rrggbb\" string, got {other}"));
            }
            None => return Err(format!("missing colors.{key}")),
        }
    }
    Ok(())
}

fn section<'a>(config: &'a Table, name: &str) -> Result<&'a Table, String> {
    match config.get(name) {
        Some(Value::Table(table)) => Ok(table),
        Some(_) => Err(format!("[{name}] must be a table")),
        None => Err(format!("missing [{name}] table")),
    }
}

fn integer(table: &Table, section: &str, key: &str) -> Result<i64, String> {
    match table.get(key) {
        Some(Value::Integer(n)) => Ok(*n),
        Some(other) => Err(format!("{section}.{key} must be an integer, got {other}")),
        None => Err(format!("missing {section}.{key}")),
    }
}

fn string_list(table: &Table, section: &str, key: &str) -> Result<(), String> {
    match table.get(key) {
        Some(Value::Array(items)) if items.iter().all(Value::is_str) => Ok(()),
        Some(other) => Err(format!("{section}.{key} must be a list of strings, got {other}")),
        None => Err(format!("missing {section}.{key}")),
    }
}
