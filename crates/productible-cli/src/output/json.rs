use productible_core::error::ProductibleError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), ProductibleError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
