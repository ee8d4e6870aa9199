//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Capitalizes the first letter of a category name for display.
///
/// Usage in templates: `{{ category|title_case }}`
#[askama::filter_fn]
pub fn title_case(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(capitalize(&value.to_string()))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::capitalize;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("jewelry"), "Jewelry");
        assert_eq!(capitalize("men's clothing"), "Men's clothing");
        assert_eq!(capitalize(""), "");
    }
}
