//! Parsing of sort and filter arguments

use anyhow::{anyhow, bail, Context, Result};
use lazygrid_core::{
    CellValue, Field, FilterOperator, FilterPredicate, SortCriterion, SortDirection,
};

/// `FIELD` or `FIELD:asc` / `FIELD:desc`
pub fn parse_sort(raw: &str) -> Result<SortCriterion> {
    let (field, direction) = match raw.split_once(':') {
        Some((field, direction)) => (field, direction),
        None => (raw, "asc"),
    };
    let field: Field = field.trim().parse()?;
    let direction = match direction.trim().to_ascii_lowercase().as_str() {
        "asc" | "ascending" => SortDirection::Ascending,
        "desc" | "descending" => SortDirection::Descending,
        other => bail!("Unknown sort direction '{}' (expected asc or desc)", other),
    };
    Ok(SortCriterion::new(field, direction))
}

/// `FIELD=VALUE`, `FIELD!=VALUE`, `FIELD~VALUE` (contains), `FIELD^VALUE`
/// (starts with) or `FIELD$VALUE` (ends with)
pub fn parse_filter(raw: &str) -> Result<(Field, FilterPredicate)> {
    const OPERATORS: &[(&str, FilterOperator)] = &[
        ("!=", FilterOperator::NotEquals),
        ("=", FilterOperator::Equals),
        ("~", FilterOperator::Contains),
        ("^", FilterOperator::StartsWith),
        ("$", FilterOperator::EndsWith),
    ];

    // Earliest operator wins so values may contain operator characters
    let (index, token, operator) = OPERATORS
        .iter()
        .filter_map(|(token, operator)| raw.find(token).map(|i| (i, *token, *operator)))
        .min_by_key(|(i, _, _)| *i)
        .ok_or_else(|| anyhow!("Filter '{}' has no operator (=, !=, ~, ^, $)", raw))?;
    let (field, value) = (&raw[..index], &raw[index + token.len()..]);

    let field: Field = field.trim().parse()?;
    let value = match operator {
        FilterOperator::Equals | FilterOperator::NotEquals => {
            CellValue::parse(field.kind(), value.trim()).with_context(|| {
                format!("'{}' is not a valid {} value for {}", value, field.kind(), field)
            })?
        }
        _ => CellValue::Text(value.to_string()),
    };
    Ok((field, FilterPredicate::new(operator, value)))
}

/// Comma separated column ids
pub fn parse_columns(raw: &str) -> Result<Vec<Field>> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| Ok(part.trim().parse::<Field>()?))
        .collect()
}
