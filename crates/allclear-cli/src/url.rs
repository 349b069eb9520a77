//! `url` subcommand: decode a map page query string.

use allclear_core::UrlQuery;
use serde_json::json;

pub(crate) fn describe_query(raw: &str) -> serde_json::Value {
    let query = UrlQuery::parse(raw);
    json!({
        "search": query.search,
        "selection": query.selection,
        "passthrough": query
            .passthrough
            .iter()
            .map(|(k, v)| json!([k, v]))
            .collect::<Vec<_>>(),
        "normalized": query.to_query_string(),
    })
}

/// Print the decoded map page parameters as JSON.
///
/// # Errors
///
/// Returns an error only if the output cannot be serialized.
pub(crate) fn run_url_decode(raw: &str) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&describe_query(raw))?);
    Ok(())
}
