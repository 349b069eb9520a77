//! Search command handlers.
//!
//! Each handler wires the same stack the map page uses: one
//! [`FacilityClient`] behind the [`FacilitySearch`] seam, one [`MapStore`],
//! a headless viewport at the configured default center, and a
//! [`LocationResolver`] driving them. Output is rendered from the settled
//! [`MapState`] snapshot.

use std::sync::Arc;

use allclear_client::{FacilityClient, FacilitySearch};
use allclear_core::{AppConfig, GeoPosition, PlaceSelection, SearchCriteria};
use allclear_locator::{
    FixedGeolocation, HeadlessViewport, ListView, LocationResolver, MapState, MapStore,
    MountOutcome, ResolverOptions, SearchTicket, ViewSync,
};
use anyhow::Context;
use serde_json::Value;

fn build_resolver(config: &AppConfig) -> anyhow::Result<LocationResolver> {
    let client = FacilityClient::from_config(config).context("failed to build search client")?;
    let search: Arc<dyn FacilitySearch> = Arc::new(client);
    let viewport = Arc::new(HeadlessViewport::new(config.default_center));
    Ok(LocationResolver::new(
        search,
        MapStore::default(),
        viewport,
        ResolverOptions::from_config(config),
    ))
}

async fn settle(resolver: &LocationResolver) -> Arc<MapState> {
    let state = resolver.store().wait_until_settled().await;
    tracing::info!(
        seq = state.applied_seq,
        count = state.locations.len(),
        "search settled"
    );
    state
}

/// Parses `key=value`. `true`, `false`, and numbers become JSON scalars;
/// anything else is kept as a string.
pub(crate) fn parse_filter(raw: &str) -> anyhow::Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("filter `{raw}` is not key=value"))?;
    let key = key.trim();
    anyhow::ensure!(!key.is_empty(), "filter `{raw}` has an empty key");

    let value = value.trim();
    let parsed = match serde_json::from_str::<Value>(value) {
        Ok(v @ (Value::Bool(_) | Value::Number(_))) => v,
        _ => Value::String(value.to_owned()),
    };
    Ok((key.to_owned(), parsed))
}

pub(crate) fn parse_criteria(filters: &[String]) -> anyhow::Result<SearchCriteria> {
    filters.iter().map(|raw| parse_filter(raw)).collect()
}

/// Run a search at `position` and print the results.
///
/// # Errors
///
/// Returns an error if a filter does not parse, the client cannot be built,
/// or the search fails.
pub(crate) async fn run_search(
    config: &AppConfig,
    position: GeoPosition,
    filters: &[String],
    unfiltered: bool,
    json: bool,
) -> anyhow::Result<()> {
    let criteria = parse_criteria(filters)?;
    let resolver = build_resolver(config)?;

    let ticket = if unfiltered {
        resolver.search_unfiltered(position)
    } else {
        resolver.store().set_criteria(criteria);
        resolver.search_at(position)
    };

    let state = settle(&resolver).await;
    ensure_succeeded(&state, ticket)?;
    print_results(&state, json)
}

/// Run a search around an autocomplete selection.
///
/// # Errors
///
/// Returns an error if `place` is not selection JSON, has no description,
/// or the search fails.
pub(crate) async fn run_locate(config: &AppConfig, place: &str, json: bool) -> anyhow::Result<()> {
    let place: PlaceSelection = serde_json::from_str(place)
        .context("place must be {description, latitude, longitude, id}")?;
    let resolver = build_resolver(config)?;

    let ticket = resolver
        .on_place_selected(&place)
        .context("place has no description; nothing to search")?;

    let state = settle(&resolver).await;
    ensure_succeeded(&state, ticket)?;
    print_results(&state, json)
}

/// Simulate page mount.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the final search fails.
pub(crate) async fn run_mount(
    config: &AppConfig,
    device: Option<GeoPosition>,
    profile: Option<GeoPosition>,
    json: bool,
) -> anyhow::Result<()> {
    let resolver = build_resolver(config)?;
    resolver.store().set_person(profile);

    let outcome = resolver
        .on_mount(&FixedGeolocation::from_option(device))
        .await;
    tracing::debug!(?outcome, "mount resolved");
    match outcome {
        MountOutcome::DeviceLocation(p) => {
            println!("centered on device location {},{}", p.latitude, p.longitude);
        }
        MountOutcome::ProfileLocation(p) => {
            println!("centered on profile location {},{}", p.latitude, p.longitude);
        }
        MountOutcome::DefaultCenter(p) => {
            println!(
                "location unavailable; map stays at {},{} and nothing was searched",
                p.latitude, p.longitude
            );
            return Ok(());
        }
    }

    let state = settle(&resolver).await;
    if let Some(failure) = &state.last_error {
        tracing::warn!(seq = failure.seq, error = %failure.message, "mount search failed");
        anyhow::bail!("search failed: {}", failure.message);
    }
    print_results(&state, json)
}

fn ensure_succeeded(state: &MapState, ticket: SearchTicket) -> anyhow::Result<()> {
    match &state.last_error {
        Some(failure) if failure.seq == ticket.seq => {
            tracing::warn!(
                seq = failure.seq,
                retryable = failure.retryable,
                error = %failure.message,
                "search failed"
            );
            let hint = if ViewSync::retry_prompt(state).is_some() {
                " (transient; try again)"
            } else {
                ""
            };
            anyhow::bail!("search failed: {}{hint}", failure.message)
        }
        _ => Ok(()),
    }
}

fn print_results(state: &MapState, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&*state.locations)?);
        return Ok(());
    }

    let active = state.search_criteria.count_active();
    if active > 0 {
        let keys: Vec<String> = state.search_criteria.diff().into_iter().collect();
        println!("filters ({active}): {}", keys.join(", "));
    }

    match ViewSync::list_view(state) {
        ListView::Loading => println!("still loading"),
        ListView::Empty { message } => println!("{message}"),
        ListView::Results(records) => {
            for (marker, record) in ViewSync::markers(state).iter().zip(records.iter()) {
                println!("{:>3}. {}", marker.label, record.name);
                if !record.address.is_empty() {
                    println!("     {}, {}", record.address, record.city_state());
                }
                if let Some(hours) = &record.hours {
                    println!("     hours: {hours}");
                }
                if record.drive_thru {
                    println!("     drive-thru");
                }
                if let Some(phone) = &record.phone {
                    println!("     phone: {phone}");
                }
            }
        }
    }
    Ok(())
}
