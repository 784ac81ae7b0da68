//! Plain-text rendering of list pages.

use countrydb_core::geo::distance_between;
use countrydb_core::prelude::*;
use std::fmt::Write;

/// One list page: the canonical href, the rows and the pager.
pub fn render_list(
    href: &str,
    state: &QueryState,
    view: &ListView<'_>,
    location: Option<UserLocation>,
) -> String {
    let mut out = String::new();
    let shown = if href.is_empty() { "(defaults)" } else { href };
    let _ = writeln!(out, "{shown}");

    if view.is_empty() {
        if view.total_items == 0 {
            let _ = writeln!(out, "No countries match.");
        } else {
            let _ = writeln!(out, "Page {} is past the end.", state.page);
        }
    }

    let offset = (state.page as usize - 1) * state.page_size as usize;
    for (i, country) in view.items.iter().enumerate() {
        let _ = write!(
            out,
            "{:>4}. {:<32} {:<4} {:<10}",
            offset + i + 1,
            country.name,
            country.code,
            country.region
        );
        if let Some(km) = location
            .filter(|_| state.sort_by_distance)
            .zip(country.position())
            .map(|(from, to)| distance_between(from, to))
        {
            let _ = write!(out, " {km:>8.0} km");
        }
        out.push('\n');
    }

    if view.total_pages > 0 {
        let total = u32::try_from(view.total_pages).unwrap_or(u32::MAX);
        let pages: Vec<String> = page_window(state.page, total)
            .into_iter()
            .map(|p| {
                if p == state.page {
                    format!("[{p}]")
                } else {
                    p.to_string()
                }
            })
            .collect();
        let _ = writeln!(
            out,
            "page {} of {} ({} countries)  {}",
            state.page,
            view.total_pages,
            view.total_items,
            pages.join(" ")
        );
    }
    out
}
