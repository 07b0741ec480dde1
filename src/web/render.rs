use serde::Serialize;
use serde_json::json;

use crate::domain::{Category, MapStyle, ResolvedPlace, SearchOrigin, category_label};
use crate::search::CandidateSearch;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Draws `MAP_DATA.markers` on a Leaflet map and fits the view to them.
/// Popup content is built with `textContent` so no upstream string is parsed
/// as HTML.
const MAP_SCRIPT: &str = r#"<script>
const MAP_DATA = __MAP_DATA__;
const map = L.map('map');
L.tileLayer(MAP_DATA.tiles, { attribution: MAP_DATA.attribution, maxZoom: 19 }).addTo(map);
const bounds = [];
for (const m of MAP_DATA.markers) {
  const popup = document.createElement('div');
  const title = document.createElement('strong');
  title.textContent = m.title;
  popup.appendChild(title);
  for (const line of m.lines) {
    const p = document.createElement('div');
    p.textContent = line;
    popup.appendChild(p);
  }
  const options = m.origin ? { opacity: 0.9, title: m.title } : { title: m.title };
  const marker = m.origin
    ? L.circleMarker([m.lat, m.lon], { radius: 10, color: '#d33' })
    : L.marker([m.lat, m.lon], options);
  marker.addTo(map).bindPopup(popup);
  bounds.push([m.lat, m.lon]);
}
if (bounds.length > 0) {
  map.fitBounds(bounds, { padding: [30, 30], maxZoom: 16 });
} else {
  map.setView([0, 0], 2);
}
</script>"#;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON safe to embed inside a `<script>` element. `<` only occurs inside
/// JSON strings, where `\u003c` decodes to the same character.
fn script_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace('<', "\\u003c")
}

/// Only http(s) URLs become links
fn is_web_url(url: &str) -> bool {
    let url = url.trim().to_ascii_lowercase();
    url.starts_with("http://") || url.starts_with("https://")
}

fn layout(title: &str, body: &str, with_map: bool) -> String {
    let map_head = if with_map {
        format!(
            r#"<link rel="stylesheet" href="{}">
<script src="{}"></script>"#,
            LEAFLET_CSS, LEAFLET_JS
        )
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
{map_head}
<style>
body {{ font-family: sans-serif; margin: 0 auto; max-width: 960px; padding: 1rem; }}
#map {{ height: 480px; margin: 1rem 0; }}
.error {{ color: #b00; }}
.place {{ border-bottom: 1px solid #ddd; padding: 0.5rem 0; }}
form.inline {{ display: inline; }}
</style>
</head>
<body>
<h1><a href="/">Place Finder</a></h1>
{body}
</body>
</html>"#,
        title = escape_html(title),
        map_head = map_head,
        body = body
    )
}

fn category_options(selected: &str, include_general: bool) -> String {
    let mut options = String::new();
    if include_general {
        options.push_str(&format!(
            r#"<option value="general"{}>Any</option>"#,
            if selected.is_empty() || selected == "general" { " selected" } else { "" }
        ));
    }
    for category in Category::ALL {
        options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            category.key(),
            if category.key() == selected { " selected" } else { "" },
            escape_html(&category.label())
        ));
    }
    options
}

fn style_options(selected: MapStyle) -> String {
    MapStyle::ALL
        .iter()
        .map(|style| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                style.key(),
                if *style == selected { " selected" } else { "" },
                style.label()
            )
        })
        .collect()
}

/// Search form, optionally with a message explaining why the last search failed
pub fn index_page(error: Option<&str>) -> String {
    let error_html = error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape_html(e)))
        .unwrap_or_default();

    let body = format!(
        r#"{error_html}
<h2>Find a place</h2>
<form method="post" action="/search">
  <input name="place" placeholder="City, address or landmark" required>
  <select name="category">{general_options}</select>
  <button type="submit">Search</button>
</form>
<h2>Explore around a place</h2>
<form method="post" action="/explore">
  <input name="place" placeholder="City, address or landmark" required>
  <select name="category">{category_options}</select>
  <select name="style">{style_options}</select>
  <button type="submit">Explore</button>
</form>"#,
        error_html = error_html,
        general_options = category_options("general", true),
        category_options = category_options(Category::Restaurant.key(), false),
        style_options = style_options(MapStyle::default()),
    );

    layout("Place Finder", &body, false)
}

/// Every geocoder candidate on a map, each with a form to search around it
pub fn candidates_page(search: &CandidateSearch, category: &str) -> String {
    let markers: Vec<serde_json::Value> = search
        .candidates
        .iter()
        .map(|c| {
            json!({
                "lat": c.lat,
                "lon": c.lon,
                "title": c.name,
                "lines": [format!("{} / {}", c.class, c.kind)],
                "origin": false,
            })
        })
        .collect();

    let data = json!({
        "tiles": MapStyle::Standard.tile_url(),
        "attribution": MapStyle::Standard.attribution(),
        "markers": markers,
    });

    let nearby_category = super::nearby_category(category);

    let list: String = search
        .candidates
        .iter()
        .map(|c| {
            format!(
                r#"<div class="place">
  <strong>{name}</strong> <small>({class} / {kind})</small><br>
  <small>{lat:.5}, {lon:.5}</small>
  <form class="inline" method="post" action="/nearby">
    <input type="hidden" name="lat" value="{lat}">
    <input type="hidden" name="lon" value="{lon}">
    <input type="hidden" name="name" value="{name}">
    <select name="category">{categories}</select>
    <select name="style">{styles}</select>
    <button type="submit">Search nearby</button>
  </form>
</div>"#,
                name = escape_html(&c.name),
                class = escape_html(&c.class),
                kind = escape_html(&c.kind),
                lat = c.lat,
                lon = c.lon,
                categories = category_options(nearby_category, false),
                styles = style_options(MapStyle::default()),
            )
        })
        .collect();

    let body = format!(
        r#"<h2>{count} result(s) for "{query}"</h2>
<div id="map"></div>
{list}
{script}"#,
        count = search.candidates.len(),
        query = escape_html(&search.query),
        list = list,
        script = MAP_SCRIPT.replace("__MAP_DATA__", &script_json(&data)),
    );

    layout(&format!("Results for {}", search.query), &body, true)
}

/// The search origin and the nearby places found around it
pub fn nearby_page(
    origin: &SearchOrigin,
    places: &[ResolvedPlace],
    category: &str,
    style: MapStyle,
) -> String {
    let label = category_label(category);

    let mut markers = vec![json!({
        "lat": origin.lat,
        "lon": origin.lon,
        "title": origin.name,
        "lines": ["Search origin"],
        "origin": true,
    })];
    markers.extend(places.iter().map(|p| {
        let mut lines = vec![
            p.category.clone(),
            p.address.clone(),
            format!("Phone: {}", p.phone),
            format!("{} m away", p.distance_m),
        ];
        if !p.website.is_empty() {
            lines.push(p.website.clone());
        }
        json!({
            "lat": p.lat,
            "lon": p.lon,
            "title": p.name,
            "lines": lines,
            "origin": false,
        })
    }));

    let data = json!({
        "tiles": style.tile_url(),
        "attribution": style.attribution(),
        "markers": markers,
    });

    let list = if places.is_empty() {
        format!(
            r#"<p>No {} found nearby.</p>"#,
            escape_html(&label.to_lowercase())
        )
    } else {
        places
            .iter()
            .map(|p| {
                let website = if p.website.is_empty() {
                    String::new()
                } else if !is_web_url(&p.website) {
                    format!("<br>{}", escape_html(&p.website))
                } else {
                    format!(
                        r#"<br><a href="{0}" rel="noopener noreferrer" target="_blank">{0}</a>"#,
                        escape_html(p.website.trim())
                    )
                };
                format!(
                    r#"<div class="place">
  <strong>{name}</strong> <small>{distance} m</small><br>
  {address}<br>
  Phone: {phone}{website}
</div>"#,
                    name = escape_html(&p.name),
                    distance = p.distance_m,
                    address = escape_html(&p.address),
                    phone = escape_html(&p.phone),
                    website = website,
                )
            })
            .collect()
    };

    let body = format!(
        r#"<h2>{label} near {origin}</h2>
<p>{count} place(s), closest first.</p>
<div id="map"></div>
{list}
{script}"#,
        label = escape_html(&label),
        origin = escape_html(&origin.name),
        count = places.len(),
        list = list,
        script = MAP_SCRIPT.replace("__MAP_DATA__", &script_json(&data)),
    );

    layout(&format!("{} near {}", label, origin.name), &body, true)
}
