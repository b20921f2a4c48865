//! HTML fragments for the directory pages.
//!
//! Every record field goes through [`escape`] before it reaches the markup,
//! attribute values included.

use serde_json::Value;

use crate::domain::{RemoteRecord, Region, SearchResult, Statistics, Structure};
use crate::search::SearchPolicy;

pub const EMPTY_TABLE: &str = "<p>Aucune structure disponible pour cette région.</p>";
pub const NO_RESULTS: &str = r#"<p class="muted" style="color: var(--muted);">Aucun résultat trouvé</p>"#;
pub const NO_STATS: &str = "<p>Aucune statistique disponible.</p>";
pub const MISSING_CITY: &str = "-";

const UNSAFE_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Escapes the characters that are significant in text and quoted
/// attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Escaped `href` value; script-bearing schemes collapse to `#`.
fn href(target: &str) -> String {
    let trimmed = target.trim_start();
    let is_unsafe = UNSAFE_SCHEMES.iter().any(|scheme| {
        trimmed
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });

    if is_unsafe {
        "#".to_string()
    } else {
        escape(target)
    }
}

fn mail_link(email: &str) -> String {
    let email = escape(email);
    format!(r#"<a href="mailto:{email}">{email}</a>"#)
}

/// Body rows only, for pages that already carry the table skeleton.
pub fn render_structure_rows(structures: &[Structure]) -> String {
    let mut html = String::new();
    for structure in structures {
        html.push_str(&format!(
            "      <tr data-id=\"{id}\">\n        <td>{nom}</td>\n        <td>{email}</td>\n        <td>{contact}</td>\n        <td>{ville}</td>\n      </tr>\n",
            id = escape(&structure.id),
            nom = escape(&structure.nom),
            email = mail_link(&structure.email),
            contact = escape(&structure.contact),
            ville = escape(structure.ville.as_deref().unwrap_or(MISSING_CITY)),
        ));
    }
    html
}

/// The structures of one region as a table, or a notice when there are none.
pub fn render_structure_table(structures: &[Structure]) -> String {
    if structures.is_empty() {
        return EMPTY_TABLE.to_string();
    }

    let mut html = String::from(
        r#"<div class="table-wrap">
  <table>
    <caption>Liste des structures</caption>
    <thead>
      <tr>
        <th>Structure</th>
        <th>Email</th>
        <th>Contact</th>
        <th>Ville</th>
      </tr>
    </thead>
    <tbody>
"#,
    );
    html.push_str(&render_structure_rows(structures));
    html.push_str("    </tbody>\n  </table>\n</div>\n");
    html
}

pub fn render_nav(regions: &[Region]) -> String {
    regions
        .iter()
        .map(|region| {
            format!(
                r#"<a href="{}">{}</a>"#,
                href(&region.page),
                escape(&region.nom)
            )
        })
        .collect()
}

pub fn render_search_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut html = String::from(
        r#"<div class="card" style="margin-top: 8px;"><h3>Résultats de recherche:</h3><ul style="list-style: none; padding: 0;">"#,
    );
    for result in results {
        html.push_str(&format!(
            "\n  <li style=\"padding: 8px 0; border-bottom: 1px solid var(--border);\">\n    <strong>{nom}</strong> ({region})<br>\n    <small>📧 {email} | 📞 {contact}</small>\n  </li>",
            nom = escape(&result.nom),
            region = escape(&result.region),
            email = escape(&result.email),
            contact = escape(&result.contact),
        ));
    }
    html.push_str("\n</ul></div>");
    html
}

/// Rows for the remote record table body, one per record.
pub fn render_remote_rows(records: &[RemoteRecord]) -> String {
    if records.is_empty() {
        return r#"<tr><td colspan="3">Aucune structure trouvée pour cette région.</td></tr>"#
            .to_string();
    }

    records
        .iter()
        .map(|record| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&record.structure),
                mail_link(&record.email),
                escape(&record.contact)
            )
        })
        .collect()
}

/// Search input and results container appended to the page header.
pub fn render_search_box(policy: &SearchPolicy) -> String {
    format!(
        r#"<div style="margin-top: 16px;">
  <input
    type="text"
    id="searchInput"
    placeholder="Rechercher une structure..."
    data-min-chars="{min_chars}"
    style="padding: 8px 12px; border: 1px solid var(--border); border-radius: 8px; background: var(--panel); color: var(--text); width: 300px;"
  />
  <div id="searchResults" style="margin-top: 8px;"></div>
</div>
"#,
        min_chars = policy.min_chars
    )
}

fn stat_value(value: &Value) -> String {
    match value {
        Value::Null => MISSING_CITY.to_string(),
        Value::String(text) => escape(text),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => escape(&value.to_string()),
    }
}

pub fn render_stats(stats: &Statistics) -> String {
    if stats.is_empty() {
        return NO_STATS.to_string();
    }

    let mut html = String::from("<dl class=\"stats\">\n");
    for (key, value) in stats.entries() {
        html.push_str(&format!(
            "  <dt>{}</dt><dd>{}</dd>\n",
            escape(key),
            stat_value(value)
        ));
    }
    html.push_str("</dl>\n");
    html
}
