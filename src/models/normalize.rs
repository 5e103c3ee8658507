use crate::config::Config;
use crate::models::{PropertyDetail, PropertySummary, RawRecord, PLACEHOLDER};
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde_json::{Number, Value};

const IMAGE_FIELD: &str = "url_img";

/// Turns raw upstream records into page models.
///
/// Normalization is total: every field is optional on the way in and every
/// output field is populated, with [`PLACEHOLDER`] or zero standing in for
/// whatever the record lacks.
#[derive(Debug, Clone)]
pub struct Normalizer {
    image_base_url: String,
    site_url: String,
    share_service_url: Url,
}

impl Normalizer {
    pub fn new(image_base_url: &str, site_url: &str, share_service_url: Url) -> Self {
        Self {
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
            site_url: site_url.trim_end_matches('/').to_string(),
            share_service_url,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.image_base_url,
            &config.site_url,
            config.share_service_url.clone(),
        )
    }

    /// Canonical public URL of a detail page
    pub fn page_url(&self, id: &str) -> String {
        format!("{}/{}", self.site_url, id)
    }

    pub fn normalize_summary(&self, raw: &RawRecord) -> PropertySummary {
        let filenames = normalize_image_field(raw.field(IMAGE_FIELD));

        PropertySummary {
            id: raw.id.clone(),
            street_name: text_field(raw, "street_name"),
            map_area: text_field(raw, "map_area"),
            property_type: text_field(raw, "property_type"),
            price_current: price_field(raw, "price_current"),
            image_urls: resolve_image_urls(&self.image_base_url, &filenames),
        }
    }

    pub fn normalize_detail(&self, raw: &RawRecord) -> PropertyDetail {
        let summary = self.normalize_summary(raw);
        let page_url = self.page_url(&summary.id);
        let share_text = build_share_text(&summary.street_name, summary.price_current, &page_url);
        let share_href = share_link(&self.share_service_url, &share_text);

        let remarks = optional_text(raw, "remarks_es").or_else(|| optional_text(raw, "remarks"));
        let listed_at = raw
            .created_time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc));

        PropertyDetail {
            subdivision: text_field(raw, "subdivision"),
            region: text_field(raw, "region"),
            district: text_field(raw, "district"),
            year_built: text_field(raw, "year_built"),
            bedrooms: text_field(raw, "bedrooms"),
            bathrooms: text_field(raw, "bathrooms"),
            half_bathrooms: text_field(raw, "half_bathrooms"),
            number_of_rooms: text_field(raw, "number_of_rooms"),
            lot_sqft: text_field(raw, "lot_sqft"),
            sqft_total: text_field(raw, "sqft_total"),
            style: text_field(raw, "style"),
            remodelled: text_field(raw, "remodelled"),
            possession: text_field(raw, "possession"),
            zoning: text_field(raw, "zoning"),
            status: text_field(raw, "status"),
            interior_features: text_field(raw, "interior_features"),
            exterior_features: text_field(raw, "exterior_features"),
            other_services: text_field(raw, "other_services"),
            internal_features: text_field(raw, "internal_features"),
            remarks,
            listed_at,
            page_url,
            share_text,
            share_href,
            summary,
        }
    }
}

/// Filenames from an image field that may be a list, a comma-joined string,
/// or missing altogether. Order is preserved and blank entries are dropped.
/// Scalar list elements use their string form; nested lists, objects and
/// nulls are skipped.
pub fn normalize_image_field(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .filter(|name| !name.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

pub fn resolve_image_urls(base_url: &str, filenames: &[String]) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    filenames
        .iter()
        .map(|name| format!("{}/{}", base, name.trim_start_matches('/')))
        .collect()
}

/// Plain-text share message; encode with [`share_link`] before embedding.
pub fn build_share_text(street_name: &str, price_current: f64, page_url: &str) -> String {
    let street = if street_name.trim().is_empty() {
        PLACEHOLDER
    } else {
        street_name
    };
    format!("{} – ${}\n{}", street, format_price(price_current), page_url)
}

pub fn share_link(share_service_url: &Url, share_text: &str) -> String {
    let mut url = share_service_url.clone();
    url.query_pairs_mut().append_pair("text", share_text);
    url.to_string()
}

/// en-US style grouping: `1234567.5` renders as `1,234,567.5`.
/// Values of 1e15 and above are shown whole; their fraction is noise.
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let abs = value.abs();
    let (whole, fraction) = if abs >= 1e15 {
        (format!("{:.0}", abs.trunc()), String::new())
    } else {
        let rounded = (abs * 1000.0).round() / 1000.0;
        let fraction = format!("{:.3}", rounded.fract());
        let fraction = fraction
            .trim_start_matches('0')
            .trim_start_matches('.')
            .trim_end_matches('0')
            .to_string();
        (format!("{:.0}", rounded.trunc()), fraction)
    };

    let mut out = String::new();
    if value < 0.0 && (whole != "0" || !fraction.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_thousands(&whole));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(&fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn text_field(raw: &RawRecord, name: &str) -> String {
    optional_text(raw, name).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn optional_text(raw: &RawRecord, name: &str) -> Option<String> {
    raw.field(name).and_then(display_value)
}

fn display_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => display_number(n),
        Value::Bool(true) => "Sí".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null | Value::Object(_) => return None,
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn display_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn price_field(raw: &RawRecord, name: &str) -> f64 {
    let price = match raw.field(name) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect::<String>()
            .parse::<f64>()
            .ok(),
        _ => None,
    };
    price.filter(|p| p.is_finite()).unwrap_or(0.0)
}
