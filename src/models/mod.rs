pub mod normalize;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

pub use normalize::{format_price, Normalizer};

/// Token rendered wherever a record lacks a value
pub const PLACEHOLDER: &str = "—";

/// One listing exactly as the upstream table returns it
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawRecord {
    pub id: String,
    #[serde(default, rename = "createdTime")]
    pub created_time: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RawRecord {
    /// Field value, treating JSON null the same as a missing key
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }
}

/// Catalog row
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySummary {
    pub id: String,
    pub street_name: String,
    pub map_area: String,
    pub property_type: String,
    pub price_current: f64,
    pub image_urls: Vec<String>,
}

impl PropertySummary {
    pub fn thumbnail(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

/// Labeled entry in the detail attribute grid
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub label: &'static str,
    pub value: String,
}

/// Full listing as shown on the detail page
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDetail {
    pub summary: PropertySummary,
    pub subdivision: String,
    pub region: String,
    pub district: String,
    pub year_built: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub half_bathrooms: String,
    pub number_of_rooms: String,
    pub lot_sqft: String,
    pub sqft_total: String,
    pub style: String,
    pub remodelled: String,
    pub possession: String,
    pub zoning: String,
    pub status: String,
    pub interior_features: String,
    pub exterior_features: String,
    pub other_services: String,
    pub internal_features: String,
    /// Spanish remarks when present, otherwise the generic remarks
    pub remarks: Option<String>,
    pub listed_at: Option<DateTime<Utc>>,
    pub page_url: String,
    pub share_text: String,
    /// Message-app deep link carrying the encoded share text
    pub share_href: String,
}

impl PropertyDetail {
    pub fn street_name(&self) -> &str {
        &self.summary.street_name
    }

    pub fn image_urls(&self) -> &[String] {
        &self.summary.image_urls
    }

    /// Preview image for social cards
    pub fn og_image(&self) -> Option<&str> {
        self.summary.thumbnail()
    }

    /// Meta description; empty when the record has no remarks
    pub fn description(&self) -> &str {
        self.remarks.as_deref().unwrap_or("")
    }

    /// Rows of the attribute grid, in display order
    pub fn attributes(&self) -> Vec<Attribute> {
        let s = &self.summary;
        let mut rows = vec![
            attr("Precio", format!("${}", format_price(s.price_current))),
            attr("Subdivisión", self.subdivision.clone()),
            attr("Región", self.region.clone()),
            attr("Distrito", self.district.clone()),
            attr("Área", s.map_area.clone()),
            attr("Tipo", s.property_type.clone()),
            attr("Año", self.year_built.clone()),
            attr("Recámaras", self.bedrooms.clone()),
            attr("Baños completos", self.bathrooms.clone()),
            attr("Medios baños", self.half_bathrooms.clone()),
            attr("Habitaciones", self.number_of_rooms.clone()),
            attr("Tamaño lote", with_unit(&self.lot_sqft, "ft²")),
            attr("Total sqft", with_unit(&self.sqft_total, "ft²")),
            attr("Estilo", self.style.clone()),
            attr("Remodelado", self.remodelled.clone()),
            attr("Posesión", self.possession.clone()),
            attr("Zonificación", self.zoning.clone()),
            attr("Estado", self.status.clone()),
        ];
        if let Some(listed_at) = self.listed_at {
            rows.push(attr("Publicado", listed_at.format("%d/%m/%Y").to_string()));
        }
        rows
    }
}

fn attr(label: &'static str, value: String) -> Attribute {
    Attribute { label, value }
}

fn with_unit(value: &str, unit: &str) -> String {
    if value == PLACEHOLDER {
        value.to_string()
    } else {
        format!("{} {}", value, unit)
    }
}
