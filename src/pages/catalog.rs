use crate::models::{format_price, Normalizer, PropertySummary};
use crate::pages::layout::{html_escape, meta_name, wrap_page};
use crate::sources::RecordSource;
use tracing::{info, warn};

/// One page of listings, in the order the source returned them
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub properties: Vec<PropertySummary>,
    /// Set when the source failed and the list was left empty
    pub degraded: bool,
}

/// Fetch and normalize the catalog. An unavailable source yields an empty,
/// degraded catalog rather than an error.
pub async fn fetch(source: &dyn RecordSource, normalizer: &Normalizer, page_size: usize) -> Catalog {
    match source.list_records(page_size).await {
        Ok(records) => {
            let properties: Vec<_> = records
                .iter()
                .take(page_size)
                .map(|r| normalizer.normalize_summary(r))
                .collect();
            info!("Catalog built with {} properties from {}", properties.len(), source.source_name());
            Catalog {
                properties,
                degraded: false,
            }
        }
        Err(e) => {
            warn!("{} unavailable, serving empty catalog: {:#}", source.source_name(), e);
            Catalog {
                properties: Vec::new(),
                degraded: true,
            }
        }
    }
}

pub fn render(catalog: &Catalog) -> String {
    let head = meta_name("description", "Listado de propiedades MLS Panamá");

    let list = if catalog.properties.is_empty() {
        r#"<p class="empty">No hay propiedades disponibles en este momento.</p>"#.to_string()
    } else {
        let cards: String = catalog.properties.iter().map(card).collect();
        format!(r#"<ul class="grid">{}</ul>"#, cards)
    };

    let body = format!("<main>\n<h1>Catálogo de Propiedades</h1>\n{}\n</main>", list);
    wrap_page("Catálogo de Propiedades", &head, &body)
}

fn card(p: &PropertySummary) -> String {
    let street = html_escape(&p.street_name);
    let thumb = match p.thumbnail() {
        Some(url) => format!(
            r#"<img src="{}" alt="{}" class="thumb">"#,
            html_escape(url),
            street
        ),
        None => r#"<div class="thumb-placeholder">Sin imagen</div>"#.to_string(),
    };

    format!(
        r#"<li><a href="/{id}" class="card">{thumb}<div class="card-body">
<h2>{street}</h2>
<p class="location">{area}</p>
<p class="type">{ptype}</p>
<p class="price">${price}</p>
</div></a></li>"#,
        id = html_escape(&p.id),
        area = html_escape(&p.map_area),
        ptype = html_escape(&p.property_type),
        price = format_price(p.price_current),
    )
}
