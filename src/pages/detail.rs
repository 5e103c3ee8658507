use crate::models::{Normalizer, PropertyDetail, PLACEHOLDER};
use crate::pages::layout::{html_escape, meta_name, meta_property, wrap_page};
use crate::sources::{RecordLookup, RecordSource};
use anyhow::Result;
use tracing::{debug, warn};

/// Result of looking up a detail page
#[derive(Debug)]
pub enum DetailOutcome {
    Found(Box<PropertyDetail>),
    NotFound,
}

/// Fetch and normalize one listing. Only an unreachable source is an error;
/// a missing record is an ordinary outcome.
pub async fn fetch(source: &dyn RecordSource, normalizer: &Normalizer, id: &str) -> Result<DetailOutcome> {
    match source.get_record(id).await {
        RecordLookup::Found(record) => Ok(DetailOutcome::Found(Box::new(normalizer.normalize_detail(&record)))),
        RecordLookup::NotFound => {
            debug!("No listing with id {}", id);
            Ok(DetailOutcome::NotFound)
        }
        RecordLookup::Unavailable(e) => {
            warn!("{} unavailable while loading {}: {:#}", source.source_name(), id, e);
            Err(e.context(format!("Failed to load listing {}", id)))
        }
    }
}

pub fn render(detail: &PropertyDetail) -> String {
    let street = detail.street_name();
    let description = detail.description();

    let mut head = vec![
        meta_name("description", description),
        meta_property("og:title", street),
        meta_property("og:description", description),
    ];
    if let Some(image) = detail.og_image() {
        head.push(meta_property("og:image", image));
    }
    head.push(meta_property("og:url", &detail.page_url));
    head.push(meta_name("twitter:card", "summary_large_image"));

    let street_html = html_escape(street);
    let gallery: String = detail
        .image_urls()
        .iter()
        .map(|url| format!(r#"<img src="{}" alt="{}">"#, html_escape(url), street_html))
        .collect();

    let grid: String = detail
        .attributes()
        .iter()
        .map(|a| format!("<div><strong>{}:</strong> {}</div>", a.label, html_escape(&a.value)))
        .collect();

    let body = format!(
        r#"<main class="detail">
<a href="/" class="back-link">← Volver al catálogo</a>
<h1>{street}</h1>
<div class="gallery">{gallery}</div>
<section class="info-grid">{grid}</section>
<section class="features">
<h2>Características</h2>
<p><strong>Interior:</strong> {interior}</p>
<p><strong>Exterior:</strong> {exterior}</p>
<p><strong>Servicios:</strong> {services}</p>
<p><strong>Otras:</strong> {internal}</p>
</section>
<section class="remarks">
<h2>Descripción</h2>
<p>{remarks}</p>
</section>
<a href="{share}" class="btn-share" target="_blank" rel="noopener">Compartir por WhatsApp</a>
</main>"#,
        street = street_html,
        interior = html_escape(&detail.interior_features),
        exterior = html_escape(&detail.exterior_features),
        services = html_escape(&detail.other_services),
        internal = html_escape(&detail.internal_features),
        remarks = html_escape(detail.remarks.as_deref().unwrap_or(PLACEHOLDER)),
        share = html_escape(&detail.share_href),
    );

    wrap_page(street, &head.join("\n"), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRecord;
    use crate::sources::FixtureSource;
    use reqwest::Url;
    use scraper::{Html, Selector};
    use serde_json::json;

    fn normalizer() -> Normalizer {
        Normalizer::new(
            "https://img.example.com/files",
            "https://tu-dominio.com",
            Url::parse("https://api.whatsapp.com/send").unwrap(),
        )
    }

    fn source() -> FixtureSource {
        let fields = json!({
            "street_name": "Main St",
            "price_current": 150000,
            "remarks_es": "Casa \"amplia\"",
            "url_img": ["one.jpg", "two.jpg"],
            "other_services": ["Agua", "Luz"],
        });
        FixtureSource::new(vec![
            RawRecord {
                id: "rec1".to_string(),
                created_time: None,
                fields: fields.as_object().cloned().unwrap(),
            },
            RawRecord {
                id: "recBare".to_string(),
                ..Default::default()
            },
        ])
    }

    fn meta(html: &Html, property: &str) -> Option<String> {
        let selector = Selector::parse(&format!(r#"meta[property="{}"]"#, property)).unwrap();
        html.select(&selector)
            .next()
            .and_then(|m| m.value().attr("content"))
            .map(str::to_string)
    }

    async fn rendered(id: &str) -> Html {
        match fetch(&source(), &normalizer(), id).await.unwrap() {
            DetailOutcome::Found(detail) => Html::parse_document(&render(&detail)),
            DetailOutcome::NotFound => panic!("{} should exist", id),
        }
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let outcome = fetch(&source(), &normalizer(), "recNope").await.unwrap();
        assert!(matches!(outcome, DetailOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_social_metadata() {
        let html = rendered("rec1").await;
        assert_eq!(meta(&html, "og:title").as_deref(), Some("Main St"));
        assert_eq!(meta(&html, "og:description").as_deref(), Some("Casa \"amplia\""));
        assert_eq!(
            meta(&html, "og:image").as_deref(),
            Some("https://img.example.com/files/one.jpg")
        );
        assert_eq!(meta(&html, "og:url").as_deref(), Some("https://tu-dominio.com/rec1"));

        let twitter = Selector::parse(r#"meta[name="twitter:card"]"#).unwrap();
        let card = html
            .select(&twitter)
            .next()
            .and_then(|m| m.value().attr("content"));
        assert_eq!(card, Some("summary_large_image"));
    }

    #[tokio::test]
    async fn test_gallery_and_share_link() {
        let html = rendered("rec1").await;

        let images = Selector::parse(".gallery img").unwrap();
        assert_eq!(html.select(&images).count(), 2);

        let share = Selector::parse("a.btn-share").unwrap();
        let href = html
            .select(&share)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap();
        let url = Url::parse(href).unwrap();
        assert_eq!(url.host_str(), Some("api.whatsapp.com"));
        let text = url
            .query_pairs()
            .find(|(k, _)| k == "text")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(text, "Main St – $150,000\nhttps://tu-dominio.com/rec1");
    }

    #[tokio::test]
    async fn test_bare_record_renders_placeholders() {
        let html = rendered("recBare").await;
        assert!(meta(&html, "og:image").is_none());

        let images = Selector::parse(".gallery img").unwrap();
        assert_eq!(html.select(&images).count(), 0);

        let remarks = Selector::parse("section.remarks p").unwrap();
        let text: String = html.select(&remarks).next().unwrap().text().collect();
        assert_eq!(text, PLACEHOLDER);

        let rows = Selector::parse("section.info-grid div").unwrap();
        let lot: String = html
            .select(&rows)
            .map(|row| row.text().collect::<String>())
            .find(|t| t.starts_with("Tamaño lote"))
            .unwrap();
        assert_eq!(lot, format!("Tamaño lote: {}", PLACEHOLDER));
    }
}
