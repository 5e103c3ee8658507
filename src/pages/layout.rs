//! Page shell, stylesheet and the fixed error pages.

/// HTML-escape a string before interpolating it into markup
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

const CSS: &str = r#"
body{margin:0;background:#f7f7f7;color:#222;font-family:Arial,sans-serif}
main{max-width:1200px;margin:0 auto;padding:1rem}
main.detail{max-width:800px;margin:2rem auto;background:#fff;border-radius:8px;box-shadow:0 4px 20px rgba(0,0,0,0.05)}
h1{text-align:center;margin-bottom:1.5rem}
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(280px,1fr));gap:1rem;list-style:none;padding:0;margin:0}
.card{display:flex;flex-direction:column;background:#fff;border-radius:8px;overflow:hidden;text-decoration:none;color:inherit;box-shadow:0 2px 8px rgba(0,0,0,0.1);transition:transform .2s}
.card:hover{transform:translateY(-4px)}
.thumb{width:100%;height:160px;object-fit:cover}
.thumb-placeholder{width:100%;height:160px;background:#eee;display:flex;align-items:center;justify-content:center;color:#999}
.card-body{padding:1rem;display:flex;flex-direction:column;flex:1}
.card-body h2{margin:0 0 .5rem;font-size:1.2rem}
.location,.type{margin:0 0 .5rem;color:#666;font-size:.9rem}
.price{margin-top:auto;font-weight:bold;color:#2a9d8f}
.empty{text-align:center;color:#666}
.back-link{display:inline-block;margin:1rem 0;color:#2a9d8f}
.gallery{display:grid;grid-template-columns:repeat(auto-fill,minmax(200px,1fr));gap:4px}
.gallery img{width:100%;height:150px;object-fit:cover;border-radius:4px}
.info-grid{display:grid;grid-template-columns:1fr 1fr;gap:.5rem 1rem;padding:1rem 0;border-top:1px solid #eee}
.features,.remarks{padding:1rem 0;border-top:1px solid #eee}
.btn-share{display:inline-block;margin:1rem 0 2rem;padding:.75rem 1.25rem;background:#25D366;color:#fff;border-radius:4px;text-decoration:none}
"#;

/// Wrap a body in the full document. `head` is trusted, pre-escaped markup.
pub fn wrap_page(title: &str, head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title>
{head}
<style>{CSS}</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = html_escape(title),
    )
}

pub fn meta_name(name: &str, content: &str) -> String {
    format!(
        r#"<meta name="{}" content="{}">"#,
        html_escape(name),
        html_escape(content)
    )
}

pub fn meta_property(property: &str, content: &str) -> String {
    format!(
        r#"<meta property="{}" content="{}">"#,
        html_escape(property),
        html_escape(content)
    )
}

pub fn not_found_page() -> String {
    wrap_page(
        "Propiedad no encontrada",
        "",
        r#"<main class="detail">
<a href="/" class="back-link">← Volver al catálogo</a>
<h1>Propiedad no encontrada</h1>
<p class="empty">La propiedad que busca no existe o ya no está disponible.</p>
</main>"#,
    )
}

pub fn unavailable_page() -> String {
    wrap_page(
        "Servicio no disponible",
        "",
        r#"<main class="detail">
<a href="/" class="back-link">← Volver al catálogo</a>
<h1>Servicio no disponible</h1>
<p class="empty">No pudimos cargar la información en este momento. Intente de nuevo en unos minutos.</p>
</main>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_wrap_page_escapes_title() {
        let page = wrap_page("<script>", "", "<p>body</p>");
        assert!(page.contains("<title>&lt;script&gt;</title>"));
        assert!(page.contains("<p>body</p>"));
    }
}
