use crate::quote::{format_money, QuoteFigures};
use chrono::{Local, Locale, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use thiserror::Error;

const BASE_TEMPLATE: &str = "base.html.tera";
const FRAGMENT_TEMPLATE: &str = "fragment.html.tera";
const INTERNAL_TEMPLATE: &str = "internal.html.tera";
const CUSTOMER_TEMPLATE: &str = "customer.html.tera";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Error de plantilla: {0}")]
    Template(#[from] tera::Error),
}

/// Which proforma to produce from a set of figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentVariant {
    /// Base and customer prices side by side; never shown to the customer.
    Internal,
    #[default]
    Customer,
}

impl DocumentVariant {
    fn template(self) -> &'static str {
        match self {
            DocumentVariant::Internal => INTERNAL_TEMPLATE,
            DocumentVariant::Customer => CUSTOMER_TEMPLATE,
        }
    }

    fn title(self) -> &'static str {
        match self {
            DocumentVariant::Internal => "Proforma interna",
            DocumentVariant::Customer => "Proforma de exámenes solicitados",
        }
    }
}

/// A complete, self-contained HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument(String);

impl RenderedDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[derive(Serialize)]
struct LineView<'a> {
    code: &'a str,
    name: &'a str,
    base: String,
    customer: String,
}

pub struct DocumentRenderer {
    tera: Tera,
    stylesheet_url: Option<String>,
}

impl DocumentRenderer {
    pub fn new(stylesheet_url: Option<String>) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html.tera"]);
        tera.add_raw_templates(vec![
            (BASE_TEMPLATE, include_str!("templates/base.html.tera")),
            (FRAGMENT_TEMPLATE, include_str!("templates/fragment.html.tera")),
            (INTERNAL_TEMPLATE, include_str!("templates/internal.html.tera")),
            (CUSTOMER_TEMPLATE, include_str!("templates/customer.html.tera")),
        ])?;

        Ok(Self {
            tera,
            stylesheet_url: stylesheet_url.filter(|url| !url.trim().is_empty()),
        })
    }

    /// Deterministic for a given `issued_on`.
    pub fn render(
        &self,
        figures: &QuoteFigures,
        variant: DocumentVariant,
        issued_on: NaiveDate,
    ) -> Result<RenderedDocument, RenderError> {
        let lines: Vec<LineView> = figures
            .lines
            .iter()
            .map(|line| LineView {
                code: &line.code,
                name: &line.name,
                base: format_money(line.base_price),
                customer: format_money(line.customer_price),
            })
            .collect();

        let mut context = self.base_context(variant.title());
        context.insert("issued_on", &long_date(issued_on));
        context.insert("lines", &lines);
        context.insert("total_base", &format_money(figures.total_base));
        context.insert("total_customer", &format_money(figures.total_customer));
        context.insert("service_fee", &format_money(figures.service_fee));
        context.insert("final_total", &format_money(figures.final_total));

        let html = self.tera.render(variant.template(), &context)?;
        tracing::debug!(
            "🧾 Documento {:?} generado ({} ítems, {} bytes)",
            variant,
            figures.item_count(),
            html.len()
        );
        Ok(RenderedDocument(html))
    }

    pub fn render_today(
        &self,
        figures: &QuoteFigures,
        variant: DocumentVariant,
    ) -> Result<RenderedDocument, RenderError> {
        self.render(figures, variant, Local::now().date_naive())
    }

    /// Wraps caller-supplied markup in a full document carrying the stylesheet,
    /// so styling survives outside the page it was cut from. The fragment is
    /// inserted verbatim.
    pub fn wrap_fragment(&self, fragment: &str) -> Result<RenderedDocument, RenderError> {
        let mut context = self.base_context("Proforma");
        context.insert("body", fragment);

        let html = self.tera.render(FRAGMENT_TEMPLATE, &context)?;
        Ok(RenderedDocument(html))
    }

    fn base_context(&self, title: &str) -> Context {
        let mut context = Context::new();
        context.insert("title", title);
        context.insert("stylesheet_url", &self.stylesheet_url);
        context
    }
}

/// "lunes, 14 de abril de 2025"
pub fn long_date(date: NaiveDate) -> String {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .format_localized("%A, %-d de %B de %Y", Locale::es_ES)
        .to_string()
}
