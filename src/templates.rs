use std::sync::OnceLock;
use tera::Tera;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("winners.html", include_str!("../templates/winners.html")),
    ("author_dashboard.html", include_str!("../templates/author_dashboard.html")),
    ("reviewer_dashboard.html", include_str!("../templates/reviewer_dashboard.html")),
    ("admin_dashboard.html", include_str!("../templates/admin_dashboard.html")),
];

static TERA: OnceLock<Result<Tera, String>> = OnceLock::new();

/// Templates are compiled into the binary and parsed once.
pub fn get_tera() -> Result<&'static Tera, &'static str> {
    TERA.get_or_init(|| {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())
            .map_err(|e| e.to_string())?;
        Ok(tera)
    })
    .as_ref()
    .map_err(|e| e.as_str())
}
