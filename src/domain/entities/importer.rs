use serde::{Deserialize, Deserializer, Serialize};

/// The four supplier integrations the backend knows how to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importer {
    Noriega,
    Alsacia,
    Refax,
    Emasa,
}

impl Importer {
    pub const ALL: [Importer; 4] = [
        Importer::Noriega,
        Importer::Alsacia,
        Importer::Refax,
        Importer::Emasa,
    ];

    /// Lowercase id used in backend URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Importer::Noriega => "noriega",
            Importer::Alsacia => "alsacia",
            Importer::Refax => "refax",
            Importer::Emasa => "emasa",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Importer::Noriega => "Noriega",
            Importer::Alsacia => "Alsacia",
            Importer::Refax => "Refax",
            Importer::Emasa => "Emasa",
        }
    }
}

impl std::fmt::Display for Importer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Importer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "noriega" => Ok(Importer::Noriega),
            "alsacia" => Ok(Importer::Alsacia),
            "refax" => Ok(Importer::Refax),
            "emasa" => Ok(Importer::Emasa),
            _ => Err(format!("Unknown importer: {}", s)),
        }
    }
}

/// Per-importer settings. The console only transports these values; the
/// backend is what enforces limits and scraping speed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImporterConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rut: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "categoryLimit", default = "default_category_limit")]
    pub category_limit: u32,
    #[serde(rename = "productsPerMinute", default = "default_products_per_minute")]
    pub products_per_minute: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImporterConfigs {
    #[serde(default)]
    pub configs: Vec<ImporterConfig>,
}

impl ImporterConfig {
    pub fn validate(&self) -> crate::domain::errors::DomainResult<()> {
        self.name.parse::<Importer>().map_err(|_| {
            crate::domain::errors::DomainError::ValidationError(format!(
                "Invalid importer name: {}",
                self.name
            ))
        })?;
        if self.products_per_minute == 0 {
            return Err(crate::domain::errors::DomainError::ValidationError(
                "Products per minute must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub product_count: Option<u64>,
    #[serde(default)]
    pub importer: Option<String>,
    #[serde(default)]
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CategoryList {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySelection {
    pub category_ids: Vec<String>,
}

/// Row of `GET /importers`; the numeric id is what bulk deletes key on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImporterRecord {
    pub id: i64,
    pub name: String,
}

impl ImporterRecord {
    pub fn is(&self, importer: Importer) -> bool {
        self.name.eq_ignore_ascii_case(importer.as_str())
    }
}

/// Categories the operator picked for deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDeletion {
    #[serde(deserialize_with = "ids_from_strings_or_numbers")]
    pub category_ids: Vec<i64>,
}

/// Body of `POST /categories/delete-multiple`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteCategoriesRequest {
    pub category_ids: Vec<i64>,
    pub importer_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CategoriesDeleted {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub deleted_count: u64,
    #[serde(default)]
    pub products_deleted: u64,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImportRequest {
    pub selected_categories: Vec<String>,
}

/// Answer to a start-import call. Background imports carry a `job_id`; the
/// development categories import runs inline and reports `saved`/`total`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ImportStarted {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub saved: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub importer: Option<String>,
}

impl Product {
    /// Case-insensitive substring match on name or SKU.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.sku.to_lowercase().contains(&term)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductList {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub importer: Option<Importer>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ProductFilter {
    /// Query pairs sent upstream; search is applied locally.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(importer) = self.importer {
            pairs.push(("importer", importer.as_str().to_string()));
        }
        if let Some(category) = self.category.as_ref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.clone()));
        }
        pairs
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

fn ids_from_strings_or_numbers<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<serde_json::Value>::deserialize(deserializer)?
        .into_iter()
        .map(|value| match &value {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| serde::de::Error::custom(format!("invalid category id {}", value))))
        .collect()
}

fn default_color() -> String {
    "blue".to_string()
}

fn default_category_limit() -> u32 {
    100
}

fn default_products_per_minute() -> u32 {
    60
}
