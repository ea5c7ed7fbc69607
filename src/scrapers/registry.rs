use thiserror::Error;
use url::Url;

const COINAFRIQUE_BASE: &str = "https://sn.coinafrique.com/categorie";

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("Invalid listing URL for category '{category}': {reason}")]
    InvalidUrl { category: String, reason: String },

    #[error("Category '{0}' must have at least one page")]
    NoPages(String),

    #[error("Category '{0}' is defined twice")]
    Duplicate(String),
}

/// One catalog category and the listing index it is scraped from
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpec {
    pub name: String,
    pub listing_url: Url,
    pub max_pages: u32,
}

impl CategorySpec {
    pub fn new(name: &str, listing_url: &str, max_pages: u32) -> Result<Self, RegistryError> {
        let listing_url = Url::parse(listing_url).map_err(|e| RegistryError::InvalidUrl {
            category: name.to_string(),
            reason: e.to_string(),
        })?;
        if max_pages == 0 {
            return Err(RegistryError::NoPages(name.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            listing_url,
            max_pages,
        })
    }

    /// URL of the given listing page, `page` starting at 1
    pub fn page_url(&self, page: u32) -> Url {
        let mut url = self.listing_url.clone();
        url.query_pairs_mut().append_pair("page", &page.to_string());
        url
    }

    /// Number of pages to visit under the given cap
    pub fn effective_pages(&self, page_cap: u32) -> u32 {
        self.max_pages.min(page_cap)
    }
}

/// Read-only, ordered set of categories
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<CategorySpec>,
}

impl CategoryRegistry {
    /// Build a registry; definition order is kept as iteration order.
    pub fn new(categories: Vec<CategorySpec>) -> Result<Self, RegistryError> {
        for (i, spec) in categories.iter().enumerate() {
            if categories[..i].iter().any(|c| c.name == spec.name) {
                return Err(RegistryError::Duplicate(spec.name.clone()));
            }
        }
        Ok(Self { categories })
    }

    /// The CoinAfrique Senegal animal categories
    pub fn coinafrique() -> Result<Self, RegistryError> {
        Self::new(vec![
            CategorySpec::new("chiens", &format!("{}/chiens", COINAFRIQUE_BASE), 11)?,
            CategorySpec::new("moutons", &format!("{}/moutons", COINAFRIQUE_BASE), 16)?,
            CategorySpec::new(
                "poules_lapins_pigeons",
                &format!("{}/poules-lapins-et-pigeons", COINAFRIQUE_BASE),
                10,
            )?,
            CategorySpec::new(
                "autres_animaux",
                &format!("{}/autres-animaux", COINAFRIQUE_BASE),
                6,
            )?,
        ])
    }

    pub fn list(&self) -> &[CategorySpec] {
        &self.categories
    }

    pub fn get(&self, name: &str) -> Option<&CategorySpec> {
        self.categories.iter().find(|c| c.name == name)
    }
}
