//! Seed the catalog from a YAML file.
//!
//! ```yaml
//! products:
//!   - name: Cotton Kurta
//!     category: Clothing
//!     brand: Weave
//!     sku: WV-KURTA-01
//!     price: 899
//!     mrp: 1299
//!     stock: 40
//!     sizes: [S, M, L]
//!     main_image: images/kurta.jpg
//!     additional_images: [images/kurta-back.jpg]
//! ```
//!
//! Every entry is checked with the same rules as the admin product editor,
//! and every image is read, before the database is touched. Image paths are
//! relative to the YAML file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

use bazaar_admin::db::{self, ProductRepository, RepositoryError};
use bazaar_admin::forms::{MAX_ADDITIONAL_IMAGES, MAX_IMAGE_BYTES, ProductForm};
use bazaar_admin::models::{NewImage, ProductInput};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Top level of a catalog file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    pub products: Vec<SeedProduct>,
}

/// One product entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedProduct {
    pub name: String,
    pub category: String,
    pub brand: String,
    pub sku: String,
    #[serde(default)]
    pub product_code: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub full_description: String,
    pub price: Decimal,
    pub mrp: Decimal,
    #[serde(default)]
    pub discount: Option<Decimal>,
    pub stock: u32,
    #[serde(default)]
    pub low_stock_alert: Option<u32>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub dimensions: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub warranty: String,
    #[serde(default)]
    pub return_policy: String,
    #[serde(default)]
    pub bank_offers: String,
    #[serde(default)]
    pub special_offer: String,
    #[serde(default)]
    pub delivery_charge: Option<Decimal>,
    #[serde(default)]
    pub free_delivery: bool,
    #[serde(default)]
    pub launch_date: Option<NaiveDate>,
    /// `Active` or `Inactive`; defaults to `Active`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub main_image: Option<PathBuf>,
    #[serde(default)]
    pub additional_images: Vec<PathBuf>,
}

/// A validated entry, images loaded.
#[derive(Debug)]
pub struct PreparedProduct {
    pub input: ProductInput,
    pub main_image: Option<NewImage>,
    pub additional_images: Vec<NewImage>,
}

impl SeedProduct {
    /// The entry as the admin editor would have submitted it.
    fn to_form(&self) -> ProductForm {
        let amount = |value: Option<Decimal>| value.map(|d| d.to_string()).unwrap_or_default();
        let count = |value: Option<u32>| value.map(|n| n.to_string()).unwrap_or_default();

        ProductForm {
            name: self.name.clone(),
            category: self.category.clone(),
            brand: self.brand.clone(),
            sku: self.sku.clone(),
            product_code: self.product_code.clone(),
            short_description: self.short_description.clone(),
            full_description: self.full_description.clone(),
            price: self.price.to_string(),
            mrp: self.mrp.to_string(),
            discount: amount(self.discount),
            stock: self.stock.to_string(),
            low_stock_alert: count(self.low_stock_alert),
            material: self.material.clone(),
            dimensions: self.dimensions.clone(),
            weight: self.weight.clone(),
            warranty: self.warranty.clone(),
            return_policy: self.return_policy.clone(),
            bank_offers: self.bank_offers.clone(),
            special_offer: self.special_offer.clone(),
            delivery_charge: amount(self.delivery_charge),
            free_delivery: self.free_delivery,
            launch_date: self
                .launch_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            status: self.status.clone().unwrap_or_default(),
            ..ProductForm::default()
        }
    }

    /// Validate the product fields.
    ///
    /// List fields are taken from the YAML lists as-is so that items may
    /// contain commas.
    fn to_input(&self) -> Result<ProductInput, String> {
        let mut input = self.to_form().validate().map_err(|e| e.to_string())?;
        input.sizes = clean(&self.sizes);
        input.colors = clean(&self.colors);
        input.variants = clean(&self.variants);
        input.tags = clean(&self.tags);
        input.key_features = clean(&self.key_features);
        Ok(input)
    }
}

fn clean(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Content type for an image file, from its extension.
fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

async fn load_image(base_dir: &Path, path: &Path) -> Result<NewImage, String> {
    let content_type = content_type_for(path)
        .ok_or_else(|| format!("{} has an unsupported image extension", path.display()))?;
    let full_path = base_dir.join(path);
    let data = tokio::fs::read(&full_path)
        .await
        .map_err(|e| format!("could not read {}: {e}", full_path.display()))?;
    if data.len() > MAX_IMAGE_BYTES {
        return Err(format!("{} is larger than 5 MiB", path.display()));
    }
    Ok(NewImage {
        content_type: content_type.to_owned(),
        data,
    })
}

/// Check one entry's images without reading them.
fn check_image_paths(product: &SeedProduct) -> Vec<String> {
    let mut errors = Vec::new();
    if product.additional_images.len() > MAX_ADDITIONAL_IMAGES {
        errors.push(format!(
            "at most {MAX_ADDITIONAL_IMAGES} additional images are allowed"
        ));
    }
    for path in product.main_image.iter().chain(&product.additional_images) {
        if content_type_for(path).is_none() {
            errors.push(format!("{} has an unsupported image extension", path.display()));
        }
    }
    errors
}

/// Validate every entry's fields, reporting problems as `"SKU: message"`.
fn validate_entries(catalog: &CatalogFile) -> (Vec<ProductInput>, Vec<String>) {
    let mut errors = Vec::new();
    let mut inputs = Vec::with_capacity(catalog.products.len());
    let mut seen = HashSet::new();

    for (index, product) in catalog.products.iter().enumerate() {
        let label = if product.sku.trim().is_empty() {
            format!("entry {}", index + 1)
        } else {
            product.sku.trim().to_owned()
        };

        if !product.sku.trim().is_empty() && !seen.insert(product.sku.trim().to_owned()) {
            errors.push(format!("{label}: SKU appears more than once"));
        }
        errors.extend(
            check_image_paths(product)
                .into_iter()
                .map(|e| format!("{label}: {e}")),
        );
        match product.to_input() {
            Ok(input) => inputs.push(input),
            Err(e) => errors.push(format!("{label}: {e}")),
        }
    }

    (inputs, errors)
}

/// Parse and validate a catalog file, loading its images.
///
/// # Errors
///
/// Returns `SeedError::Invalid` after logging each problem found.
pub async fn prepare(path: &Path) -> Result<Vec<PreparedProduct>, SeedError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let catalog: CatalogFile = serde_yaml::from_str(&content)?;
    info!(products = catalog.products.len(), "Parsed catalog");

    let (inputs, mut errors) = validate_entries(&catalog);

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut prepared = Vec::with_capacity(inputs.len());
    if errors.is_empty() {
        for (product, input) in catalog.products.iter().zip(inputs) {
            let main_image = match &product.main_image {
                Some(image) => match load_image(base_dir, image).await {
                    Ok(image) => Some(image),
                    Err(e) => {
                        errors.push(format!("{}: {e}", input.sku));
                        None
                    }
                },
                None => None,
            };
            let mut additional_images = Vec::with_capacity(product.additional_images.len());
            for image in &product.additional_images {
                match load_image(base_dir, image).await {
                    Ok(image) => additional_images.push(image),
                    Err(e) => errors.push(format!("{}: {e}", input.sku)),
                }
            }
            prepared.push(PreparedProduct {
                input,
                main_image,
                additional_images,
            });
        }
    }

    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }

    info!("Catalog validated successfully");
    Ok(prepared)
}

/// Seed products from a catalog file.
///
/// With `clear`, every existing product is deleted first. Products whose SKU
/// already exists are skipped.
///
/// # Errors
///
/// Returns an error if the file is invalid, `DATABASE_URL` is unset, or a
/// database operation fails.
pub async fn catalog(file: &Path, clear: bool) -> Result<(), SeedError> {
    info!(path = %file.display(), "Loading catalog from file");
    let products = prepare(file).await?;

    let database_url = super::database_url().ok_or(SeedError::MissingEnvVar("DATABASE_URL"))?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    if clear {
        let removed = sqlx::query("DELETE FROM shop.product")
            .execute(&pool)
            .await?
            .rows_affected();
        info!(removed, "Cleared existing products");
    }

    let repo = ProductRepository::new(&pool);
    let mut inserted = 0_usize;
    let mut skipped = 0_usize;
    for product in &products {
        match repo
            .create(
                &product.input,
                product.main_image.as_ref(),
                &product.additional_images,
            )
            .await
        {
            Ok(id) => {
                inserted += 1;
                info!(product_id = %id, sku = %product.input.sku, "Product seeded");
            }
            Err(RepositoryError::Conflict(_)) => {
                skipped += 1;
                warn!(sku = %product.input.sku, "SKU already exists, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!("Seeding complete!");
    info!("  Products inserted: {inserted}");
    info!("  Products skipped (already exist): {skipped}");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use bazaar_core::ProductStatus;

    const CATALOG: &str = r"
products:
  - name: Cotton Kurta
    category: Clothing
    brand: Weave
    sku: WV-KURTA-01
    price: 899
    mrp: '1299.50'
    stock: 40
    sizes: [S, ' M ', L, '']
    key_features:
      - Hand block printed, natural dyes
    status: Inactive
    launch_date: 2026-09-01
  - name: Steel Bottle
    category: Kitchen
    brand: Thermo
    sku: TH-BOTTLE-1
    price: 450
    mrp: 450
    stock: 0
";

    fn parse(yaml: &str) -> CatalogFile {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_catalog_entries_validate() {
        let (inputs, errors) = validate_entries(&parse(CATALOG));
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(inputs.len(), 2);

        let kurta = &inputs[0];
        assert_eq!(kurta.mrp.amount(), Decimal::new(129_950, 2));
        assert_eq!(kurta.sizes, vec!["S", "M", "L"]);
        assert_eq!(kurta.key_features, vec!["Hand block printed, natural dyes"]);
        assert_eq!(kurta.status, ProductStatus::Inactive);
        assert_eq!(kurta.launch_date, NaiveDate::from_ymd_opt(2026, 9, 1));

        let bottle = &inputs[1];
        assert_eq!(bottle.status, ProductStatus::Active);
        assert_eq!(bottle.discount, Decimal::ZERO);
        assert_eq!(bottle.low_stock_alert, 0);
    }

    #[test]
    fn test_duplicate_sku_and_bad_fields_reported() {
        let yaml = r"
products:
  - { name: A, category: C, brand: B, sku: DUP, price: 10, mrp: 10, stock: 1 }
  - { name: '', category: C, brand: B, sku: DUP, price: 10, mrp: 10, stock: 1, discount: 120 }
  - { name: A, category: C, brand: B, sku: IMG, price: 10, mrp: 10, stock: 1, main_image: a.bmp }
";
        let (_, errors) = validate_entries(&parse(yaml));
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors[0].starts_with("DUP: SKU appears more than once"));
        assert!(errors[1].contains("name is required"));
        assert!(errors[2].contains("unsupported image extension"));
    }

    #[test]
    fn test_too_many_additional_images() {
        let yaml = r"
products:
  - name: A
    category: C
    brand: B
    sku: MANY
    price: 10
    mrp: 10
    stock: 1
    additional_images: [1.png, 2.png, 3.png, 4.png, 5.png, 6.png]
";
        let (_, errors) = validate_entries(&parse(yaml));
        assert_eq!(
            errors,
            vec!["MANY: at most 5 additional images are allowed".to_string()]
        );
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let yaml = "products:\n  - { name: A, colour: red }\n";
        assert!(serde_yaml::from_str::<CatalogFile>(yaml).is_err());
    }

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type_for(Path::new("a/kurta.JPG")), Some("image/jpeg"));
        assert_eq!(content_type_for(Path::new("b.webp")), Some("image/webp"));
        assert_eq!(content_type_for(Path::new("c.svg")), None);
        assert_eq!(content_type_for(Path::new("noext")), None);
    }

    #[tokio::test]
    async fn test_prepare_reports_missing_image_file() {
        let dir = std::env::temp_dir().join(format!("bz-seed-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let file = dir.join("catalog.yaml");
        tokio::fs::write(
            &file,
            "products:\n  - { name: A, category: C, brand: B, sku: S1, price: 1, mrp: 1, stock: 1, main_image: missing.png }\n",
        )
        .await
        .unwrap();

        let result = prepare(&file).await;
        assert!(matches!(result, Err(SeedError::Invalid(1))));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
