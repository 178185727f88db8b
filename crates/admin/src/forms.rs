//! Product editor form handling.
//!
//! The editor posts `multipart/form-data`: text fields plus a main image and
//! up to five additional images. [`read_product_upload`] collects the raw
//! values into a [`ProductForm`] (kept as typed so a failed submission can be
//! re-rendered) and [`ProductForm::validate`] turns them into a
//! [`ProductInput`].

use axum::extract::Multipart;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use bazaar_core::{Price, ProductStatus};

use crate::models::{NewImage, ProductInput};

/// Largest accepted image file.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Additional images a product may carry.
pub const MAX_ADDITIONAL_IMAGES: usize = 5;

/// Request body limit for the product routes.
pub const MAX_BODY_BYTES: usize = 40 * 1024 * 1024;

/// Errors from parsing or validating the product form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProductFormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} must be a non-negative amount")]
    InvalidAmount(&'static str),

    #[error("{0} must be a whole number of at least 0")]
    InvalidCount(&'static str),

    #[error("discount must be a percentage between 0 and 100")]
    InvalidDiscount,

    #[error("launch date must be in YYYY-MM-DD format")]
    InvalidLaunchDate,

    #[error("status must be Active or Inactive")]
    InvalidStatus,

    #[error("a main image is required")]
    MainImageRequired,

    #[error("{0} is larger than 5 MiB")]
    ImageTooLarge(String),

    #[error("{0} is not an image")]
    NotAnImage(String),

    #[error("at most {max} additional images are allowed")]
    TooManyImages { max: usize },

    #[error("upload could not be read: {0}")]
    Multipart(String),
}

/// Raw product form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub brand: String,
    pub sku: String,
    pub product_code: String,
    pub short_description: String,
    pub full_description: String,
    pub price: String,
    pub mrp: String,
    pub discount: String,
    pub stock: String,
    pub low_stock_alert: String,
    pub sizes: String,
    pub colors: String,
    pub variants: String,
    pub tags: String,
    pub key_features: String,
    pub material: String,
    pub dimensions: String,
    pub weight: String,
    pub warranty: String,
    pub return_policy: String,
    pub bank_offers: String,
    pub special_offer: String,
    pub delivery_charge: String,
    pub free_delivery: bool,
    pub launch_date: String,
    pub status: String,
}

impl ProductForm {
    /// A blank form for a new product.
    #[must_use]
    pub fn new_product() -> Self {
        Self {
            status: ProductStatus::Active.to_string(),
            low_stock_alert: "0".to_string(),
            delivery_charge: "0".to_string(),
            ..Self::default()
        }
    }

    /// Pre-fill the form from a stored product.
    #[must_use]
    pub fn from_input(input: &ProductInput) -> Self {
        Self {
            name: input.name.clone(),
            category: input.category.clone(),
            brand: input.brand.clone(),
            sku: input.sku.clone(),
            product_code: input.product_code.clone(),
            short_description: input.short_description.clone(),
            full_description: input.full_description.clone(),
            price: input.price.amount().to_string(),
            mrp: input.mrp.amount().to_string(),
            discount: input.discount.normalize().to_string(),
            stock: input.stock.to_string(),
            low_stock_alert: input.low_stock_alert.to_string(),
            sizes: input.sizes.join(", "),
            colors: input.colors.join(", "),
            variants: input.variants.join(", "),
            tags: input.tags.join(", "),
            key_features: input.key_features.join("\n"),
            material: input.material.clone(),
            dimensions: input.dimensions.clone(),
            weight: input.weight.clone(),
            warranty: input.warranty.clone(),
            return_policy: input.return_policy.clone(),
            bank_offers: input.bank_offers.clone(),
            special_offer: input.special_offer.clone(),
            delivery_charge: input.delivery_charge.amount().to_string(),
            free_delivery: input.free_delivery,
            launch_date: input
                .launch_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            status: input.status.to_string(),
        }
    }

    /// Store one text field. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "name" => &mut self.name,
            "category" => &mut self.category,
            "brand" => &mut self.brand,
            "sku" => &mut self.sku,
            "product_code" => &mut self.product_code,
            "short_description" => &mut self.short_description,
            "full_description" => &mut self.full_description,
            "price" => &mut self.price,
            "mrp" => &mut self.mrp,
            "discount" => &mut self.discount,
            "stock" => &mut self.stock,
            "low_stock_alert" => &mut self.low_stock_alert,
            "sizes" => &mut self.sizes,
            "colors" => &mut self.colors,
            "variants" => &mut self.variants,
            "tags" => &mut self.tags,
            "key_features" => &mut self.key_features,
            "material" => &mut self.material,
            "dimensions" => &mut self.dimensions,
            "weight" => &mut self.weight,
            "warranty" => &mut self.warranty,
            "return_policy" => &mut self.return_policy,
            "bank_offers" => &mut self.bank_offers,
            "special_offer" => &mut self.special_offer,
            "delivery_charge" => &mut self.delivery_charge,
            "launch_date" => &mut self.launch_date,
            "status" => &mut self.status,
            "free_delivery" => {
                self.free_delivery = value == "on";
                return;
            }
            _ => return,
        };
        *slot = value;
    }

    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns the first `ProductFormError` found, checking fields in form
    /// order.
    pub fn validate(&self) -> Result<ProductInput, ProductFormError> {
        Ok(ProductInput {
            name: required("name", &self.name)?,
            category: required("category", &self.category)?,
            brand: required("brand", &self.brand)?,
            sku: required("sku", &self.sku)?,
            product_code: self.product_code.trim().to_string(),
            short_description: required("short description", &self.short_description)?,
            full_description: required("full description", &self.full_description)?,
            price: amount("price", &self.price)?,
            mrp: amount("mrp", &self.mrp)?,
            discount: discount(&self.discount)?,
            stock: count("stock", &self.stock)?,
            low_stock_alert: count_or_zero("low stock alert", &self.low_stock_alert)?,
            sizes: split_list(&self.sizes),
            colors: split_list(&self.colors),
            variants: split_list(&self.variants),
            tags: split_list(&self.tags),
            key_features: split_key_features(&self.key_features),
            material: self.material.trim().to_string(),
            dimensions: self.dimensions.trim().to_string(),
            weight: self.weight.trim().to_string(),
            warranty: self.warranty.trim().to_string(),
            return_policy: self.return_policy.trim().to_string(),
            bank_offers: self.bank_offers.trim().to_string(),
            special_offer: self.special_offer.trim().to_string(),
            delivery_charge: amount_or_zero("delivery charge", &self.delivery_charge)?,
            free_delivery: self.free_delivery,
            launch_date: launch_date(&self.launch_date)?,
            status: status(&self.status)?,
        })
    }
}

/// Everything one editor submission carried.
#[derive(Debug, Default)]
pub struct ProductUpload {
    pub form: ProductForm,
    pub main_image: Option<NewImage>,
    pub additional_images: Vec<NewImage>,
    /// First problem with an uploaded file, reported after text validation.
    pub image_error: Option<ProductFormError>,
}

impl ProductUpload {
    /// Validate text fields and images for a new product.
    ///
    /// # Errors
    ///
    /// Returns a field error, any image error, or
    /// `ProductFormError::MainImageRequired`.
    pub fn validate_new(&self) -> Result<(ProductInput, &NewImage), ProductFormError> {
        let input = self.validate_existing(0)?;
        let main = self
            .main_image
            .as_ref()
            .ok_or(ProductFormError::MainImageRequired)?;
        Ok((input, main))
    }

    /// Validate text fields and images for an update of a product that
    /// already stores `stored_additional` additional images.
    ///
    /// # Errors
    ///
    /// Returns a field error, any image error, or
    /// `ProductFormError::TooManyImages` when the new images would push the
    /// product past the limit.
    pub fn validate_existing(
        &self,
        stored_additional: usize,
    ) -> Result<ProductInput, ProductFormError> {
        let input = self.form.validate()?;
        if let Some(err) = &self.image_error {
            return Err(err.clone());
        }
        if stored_additional + self.additional_images.len() > MAX_ADDITIONAL_IMAGES {
            return Err(ProductFormError::TooManyImages {
                max: MAX_ADDITIONAL_IMAGES,
            });
        }
        Ok(input)
    }
}

/// Read the editor's multipart body.
///
/// File problems are recorded in [`ProductUpload::image_error`] so the text
/// fields can still be shown back to the admin.
///
/// # Errors
///
/// Returns `ProductFormError::Multipart` if the body is malformed or exceeds
/// the request limit.
pub async fn read_product_upload(
    mut multipart: Multipart,
) -> Result<ProductUpload, ProductFormError> {
    let mut upload = ProductUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ProductFormError::Multipart(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            "main_image" | "additional_images" => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field.content_type().unwrap_or_default().to_owned();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ProductFormError::Multipart(e.body_text()))?;

                // Browsers send an empty part for an untouched file input
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }

                if let Err(err) = check_image(&file_name, &content_type, data.len()) {
                    upload.image_error.get_or_insert(err);
                    continue;
                }

                let image = NewImage {
                    content_type,
                    data: data.to_vec(),
                };
                if name == "main_image" {
                    upload.main_image = Some(image);
                } else {
                    upload.additional_images.push(image);
                }
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ProductFormError::Multipart(e.body_text()))?;
                upload.form.set(&name, value);
            }
        }
    }

    if upload.additional_images.len() > MAX_ADDITIONAL_IMAGES {
        upload
            .image_error
            .get_or_insert(ProductFormError::TooManyImages {
                max: MAX_ADDITIONAL_IMAGES,
            });
    }

    Ok(upload)
}

fn check_image(file_name: &str, content_type: &str, len: usize) -> Result<(), ProductFormError> {
    let label = if file_name.is_empty() {
        "uploaded file".to_string()
    } else {
        file_name.to_string()
    };
    if !content_type.starts_with("image/") {
        return Err(ProductFormError::NotAnImage(label));
    }
    if len > MAX_IMAGE_BYTES {
        return Err(ProductFormError::ImageTooLarge(label));
    }
    Ok(())
}

/// Split a comma-separated list, trimming entries and dropping blanks.
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Key features accept newlines as well as commas.
#[must_use]
pub fn split_key_features(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn required(field: &'static str, value: &str) -> Result<String, ProductFormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ProductFormError::MissingField(field));
    }
    Ok(value.to_string())
}

fn amount(field: &'static str, value: &str) -> Result<Price, ProductFormError> {
    if value.trim().is_empty() {
        return Err(ProductFormError::MissingField(field));
    }
    Price::parse(value).map_err(|_| ProductFormError::InvalidAmount(field))
}

fn amount_or_zero(field: &'static str, value: &str) -> Result<Price, ProductFormError> {
    if value.trim().is_empty() {
        return Ok(Price::ZERO);
    }
    amount(field, value)
}

fn count(field: &'static str, value: &str) -> Result<i32, ProductFormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ProductFormError::MissingField(field));
    }
    match value.parse::<i32>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(ProductFormError::InvalidCount(field)),
    }
}

fn count_or_zero(field: &'static str, value: &str) -> Result<i32, ProductFormError> {
    if value.trim().is_empty() {
        return Ok(0);
    }
    count(field, value)
}

fn discount(value: &str) -> Result<Decimal, ProductFormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Decimal::ZERO);
    }
    match value.parse::<Decimal>() {
        Ok(d) if d >= Decimal::ZERO && d <= Decimal::ONE_HUNDRED => Ok(d),
        _ => Err(ProductFormError::InvalidDiscount),
    }
}

fn launch_date(value: &str) -> Result<Option<NaiveDate>, ProductFormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ProductFormError::InvalidLaunchDate)
}

fn status(value: &str) -> Result<ProductStatus, ProductFormError> {
    if value.trim().is_empty() {
        return Ok(ProductStatus::Active);
    }
    value.parse().map_err(|_| ProductFormError::InvalidStatus)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled() -> ProductForm {
        let mut form = ProductForm::new_product();
        for (name, value) in [
            ("name", "Block Print Kurta"),
            ("category", "Clothing"),
            ("brand", "Fabindia"),
            ("sku", "FAB-KUR-001"),
            ("short_description", "Cotton kurta"),
            ("full_description", "Hand block printed cotton kurta."),
            ("price", "1299"),
            ("mrp", "1599.50"),
            ("discount", "19"),
            ("stock", "40"),
            ("sizes", " S, M ,, L "),
            ("key_features", "Pure cotton\nHand printed, Machine wash"),
        ] {
            form.set(name, value.to_string());
        }
        form
    }

    #[test]
    fn test_split_list_trims_and_drops_blanks() {
        assert_eq!(split_list(" S, M ,, L "), vec!["S", "M", "L"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_key_features_split_on_newlines_too() {
        assert_eq!(
            split_key_features("Pure cotton\r\nHand printed, Machine wash\n"),
            vec!["Pure cotton", "Hand printed", "Machine wash"]
        );
    }

    #[test]
    fn test_validate_applies_defaults() {
        let input = filled().validate().unwrap();
        assert_eq!(input.sizes, vec!["S", "M", "L"]);
        assert_eq!(input.key_features.len(), 3);
        assert_eq!(input.low_stock_alert, 0);
        assert_eq!(input.delivery_charge, Price::ZERO);
        assert_eq!(input.status, ProductStatus::Active);
        assert_eq!(input.launch_date, None);
        assert!(!input.free_delivery);
    }

    #[test]
    fn test_free_delivery_checkbox() {
        let mut form = filled();
        form.set("free_delivery", "on".to_string());
        assert!(form.validate().unwrap().free_delivery);
        form.set("free_delivery", "off".to_string());
        assert!(!form.validate().unwrap().free_delivery);
    }

    #[test]
    fn test_validation_errors() {
        let mut form = filled();
        form.set("brand", "  ".to_string());
        assert_eq!(form.validate(), Err(ProductFormError::MissingField("brand")));

        let mut form = filled();
        form.set("price", "-5".to_string());
        assert_eq!(form.validate(), Err(ProductFormError::InvalidAmount("price")));

        let mut form = filled();
        form.set("stock", "-1".to_string());
        assert_eq!(form.validate(), Err(ProductFormError::InvalidCount("stock")));

        let mut form = filled();
        form.set("launch_date", "14/10/2026".to_string());
        assert_eq!(form.validate(), Err(ProductFormError::InvalidLaunchDate));

        let mut form = filled();
        form.set("status", "Archived".to_string());
        assert_eq!(form.validate(), Err(ProductFormError::InvalidStatus));
    }

    #[test]
    fn test_edit_form_prefill() {
        let mut form = filled();
        form.set("launch_date", "2026-11-01".to_string());
        form.set("status", "Inactive".to_string());
        let prefilled = ProductForm::from_input(&form.validate().unwrap());
        assert_eq!(prefilled.sizes, "S, M, L");
        assert_eq!(prefilled.key_features, "Pure cotton\nHand printed\nMachine wash");
        assert_eq!(prefilled.launch_date, "2026-11-01");
        assert_eq!(prefilled.status, "Inactive");
        assert_eq!(prefilled.validate().unwrap(), form.validate().unwrap());
    }

    #[test]
    fn test_check_image() {
        assert!(check_image("a.png", "image/png", 1024).is_ok());
        assert_eq!(
            check_image("a.pdf", "application/pdf", 10),
            Err(ProductFormError::NotAnImage("a.pdf".to_string()))
        );
        assert_eq!(
            check_image("big.jpg", "image/jpeg", MAX_IMAGE_BYTES + 1),
            Err(ProductFormError::ImageTooLarge("big.jpg".to_string()))
        );
    }

    #[test]
    fn test_upload_requires_main_image_on_create() {
        let upload = ProductUpload {
            form: filled(),
            ..ProductUpload::default()
        };
        assert!(matches!(
            upload.validate_new(),
            Err(ProductFormError::MainImageRequired)
        ));
        assert!(upload.validate_existing(0).is_ok());
    }

    #[test]
    fn test_additional_image_limit_counts_stored_images() {
        let image = NewImage {
            content_type: "image/png".to_string(),
            data: vec![1, 2, 3],
        };
        let upload = ProductUpload {
            form: filled(),
            additional_images: vec![image.clone(), image],
            ..ProductUpload::default()
        };
        assert!(upload.validate_existing(3).is_ok());
        assert_eq!(
            upload.validate_existing(4),
            Err(ProductFormError::TooManyImages { max: 5 })
        );
    }
}
