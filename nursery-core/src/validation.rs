//! Plant and category payload validation
//!
//! Payloads arrive as untyped JSON. The validator walks them field by field,
//! collects every failure (not just the first) and, when nothing failed,
//! returns the normalised typed value with defaults applied.
//!
//! # Rules
//!
//! | Field | Rule |
//! |-------|------|
//! | `name`, `description`, `careInstructions` | required, non-blank string |
//! | `scientificName` | optional string, blank means absent |
//! | `categories` | at least one non-blank string; must name a managed category when a list is supplied |
//! | `images` | at least one `{url, alt, publicId}`; `url` absolute http(s) |
//! | `featured` | optional boolean, default `false` |
//! | `price` | optional finite number, not negative |
//! | `stock` | optional integer |
//! | `seoMetadata` | optional `{title?, description?, keywords?}` |
//!
//! Server-assigned and unknown fields are ignored.

use serde_json::{Map, Value};
use url::Url;

use crate::error::ValidationErrors;
use crate::types::{PlantDraft, PlantImage, PlantPatch, SeoMetadata};

const NAME_REQUIRED: &str = "Plant name is required";
const DESCRIPTION_REQUIRED: &str = "Description is required";
const CARE_REQUIRED: &str = "Care instructions are required";
const CATEGORIES_REQUIRED: &str = "At least one category is required";
const IMAGES_REQUIRED: &str = "At least one image is required";
const CATEGORY_NAME_REQUIRED: &str = "Category name is required";

/// Tunables applied on top of the fixed schema
#[derive(Debug, Clone, Default)]
pub struct ValidationPolicy {
    /// Hosts image URLs may point at. Empty allows any host.
    pub allowed_image_hosts: Vec<String>,
}

/// Schema validator for plant payloads
#[derive(Debug, Clone, Default)]
pub struct PlantValidator {
    policy: ValidationPolicy,
}

impl PlantValidator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Validate a full create payload.
    ///
    /// `known_categories` switches on category enforcement: every tag must
    /// match one of them ignoring case and is replaced by its canonical form.
    pub fn validate_new(
        &self,
        payload: &Value,
        known_categories: Option<&[String]>,
    ) -> Result<PlantDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let Some(obj) = as_object(payload, &mut errors) else {
            return Err(errors);
        };

        let name = required_text(obj.get("name"), "name", NAME_REQUIRED, &mut errors);
        let scientific_name = obj
            .get("scientificName")
            .and_then(|v| optional_text(v, "scientificName", &mut errors));
        let description = required_text(
            obj.get("description"),
            "description",
            DESCRIPTION_REQUIRED,
            &mut errors,
        );
        let care_instructions = required_text(
            obj.get("careInstructions"),
            "careInstructions",
            CARE_REQUIRED,
            &mut errors,
        );
        let categories = categories(obj.get("categories"), known_categories, &mut errors);
        let images = self.images(obj.get("images"), &mut errors);
        let featured = obj
            .get("featured")
            .and_then(|v| optional_bool(v, "featured", &mut errors))
            .unwrap_or(false);
        let price = obj.get("price").and_then(|v| price(v, &mut errors));
        let stock = obj.get("stock").and_then(|v| stock(v, &mut errors));
        let seo_metadata = obj
            .get("seoMetadata")
            .and_then(|v| seo_metadata(v, &mut errors));

        match (name, description, care_instructions, categories, images) {
            (Some(name), Some(description), Some(care_instructions), Some(categories), Some(images))
                if errors.is_empty() =>
            {
                Ok(PlantDraft {
                    name,
                    scientific_name,
                    description,
                    care_instructions,
                    categories,
                    images,
                    featured,
                    price,
                    stock,
                    seo_metadata,
                })
            }
            _ => Err(errors),
        }
    }

    /// Validate an update payload. Only present fields are checked, each with
    /// the same rule as on create.
    pub fn validate_patch(
        &self,
        payload: &Value,
        known_categories: Option<&[String]>,
    ) -> Result<PlantPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let Some(obj) = as_object(payload, &mut errors) else {
            return Err(errors);
        };

        let patch = PlantPatch {
            name: obj
                .get("name")
                .and_then(|v| required_text(Some(v), "name", NAME_REQUIRED, &mut errors)),
            scientific_name: obj
                .get("scientificName")
                .map(|v| optional_text(v, "scientificName", &mut errors)),
            description: obj.get("description").and_then(|v| {
                required_text(Some(v), "description", DESCRIPTION_REQUIRED, &mut errors)
            }),
            care_instructions: obj.get("careInstructions").and_then(|v| {
                required_text(Some(v), "careInstructions", CARE_REQUIRED, &mut errors)
            }),
            categories: obj
                .get("categories")
                .and_then(|v| categories(Some(v), known_categories, &mut errors)),
            images: obj
                .get("images")
                .and_then(|v| self.images(Some(v), &mut errors)),
            // null clears the flag back to its default
            featured: obj.get("featured").and_then(|v| match v {
                Value::Null => Some(false),
                other => optional_bool(other, "featured", &mut errors),
            }),
            price: obj.get("price").map(|v| price(v, &mut errors)),
            stock: obj.get("stock").map(|v| stock(v, &mut errors)),
            seo_metadata: obj
                .get("seoMetadata")
                .map(|v| seo_metadata(v, &mut errors)),
        };

        errors.into_result(patch)
    }

    fn images(&self, value: Option<&Value>, errors: &mut ValidationErrors) -> Option<Vec<PlantImage>> {
        let items = match value {
            None | Some(Value::Null) => {
                errors.push("images", IMAGES_REQUIRED);
                return None;
            }
            Some(Value::Array(items)) => items,
            Some(_) => {
                errors.push("images", "must be an array");
                return None;
            }
        };
        if items.is_empty() {
            errors.push("images", IMAGES_REQUIRED);
            return None;
        }

        let before = errors.len();
        let mut images = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = format!("images[{}]", i);
            let Some(entry) = item.as_object() else {
                errors.push(path, "must be an object");
                continue;
            };

            let url = match entry.get("url") {
                Some(Value::String(raw)) => self.image_url(raw, &format!("{}.url", path), errors),
                _ => {
                    errors.push(format!("{}.url", path), "must be a string");
                    None
                }
            };
            let alt = string_field(entry, "alt", &path, errors);
            let public_id = string_field(entry, "publicId", &path, errors);

            if let (Some(url), Some(alt), Some(public_id)) = (url, alt, public_id) {
                images.push(PlantImage {
                    url,
                    alt,
                    public_id,
                });
            }
        }

        (errors.len() == before).then_some(images)
    }

    fn image_url(&self, raw: &str, field: &str, errors: &mut ValidationErrors) -> Option<String> {
        let parsed = match Url::parse(raw.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            _ => {
                errors.push(field, "must be a valid absolute http(s) URL");
                return None;
            }
        };
        let Some(host) = parsed.host_str().filter(|h| !h.is_empty()) else {
            errors.push(field, "must be a valid absolute http(s) URL");
            return None;
        };

        let allowed = &self.policy.allowed_image_hosts;
        if !allowed.is_empty() && !allowed.iter().any(|h| h.eq_ignore_ascii_case(host)) {
            errors.push(field, format!("image host '{}' is not allowed", host));
            return None;
        }

        Some(raw.trim().to_string())
    }
}

/// Validate a category create payload, returning the trimmed name
pub fn validate_category_name(payload: &Value) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Some(obj) = as_object(payload, &mut errors) else {
        return Err(errors);
    };
    let name = required_text(obj.get("name"), "name", CATEGORY_NAME_REQUIRED, &mut errors);
    match name {
        Some(name) if errors.is_empty() => Ok(name),
        _ => Err(errors),
    }
}

fn as_object<'a>(payload: &'a Value, errors: &mut ValidationErrors) -> Option<&'a Map<String, Value>> {
    let obj = payload.as_object();
    if obj.is_none() {
        errors.push("", "expected a JSON object");
    }
    obj
}

fn required_text(
    value: Option<&Value>,
    field: &str,
    required: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => {
            errors.push(field, required);
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(field, required);
            None
        }
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(_) => {
            errors.push(field, "must be a string");
            None
        }
    }
}

/// `null` and blank strings normalise to `None`
fn optional_text(value: &Value, field: &str, errors: &mut ValidationErrors) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => {
            errors.push(field, "must be a string");
            None
        }
    }
}

fn optional_bool(value: &Value, field: &str, errors: &mut ValidationErrors) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        _ => {
            errors.push(field, "must be a boolean");
            None
        }
    }
}

fn string_field(
    obj: &Map<String, Value>,
    key: &str,
    parent: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match obj.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => {
            errors.push(format!("{}.{}", parent, key), "must be a string");
            None
        }
    }
}

fn categories(
    value: Option<&Value>,
    known: Option<&[String]>,
    errors: &mut ValidationErrors,
) -> Option<Vec<String>> {
    let items = match value {
        None | Some(Value::Null) => {
            errors.push("categories", CATEGORIES_REQUIRED);
            return None;
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            errors.push("categories", "must be an array");
            return None;
        }
    };
    if items.is_empty() {
        errors.push("categories", CATEGORIES_REQUIRED);
        return None;
    }

    let before = errors.len();
    let mut tags = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let path = format!("categories[{}]", i);
        let tag = match item {
            Value::String(s) if !s.trim().is_empty() => s.trim(),
            Value::String(_) => {
                errors.push(path, "must not be blank");
                continue;
            }
            _ => {
                errors.push(path, "must be a string");
                continue;
            }
        };

        match known {
            None => tags.push(tag.to_string()),
            Some(known) => {
                let wanted = tag.to_lowercase();
                match known.iter().find(|k| k.trim().to_lowercase() == wanted) {
                    Some(canonical) => tags.push(canonical.clone()),
                    None => errors.push(path, format!("unknown category '{}'", tag)),
                }
            }
        }
    }

    (errors.len() == before).then_some(tags)
}

fn price(value: &Value, errors: &mut ValidationErrors) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::Number(n) => match n.as_f64() {
            Some(p) if p.is_finite() && p >= 0.0 => Some(p),
            _ => {
                errors.push("price", "must not be negative");
                None
            }
        },
        _ => {
            errors.push("price", "must be a number");
            None
        }
    }
}

fn stock(value: &Value, errors: &mut ValidationErrors) -> Option<i64> {
    match value {
        Value::Null => None,
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(f as i64),
                _ => {
                    errors.push("stock", "must be an integer");
                    None
                }
            }
        }
        _ => {
            errors.push("stock", "must be an integer");
            None
        }
    }
}

fn seo_metadata(value: &Value, errors: &mut ValidationErrors) -> Option<SeoMetadata> {
    let obj = match value {
        Value::Null => return None,
        Value::Object(obj) => obj,
        _ => {
            errors.push("seoMetadata", "must be an object");
            return None;
        }
    };

    let title = obj
        .get("title")
        .and_then(|v| optional_text(v, "seoMetadata.title", errors));
    let description = obj
        .get("description")
        .and_then(|v| optional_text(v, "seoMetadata.description", errors));

    let mut keywords = Vec::new();
    match obj.get("keywords") {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::String(s) if s.trim().is_empty() => {}
                    Value::String(s) => keywords.push(s.trim().to_string()),
                    _ => errors.push(format!("seoMetadata.keywords[{}]", i), "must be a string"),
                }
            }
        }
        Some(_) => errors.push("seoMetadata.keywords", "must be an array"),
    }

    Some(SeoMetadata {
        title,
        description,
        keywords,
    })
}
