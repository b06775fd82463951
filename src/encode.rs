//! Feature encoding for raw sales records.
//!
//! Each record becomes a `(month, product_index)` input and a quantity target:
//!
//! - the month comes from the calendar date in `sales_date`; records whose date
//!   does not parse are dropped,
//! - products are indexed in order of first appearance across the whole batch,
//! - quantities that do not parse as a finite number are coerced to `0.0` and the
//!   record is kept.
//!
//! The date/quantity asymmetry is deliberate behaviour that callers rely on.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// One raw sales row, as supplied by the host application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub sales_date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub quantity_sold: String,
}

impl SalesRecord {
    pub fn new(
        sales_date: impl Into<String>,
        product_description: impl Into<String>,
        quantity_sold: impl Into<String>,
    ) -> Self {
        Self {
            sales_date: sales_date.into(),
            product_description: product_description.into(),
            quantity_sold: quantity_sold.into(),
        }
    }
}

/// Accept strings, numbers, or `null` for record fields.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Float(x)) => x.to_string(),
        None => String::new(),
    })
}

/// Insertion-ordered, bijective mapping from product description to index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProductIndex {
    names: Vec<String>,
    #[serde(skip)]
    lookup: HashMap<String, usize>,
}

impl ProductIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index for `name`, assigning the next free one on first sight.
    pub fn insert(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.lookup.get(name) {
            return idx;
        }
        let idx = self.names.len();
        self.names.push(name.to_owned());
        self.lookup.insert(name.to_owned(), idx);
        idx
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    #[inline]
    pub fn name(&self, idx: usize) -> Option<&str> {
        self.names.get(idx).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Product names in index order.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// `(index, name)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().map(String::as_str).enumerate()
    }
}

/// Model input: calendar month (1..=12) and product index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FeatureVector {
    pub month: u32,
    pub product_index: usize,
}

impl FeatureVector {
    /// Width of the model input.
    pub const DIM: usize = 2;

    #[inline]
    pub fn new(month: u32, product_index: usize) -> Self {
        Self {
            month,
            product_index,
        }
    }

    #[inline]
    pub fn to_input(self) -> [f32; Self::DIM] {
        [self.month as f32, self.product_index as f32]
    }
}

/// Output of [`encode`]: aligned features/targets plus the product index.
///
/// `features().len() == targets().len()` always holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedSales {
    features: Vec<FeatureVector>,
    targets: Vec<f32>,
    products: ProductIndex,
}

impl EncodedSales {
    #[inline]
    pub fn features(&self) -> &[FeatureVector] {
        &self.features
    }

    #[inline]
    pub fn targets(&self) -> &[f32] {
        &self.targets
    }

    #[inline]
    pub fn products(&self) -> &ProductIndex {
        &self.products
    }

    #[inline]
    pub fn into_products(self) -> ProductIndex {
        self.products
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    fn push(&mut self, feature: FeatureVector, target: f32) {
        self.features.push(feature);
        self.targets.push(target);
    }
}

/// Encode a batch of records.
///
/// Never fails: empty input yields an empty result, bad dates drop the record,
/// bad quantities become `0.0`.
pub fn encode(records: &[SalesRecord]) -> EncodedSales {
    let mut products = ProductIndex::new();
    for record in records {
        products.insert(&record.product_description);
    }

    let mut encoded = EncodedSales {
        features: Vec::with_capacity(records.len()),
        targets: Vec::with_capacity(records.len()),
        products: ProductIndex::new(),
    };

    for record in records {
        let month = parse_month(&record.sales_date);
        let product_index = products.get(&record.product_description);
        if let (Some(month), Some(product_index)) = (month, product_index) {
            encoded.push(
                FeatureVector::new(month, product_index),
                coerce_quantity(&record.quantity_sold),
            );
        }
    }
    encoded.products = products;

    debug!(
        records = records.len(),
        kept = encoded.len(),
        dropped = records.len() - encoded.len(),
        products = encoded.products.len(),
        "encoded sales records"
    );
    encoded
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Calendar month (1..=12) of a date string, or `None` if it does not parse.
pub fn parse_month(raw: &str) -> Option<u32> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date.month());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.month());
    }
    // Month as written, in the timestamp's own offset.
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.month())
}

/// Parse a quantity, substituting `0.0` for anything that is not a finite number.
pub fn coerce_quantity(raw: &str) -> f32 {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|q| q.is_finite())
        .unwrap_or(0.0)
}
