//! CategoryNode: Nested Nomenclature Input
//!
//! Decodes the nested JSON tree delivered by the fetch collaborator.
//! Every optional field is decoded leniently: `null`, a missing key or a
//! value of the wrong shape becomes the empty value for that field. Where a
//! field has several accepted keys, the first key present wins.
//!
//! A node without a usable `id` cannot become a record. It is dropped on its
//! own and its decodable children take its place under its parent, so one bad
//! entry never hides the subtree below it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::flatten::Lang;
use crate::error::CatalogError;

/// Node identifier as assigned by the upstream nomenclature API
pub type NodeId = u32;

type Object = Map<String, Value>;

// =============================================================================
// Types
// =============================================================================

/// One `(country, rate)` pair from the tax enrichment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxValue {
    pub country_id: u32,
    pub rate: String,
}

/// Optional tax enrichment merged onto a node by NC code.
///
/// The free-text fields are indexed by `Lang::index()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxInfo {
    pub vat: String,
    pub excise: String,
    /// Customs duty as displayed, e.g. "5%" or "exempt"
    pub tax_customs: [String; 3],
    pub vat_exemption: [String; 3],
    pub excise_exempted: [String; 3],
    pub export: [String; 3],
    pub tax_values: Vec<TaxValue>,
    pub valid_from: String,
    pub valid_to: String,
}

impl TaxInfo {
    pub fn is_empty(&self) -> bool {
        self.vat.is_empty()
            && self.excise.is_empty()
            && all_empty(&self.tax_customs)
            && all_empty(&self.vat_exemption)
            && all_empty(&self.excise_exempted)
            && all_empty(&self.export)
            && self.tax_values.is_empty()
            && self.valid_from.is_empty()
            && self.valid_to.is_empty()
    }

    pub fn tax_customs(&self, lang: Lang) -> &str {
        &self.tax_customs[lang.index()]
    }

    pub fn vat_exemption(&self, lang: Lang) -> &str {
        &self.vat_exemption[lang.index()]
    }

    pub fn excise_exempted(&self, lang: Lang) -> &str {
        &self.excise_exempted[lang.index()]
    }

    pub fn export(&self, lang: Lang) -> &str {
        &self.export[lang.index()]
    }

    fn from_object(map: &Object) -> TaxInfo {
        let i18n = map.get("i18n").and_then(Value::as_object);
        TaxInfo {
            vat: text(map, &["vat"]),
            excise: text(map, &["excise"]),
            tax_customs: localized(map, i18n, "tax_customs"),
            vat_exemption: localized(map, i18n, "vat_exemption"),
            excise_exempted: localized(map, i18n, "excise_exempted"),
            export: localized(map, i18n, "export"),
            tax_values: match first(map, &["tax_values", "taxValues", "taxvalues_set"]) {
                Some(Value::Array(items)) => items.iter().filter_map(decode_tax_value).collect(),
                _ => Vec::new(),
            },
            valid_from: text(map, &["valid_from"]),
            valid_to: text(map, &["valid_to"]),
        }
    }
}

fn all_empty(texts: &[String; 3]) -> bool {
    texts.iter().all(String::is_empty)
}

/// A node of the nested nomenclature tree
#[derive(Debug, Clone, Default)]
pub struct CategoryNode {
    pub id: NodeId,
    /// NC code, possibly empty for chapter/section headings
    pub nc: String,
    pub name_ro: String,
    pub name_ru: String,
    pub name_en: String,
    pub info_ro: String,
    pub info_ru: String,
    pub info_en: String,
    // Regulatory act lists are only ever counted.
    pub import_acts: usize,
    pub export_acts: usize,
    pub transit_acts: usize,
    pub regulatory_acts: usize,
    pub tax_info: Option<TaxInfo>,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Total number of regulatory acts attached to this node
    pub fn regulatory_act_count(&self) -> usize {
        self.regulatory_acts + self.import_acts + self.export_acts + self.transit_acts
    }
}

// =============================================================================
// Document decoding
// =============================================================================

/// Parse a whole nomenclature document into its root nodes.
///
/// Accepts a bare JSON array of nodes, or an object wrapping the array under
/// `results` or `children`.
pub fn parse_document(json: &str) -> Result<Vec<CategoryNode>, CatalogError> {
    if json.trim().is_empty() {
        return Err(CatalogError::EmptyDocument);
    }

    let root: Value = serde_json::from_str(json)?;
    match root {
        Value::Array(items) => Ok(decode_nodes(items)),
        Value::Object(mut map) => {
            match map.remove("results").or_else(|| map.remove("children")) {
                Some(Value::Array(items)) => Ok(decode_nodes(items)),
                _ => Err(CatalogError::NotAList { found: "object" }),
            }
        }
        Value::Null => Err(CatalogError::EmptyDocument),
        Value::Bool(_) => Err(CatalogError::NotAList { found: "boolean" }),
        Value::Number(_) => Err(CatalogError::NotAList { found: "number" }),
        Value::String(_) => Err(CatalogError::NotAList { found: "string" }),
    }
}

/// Decode a list of raw nodes. Nodes without an id hand their children up.
fn decode_nodes(items: Vec<Value>) -> Vec<CategoryNode> {
    let mut nodes = Vec::with_capacity(items.len());
    for (position, raw) in items.into_iter().enumerate() {
        let mut map = match raw {
            Value::Object(map) => map,
            other => {
                tracing::warn!(position, found = %other, "skipping non-object category node");
                continue;
            }
        };

        let children = match map.remove("children") {
            Some(Value::Array(items)) => decode_nodes(items),
            _ => Vec::new(),
        };

        match map.get("id").and_then(value_as_id) {
            Some(id) => nodes.push(decode_node(id, &map, children)),
            None => {
                tracing::warn!(
                    position,
                    promoted = children.len(),
                    "category node without a usable id; keeping its children"
                );
                nodes.extend(children);
            }
        }
    }
    nodes
}

fn decode_node(id: NodeId, map: &Object, children: Vec<CategoryNode>) -> CategoryNode {
    CategoryNode {
        id,
        nc: text(map, &["nc", "code"]),
        name_ro: text(map, &["name_ro"]),
        name_ru: text(map, &["name_ru"]),
        name_en: text(map, &["name_en"]),
        info_ro: text(map, &["info_ro"]),
        info_ru: text(map, &["info_ru"]),
        info_en: text(map, &["info_en"]),
        import_acts: count(map, &["import_acts"]),
        export_acts: count(map, &["export_acts"]),
        transit_acts: count(map, &["transit_acts"]),
        regulatory_acts: count(map, &["regulatory_acts", "regulatoryActs"]),
        tax_info: match first(map, &["tax_info", "taxInfo"]) {
            Some(Value::Object(tax)) => Some(TaxInfo::from_object(tax)).filter(|t| !t.is_empty()),
            _ => None,
        },
        children,
    }
}

// =============================================================================
// Lenient field decoders
// =============================================================================

/// Value of the first accepted key present with a non-null value
fn first<'m>(map: &'m Object, keys: &[&str]) -> Option<&'m Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

fn value_as_id(raw: &Value) -> Option<u32> {
    match raw {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text(map: &Object, keys: &[&str]) -> String {
    first(map, keys).and_then(value_as_text).unwrap_or_default()
}

fn count(map: &Object, keys: &[&str]) -> usize {
    match first(map, keys) {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Number(n)) => n.as_u64().map(|v| v as usize).unwrap_or(0),
        _ => 0,
    }
}

/// `<field>_ro`/`_ru`/`_en` keys, falling back to the API's `i18n.<lang>.<field>`
fn localized(map: &Object, i18n: Option<&Object>, field: &str) -> [String; 3] {
    Lang::ALL.map(|lang| {
        let tag = lang.tag();
        let flat = text(map, &[format!("{}_{}", field, tag).as_str()]);
        if !flat.is_empty() {
            return flat;
        }
        i18n.and_then(|i| i.get(tag))
            .and_then(Value::as_object)
            .map(|texts| text(texts, &[field]))
            .unwrap_or_default()
    })
}

/// Tax values arrive either as `[country, rate]` pairs or as objects
fn decode_tax_value(raw: &Value) -> Option<TaxValue> {
    let (country, rate) = match raw {
        Value::Array(pair) if pair.len() == 2 => (&pair[0], &pair[1]),
        Value::Object(map) => (
            first(map, &["country_id", "countryId", "country"])?,
            first(map, &["rate", "value"])?,
        ),
        _ => return None,
    };

    let country_id = match country {
        Value::Object(inner) => inner.get("id").and_then(value_as_id),
        other => value_as_id(other),
    }?;
    let rate = value_as_text(rate)?;

    Some(TaxValue { country_id, rate })
}

// =============================================================================
// Tests
// =============================================================================
