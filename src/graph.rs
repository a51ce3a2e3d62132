use serde::Serialize;

use crate::text::LinkType;

/// Where a price observation came from on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Navbar,
    Models,
}

/// One region's price observation. Embedded id-less in trims and related
/// models, wrapped with an id in the top-level price collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionPrice {
    pub region: String,
    pub from_price: Option<String>,
    pub as_shown_price: Option<String>,
    pub currency: String,
    pub disclosure_ids: Vec<String>,
    pub source: PriceSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Price {
    pub id: String,
    pub model_id: String,
    #[serde(flatten)]
    pub price: RegionPrice,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Disclosure {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub id: String,
    pub model_id: String,
    pub title: String,
    pub body: String,
    pub disclosure_ids: Vec<String>,
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trim {
    pub id: String,
    pub model_id: String,
    pub name: String,
    pub tagline: Option<String>,
    pub features: Vec<String>,
    pub prices: Vec<RegionPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Award {
    pub id: String,
    pub model_id: String,
    pub title: String,
    pub summary: String,
    pub disclosure_ids: Vec<String>,
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkRef {
    pub url: String,
    #[serde(rename = "type")]
    pub link_type: Option<LinkType>,
}

/// Model-scoped action links selected from the page link pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelLinks {
    pub build_and_price: Option<LinkRef>,
    pub inventory: Option<LinkRef>,
    pub find_dealer: Option<LinkRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedModel {
    pub id: String,
    pub name: String,
    pub canonical_url: String,
    pub prices: Vec<RegionPrice>,
    pub links: ModelLinks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    pub year: Option<i32>,
    pub canonical_url: String,
    pub locale: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub trim_ids: Vec<String>,
    pub section_ids: Vec<String>,
    pub asset_ids: Vec<String>,
    pub award_ids: Vec<String>,
    pub links: ModelLinks,
}

/// Entities that merge by id across pages.
pub trait Mergeable {
    fn id(&self) -> &str;
    fn merge(&mut self, other: Self);
}

fn fill_opt(dst: &mut Option<String>, src: Option<String>) {
    if dst.as_deref().map_or(true, |s| s.is_empty()) {
        if let Some(s) = src {
            if !s.is_empty() {
                *dst = Some(s);
            }
        }
    }
}

fn fill_str(dst: &mut String, src: String) {
    if dst.is_empty() && !src.is_empty() {
        *dst = src;
    }
}

/// Append-union preserving first-seen order.
fn union_vec(dst: &mut Vec<String>, src: Vec<String>) {
    for item in src {
        if !dst.contains(&item) {
            dst.push(item);
        }
    }
}

fn union_by_eq<T: PartialEq>(dst: &mut Vec<T>, src: Vec<T>) {
    for item in src {
        if !dst.contains(&item) {
            dst.push(item);
        }
    }
}

fn fill_link(dst: &mut Option<LinkRef>, src: Option<LinkRef>) {
    if dst.is_none() {
        *dst = src;
    }
}

impl ModelLinks {
    fn merge(&mut self, other: ModelLinks) {
        fill_link(&mut self.build_and_price, other.build_and_price);
        fill_link(&mut self.inventory, other.inventory);
        fill_link(&mut self.find_dealer, other.find_dealer);
    }
}

impl Mergeable for Model {
    fn id(&self) -> &str {
        &self.id
    }
    fn merge(&mut self, other: Model) {
        fill_str(&mut self.name, other.name);
        if self.year.is_none() {
            self.year = other.year;
        }
        fill_str(&mut self.canonical_url, other.canonical_url);
        fill_str(&mut self.locale, other.locale);
        fill_opt(&mut self.title, other.title);
        fill_opt(&mut self.description, other.description);
        union_vec(&mut self.trim_ids, other.trim_ids);
        union_vec(&mut self.section_ids, other.section_ids);
        union_vec(&mut self.asset_ids, other.asset_ids);
        union_vec(&mut self.award_ids, other.award_ids);
        self.links.merge(other.links);
    }
}

impl Mergeable for Price {
    fn id(&self) -> &str {
        &self.id
    }
    fn merge(&mut self, other: Price) {
        fill_opt(&mut self.price.from_price, other.price.from_price);
        fill_opt(&mut self.price.as_shown_price, other.price.as_shown_price);
        union_vec(&mut self.price.disclosure_ids, other.price.disclosure_ids);
    }
}

impl Mergeable for Disclosure {
    fn id(&self) -> &str {
        &self.id
    }
    fn merge(&mut self, _other: Disclosure) {
        // Id is derived from the text, so equal ids mean equal text.
    }
}

impl Mergeable for Section {
    fn id(&self) -> &str {
        &self.id
    }
    fn merge(&mut self, other: Section) {
        fill_str(&mut self.title, other.title);
        // Longer body wins; the first-seen body keeps ties.
        if other.body.len() > self.body.len() {
            self.body = other.body;
        }
        union_vec(&mut self.disclosure_ids, other.disclosure_ids);
        fill_str(&mut self.source_url, other.source_url);
    }
}

impl Mergeable for Trim {
    fn id(&self) -> &str {
        &self.id
    }
    fn merge(&mut self, other: Trim) {
        fill_str(&mut self.name, other.name);
        fill_opt(&mut self.tagline, other.tagline);
        union_vec(&mut self.features, other.features);
        union_by_eq(&mut self.prices, other.prices);
    }
}

impl Mergeable for Asset {
    fn id(&self) -> &str {
        &self.id
    }
    fn merge(&mut self, other: Asset) {
        if self.alt.is_none() {
            self.alt = other.alt;
        }
    }
}

impl Mergeable for Award {
    fn id(&self) -> &str {
        &self.id
    }
    fn merge(&mut self, other: Award) {
        if other.summary.len() > self.summary.len() {
            self.summary = other.summary;
        }
        union_vec(&mut self.disclosure_ids, other.disclosure_ids);
        fill_str(&mut self.source_url, other.source_url);
    }
}

impl Mergeable for RelatedModel {
    fn id(&self) -> &str {
        &self.id
    }
    fn merge(&mut self, other: RelatedModel) {
        fill_str(&mut self.name, other.name);
        fill_str(&mut self.canonical_url, other.canonical_url);
        union_by_eq(&mut self.prices, other.prices);
        self.links.merge(other.links);
    }
}

fn merge_into<T: Mergeable>(dst: &mut Vec<T>, src: Vec<T>) {
    for item in src {
        match dst.iter_mut().find(|d| d.id() == item.id()) {
            Some(existing) => existing.merge(item),
            None => dst.push(item),
        }
    }
}

/// The de-duplicated output graph. Collections keep first-seen order so
/// repeated runs over the same captures produce identical output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DomainGraph {
    pub models: Vec<Model>,
    pub prices: Vec<Price>,
    pub disclosures: Vec<Disclosure>,
    pub assets: Vec<Asset>,
    pub sections: Vec<Section>,
    pub trims: Vec<Trim>,
    pub related_models: Vec<RelatedModel>,
    pub awards: Vec<Award>,
}

impl DomainGraph {
    /// Fold another page's graph into this one, merging entities by id.
    pub fn merge_from(&mut self, other: DomainGraph) {
        merge_into(&mut self.models, other.models);
        merge_into(&mut self.prices, other.prices);
        merge_into(&mut self.disclosures, other.disclosures);
        merge_into(&mut self.assets, other.assets);
        merge_into(&mut self.sections, other.sections);
        merge_into(&mut self.trims, other.trims);
        merge_into(&mut self.related_models, other.related_models);
        merge_into(&mut self.awards, other.awards);
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
            && self.prices.is_empty()
            && self.disclosures.is_empty()
            && self.assets.is_empty()
            && self.sections.is_empty()
            && self.trims.is_empty()
            && self.related_models.is_empty()
            && self.awards.is_empty()
    }
}

// ── Tests ──
