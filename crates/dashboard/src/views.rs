//! Role views over the crop snapshot
//!
//! Each view receives only the slice of the snapshot its role may see. Views
//! hold copies of the crops they show so they can outlive the state lock.

use agri_gateway_trait::{Account, Crop};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;
use crate::overlay::DisapprovalOverlay;
use crate::session::Roles;

/// The four role tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Farmer,
    Inspector,
    Consumer,
    Owner,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [Self::Farmer, Self::Inspector, Self::Consumer, Self::Owner];

    /// Whether an account with `roles` may open this view
    pub fn is_permitted(self, roles: Roles) -> bool {
        match self {
            Self::Farmer | Self::Consumer => true,
            Self::Inspector => roles.is_inspector,
            Self::Owner => roles.is_owner,
        }
    }

    /// Tabs offered in navigation for `roles`
    ///
    /// Inspectors don't farm, so the farmer tab is dropped for them.
    pub fn available_tabs(roles: Roles) -> Vec<ViewKind> {
        let mut tabs = Vec::with_capacity(4);
        if !roles.is_inspector {
            tabs.push(Self::Farmer);
        }
        if roles.is_inspector {
            tabs.push(Self::Inspector);
        }
        tabs.push(Self::Consumer);
        if roles.is_owner {
            tabs.push(Self::Owner);
        }
        tabs
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Farmer => write!(f, "farmer"),
            Self::Inspector => write!(f, "inspector"),
            Self::Consumer => write!(f, "consumer"),
            Self::Owner => write!(f, "owner"),
        }
    }
}

impl FromStr for ViewKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "farmer" => Ok(Self::Farmer),
            "inspector" => Ok(Self::Inspector),
            "consumer" => Ok(Self::Consumer),
            "owner" => Ok(Self::Owner),
            other => Err(DashboardError::InvalidInput(format!(
                "unknown view '{}' (expected farmer, inspector, consumer or owner)",
                other
            ))),
        }
    }
}

/// Marketplace ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsumerSort {
    #[default]
    Name,
    Price,
    Quantity,
    Grade,
}

impl ConsumerSort {
    fn compare(self, a: &Crop, b: &Crop) -> Ordering {
        match self {
            Self::Name => a.details.name.to_lowercase().cmp(&b.details.name.to_lowercase()),
            Self::Price => a.details.unit_price.cmp(&b.details.unit_price),
            Self::Quantity => a.details.quantity.cmp(&b.details.quantity),
            Self::Grade => a.details.quality_grade.cmp(&b.details.quality_grade),
        }
    }
}

impl fmt::Display for ConsumerSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Price => write!(f, "price"),
            Self::Quantity => write!(f, "quantity"),
            Self::Grade => write!(f, "grade"),
        }
    }
}

impl FromStr for ConsumerSort {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "quantity" => Ok(Self::Quantity),
            "grade" => Ok(Self::Grade),
            other => Err(DashboardError::InvalidInput(format!(
                "unknown sort '{}' (expected name, price, quantity or grade)",
                other
            ))),
        }
    }
}

/// Marketplace sort and filter selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerQuery {
    pub sort: ConsumerSort,
    /// Case-insensitive substring of the crop type; `None` shows all
    pub crop_type: Option<String>,
}

impl ConsumerQuery {
    /// Set the crop-type filter; blank or "all" clears it
    pub fn with_crop_type(mut self, crop_type: Option<&str>) -> Self {
        self.crop_type = crop_type
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("all"))
            .map(str::to_string);
        self
    }

    pub fn with_sort(mut self, sort: ConsumerSort) -> Self {
        self.sort = sort;
        self
    }

    fn matches(&self, crop: &Crop) -> bool {
        match &self.crop_type {
            Some(wanted) => crop
                .details
                .crop_type
                .to_lowercase()
                .contains(&wanted.to_lowercase()),
            None => true,
        }
    }
}

// ===== Filters =====

/// Crops uploaded by `account`
pub fn farmer_crops<'a>(crops: &'a [Crop], account: &Account) -> Vec<&'a Crop> {
    crops.iter().filter(|c| c.is_farmed_by(account)).collect()
}

/// Crops waiting for inspection that the overlay does not hide
pub fn pending_crops<'a>(crops: &'a [Crop], overlay: &DisapprovalOverlay) -> Vec<&'a Crop> {
    crops
        .iter()
        .filter(|c| c.is_pending() && !overlay.contains(c.id))
        .collect()
}

/// Crops listed for sale
pub fn marketplace_crops(crops: &[Crop]) -> Vec<&Crop> {
    crops.iter().filter(|c| c.is_listed()).collect()
}

/// Distinct crop types among listed crops, for the filter menu
pub fn crop_types(crops: &[Crop]) -> Vec<String> {
    // Keyed by lowercase so "Grain" and "grain" collapse; first spelling wins
    let mut types: BTreeMap<String, String> = BTreeMap::new();
    for crop in marketplace_crops(crops) {
        let name = crop.details.crop_type.trim();
        if name.is_empty() {
            continue;
        }
        types.entry(name.to_lowercase()).or_insert_with(|| name.to_string());
    }
    types.into_values().collect()
}

// ===== View models =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmerView {
    pub account: Account,
    pub crops: Vec<Crop>,
}

impl FarmerView {
    pub fn build(crops: &[Crop], account: &Account) -> Self {
        Self {
            account: account.clone(),
            crops: farmer_crops(crops, account).into_iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectorView {
    pub pending: Vec<Crop>,
    /// Number of pending crops hidden by the overlay
    pub hidden: usize,
}

impl InspectorView {
    pub fn build(crops: &[Crop], overlay: &DisapprovalOverlay) -> Self {
        let pending: Vec<Crop> = pending_crops(crops, overlay).into_iter().cloned().collect();
        let hidden = crops
            .iter()
            .filter(|c| c.is_pending() && overlay.contains(c.id))
            .count();
        Self { pending, hidden }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumerView {
    pub listings: Vec<Crop>,
    pub crop_types: Vec<String>,
    pub query: ConsumerQuery,
}

impl ConsumerView {
    pub fn build(crops: &[Crop], query: &ConsumerQuery) -> Self {
        let mut listings: Vec<Crop> = marketplace_crops(crops)
            .into_iter()
            .filter(|c| query.matches(c))
            .cloned()
            .collect();
        // sort_by is stable: ties keep ascending id order
        listings.sort_by(|a, b| query.sort.compare(a, b));
        Self {
            listings,
            crop_types: crop_types(crops),
            query: query.clone(),
        }
    }
}

/// Owner panel: no crop data, only inspector management
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerView {
    pub owner: Account,
}

/// What the front end renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Farmer(FarmerView),
    Inspector(InspectorView),
    Consumer(ConsumerView),
    Owner(OwnerView),
    AccessDenied { requested: ViewKind },
    Disconnected,
    SignedOut,
}

impl View {
    /// Build the view for `kind`, applying role gating
    pub fn select(
        kind: ViewKind,
        account: &Account,
        roles: Roles,
        crops: &[Crop],
        overlay: &DisapprovalOverlay,
        query: &ConsumerQuery,
    ) -> Self {
        if !kind.is_permitted(roles) {
            return Self::AccessDenied { requested: kind };
        }
        match kind {
            ViewKind::Farmer => Self::Farmer(FarmerView::build(crops, account)),
            ViewKind::Inspector => Self::Inspector(InspectorView::build(crops, overlay)),
            ViewKind::Consumer => Self::Consumer(ConsumerView::build(crops, query)),
            ViewKind::Owner => Self::Owner(OwnerView {
                owner: account.clone(),
            }),
        }
    }

    pub fn kind(&self) -> Option<ViewKind> {
        match self {
            Self::Farmer(_) => Some(ViewKind::Farmer),
            Self::Inspector(_) => Some(ViewKind::Inspector),
            Self::Consumer(_) => Some(ViewKind::Consumer),
            Self::Owner(_) => Some(ViewKind::Owner),
            _ => None,
        }
    }
}
