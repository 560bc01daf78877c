//! Inventory table search, filtering and sorting.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::lot::LotView;
use crate::vaccine::VaccineFamily;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    CommercialName,
    GenericName,
    Family,
    LotNumber,
    #[default]
    ExpirationDate,
    QuantityOnHand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Table state: search text, family filter and sort.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQuery {
    pub search: String,
    pub family: Option<VaccineFamily>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl InventoryQuery {
    /// Clicking the active column flips the order; another column sorts
    /// ascending.
    pub fn sort_on(&mut self, field: SortField) {
        if self.sort_by == field {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_by = field;
            self.sort_order = SortOrder::Asc;
        }
    }

    fn matches(&self, view: &LotView) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || [
                view.vaccine.as_ref().map(|v| v.commercial_name.as_str()),
                view.vaccine.as_ref().map(|v| v.generic_name.as_str()),
                Some(view.lot.lot_number.as_str()),
            ]
            .into_iter()
            .flatten()
            .any(|haystack| haystack.to_lowercase().contains(&needle));

        let matches_family = match self.family {
            None => true,
            Some(family) => view.vaccine.as_ref().map(|v| v.family) == Some(family),
        };

        matches_search && matches_family
    }

    fn compare(&self, a: &LotView, b: &LotView) -> Ordering {
        let name = |v: &LotView| v.vaccine.as_ref().map(|v| v.commercial_name.clone());
        let generic = |v: &LotView| v.vaccine.as_ref().map(|v| v.generic_name.clone());
        let family = |v: &LotView| v.vaccine.as_ref().map(|v| v.family.label());

        let ordering = match self.sort_by {
            SortField::CommercialName => name(a)
                .unwrap_or_default()
                .cmp(&name(b).unwrap_or_default()),
            SortField::GenericName => generic(a)
                .unwrap_or_default()
                .cmp(&generic(b).unwrap_or_default()),
            SortField::Family => family(a)
                .unwrap_or_default()
                .cmp(&family(b).unwrap_or_default()),
            SortField::LotNumber => a.lot.lot_number.cmp(&b.lot.lot_number),
            SortField::ExpirationDate => a.lot.expiration_date.cmp(&b.lot.expiration_date),
            SortField::QuantityOnHand => a.lot.quantity_on_hand.cmp(&b.lot.quantity_on_hand),
        };

        match self.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Filter and sort a snapshot of the inventory. Ties keep input order.
    pub fn apply<'a>(&self, views: &'a [LotView]) -> Vec<&'a LotView> {
        let mut rows: Vec<&LotView> = views.iter().filter(|v| self.matches(v)).collect();
        rows.sort_by(|a, b| self.compare(a, b));
        rows
    }
}

/// Families that appear in the inventory, for the filter dropdown.
pub fn families_in_stock(views: &[LotView]) -> Vec<VaccineFamily> {
    let mut families: Vec<VaccineFamily> = views
        .iter()
        .filter_map(|v| v.vaccine.as_ref().map(|v| v.family))
        .collect();
    families.sort();
    families.dedup();
    families
}
