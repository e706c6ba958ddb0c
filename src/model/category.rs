use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The closed set of expense categories.
///
/// A category name received from the store that is not one of these is kept as `Unknown` so that
/// the record survives a round trip. Unknown categories count towards grand totals but are left out
/// of every category-scoped figure.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Groceries,
    Dining,
    SmallShop,
    CarFuel,
    /// Car maintenance and any other non-fuel car spending.
    CarOther,
    /// Money received back for fuel. Its amount is a credit, not a spend.
    FuelReimbursement,
    RentAndCouncilTax,
    Utilities,
    Internet,
    Unknown(String),
}

/// The display group that a category rolls up into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryGroup {
    Grocery,
    Car,
    Housing,
}

serde_plain::derive_display_from_serialize!(CategoryGroup);
serde_plain::derive_fromstr_from_deserialize!(CategoryGroup);

impl Category {
    /// Every known category, in the order they are presented.
    pub const ALL: [Category; 9] = [
        Category::Groceries,
        Category::Dining,
        Category::SmallShop,
        Category::CarFuel,
        Category::CarOther,
        Category::FuelReimbursement,
        Category::RentAndCouncilTax,
        Category::Utilities,
        Category::Internet,
    ];

    /// The name used by the expense store.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Groceries => GROCERIES_STR,
            Category::Dining => DINING_STR,
            Category::SmallShop => SMALL_SHOP_STR,
            Category::CarFuel => CAR_FUEL_STR,
            Category::CarOther => CAR_OTHER_STR,
            Category::FuelReimbursement => FUEL_REIMBURSEMENT_STR,
            Category::RentAndCouncilTax => RENT_AND_COUNCIL_TAX_STR,
            Category::Utilities => UTILITIES_STR,
            Category::Internet => INTERNET_STR,
            Category::Unknown(s) => s,
        }
    }

    /// The group this category rolls up into, `None` for unknown categories.
    pub fn group(&self) -> Option<CategoryGroup> {
        match self {
            Category::Groceries | Category::Dining | Category::SmallShop => {
                Some(CategoryGroup::Grocery)
            }
            Category::CarFuel | Category::CarOther | Category::FuelReimbursement => {
                Some(CategoryGroup::Car)
            }
            Category::RentAndCouncilTax | Category::Utilities | Category::Internet => {
                Some(CategoryGroup::Housing)
            }
            Category::Unknown(_) => None,
        }
    }

    /// True for categories whose amount is money received rather than spent.
    pub fn is_credit(&self) -> bool {
        matches!(self, Category::FuelReimbursement)
    }

    /// True for car spending, the only categories where a reimbursement amount can be entered.
    pub fn is_car_spending(&self) -> bool {
        matches!(self, Category::CarFuel | Category::CarOther)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Unknown(_))
    }

    /// True if this category belongs to `group`.
    pub fn is_in(&self, group: CategoryGroup) -> bool {
        self.group() == Some(group)
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Unknown(String::new())
    }
}

impl FromStr for Category {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            GROCERIES_STR => Category::Groceries,
            DINING_STR => Category::Dining,
            SMALL_SHOP_STR => Category::SmallShop,
            CAR_FUEL_STR => Category::CarFuel,
            CAR_OTHER_STR | CAR_OTHER_ALIAS_STR => Category::CarOther,
            FUEL_REIMBURSEMENT_STR => Category::FuelReimbursement,
            RENT_AND_COUNCIL_TAX_STR => Category::RentAndCouncilTax,
            UTILITIES_STR => Category::Utilities,
            INTERNET_STR => Category::Internet,
            other => Category::Unknown(other.to_string()),
        })
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match Category::from_str(&s) {
            Ok(category) => Ok(category),
            Err(never) => match never {},
        }
    }
}

pub(super) const GROCERIES_STR: &str = "Groceries";
pub(super) const DINING_STR: &str = "Dining";
pub(super) const SMALL_SHOP_STR: &str = "Small Shop";
pub(super) const CAR_FUEL_STR: &str = "Car - Fuel";
pub(super) const CAR_OTHER_STR: &str = "Car - Maintenance";
pub(super) const CAR_OTHER_ALIAS_STR: &str = "Car - Other";
pub(super) const FUEL_REIMBURSEMENT_STR: &str = "Fuel Reimbursement";
pub(super) const RENT_AND_COUNCIL_TAX_STR: &str = "Rent and Council Tax";
pub(super) const UTILITIES_STR: &str = "Utilities";
pub(super) const INTERNET_STR: &str = "Internet";
