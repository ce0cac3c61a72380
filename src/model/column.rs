use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Represents the known columns of the travel log worksheet.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionColumn {
    Date,
    Cost,
    PointSpend,
    PointCashValue,
    Category,
    TripName,
    Merchant,
}

serde_plain::derive_display_from_serialize!(TransactionColumn);
serde_plain::derive_fromstr_from_deserialize!(TransactionColumn);

impl TransactionColumn {
    /// Every column, in worksheet and export order.
    pub const ALL: [TransactionColumn; 7] = [
        TransactionColumn::Date,
        TransactionColumn::Cost,
        TransactionColumn::PointSpend,
        TransactionColumn::PointCashValue,
        TransactionColumn::Category,
        TransactionColumn::TripName,
        TransactionColumn::Merchant,
    ];

    pub fn from_header(header: impl AsRef<str>) -> Result<TransactionColumn> {
        match header.as_ref().trim() {
            DATE_STR => Ok(TransactionColumn::Date),
            COST_STR => Ok(TransactionColumn::Cost),
            POINT_SPEND_STR => Ok(TransactionColumn::PointSpend),
            POINT_CASH_VALUE_STR => Ok(TransactionColumn::PointCashValue),
            CATEGORY_STR => Ok(TransactionColumn::Category),
            TRIP_NAME_STR => Ok(TransactionColumn::TripName),
            MERCHANT_STR => Ok(TransactionColumn::Merchant),
            bad => bail!("Invalid transaction column name '{bad}'"),
        }
    }

    /// The display name used as the worksheet header and the CSV export header.
    pub fn as_header_str(&self) -> &'static str {
        match self {
            TransactionColumn::Date => DATE_STR,
            TransactionColumn::Cost => COST_STR,
            TransactionColumn::PointSpend => POINT_SPEND_STR,
            TransactionColumn::PointCashValue => POINT_CASH_VALUE_STR,
            TransactionColumn::Category => CATEGORY_STR,
            TransactionColumn::TripName => TRIP_NAME_STR,
            TransactionColumn::Merchant => MERCHANT_STR,
        }
    }
}

pub(crate) const DATE_STR: &str = "Date";
pub(crate) const COST_STR: &str = "Cost";
pub(crate) const POINT_SPEND_STR: &str = "Point Spend";
pub(crate) const POINT_CASH_VALUE_STR: &str = "Point Cash Value";
pub(crate) const CATEGORY_STR: &str = "Category";
pub(crate) const TRIP_NAME_STR: &str = "Trip Name";
pub(crate) const MERCHANT_STR: &str = "Merchant";
