//! Order records received from the storefront webhook
//!
//! Prices and costs are carried as [`Decimal`] parsed from the literal JSON
//! text, so `4.50` is stored and written back as `4.50`.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

/// One order event as delivered by the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    pub product_name: String,
    pub quantity: u32,
    #[serde(with = "decimal_literal")]
    pub price: Decimal,
    #[serde(with = "decimal_literal")]
    pub cost: Decimal,
}

impl OrderRecord {
    /// Order line with the given identifier, item and amounts.
    pub fn new(
        id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: u32,
        price: Decimal,
        cost: Decimal,
    ) -> Self {
        Self { id: id.into(), product_name: product_name.into(), quantity, price, cost }
    }

    /// Convert into the fixed `[id, name, quantity, price, cost]` row.
    pub fn to_row(&self) -> OrderRow {
        OrderRow([
            CellValue::Text(self.id.clone()),
            CellValue::Text(self.product_name.clone()),
            CellValue::Integer(i64::from(self.quantity)),
            CellValue::Decimal(self.price),
            CellValue::Decimal(self.cost),
        ])
    }
}

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Decimal(value) => write!(f, "{value}"),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Decimal(value) => decimal_literal::serialize(value, serializer),
        }
    }
}

/// The five cells written for one order, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow([CellValue; 5]);

impl OrderRow {
    /// Cells in header order.
    pub fn cells(&self) -> &[CellValue; 5] {
        &self.0
    }
}

impl From<OrderRow> for Vec<CellValue> {
    fn from(row: OrderRow) -> Self {
        row.0.into()
    }
}

/// Serde adapter that keeps decimal values as their exact literal text.
///
/// Deserialization accepts a JSON number or a JSON string and never goes
/// through `f64`. It requires a `serde_json` text deserializer
/// (`from_str`/`from_slice`), which is what every ingress path uses.
pub mod decimal_literal {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::value::RawValue;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(value.to_string()).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let literal = raw.get().trim();

        let text = if literal.starts_with('"') {
            serde_json::from_str::<String>(literal).map_err(D::Error::custom)?
        } else {
            literal.to_string()
        };

        parse(text.trim()).map_err(D::Error::custom)
    }

    /// Parse decimal text, accepting plain and scientific notation.
    pub fn parse(text: &str) -> Result<Decimal, rust_decimal::Error> {
        if text.contains(['e', 'E']) {
            Decimal::from_scientific(text)
        } else {
            Decimal::from_str(text)
        }
    }
}
