//! Column descriptors and the two presets the dashboards use.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    Date,
    String,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::String => "string",
        }
    }
}

/// How a cell value is turned into display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellFormat {
    Raw,
    Money,
    Int,
    Dte,
    Percent,
    SignedPercent,
    LongDate,
    ShortDate,
    OptionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub label: String,
    pub key: String,
    pub kind: ColumnType,
    pub format: CellFormat,
    pub title: Option<String>,
}

impl Column {
    pub fn new(label: &str, key: &str, kind: ColumnType, format: CellFormat) -> Self {
        Self {
            label: label.to_string(),
            key: key.to_string(),
            kind,
            format,
            title: None,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPreset {
    OptionsChain,
    TopContracts,
}

impl ColumnPreset {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "options_chain" | "options-chain" | "chain" => Some(ColumnPreset::OptionsChain),
            "top_contracts" | "top-contracts" | "top" => Some(ColumnPreset::TopContracts),
            _ => None,
        }
    }

    pub fn columns(&self) -> ColumnSet {
        match self {
            ColumnPreset::OptionsChain => ColumnSet::options_chain(),
            ColumnPreset::TopContracts => ColumnSet::top_contracts(),
        }
    }

    /// Field that carries days-to-expiration for this preset.
    pub fn dte_field(&self) -> &'static str {
        match self {
            ColumnPreset::OptionsChain => "days_to_expiration",
            ColumnPreset::TopContracts => "dte",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn options_chain() -> Self {
        use CellFormat as F;
        use ColumnType as T;
        Self::new(vec![
            Column::new("Expiry", "expiration_date", T::Date, F::LongDate),
            Column::new("Type", "option_type", T::String, F::OptionType),
            Column::new("Strike", "strike_price", T::Number, F::Money),
            Column::new("Last price", "latest_close_price", T::Number, F::Money),
            Column::new("Total volume", "total_volume", T::Number, F::Int),
            Column::new("DTE", "days_to_expiration", T::Number, F::Dte).with_title(
                "DTE = Days to Expiration at the end of the window. Expired contracts show DTE = 0.",
            ),
            Column::new("Moneyness", "signed_moneyness_pct", T::Number, F::Percent),
        ])
    }

    pub fn top_contracts() -> Self {
        use CellFormat as F;
        use ColumnType as T;
        Self::new(vec![
            Column::new("Ticker", "underlying_ticker", T::String, F::Raw),
            Column::new("Expiry", "expiration_date", T::Date, F::ShortDate),
            Column::new("Type", "option_type", T::String, F::OptionType),
            Column::new("Strike", "strike_price", T::Number, F::Money),
            Column::new("Last Price", "latest_close_price", T::Number, F::Money),
            Column::new("Volume", "total_volume", T::Number, F::Int),
            Column::new("Moneyness", "signed_moneyness_pct", T::Number, F::SignedPercent),
            Column::new("DTE", "dte", T::Number, F::Int).with_title("Days to Expiration from today"),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn find(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Declared type of `key`; unknown keys compare as strings.
    pub fn kind_of(&self, key: &str) -> ColumnType {
        self.find(key).map(|c| c.kind).unwrap_or(ColumnType::String)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_is_string() {
        let cols = ColumnSet::options_chain();
        assert_eq!(cols.kind_of("strike_price"), ColumnType::Number);
        assert_eq!(cols.kind_of("expiration_date"), ColumnType::Date);
        assert_eq!(cols.kind_of("nope"), ColumnType::String);
    }

    #[test]
    fn presets_parse() {
        assert_eq!(ColumnPreset::parse("top"), Some(ColumnPreset::TopContracts));
        assert_eq!(ColumnPreset::parse("Options_Chain"), Some(ColumnPreset::OptionsChain));
        assert_eq!(ColumnPreset::parse("x"), None);
        assert_eq!(ColumnPreset::TopContracts.columns().len(), 8);
    }
}
