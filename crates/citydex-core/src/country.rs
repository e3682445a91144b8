use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A country as described by the upstream country directory.
///
/// The layout mirrors the REST Countries v3.1 payload so entries can be
/// deserialized verbatim. Currencies keep the provider's order; the first one
/// is treated as the country's primary currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryDirectoryEntry {
    pub name: CountryName,
    #[serde(default)]
    pub flags: Flags,
    pub cca2: String,
    pub cca3: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currencies: Option<IndexMap<String, Currency>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryName {
    pub common: String,
    pub official: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flags {
    #[serde(default)]
    pub png: Option<String>,
    #[serde(default)]
    pub svg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl CountryDirectoryEntry {
    pub fn new(
        common: impl Into<String>,
        official: impl Into<String>,
        cca2: impl Into<String>,
        cca3: impl Into<String>,
    ) -> Self {
        Self {
            name: CountryName {
                common: common.into(),
                official: official.into(),
            },
            flags: Flags::default(),
            cca2: cca2.into(),
            cca3: cca3.into(),
            currencies: None,
        }
    }

    /// Appends a currency after any already present.
    pub fn with_currency(
        mut self,
        code: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        self.currencies.get_or_insert_with(IndexMap::new).insert(
            code.into(),
            Currency {
                name: name.into(),
                symbol: Some(symbol.into()),
            },
        );
        self
    }

    pub fn with_flag(mut self, png: impl Into<String>) -> Self {
        self.flags.png = Some(png.into());
        self
    }

    /// The first currency code listed by the provider.
    pub fn primary_currency(&self) -> Option<&str> {
        self.currencies
            .as_ref()
            .and_then(|currencies| currencies.keys().next())
            .map(String::as_str)
    }

    /// The flag image reference, preferring the raster image.
    pub fn flag(&self) -> Option<&str> {
        self.flags.png.as_deref().or(self.flags.svg.as_deref())
    }
}
