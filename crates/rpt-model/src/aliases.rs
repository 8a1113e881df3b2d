//! Alias tables: accepted header spellings per canonical column.

use serde::{Deserialize, Serialize};

use crate::ordered::OrderedMap;

/// Canonical field name to the header spellings that map onto it.
///
/// Aliases are tried in list order; the first one present in a table wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    fields: OrderedMap<Vec<String>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion used for built-in defaults and tests.
    pub fn with_field<I, S>(mut self, canonical: &str, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(canonical, aliases);
        self
    }

    pub fn insert<I, S>(&mut self, canonical: &str, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields
            .insert(canonical, aliases.into_iter().map(Into::into).collect());
    }

    pub fn aliases(&self, canonical: &str) -> Option<&[String]> {
        self.fields.get(canonical).map(Vec::as_slice)
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.fields.get(canonical).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Alias table of the transactions export.
///
/// Each field lists its canonical name first, so already standardized files load as is.
pub fn default_transaction_aliases() -> AliasTable {
    AliasTable::new()
        .with_field(
            "customer_id",
            [
                "customer_id",
                "Client ID",
                "Customer ID",
                "ID Cliente",
                "Cod Cliente",
                "cliente_id",
            ],
        )
        .with_field(
            "amount",
            ["amount", "Sale Value", "Amount", "Valor Venda", "Valor", "Total"],
        )
        .with_field(
            "date",
            ["date", "Sale Date", "Transaction Date", "Data Venda", "Data"],
        )
}

/// Alias table of the customer registry export.
pub fn default_customer_aliases() -> AliasTable {
    AliasTable::new()
        .with_field(
            "customer_id",
            ["customer_id", "Customer ID", "Client ID", "Cod Cliente", "ID Cliente"],
        )
        .with_field(
            "full_name",
            [
                "full_name",
                "Full Name",
                "Customer Name",
                "Nome Completo",
                "Nome Cliente",
                "Nome",
            ],
        )
        .with_field(
            "segment",
            ["segment", "Customer Segment", "Segment", "Segmento"],
        )
}
