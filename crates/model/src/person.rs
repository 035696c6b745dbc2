use serde::{Deserialize, Serialize};

use trattoria_core::TaxCode;

/// Identity and name shared by customers and employees.
///
/// Embedded by value in [`Customer`](crate::Customer) and [`Employee`](crate::Employee).
/// The tax code has no setter: once a person exists, its natural key never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    tax_code: TaxCode,
    first_name: String,
    last_name: String,
}

impl Person {
    pub fn new(
        tax_code: impl Into<TaxCode>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            tax_code: tax_code.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn tax_code(&self) -> &TaxCode {
        &self.tax_code
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn rename(&mut self, first_name: impl Into<String>, last_name: impl Into<String>) {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
    }
}
