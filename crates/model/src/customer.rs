use serde::{Deserialize, Serialize};

use trattoria_core::{Entity, TaxCode};

use crate::person::Person;

/// A restaurant customer.
///
/// Placed orders and table seating are not stored here; they are views over
/// [`Associations`](crate::Associations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    person: Person,
    email: String,
    phone_number: Option<String>,
}

/// Replacement values for a customer update.
///
/// `tax_code` must repeat the customer's own code; it is checked, never applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub tax_code: TaxCode,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

impl Customer {
    /// An empty phone number is stored as absent.
    pub fn new(
        tax_code: impl Into<TaxCode>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone_number: Option<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            person: Person::new(tax_code, first_name, last_name),
            email: email.into(),
            phone_number: phone_number.filter(|p| !p.is_empty()),
        }
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn tax_code(&self) -> &TaxCode {
        self.person.tax_code()
    }

    pub fn first_name(&self) -> &str {
        self.person.first_name()
    }

    pub fn last_name(&self) -> &str {
        self.person.last_name()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    /// Overwrite the mutable fields (names, email, phone). Identity is left untouched.
    pub fn apply_details(&mut self, details: &CustomerDetails) {
        self.person
            .rename(details.first_name.clone(), details.last_name.clone());
        self.email = details.email.clone();
        self.phone_number = details.phone_number.clone().filter(|p| !p.is_empty());
    }

    /// Details carrying this customer's current values, ready to be edited.
    pub fn details(&self) -> CustomerDetails {
        CustomerDetails {
            tax_code: self.tax_code().clone(),
            first_name: self.first_name().to_string(),
            last_name: self.last_name().to_string(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
        }
    }
}

impl Entity for Customer {
    type Id = TaxCode;
    const KIND: &'static str = "customer";

    fn id(&self) -> &Self::Id {
        self.person.tax_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_phone_is_absent() {
        let c = Customer::new(
            "RSSMRA85M01H501Z",
            "Mario",
            "Rossi",
            Some(String::new()),
            "mario@example.com",
        );
        assert_eq!(c.phone_number(), None);
    }

    #[test]
    fn apply_details_keeps_identity() {
        let mut c = Customer::new("RSSMRA85M01H501Z", "Mario", "Rossi", None, "mario@example.com");
        let mut details = c.details();
        details.tax_code = TaxCode::from("VRDGPP80A01F205X");
        details.first_name = "Marco".to_string();
        details.phone_number = Some("+393331234567".to_string());

        c.apply_details(&details);

        assert_eq!(c.tax_code().as_str(), "RSSMRA85M01H501Z");
        assert_eq!(c.first_name(), "Marco");
        assert_eq!(c.phone_number(), Some("+393331234567"));
    }
}
