//! Validation rules: stateless predicates over caller-supplied fields.
//!
//! Format rules (tax code, email, phone) are driven by [`RulesConfig`] patterns, compiled
//! once into a [`Rules`] value. Numeric and date rules are free functions.

use std::sync::Arc;

use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::TaxCode;

pub const TAX_CODE_PATTERN: &str = r"^[A-Z]{6}[0-9]{2}[A-Z][0-9]{2}[A-Z][0-9]{3}[A-Z]$";
pub const EMAIL_PATTERN: &str = r"^[A-Za-z0-9+_.-]+@(.+)$";
pub const PHONE_PATTERN: &str = r"^[+]?[0-9]{10,15}$";

static GLOBAL: OnceCell<Arc<Rules>> = OnceCell::new();

/// Pattern configuration for the format rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub tax_code_pattern: String,
    pub email_pattern: String,
    pub phone_pattern: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            tax_code_pattern: TAX_CODE_PATTERN.to_string(),
            email_pattern: EMAIL_PATTERN.to_string(),
            phone_pattern: PHONE_PATTERN.to_string(),
        }
    }
}

/// Compiled format rules.
#[derive(Debug, Clone)]
pub struct Rules {
    config: RulesConfig,
    tax_code: Regex,
    email: Regex,
    phone: Regex,
}

impl Default for Rules {
    fn default() -> Self {
        // Built-in patterns are constants and always compile.
        Self {
            config: RulesConfig::default(),
            tax_code: Regex::new(TAX_CODE_PATTERN).expect("built-in tax code pattern compiles"),
            email: Regex::new(EMAIL_PATTERN).expect("built-in email pattern compiles"),
            phone: Regex::new(PHONE_PATTERN).expect("built-in phone pattern compiles"),
        }
    }
}

impl Rules {
    pub fn from_config(config: &RulesConfig) -> DomainResult<Self> {
        Ok(Self {
            config: config.clone(),
            tax_code: compile("tax_code_pattern", &config.tax_code_pattern)?,
            email: compile("email_pattern", &config.email_pattern)?,
            phone: compile("phone_pattern", &config.phone_pattern)?,
        })
    }

    /// Patterns these rules were compiled from.
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Process-wide rules. Falls back to the built-in patterns when nothing was installed.
    pub fn global() -> Arc<Rules> {
        GLOBAL.get_or_init(|| Arc::new(Rules::default())).clone()
    }

    /// Install the process-wide rules. Only the first call (or a call made before any
    /// [`Rules::global`] read) succeeds.
    pub fn install(config: &RulesConfig) -> DomainResult<Arc<Rules>> {
        let rules = Arc::new(Rules::from_config(config)?);
        GLOBAL
            .set(rules.clone())
            .map_err(|_| DomainError::conflict("validation rules are already installed"))?;
        Ok(rules)
    }

    pub fn is_valid_tax_code(&self, value: &str) -> bool {
        self.tax_code.is_match(value)
    }

    pub fn is_valid_email(&self, value: &str) -> bool {
        self.email.is_match(value)
    }

    pub fn is_valid_phone(&self, value: &str) -> bool {
        self.phone.is_match(value)
    }

    pub fn check_tax_code(&self, tax_code: &TaxCode) -> DomainResult<()> {
        require_non_empty("tax code", tax_code.as_str())?;
        if !self.is_valid_tax_code(tax_code.as_str()) {
            return Err(DomainError::validation(format!(
                "invalid tax code format: {tax_code}"
            )));
        }
        Ok(())
    }

    pub fn check_email(&self, email: &str) -> DomainResult<()> {
        require_non_empty("email", email)?;
        if !self.is_valid_email(email) {
            return Err(DomainError::validation(format!("invalid email format: {email}")));
        }
        Ok(())
    }

    /// Phone numbers are optional; an empty string counts as absent.
    pub fn check_phone(&self, phone: Option<&str>) -> DomainResult<()> {
        match phone {
            Some(p) if !p.is_empty() && !self.is_valid_phone(p) => Err(DomainError::validation(
                format!("invalid phone number format: {p}"),
            )),
            _ => Ok(()),
        }
    }
}

fn compile(field: &str, pattern: &str) -> DomainResult<Regex> {
    Regex::new(pattern).map_err(|e| DomainError::validation(format!("{field}: {e}")))
}

/// Rejects empty or whitespace-only text.
pub fn require_non_empty(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Salary in smallest currency unit; zero is allowed.
pub fn check_salary(salary: i64) -> DomainResult<()> {
    if salary < 0 {
        return Err(DomainError::validation("salary cannot be negative"));
    }
    Ok(())
}

/// Price in smallest currency unit.
pub fn check_price(price: i64) -> DomainResult<()> {
    if price <= 0 {
        return Err(DomainError::validation("price must be greater than 0"));
    }
    Ok(())
}

pub fn check_quantity(quantity: i64) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::validation("quantity must be greater than 0"));
    }
    Ok(())
}

pub fn check_seats(num_seats: u32) -> DomainResult<()> {
    if num_seats == 0 {
        return Err(DomainError::validation("number of seats must be greater than 0"));
    }
    Ok(())
}

pub fn check_date_range(start: NaiveDate, end: NaiveDate) -> DomainResult<()> {
    if start > end {
        return Err(DomainError::validation(format!(
            "start date {start} cannot be after end date {end}"
        )));
    }
    Ok(())
}

pub fn check_not_in_future(field: &str, date: NaiveDate, today: NaiveDate) -> DomainResult<()> {
    if date > today {
        return Err(DomainError::validation(format!(
            "{field} cannot be in the future ({date} > {today})"
        )));
    }
    Ok(())
}
