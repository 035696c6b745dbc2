use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use trattoria_core::{Entity, TaxCode};

use crate::person::Person;

/// A restaurant employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    person: Person,
    /// Salary in smallest currency unit.
    salary: i64,
    job_title: String,
    hire_date: NaiveDate,
}

/// Replacement values for an employee update (the tax code is not part of it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDetails {
    pub first_name: String,
    pub last_name: String,
    pub salary: i64,
    pub job_title: String,
    pub hire_date: NaiveDate,
}

impl Employee {
    pub fn new(
        tax_code: impl Into<TaxCode>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        salary: i64,
        job_title: impl Into<String>,
        hire_date: NaiveDate,
    ) -> Self {
        Self {
            person: Person::new(tax_code, first_name, last_name),
            salary,
            job_title: job_title.into(),
            hire_date,
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

    pub fn salary(&self) -> i64 {
        self.salary
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn hire_date(&self) -> NaiveDate {
        self.hire_date
    }

    pub fn apply_details(&mut self, details: &EmployeeDetails) {
        self.person
            .rename(details.first_name.clone(), details.last_name.clone());
        self.salary = details.salary;
        self.job_title = details.job_title.clone();
        self.hire_date = details.hire_date;
    }

    pub fn details(&self) -> EmployeeDetails {
        EmployeeDetails {
            first_name: self.first_name().to_string(),
            last_name: self.last_name().to_string(),
            salary: self.salary,
            job_title: self.job_title.clone(),
            hire_date: self.hire_date,
        }
    }
}

impl Entity for Employee {
    type Id = TaxCode;
    const KIND: &'static str = "employee";

    fn id(&self) -> &Self::Id {
        self.person.tax_code()
    }
}
