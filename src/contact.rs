//! Address-book record model
//!
//! A [`Contact`] is immutable once built. Construction goes through
//! [`ContactBuilder`], which starts from the customer identifier and fills the
//! remaining fields with chained setters.
//!
//! Optional fields (`region`, `postal_code`, `fax`) are `Option<String>`:
//! `None` means the field is absent, `Some(String::new())` means it is present
//! but empty. The codecs keep these two states apart.

use std::fmt;

use serde::Serialize;

/// One field of a contact, in canonical wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CustomerId,
    CompanyName,
    ContactName,
    ContactTitle,
    Address,
    City,
    Email,
    Region,
    PostalCode,
    Country,
    Phone,
    Fax,
}

impl Field {
    /// Every field in the order both wire formats emit them
    pub const ALL: [Field; 12] = [
        Field::CustomerId,
        Field::CompanyName,
        Field::ContactName,
        Field::ContactTitle,
        Field::Address,
        Field::City,
        Field::Email,
        Field::Region,
        Field::PostalCode,
        Field::Country,
        Field::Phone,
        Field::Fax,
    ];

    /// Key used in the JSON representation (case-sensitive)
    pub fn json_key(self) -> &'static str {
        match self {
            Field::CustomerId => "customerId",
            Field::CompanyName => "companyName",
            Field::ContactName => "contactName",
            Field::ContactTitle => "contactTitle",
            Field::Address => "address",
            Field::City => "city",
            Field::Email => "email",
            Field::Region => "region",
            Field::PostalCode => "postalCode",
            Field::Country => "country",
            Field::Phone => "phone",
            Field::Fax => "fax",
        }
    }

    /// Element name used in the XML representation
    pub fn xml_tag(self) -> &'static str {
        match self {
            Field::CustomerId => "CustomerID",
            Field::CompanyName => "CompanyName",
            Field::ContactName => "ContactName",
            Field::ContactTitle => "ContactTitle",
            Field::Address => "Address",
            Field::City => "City",
            Field::Email => "Email",
            Field::Region => "Region",
            Field::PostalCode => "PostalCode",
            Field::Country => "Country",
            Field::Phone => "Phone",
            Field::Fax => "Fax",
        }
    }

    /// Whether the field may be absent
    pub fn is_optional(self) -> bool {
        matches!(self, Field::Region | Field::PostalCode | Field::Fax)
    }
}

/// A single address-book entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    customer_id: String,
    company_name: String,
    contact_name: String,
    contact_title: String,
    address: String,
    city: String,
    email: String,
    region: Option<String>,
    /// Kept as text to allow ZIP+4 and non-numeric codes
    postal_code: Option<String>,
    country: String,
    phone: String,
    fax: Option<String>,
}

impl Contact {
    /// Start building a contact with the given customer identifier
    pub fn builder(customer_id: impl Into<String>) -> ContactBuilder {
        ContactBuilder::new(customer_id)
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn contact_name(&self) -> &str {
        &self.contact_name
    }

    pub fn contact_title(&self) -> &str {
        &self.contact_title
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn fax(&self) -> Option<&str> {
        self.fax.as_deref()
    }

    /// Value of a field by name; `None` only for an absent optional field
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::CustomerId => Some(&self.customer_id),
            Field::CompanyName => Some(&self.company_name),
            Field::ContactName => Some(&self.contact_name),
            Field::ContactTitle => Some(&self.contact_title),
            Field::Address => Some(&self.address),
            Field::City => Some(&self.city),
            Field::Email => Some(&self.email),
            Field::Region => self.region(),
            Field::PostalCode => self.postal_code(),
            Field::Country => Some(&self.country),
            Field::Phone => Some(&self.phone),
            Field::Fax => self.fax(),
        }
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Customer ID: {}\nCompany Name: {}\nEmail: {}",
            self.customer_id, self.company_name, self.email
        )
    }
}

/// Fluent builder for [`Contact`]
///
/// Required fields default to the empty string, optional fields default to
/// absent. `build` borrows the builder, so it can be called repeatedly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactBuilder {
    customer_id: String,
    company_name: String,
    contact_name: String,
    contact_title: String,
    address: String,
    city: String,
    email: String,
    region: Option<String>,
    postal_code: Option<String>,
    country: String,
    phone: String,
    fax: Option<String>,
}

impl ContactBuilder {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            company_name: String::new(),
            contact_name: String::new(),
            contact_title: String::new(),
            address: String::new(),
            city: String::new(),
            email: String::new(),
            region: None,
            postal_code: None,
            country: String::new(),
            phone: String::new(),
            fax: None,
        }
    }

    pub fn company_name(mut self, value: impl Into<String>) -> Self {
        self.company_name = value.into();
        self
    }

    pub fn contact_name(mut self, value: impl Into<String>) -> Self {
        self.contact_name = value.into();
        self
    }

    pub fn contact_title(mut self, value: impl Into<String>) -> Self {
        self.contact_title = value.into();
        self
    }

    pub fn address(mut self, value: impl Into<String>) -> Self {
        self.address = value.into();
        self
    }

    pub fn city(mut self, value: impl Into<String>) -> Self {
        self.city = value.into();
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = value.into();
        self
    }

    pub fn region(self, value: impl Into<String>) -> Self {
        self.region_opt(Some(value.into()))
    }

    pub fn region_opt(mut self, value: Option<String>) -> Self {
        self.region = value;
        self
    }

    pub fn postal_code(self, value: impl Into<String>) -> Self {
        self.postal_code_opt(Some(value.into()))
    }

    pub fn postal_code_opt(mut self, value: Option<String>) -> Self {
        self.postal_code = value;
        self
    }

    pub fn country(mut self, value: impl Into<String>) -> Self {
        self.country = value.into();
        self
    }

    pub fn phone(mut self, value: impl Into<String>) -> Self {
        self.phone = value.into();
        self
    }

    pub fn fax(self, value: impl Into<String>) -> Self {
        self.fax_opt(Some(value.into()))
    }

    pub fn fax_opt(mut self, value: Option<String>) -> Self {
        self.fax = value;
        self
    }

    /// Set a field by name
    ///
    /// `None` marks an optional field absent; on a required field it stores
    /// the empty string, since required fields have no absent state.
    pub fn set(mut self, field: Field, value: Option<String>) -> Self {
        let required = |value: Option<String>| value.unwrap_or_default();
        match field {
            Field::CustomerId => self.customer_id = required(value),
            Field::CompanyName => self.company_name = required(value),
            Field::ContactName => self.contact_name = required(value),
            Field::ContactTitle => self.contact_title = required(value),
            Field::Address => self.address = required(value),
            Field::City => self.city = required(value),
            Field::Email => self.email = required(value),
            Field::Region => self.region = value,
            Field::PostalCode => self.postal_code = value,
            Field::Country => self.country = required(value),
            Field::Phone => self.phone = required(value),
            Field::Fax => self.fax = value,
        }
        self
    }

    pub fn build(&self) -> Contact {
        Contact {
            customer_id: self.customer_id.clone(),
            company_name: self.company_name.clone(),
            contact_name: self.contact_name.clone(),
            contact_title: self.contact_title.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            email: self.email.clone(),
            region: self.region.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
            phone: self.phone.clone(),
            fax: self.fax.clone(),
        }
    }
}
