//! Core domain types for the storefront.
//!
//! Products come from the backend and never change afterwards. The order
//! draft is edited field by field while the customer fills in the checkout
//! forms, and becomes a [`FinalOrder`] once both forms validate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a product
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new `ProductId` from a string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog item as served by the backend.
///
/// `price` is `None` for priceless items, which are shown but cannot be
/// bought. `image` is a fully resolved URL by the time it reaches the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,
    /// Display title
    pub title: String,
    /// Long description, shown in the preview
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category label
    pub category: String,
    /// Price in whole currency units.
    ///
    /// Fractional or negative prices do not deserialize.
    pub price: Option<u64>,
    /// Image URL
    pub image: String,
}

impl Product {
    /// Whether the product can be put in the basket
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        self.price.is_some()
    }
}

/// How the customer pays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery
    Cash,
    /// Card online
    Card,
}

impl PaymentMethod {
    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// A form field or value name that does not exist
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown field or value: {0}")]
pub struct UnknownField(pub String);

/// Fields of the address step ("order" form)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
    /// Delivery address
    Address,
    /// Payment method
    Payment,
}

impl OrderField {
    /// Form input name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Payment => "payment",
        }
    }
}

impl FromStr for OrderField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "address" => Ok(Self::Address),
            "payment" => Ok(Self::Payment),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Fields of the contacts step ("contacts" form)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactsField {
    /// Email address
    Email,
    /// Phone number
    Phone,
}

impl ContactsField {
    /// Form input name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl FromStr for ContactsField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Any validated checkout field. Ordering is the order errors are shown in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    /// Payment method
    Payment,
    /// Delivery address
    Address,
    /// Email address
    Email,
    /// Phone number
    Phone,
}

impl From<OrderField> for FormField {
    fn from(field: OrderField) -> Self {
        match field {
            OrderField::Address => Self::Address,
            OrderField::Payment => Self::Payment,
        }
    }
}

impl From<ContactsField> for FormField {
    fn from(field: ContactsField) -> Self {
        match field {
            ContactsField::Email => Self::Email,
            ContactsField::Phone => Self::Phone,
        }
    }
}

/// The checkout form data being filled in.
///
/// Serialized with `payment: ""` while no method is chosen, which is what
/// the views expect.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Delivery address
    pub address: String,
    /// Chosen payment method
    #[serde(with = "payment_or_empty")]
    pub payment: Option<PaymentMethod>,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
}

impl OrderDraft {
    /// Set an address-step field from raw form input.
    ///
    /// A payment value other than `cash`/`card` clears the selection.
    pub fn set_order_field(&mut self, field: OrderField, value: &str) {
        match field {
            OrderField::Address => value.clone_into(&mut self.address),
            OrderField::Payment => self.payment = value.parse().ok(),
        }
    }

    /// Set a contacts-step field from raw form input.
    pub fn set_contacts_field(&mut self, field: ContactsField, value: &str) {
        match field {
            ContactsField::Email => value.clone_into(&mut self.email),
            ContactsField::Phone => value.clone_into(&mut self.phone),
        }
    }
}

mod payment_or_empty {
    use super::PaymentMethod;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[allow(clippy::ref_option)] // signature fixed by serde(with)
    pub fn serialize<S: Serializer>(payment: &Option<PaymentMethod>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(payment.map_or("", PaymentMethod::as_str))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PaymentMethod>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(D::Error::custom)
    }
}

/// Field → message map describing why a form group is invalid.
///
/// An absent field is valid. An empty map means the whole group is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<FormField, String>);

impl FormErrors {
    /// No errors
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record an error for `field`, replacing any previous one
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// The message for `field`, if it is invalid
    #[must_use]
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether `field` has an error
    #[must_use]
    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    /// Whether there are no errors at all
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of invalid fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Same as [`FormErrors::is_valid`]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Invalid fields with their messages, in display order
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Add every error of `other`
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// All messages joined with `"; "`, for the form's error line
    #[must_use]
    pub fn summary(&self) -> String {
        self.0.values().map(String::as_str).collect::<Vec<_>>().join("; ")
    }
}

/// The payload submitted to the backend at checkout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalOrder {
    /// Payment method
    pub payment: PaymentMethod,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Delivery address
    pub address: String,
    /// Sum of item prices
    pub total: u64,
    /// Basket product ids in basket order
    pub items: Vec<ProductId>,
}

/// The backend's acknowledgement of a placed order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    /// Order id assigned by the backend
    pub id: String,
    /// Amount charged
    pub total: u64,
}
