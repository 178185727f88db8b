//! Shipping address captured at registration and snapshotted onto orders.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Pincode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PincodeError {
    /// The input is empty.
    #[error("pincode cannot be empty")]
    Empty,
    /// The input is not exactly six digits.
    #[error("pincode must be exactly 6 digits")]
    Format,
}

/// Errors that can occur when building a [`ShippingAddress`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// A required field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// The pincode was invalid.
    #[error(transparent)]
    Pincode(#[from] PincodeError),
}

/// A six-digit postal index number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Pincode(String);

impl Pincode {
    /// Parse a pincode.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or is not six ASCII digits.
    pub fn parse(s: &str) -> Result<Self, PincodeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PincodeError::Empty);
        }
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PincodeError::Format);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the pincode digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pincode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an order ships to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingAddress {
    pub state: String,
    pub district: String,
    pub area_name: String,
    pub pincode: Pincode,
}

impl ShippingAddress {
    /// Build an address from raw form input.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::MissingField` for a blank state, district or
    /// area, and `AddressError::Pincode` if the pincode is invalid.
    pub fn new(
        state: &str,
        district: &str,
        area_name: &str,
        pincode: &str,
    ) -> Result<Self, AddressError> {
        Ok(Self {
            state: required("state", state)?,
            district: required("district", district)?,
            area_name: required("area", area_name)?,
            pincode: Pincode::parse(pincode)?,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, AddressError> {
    let value = value.trim();
    if value.is_empty() {
        Err(AddressError::MissingField(field))
    } else {
        Ok(value.to_owned())
    }
}

impl fmt::Display for ShippingAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {} - {}",
            self.area_name, self.district, self.state, self.pincode
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pincode_validation() {
        assert_eq!(Pincode::parse(" 560001 ").unwrap().as_str(), "560001");
        assert_eq!(Pincode::parse(""), Err(PincodeError::Empty));
        assert_eq!(Pincode::parse("56001"), Err(PincodeError::Format));
        assert_eq!(Pincode::parse("56000a"), Err(PincodeError::Format));
    }

    #[test]
    fn test_address_trims_fields() {
        let address =
            ShippingAddress::new(" Karnataka ", "Bengaluru Urban", " Indiranagar", "560038")
                .unwrap();
        assert_eq!(address.state, "Karnataka");
        assert_eq!(address.area_name, "Indiranagar");
    }

    #[test]
    fn test_address_reports_first_missing_field() {
        assert_eq!(
            ShippingAddress::new("Kerala", "  ", "", "682001"),
            Err(AddressError::MissingField("district"))
        );
    }

    #[test]
    fn test_address_display() {
        let address = ShippingAddress::new("Goa", "North Goa", "Panaji", "403001").unwrap();
        assert_eq!(address.to_string(), "Panaji, North Goa, Goa - 403001");
    }
}
