//! Storefront customers as seen from the back office.

use chrono::{DateTime, Utc};

use bazaar_core::UserId;

/// Placeholder for blank contact or address fields.
pub const NOT_PROVIDED: &str = "Not provided";

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: UserId,
    pub email: String,
    pub phone: String,
    pub state: String,
    pub district: String,
    pub area_name: String,
    pub pincode: String,
    pub created_at: DateTime<Utc>,
    pub order_count: i64,
}

/// The value itself, or "Not provided" when blank.
#[must_use]
pub fn or_not_provided(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_PROVIDED
    } else {
        value
    }
}

impl Customer {
    #[must_use]
    pub fn phone_display(&self) -> &str {
        or_not_provided(&self.phone)
    }

    #[must_use]
    pub fn state_display(&self) -> &str {
        or_not_provided(&self.state)
    }

    #[must_use]
    pub fn district_display(&self) -> &str {
        or_not_provided(&self.district)
    }

    #[must_use]
    pub fn area_display(&self) -> &str {
        or_not_provided(&self.area_name)
    }

    #[must_use]
    pub fn pincode_display(&self) -> &str {
        or_not_provided(&self.pincode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_show_placeholder() {
        assert_eq!(or_not_provided(""), "Not provided");
        assert_eq!(or_not_provided("   "), "Not provided");
        assert_eq!(or_not_provided("560001"), "560001");
    }
}
