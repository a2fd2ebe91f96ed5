//! Shipping details form and its validation.

use cosmetica_core::{Email, Phone};
use serde::{Deserialize, Serialize};

use super::CheckoutError;

/// Raw shipping form input, as typed by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

/// A required field of the shipping form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    City,
    State,
    Country,
    PostalCode,
}

impl Field {
    const ALL: [Self; 9] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::City,
        Self::State,
        Self::Country,
        Self::PostalCode,
    ];

    /// Label shown to customers.
    const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Address => "Address",
            Self::City => "City",
            Self::State => "State",
            Self::Country => "Country",
            Self::PostalCode => "Postal Code",
        }
    }
}

impl ShippingForm {
    fn value(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Address => &self.address,
            Field::City => &self.city,
            Field::State => &self.state,
            Field::Country => &self.country,
            Field::PostalCode => &self.postal_code,
        }
    }

    /// Labels of required fields that are blank, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        Field::ALL
            .into_iter()
            .filter(|field| self.value(*field).trim().is_empty())
            .map(Field::label)
            .collect()
    }

    /// Validate the form into [`ShippingDetails`].
    ///
    /// Missing fields are all reported together; the phone and email formats
    /// are only checked once every field is present.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingFields`], [`CheckoutError::InvalidPhone`],
    /// or [`CheckoutError::InvalidEmail`].
    pub fn validate(&self) -> Result<ShippingDetails, CheckoutError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CheckoutError::MissingFields(missing));
        }

        let phone = Phone::parse(&self.phone).map_err(|_| CheckoutError::InvalidPhone)?;
        let email = Email::parse(&self.email)?;

        Ok(ShippingDetails {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email,
            phone,
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            country: self.country.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
        })
    }
}

/// Validated shipping address carried from details into payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: Phone,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

impl ShippingDetails {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl From<&ShippingDetails> for ShippingForm {
    fn from(details: &ShippingDetails) -> Self {
        Self {
            first_name: details.first_name.clone(),
            last_name: details.last_name.clone(),
            email: details.email.to_string(),
            phone: details.phone.to_string(),
            address: details.address.clone(),
            city: details.city.clone(),
            state: details.state.clone(),
            country: details.country.clone(),
            postal_code: details.postal_code.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn complete_form() -> ShippingForm {
        ShippingForm {
            first_name: "Nadia".to_string(),
            last_name: "Perera".to_string(),
            email: "nadia@example.com".to_string(),
            phone: "0771234567".to_string(),
            address: "12 Lotus Road".to_string(),
            city: "Kandy".to_string(),
            state: "Central".to_string(),
            country: "Sri Lanka".to_string(),
            postal_code: "20000".to_string(),
        }
    }

    #[test]
    fn test_complete_form_validates() {
        let details = complete_form().validate().unwrap();
        assert_eq!(details.full_name(), "Nadia Perera");
        assert_eq!(details.phone.as_str(), "0771234567");
    }

    #[test]
    fn test_all_missing_fields_reported_at_once() {
        let form = ShippingForm {
            first_name: String::new(),
            city: "   ".to_string(),
            postal_code: String::new(),
            ..complete_form()
        };

        let err = form.validate().unwrap_err();
        assert_eq!(
            err,
            CheckoutError::MissingFields(vec!["First Name", "City", "Postal Code"])
        );
        assert_eq!(
            err.to_string(),
            "Please fill in all required fields: First Name, City, Postal Code"
        );
    }

    #[test]
    fn test_empty_form_lists_every_field() {
        let err = ShippingForm::default().validate().unwrap_err();
        let CheckoutError::MissingFields(fields) = err else {
            panic!("expected missing fields");
        };
        assert_eq!(fields.len(), 9);
    }

    #[test]
    fn test_short_phone_rejected() {
        let form = ShippingForm {
            phone: "12345".to_string(),
            ..complete_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err, CheckoutError::InvalidPhone);
        assert!(err.to_string().contains("phone"));
    }

    #[test]
    fn test_formatted_phone_rejected() {
        let form = ShippingForm {
            phone: "077 123 4567".to_string(),
            ..complete_form()
        };
        assert_eq!(form.validate().unwrap_err(), CheckoutError::InvalidPhone);
    }

    #[test]
    fn test_bad_email_rejected() {
        let form = ShippingForm {
            email: "nadia-at-example".to_string(),
            ..complete_form()
        };
        assert!(matches!(
            form.validate().unwrap_err(),
            CheckoutError::InvalidEmail(_)
        ));
    }

    #[test]
    fn test_values_are_trimmed() {
        let form = ShippingForm {
            city: "  Kandy ".to_string(),
            ..complete_form()
        };
        assert_eq!(form.validate().unwrap().city, "Kandy");
    }

    #[test]
    fn test_details_round_trip_back_to_form() {
        let form = complete_form();
        let details = form.validate().unwrap();
        assert_eq!(ShippingForm::from(&details), form);
    }
}
