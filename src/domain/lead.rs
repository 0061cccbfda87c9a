// Property lead domain model and field validation
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

pub const PROPERTY_TYPES: &[&str] = &[
    "Apartment",
    "House",
    "Condo",
    "Townhouse",
    "Villa",
    "Studio",
    "Penthouse",
    "Duplex",
];

pub const PROPERTY_AREAS: &[&str] = &[
    "Downtown",
    "Suburbs",
    "Waterfront",
    "City Center",
    "Residential District",
    "Business District",
    "Historic District",
    "Beachfront",
];

pub const BUDGET_RANGES: &[&str] = &[
    "Under $200K",
    "$200K - $400K",
    "$400K - $600K",
    "$600K - $800K",
    "$800K - $1M",
    "$1M - $2M",
    "Over $2M",
];

const MIN_NAME_CHARS: usize = 2;
const MIN_PHONE_CHARS: usize = 10;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .expect("email pattern is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyLead {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub property_area: String,
    pub property_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadReceipt {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadPage {
    pub leads: Vec<PropertyLead>,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadField {
    Name,
    Phone,
    Email,
    PropertyArea,
    PropertyType,
    Budget,
    Message,
}

impl LeadField {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadField::Name => "name",
            LeadField::Phone => "phone",
            LeadField::Email => "email",
            LeadField::PropertyArea => "propertyArea",
            LeadField::PropertyType => "propertyType",
            LeadField::Budget => "budget",
            LeadField::Message => "message",
        }
    }
}

impl fmt::Display for LeadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: LeadField,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("lead form has {} invalid field(s): {}", .0.len(), summarize(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn message_for(&self, field: LeadField) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    pub fn fields(&self) -> impl Iterator<Item = LeadField> + '_ {
        self.0.iter().map(|e| e.field)
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw form input. Everything is a string until it validates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeadFormValues {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub property_area: String,
    pub property_type: String,
    pub budget: String,
    pub message: String,
}

impl LeadFormValues {
    pub fn set(&mut self, field: LeadField, value: impl Into<String>) {
        let value = value.into();
        match field {
            LeadField::Name => self.name = value,
            LeadField::Phone => self.phone = value,
            LeadField::Email => self.email = value,
            LeadField::PropertyArea => self.property_area = value,
            LeadField::PropertyType => self.property_type = value,
            LeadField::Budget => self.budget = value,
            LeadField::Message => self.message = value,
        }
    }

    pub fn get(&self, field: LeadField) -> &str {
        match field {
            LeadField::Name => &self.name,
            LeadField::Phone => &self.phone,
            LeadField::Email => &self.email,
            LeadField::PropertyArea => &self.property_area,
            LeadField::PropertyType => &self.property_type,
            LeadField::Budget => &self.budget,
            LeadField::Message => &self.message,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == LeadFormValues::default()
    }

    pub fn validate(&self) -> Result<PropertyLead, ValidationErrors> {
        let mut errors = Vec::new();

        if self.name.chars().count() < MIN_NAME_CHARS {
            errors.push(FieldError {
                field: LeadField::Name,
                message: "Name must be at least 2 characters",
            });
        }
        if self.phone.chars().count() < MIN_PHONE_CHARS {
            errors.push(FieldError {
                field: LeadField::Phone,
                message: "Please enter a valid phone number",
            });
        }
        if !is_valid_email(&self.email) {
            errors.push(FieldError {
                field: LeadField::Email,
                message: "Please enter a valid email address",
            });
        }
        if self.property_area.is_empty() {
            errors.push(FieldError {
                field: LeadField::PropertyArea,
                message: "Please select a property area",
            });
        }
        if self.property_type.is_empty() {
            errors.push(FieldError {
                field: LeadField::PropertyType,
                message: "Please select a property type",
            });
        }

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        Ok(PropertyLead {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            property_area: self.property_area.clone(),
            property_type: self.property_type.clone(),
            budget: non_empty(&self.budget),
            message: non_empty(&self.message),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_values() -> LeadFormValues {
        LeadFormValues {
            name: "Al".to_string(),
            phone: "5551234567".to_string(),
            email: "a@b.com".to_string(),
            property_area: "Downtown".to_string(),
            property_type: "House".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_boundary_values_pass() {
        let lead = valid_values().validate().unwrap();
        assert_eq!(lead.name, "Al");
        assert_eq!(lead.budget, None);
        assert_eq!(lead.message, None);
    }

    #[test]
    fn test_single_char_name_fails() {
        let mut values = valid_values();
        values.set(LeadField::Name, "A");
        let errors = values.validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![LeadField::Name]);
        assert_eq!(
            errors.message_for(LeadField::Name),
            Some("Name must be at least 2 characters")
        );
    }

    #[test]
    fn test_short_phone_fails() {
        let mut values = valid_values();
        values.set(LeadField::Phone, "555123456");
        let errors = values.validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![LeadField::Phone]);
    }

    #[test]
    fn test_email_grammar() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("sarah.johnson@email.com"));
        assert!(is_valid_email("first+tag@mail.example.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a..b@c.com"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@-b.com"));
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let errors = LeadFormValues::default().validate().unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec![
                LeadField::Name,
                LeadField::Phone,
                LeadField::Email,
                LeadField::PropertyArea,
                LeadField::PropertyType,
            ]
        );
        assert!(errors.to_string().starts_with("lead form has 5 invalid field(s)"));
    }

    #[test]
    fn test_optional_fields_carried_when_present() {
        let mut values = valid_values();
        values.set(LeadField::Budget, BUDGET_RANGES[1]);
        values.set(LeadField::Message, "Looking for a garden");
        let lead = values.validate().unwrap();
        assert_eq!(lead.budget.as_deref(), Some("$200K - $400K"));
        assert_eq!(lead.message.as_deref(), Some("Looking for a garden"));
    }

    #[test]
    fn test_lead_wire_format() {
        let lead = valid_values().validate().unwrap();
        let json = serde_json::to_value(&lead).unwrap();
        assert_eq!(json["propertyArea"], "Downtown");
        assert!(json.get("budget").is_none());

        let receipt: LeadReceipt =
            serde_json::from_str(r#"{"success":true,"leadId":"lead_123"}"#).unwrap();
        assert_eq!(receipt.lead_id.as_deref(), Some("lead_123"));
    }
}
