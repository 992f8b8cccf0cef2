use crate::domain::model::PersonRecord;
use crate::utils::error::{ColetorError, Result};

/// Raw field values as read from the input surface. Selector fields carry
/// both the machine value (`region_code`) and the display label
/// (`region_label`); the label is what ends up in the record.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub name: String,
    pub contact: String,
    pub region_code: String,
    pub region_label: String,
    pub city: String,
    pub neighborhood: String,
}

/// Validates the input and builds the record. Every required field is checked
/// and all missing ones are reported in a single aggregated message; nothing
/// is partially accepted.
pub fn submit(input: &FormInput) -> Result<PersonRecord> {
    let name = input.name.trim();
    let contact = input.contact.trim();
    let city = input.city.trim();
    let neighborhood = input.neighborhood.trim();

    let mut missing = Vec::new();
    if name.is_empty() {
        missing.push("name");
    }
    if contact.is_empty() {
        missing.push("contact");
    }
    // Selection is judged on the machine value, mirroring the selector state.
    if input.region_code.trim().is_empty() {
        missing.push("region");
    }
    if city.is_empty() {
        missing.push("city");
    }
    if neighborhood.is_empty() {
        missing.push("neighborhood");
    }

    if !missing.is_empty() {
        return Err(ColetorError::Validation {
            message: format!("missing required fields: {}", missing.join(", ")),
        });
    }

    Ok(PersonRecord {
        name: name.to_string(),
        contact: contact.to_string(),
        region: input.region_label.trim().to_string(),
        city: city.to_string(),
        neighborhood: neighborhood.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_input() -> FormInput {
        FormInput {
            name: "Ana".to_string(),
            contact: "111".to_string(),
            region_code: "SP".to_string(),
            region_label: "São Paulo".to_string(),
            city: "São Paulo".to_string(),
            neighborhood: "Centro".to_string(),
        }
    }

    #[test]
    fn test_submit_builds_record_with_region_label() {
        let record = submit(&full_input()).unwrap();
        assert_eq!(record.name, "Ana");
        assert_eq!(record.contact, "111");
        assert_eq!(record.region, "São Paulo"); // label, not "SP"
        assert_eq!(record.city, "São Paulo");
        assert_eq!(record.neighborhood, "Centro");
    }

    #[test]
    fn test_submit_trims_whitespace() {
        let mut input = full_input();
        input.name = "  Ana  ".to_string();
        input.neighborhood = "\tCentro ".to_string();
        let record = submit(&input).unwrap();
        assert_eq!(record.name, "Ana");
        assert_eq!(record.neighborhood, "Centro");
    }

    #[test]
    fn test_submit_rejects_blank_name() {
        let mut input = full_input();
        input.name = "   ".to_string();
        let err = submit(&input).unwrap_err();
        match err {
            ColetorError::Validation { message } => {
                assert!(message.contains("name"));
                assert!(!message.contains("contact"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_submit_aggregates_all_missing_fields() {
        let err = submit(&FormInput::default()).unwrap_err();
        match err {
            ColetorError::Validation { message } => {
                for field in ["name", "contact", "region", "city", "neighborhood"] {
                    assert!(message.contains(field), "missing {} in: {}", field, message);
                }
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_submit_requires_region_code_not_just_label() {
        let mut input = full_input();
        input.region_code = "".to_string();
        assert!(submit(&input).is_err());
    }
}
