use crate::models::entry::{Entry, EntryData, parse_date};
use serde::Deserialize;

/// Raw entry form as posted by the browser. Nothing is interpreted yet, so
/// an invalid submission can be shown back to the user exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EntryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub department: String,
}

/// Field-level validation messages, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: Vec<(&'static str, String)>,
}

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push((field, message.into()));
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

impl EntryForm {
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            name: entry.name.clone(),
            start_date: entry.start_date_str(),
            end_date: entry.end_date_str(),
            vendor: entry
                .vendor
                .as_ref()
                .map(|v| v.id.to_string())
                .unwrap_or_default(),
            department: entry
                .department
                .as_ref()
                .map(|d| d.id.to_string())
                .unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<EntryData, FormErrors> {
        let mut errors = FormErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "This field is required");
        }

        let start_date = optional_date(&self.start_date, "start_date", &mut errors);
        let end_date = optional_date(&self.end_date, "end_date", &mut errors);
        if let (Some(start), Some(end)) = (start_date, end_date)
            && end < start
        {
            errors.add("end_date", "End date must not be before the start date");
        }

        let vendor_id = optional_id(&self.vendor, "vendor", &mut errors);
        let department_id = optional_id(&self.department, "department", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(EntryData {
            name: name.to_string(),
            start_date,
            end_date,
            vendor_id,
            department_id,
        })
    }
}

fn optional_date(
    raw: &str,
    field: &'static str,
    errors: &mut FormErrors,
) -> Option<chrono::NaiveDate> {
    if raw.trim().is_empty() {
        return None;
    }
    let parsed = parse_date(raw);
    if parsed.is_none() {
        errors.add(field, "Invalid date, expected yyyy-MM-dd");
    }
    parsed
}

fn optional_id(raw: &str, field: &'static str, errors: &mut FormErrors) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, "Invalid selection");
            None
        }
    }
}
