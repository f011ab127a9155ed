use super::reference::Reference;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: i64,                        // ⇔ entry.id (assigned at insert, never rewritten)
    pub name: String,                   // ⇔ entry.name (TEXT NOT NULL)
    pub start_date: Option<NaiveDate>,  // ⇔ entry.start_date (TEXT "YYYY-MM-DD")
    pub end_date: Option<NaiveDate>,    // ⇔ entry.end_date (TEXT "YYYY-MM-DD")
    pub vendor: Option<Reference>,      // ⇔ entry.vendor_id → vendor
    pub department: Option<Reference>,  // ⇔ entry.department_id → department
}

/// The mutable part of an entry, as submitted through a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryData {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub vendor_id: Option<i64>,
    pub department_id: Option<i64>,
}

impl EntryData {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_date: None,
            end_date: None,
            vendor_id: None,
            department_id: None,
        }
    }
}

impl Entry {
    pub fn start_date_str(&self) -> String {
        format_date(self.start_date)
    }

    pub fn end_date_str(&self) -> String {
        format_date(self.end_date)
    }

    pub fn vendor_name(&self) -> &str {
        self.vendor.as_ref().map(|v| v.name.as_str()).unwrap_or("")
    }

    pub fn department_name(&self) -> &str {
        self.department.as_ref().map(|d| d.name.as_str()).unwrap_or("")
    }

    /// Back to the editable shape (used to pre-fill forms and in tests).
    pub fn data(&self) -> EntryData {
        EntryData {
            name: self.name.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            vendor_id: self.vendor.as_ref().map(|v| v.id),
            department_id: self.department.as_ref().map(|d| d.id),
        }
    }
}

/// `YYYY-MM-DD`, or an empty string when absent.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}
