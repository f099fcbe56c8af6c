use serde::{Deserialize, Serialize};

/// A student record as returned by `GET /students/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub system_access: bool,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub roll: i64,
    #[serde(default)]
    pub father_name: String,
    #[serde(default)]
    pub father_phone: String,
    #[serde(default)]
    pub mother_name: String,
    #[serde(default)]
    pub mother_phone: String,
    #[serde(default)]
    pub guardian_name: String,
    #[serde(default)]
    pub guardian_phone: String,
    #[serde(default)]
    pub relation_of_guardian: String,
    #[serde(default)]
    pub current_address: String,
    #[serde(default)]
    pub permanent_address: String,
    #[serde(default)]
    pub admission_date: String,
    #[serde(default)]
    pub reporter_name: String,
}

impl Student {
    /// Class and section joined as "class-section"
    pub fn class_section(&self) -> String {
        match (self.class.trim(), self.section.trim()) {
            ("", "") => String::new(),
            (class, "") => class.to_string(),
            ("", section) => section.to_string(),
            (class, section) => format!("{}-{}", class, section),
        }
    }

    /// "Name (phone)", dropping whichever half is missing
    pub fn parent_line(name: &str, phone: &str) -> String {
        match (name.trim(), phone.trim()) {
            (name, "") => name.to_string(),
            ("", phone) => format!("({})", phone),
            (name, phone) => format!("{} ({})", name, phone),
        }
    }
}
