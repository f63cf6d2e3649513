use serde_json::Value;

use crate::models::str_field;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
}

/// A bullet source: either one paragraph of text or a list of points.
#[derive(Debug, Clone, PartialEq)]
pub enum Description {
    One(String),
    Many(Vec<String>),
}

impl Description {
    pub fn points(&self) -> Vec<&str> {
        match self {
            Description::One(text) => vec![text.as_str()],
            Description::Many(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

/// A structured section element: a job, a degree or a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    pub title: Option<String>,
    pub company: Option<String>,
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub location: Option<String>,
    pub dates: Option<String>,
    pub description: Option<Description>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionItem {
    Entry(Entry),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    Text(String),
    Items(Vec<SectionItem>),
}

impl SectionContent {
    pub fn is_empty(&self) -> bool {
        match self {
            SectionContent::Text(text) => text.is_empty(),
            SectionContent::Items(items) => items.is_empty(),
        }
    }
}

/// The regeneration reply. Every key is optional at every level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedResume {
    pub contact: Option<Contact>,
    pub summary: Option<SectionContent>,
    pub experience: Option<SectionContent>,
    pub education: Option<SectionContent>,
    pub skills: Option<SectionContent>,
    pub projects: Option<SectionContent>,
}

impl GeneratedResume {
    /// Builds a resume from an arbitrary JSON value.
    ///
    /// Section values that are neither a string nor a list are dropped, as are
    /// list elements that are neither an object nor a string.
    pub fn from_value(value: &Value) -> Self {
        Self {
            contact: value.get("contact").filter(|c| c.is_object()).map(|c| Contact {
                name: str_field(c, "name"),
                email: str_field(c, "email"),
                phone: str_field(c, "phone"),
                linkedin: str_field(c, "linkedin"),
            }),
            summary: section(value, "summary"),
            experience: section(value, "experience"),
            education: section(value, "education"),
            skills: section(value, "skills"),
            projects: section(value, "projects"),
        }
    }
}

fn section(value: &Value, key: &str) -> Option<SectionContent> {
    match value.get(key)? {
        Value::String(text) => Some(SectionContent::Text(text.clone())),
        Value::Array(items) => Some(SectionContent::Items(
            items.iter().filter_map(section_item).collect(),
        )),
        _ => None,
    }
}

fn section_item(item: &Value) -> Option<SectionItem> {
    match item {
        Value::String(text) => Some(SectionItem::Text(text.clone())),
        Value::Object(_) => Some(SectionItem::Entry(Entry {
            title: str_field(item, "title"),
            company: str_field(item, "company"),
            institution: str_field(item, "institution"),
            degree: str_field(item, "degree"),
            location: str_field(item, "location"),
            dates: str_field(item, "dates"),
            description: description(item),
        })),
        _ => None,
    }
}

fn description(item: &Value) -> Option<Description> {
    match item.get("description")? {
        Value::String(text) => Some(Description::One(text.clone())),
        Value::Array(points) => Some(Description::Many(
            points.iter().filter_map(Value::as_str).map(String::from).collect(),
        )),
        _ => None,
    }
}
