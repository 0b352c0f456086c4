use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::controller::Resource;
use crate::normalize;

/// Lifecycle status shared by courses and tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CatalogStatus {
    Active,
    Inactive,
    #[default]
    Draft,
}

impl CatalogStatus {
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "draft" => Some(Self::Draft),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Draft => "draft",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LearnerStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl LearnerStatus {
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    #[default]
    Pending,
    Overdue,
}

impl InvoiceStatus {
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "paid" => Some(Self::Paid),
            "pending" => Some(Self::Pending),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Overdue => "overdue",
        }
    }
}

/// Canonical course record. `id` stays absent until the backend persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Option<String>,
    pub title: String,
    pub author: String,
    pub track: String,
    pub description: String,
    pub picture: String,
    pub date_created: String,
    pub status: CatalogStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub duration: String,
    pub image: String,
    pub instructor: String,
    pub students: u32,
    pub rating: f64,
    pub technologies: Vec<String>,
    pub status: CatalogStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Learner {
    pub id: Option<String>,
    /// Derived: firstName + lastName trimmed, falling back to email.
    pub name: String,
    pub email: String,
    pub date_joined: String,
    pub courses_enrolled: u32,
    pub status: LearnerStatus,
    pub avatar: String,
    pub program: String,
    pub gender: String,
    pub contact: String,
    pub country: String,
    pub paid_status: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Option<String>,
    pub learner_name: String,
    pub learner_email: String,
    pub date_created: String,
    pub amount: f64,
    pub status: InvoiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_details: Option<String>,
}

impl Resource for Course {
    const PATH: &'static str = "/courses";
    const COLLECTION_KEYS: &'static [&'static str] = &["courses", "data"];
    const ITEM_KEY: &'static str = "course";

    fn normalize(raw: &Value) -> Self {
        normalize::normalize_course(raw)
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.title, &self.author, &self.track]
    }
}

impl Resource for Track {
    const PATH: &'static str = "/tracks";
    const COLLECTION_KEYS: &'static [&'static str] = &["tracks", "data"];
    const ITEM_KEY: &'static str = "track";

    fn normalize(raw: &Value) -> Self {
        normalize::normalize_track(raw)
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.title, &self.instructor, self.status.as_str()]
    }
}

impl Resource for Learner {
    const PATH: &'static str = "/learners";
    const COLLECTION_KEYS: &'static [&'static str] = &["learners", "data"];
    const ITEM_KEY: &'static str = "learner";

    fn normalize(raw: &Value) -> Self {
        normalize::normalize_learner(raw)
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.name, &self.email, self.status.as_str()]
    }
}

impl Resource for Invoice {
    const PATH: &'static str = "/invoices";
    const COLLECTION_KEYS: &'static [&'static str] = &["invoices", "data"];
    const ITEM_KEY: &'static str = "invoice";

    fn normalize(raw: &Value) -> Self {
        normalize::normalize_invoice(raw)
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.learner_name, &self.learner_email, self.status.as_str()]
    }
}
