//! Backend payload shapes are inconsistent: ids arrive as `id` or `_id`,
//! names as camelCase or snake_case, entities bare or wrapped in a named
//! envelope. Each normalizer here is a total function from an arbitrary
//! `Value` to one canonical record; bad input yields defaults, never an
//! error.

use serde_json::Value;

use crate::model::{
    CatalogStatus, Course, Invoice, InvoiceStatus, Learner, LearnerStatus, Track,
};

/// Resolve the first present, non-null value among candidate field names.
/// Candidate order is the alias priority (`id` before `_id`, and so on).
fn pick<'a>(src: &'a Value, names: &[&str]) -> Option<&'a Value> {
    for name in names {
        match src.get(name) {
            None | Some(Value::Null) => continue,
            Some(v) => return Some(v),
        }
    }
    None
}

fn text(src: &Value, names: &[&str]) -> String {
    match pick(src, names) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn opt_text(src: &Value, names: &[&str]) -> Option<String> {
    let s = text(src, names);
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Numbers may arrive as JSON numbers or numeric strings; anything else
/// (including NaN/infinite) normalizes to 0.
fn number(src: &Value, names: &[&str]) -> f64 {
    let parsed = match pick(src, names) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn count(src: &Value, names: &[&str]) -> u32 {
    number(src, names).max(0.0) as u32
}

fn id_of(src: &Value) -> Option<String> {
    opt_text(src, &["id", "_id"])
}

/// Unwrap `{ "<key>": {...} }` envelopes; anything else is used directly.
fn unwrap_entity<'a>(raw: &'a Value, key: &str) -> &'a Value {
    match raw.get(key) {
        Some(v) if v.is_object() => v,
        _ => raw,
    }
}

/// Extract the element list from whichever collection shape the backend
/// chose: a bare array, `{<plural>: [...]}`, `{data: [...]}`, a single
/// enveloped entity, or an object that itself looks like an entity.
pub fn collection(raw: &Value, plural_keys: &[&str], item_key: &str) -> Vec<Value> {
    if let Some(items) = raw.as_array() {
        return items.clone();
    }
    for key in plural_keys {
        if let Some(items) = raw.get(*key).and_then(Value::as_array) {
            return items.clone();
        }
    }
    if let Some(one) = raw.get(item_key) {
        if one.is_object() {
            return vec![one.clone()];
        }
    }
    if raw.is_object() && id_of(raw).is_some() {
        return vec![raw.clone()];
    }
    Vec::new()
}

pub fn normalize_course(raw: &Value) -> Course {
    let src = unwrap_entity(raw, "course");
    if !src.is_object() {
        return Course::default();
    }

    // `track` may be a plain name/id or a nested track object.
    let track = match pick(src, &["track"]) {
        Some(v) if v.is_object() => text(v, &["title", "name", "id", "_id"]),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };

    Course {
        id: id_of(src),
        title: text(src, &["title", "name"]),
        author: text(src, &["author", "instructor"]),
        track,
        description: text(src, &["description"]),
        picture: text(src, &["picture", "image"]),
        date_created: text(src, &["createdAt", "dateCreated", "created_at"]),
        status: pick(src, &["status"])
            .and_then(Value::as_str)
            .and_then(CatalogStatus::from_raw)
            .unwrap_or_default(),
    }
}

pub fn normalize_track(raw: &Value) -> Track {
    let src = unwrap_entity(raw, "track");
    if !src.is_object() {
        return Track::default();
    }

    // Technologies arrive either as an array of strings or one
    // comma-joined string.
    let technologies = match pick(src, &["technologies"]) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    };

    Track {
        id: id_of(src),
        title: text(src, &["title", "name"]),
        description: text(src, &["description"]),
        price: number(src, &["price"]).max(0.0),
        duration: text(src, &["duration"]),
        image: text(src, &["image", "picture"]),
        instructor: text(src, &["instructor"]),
        students: count(src, &["students", "studentCount", "student_count"]),
        rating: number(src, &["rating"]).clamp(0.0, 5.0),
        technologies,
        status: pick(src, &["status"])
            .and_then(Value::as_str)
            .and_then(CatalogStatus::from_raw)
            .unwrap_or_default(),
    }
}

pub fn normalize_learner(raw: &Value) -> Learner {
    let src = unwrap_entity(raw, "learner");
    if !src.is_object() {
        return Learner::default();
    }

    let first_name = text(src, &["firstName", "first_name"]);
    let last_name = text(src, &["lastName", "last_name"]);
    let email = text(src, &["email"]);

    let mut name = format!("{} {}", first_name, last_name).trim().to_string();
    if name.is_empty() {
        name = email.clone();
    }

    // Status fallback: explicit status wins, then `disabled: true` means
    // inactive, else active.
    let status = match pick(src, &["status"]).and_then(Value::as_str) {
        Some(s) => LearnerStatus::from_raw(s).unwrap_or_default(),
        None if pick(src, &["disabled"]).and_then(Value::as_bool) == Some(true) => {
            LearnerStatus::Inactive
        }
        None => LearnerStatus::Active,
    };

    Learner {
        id: id_of(src),
        name,
        email,
        date_joined: text(src, &["createdAt", "dateCreated", "dateJoined", "created_at"]),
        courses_enrolled: count(src, &["coursesEnrolled", "courses_count"]),
        status,
        avatar: text(src, &["profileImage", "avatar"]),
        program: text(src, &["program", "track"]),
        gender: text(src, &["gender"]),
        contact: text(src, &["contact"]),
        country: text(src, &["country", "location"]),
        paid_status: text(src, &["paidStatus", "paymentStatus"]),
        description: text(src, &["description"]),
    }
}

pub fn normalize_invoice(raw: &Value) -> Invoice {
    let src = unwrap_entity(raw, "invoice");
    if !src.is_object() {
        return Invoice::default();
    }

    // The learner may be embedded as an object under `learner`/`learnerId`,
    // or flattened onto the invoice itself.
    let learner = pick(src, &["learner", "learnerId"]).filter(|v| v.is_object());

    let learner_name = learner
        .map(|l| {
            format!(
                "{} {}",
                text(l, &["firstName", "first_name"]),
                text(l, &["lastName", "last_name"])
            )
            .trim()
            .to_string()
        })
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| text(src, &["learnerName", "learner_name"]));

    let learner_email = learner
        .map(|l| text(l, &["email"]))
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| text(src, &["learnerEmail", "learner_email"]));

    Invoice {
        id: id_of(src),
        learner_name,
        learner_email,
        date_created: text(src, &["createdAt", "dateCreated", "created_at"]),
        amount: number(src, &["amount"]).max(0.0),
        status: pick(src, &["status"])
            .and_then(Value::as_str)
            .and_then(InvoiceStatus::from_raw)
            .unwrap_or_default(),
        due_date: opt_text(src, &["dueDate", "due_date"]),
        payment_details: opt_text(src, &["paymentDetails", "payment_details"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn learner_missing_fields_get_defaults() {
        let learner = normalize_learner(&json!({ "email": "a@b.com" }));
        assert_eq!(learner.id, None);
        assert_eq!(learner.name, "a@b.com");
        assert_eq!(learner.courses_enrolled, 0);
        assert_eq!(learner.status, LearnerStatus::Active);
        assert_eq!(learner.avatar, "");
    }

    #[test]
    fn learner_disabled_without_status_is_inactive() {
        let learner = normalize_learner(&json!({
            "firstName": "Ama",
            "lastName": "Mensah",
            "disabled": true
        }));
        assert_eq!(learner.name, "Ama Mensah");
        assert_eq!(learner.status, LearnerStatus::Inactive);
    }

    #[test]
    fn learner_envelope_and_snake_case_aliases() {
        let learner = normalize_learner(&json!({
            "learner": {
                "_id": "L1",
                "first_name": "Kofi",
                "last_name": "Asante",
                "courses_count": "3",
                "location": "Ghana"
            }
        }));
        assert_eq!(learner.id.as_deref(), Some("L1"));
        assert_eq!(learner.name, "Kofi Asante");
        assert_eq!(learner.courses_enrolled, 3);
        assert_eq!(learner.country, "Ghana");
    }

    #[test]
    fn id_alias_priority_prefers_id_over_underscore_id() {
        let invoice = normalize_invoice(&json!({ "id": "A", "_id": "B" }));
        assert_eq!(invoice.id.as_deref(), Some("A"));
    }

    #[test]
    fn invoice_nested_learner_wins_over_flattened_fields() {
        let invoice = normalize_invoice(&json!({
            "invoice": {
                "_id": "INV-1",
                "learner": { "firstName": "Efua", "lastName": "Owusu", "email": "e@o.com" },
                "learnerName": "stale",
                "amount": "150.5",
                "dueDate": "2026-01-31"
            }
        }));
        assert_eq!(invoice.learner_name, "Efua Owusu");
        assert_eq!(invoice.learner_email, "e@o.com");
        assert_eq!(invoice.amount, 150.5);
        assert_eq!(invoice.status, InvoiceStatus::Pending);
        assert_eq!(invoice.due_date.as_deref(), Some("2026-01-31"));
        assert_eq!(invoice.payment_details, None);
    }

    #[test]
    fn invoice_bad_amount_and_unknown_status_normalize() {
        let invoice = normalize_invoice(&json!({
            "id": "X",
            "amount": "not-a-number",
            "status": "archived"
        }));
        assert_eq!(invoice.amount, 0.0);
        assert_eq!(invoice.status, InvoiceStatus::Pending);
    }

    #[test]
    fn non_object_input_yields_default_record() {
        assert_eq!(normalize_invoice(&json!("oops")), Invoice::default());
        assert_eq!(normalize_course(&Value::Null), Course::default());
    }

    #[test]
    fn track_technologies_comma_string_and_rating_clamp() {
        let track = normalize_track(&json!({
            "name": "Cloud Computing",
            "technologies": "Azure, AWS , Docker",
            "rating": 7.2,
            "price": -20
        }));
        assert_eq!(track.title, "Cloud Computing");
        assert_eq!(track.technologies, vec!["Azure", "AWS", "Docker"]);
        assert_eq!(track.rating, 5.0);
        assert_eq!(track.price, 0.0);
    }

    #[test]
    fn course_track_object_resolves_to_name() {
        let course = normalize_course(&json!({
            "course": {
                "title": "ReactJS",
                "author": "John",
                "track": { "name": "Software Engineering" }
            }
        }));
        assert_eq!(course.track, "Software Engineering");
        assert_eq!(course.status, CatalogStatus::Draft);
    }

    #[test]
    fn collection_cascade_handles_all_shapes() {
        let keys: &[&str] = &["invoices", "data"];
        assert_eq!(collection(&json!([{ "id": 1 }]), keys, "invoice").len(), 1);
        assert_eq!(
            collection(&json!({ "invoices": [{}, {}] }), keys, "invoice").len(),
            2
        );
        assert_eq!(
            collection(&json!({ "data": [{}, {}, {}] }), keys, "invoice").len(),
            3
        );
        assert_eq!(
            collection(&json!({ "invoice": { "id": "1" } }), keys, "invoice").len(),
            1
        );
        assert_eq!(collection(&json!({ "_id": "solo" }), keys, "invoice").len(), 1);
        assert_eq!(collection(&json!({ "success": true }), keys, "invoice").len(), 0);
    }
}
