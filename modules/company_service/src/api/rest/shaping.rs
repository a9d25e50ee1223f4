//! Data shaping (`fields=`) and hypermedia links for employee lists

use super::dto::{EmployeeDto, Link};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Serialized entity reduced to the requested properties
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedEntity {
    pub id: Uuid,
    pub entity: Map<String, Value>,
}

/// Requested property names, lower-cased; empty means all
fn requested_fields(fields: Option<&str>) -> Vec<String> {
    fields
        .unwrap_or_default()
        .split(',')
        .map(|field| field.trim().to_lowercase())
        .filter(|field| !field.is_empty())
        .collect()
}

/// Keep only the named properties (case-insensitive); unknown names are
/// ignored.
pub fn shape<T: Serialize>(value: &T, fields: Option<&str>) -> Map<String, Value> {
    let requested = requested_fields(fields);
    let object = match serde_json::to_value(value) {
        Ok(Value::Object(object)) => object,
        Ok(_) | Err(_) => return Map::new(),
    };

    if requested.is_empty() {
        return object;
    }

    object
        .into_iter()
        .filter(|(key, _)| requested.contains(&key.to_lowercase()))
        .collect()
}

pub fn shape_employees(employees: &[EmployeeDto], fields: Option<&str>) -> Vec<ShapedEntity> {
    employees
        .iter()
        .map(|employee| ShapedEntity {
            id: employee.id,
            entity: shape(employee, fields),
        })
        .collect()
}

fn employee_links(company_id: Uuid, id: Uuid) -> Vec<Link> {
    let href = format!("/api/companies/{company_id}/employees/{id}");
    vec![
        Link::new(href.clone(), "self", "GET"),
        Link::new(href.clone(), "delete_employee", "DELETE"),
        Link::new(href.clone(), "update_employee", "PUT"),
        Link::new(href, "partially_update_employee", "PATCH"),
    ]
}

/// `{ value: [...], links: [...] }` with per-item links
pub fn linked_employees(
    company_id: Uuid,
    shaped: Vec<ShapedEntity>,
    fields: Option<&str>,
) -> Value {
    let value: Vec<Value> = shaped
        .into_iter()
        .map(|ShapedEntity { id, mut entity }| {
            entity.insert(
                "links".to_string(),
                serde_json::to_value(employee_links(company_id, id)).unwrap_or(Value::Null),
            );
            Value::Object(entity)
        })
        .collect();

    let mut collection_href = format!("/api/companies/{company_id}/employees");
    if let Some(fields) = fields.filter(|f| !f.trim().is_empty()) {
        collection_href.push_str("?fields=");
        collection_href.push_str(fields.trim());
    }

    serde_json::json!({
        "value": value,
        "links": [Link::new(collection_href, "self", "GET")],
    })
}

/// Links advertised by `GET /api`
pub fn root_links() -> Vec<Link> {
    vec![
        Link::new("/api", "self", "GET"),
        Link::new("/api/companies", "companies", "GET"),
        Link::new("/api/companies", "create_company", "POST"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee() -> EmployeeDto {
        EmployeeDto {
            id: Uuid::new_v4(),
            name: "Jana McLeaf".to_string(),
            age: 30,
            position: "Software developer".to_string(),
        }
    }

    #[test]
    fn shaping_is_case_insensitive_and_ignores_unknown_fields() {
        let shaped = shape(&employee(), Some("NAME, age ,salary"));
        let keys: Vec<&str> = shaped.keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 2);
        assert!(shaped.contains_key("name"));
        assert!(shaped.contains_key("age"));
    }

    #[test]
    fn no_fields_keeps_everything() {
        assert_eq!(shape(&employee(), None).len(), 4);
        assert_eq!(shape(&employee(), Some(" , ")).len(), 4);
    }

    #[test]
    fn linked_collection_carries_item_and_collection_links() {
        let company_id = Uuid::new_v4();
        let dto = employee();
        let body = linked_employees(
            company_id,
            shape_employees(std::slice::from_ref(&dto), Some("name")),
            Some("name"),
        );

        let item = &body["value"][0];
        assert_eq!(item["name"], "Jana McLeaf");
        assert!(item.get("age").is_none());
        assert_eq!(item["links"].as_array().map(Vec::len), Some(4));
        assert_eq!(
            item["links"][0]["href"],
            format!("/api/companies/{company_id}/employees/{}", dto.id)
        );
        assert_eq!(
            body["links"][0]["href"],
            format!("/api/companies/{company_id}/employees?fields=name")
        );
    }
}
