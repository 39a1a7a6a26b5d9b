//! The fixed list of services users can book.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Service {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price: i64,
}

const SERVICES: &[Service] = &[
    Service {
        id: "1",
        name: "Book Mental Health Talks",
        description: "One-on-one mental health sessions.",
        price: 500,
    },
    Service {
        id: "2",
        name: "Book Full Health Checkup",
        description: "Comprehensive health checkup.",
        price: 1200,
    },
    Service {
        id: "3",
        name: "Book Grocery Shopping",
        description: "Assistance in purchasing groceries.",
        price: 300,
    },
];

pub fn all() -> &'static [Service] {
    SERVICES
}

pub fn find(id: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|service| service.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_services_by_id() {
        let checkup = find("2").unwrap();
        assert_eq!(checkup.name, "Book Full Health Checkup");
        assert_eq!(checkup.price, 1200);
        assert!(find("42").is_none());
    }

    #[test]
    fn service_ids_are_unique() {
        let mut ids: Vec<_> = all().iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), all().len());
    }
}
