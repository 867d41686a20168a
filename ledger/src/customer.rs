//! Customer records.

use cbs_common::CustomerId;
use serde::{Deserialize, Serialize};

use crate::account::Account;

/// A bank customer. Personal fields keep the keys the dashboard reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(rename = "prenom")]
    pub first_name: String,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "adresse")]
    pub address: String,
    pub email: String,
    #[serde(rename = "telephone")]
    pub phone: String,
}

impl Customer {
    /// Display name, first name first.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A customer together with every account they own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    #[serde(flatten)]
    pub customer: Customer,
    pub accounts: Vec<Account>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        Customer {
            id: CustomerId::new("C002"),
            first_name: "Fatima".to_string(),
            last_name: "El Fihri".to_string(),
            address: "45 Avenue Habib Bourguiba, 4000 Sousse".to_string(),
            email: "fatima.elfihri@email.tn".to_string(),
            phone: "+216 22 789 012".to_string(),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(customer().full_name(), "Fatima El Fihri");
    }

    #[test]
    fn test_profile_flattens_customer_fields() {
        let profile = CustomerProfile {
            customer: customer(),
            accounts: Vec::new(),
        };
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["id"], "C002");
        assert_eq!(json["prenom"], "Fatima");
        assert_eq!(json["nom"], "El Fihri");
        assert_eq!(json["telephone"], "+216 22 789 012");
        assert!(json["accounts"].as_array().unwrap().is_empty());
    }
}
