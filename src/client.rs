use serde::{Deserialize, Serialize};

use crate::types::ClientId;

/// contact details supplied when registering a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDetails {
    pub full_name: String,
    /// national identity document number, unique across clients
    pub national_id: String,
    pub address: String,
    pub phone: String,
    pub backup_phones: Vec<String>,
    pub notes: Option<String>,
}

/// a borrower
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub full_name: String,
    pub national_id: String,
    pub address: String,
    pub phone: String,
    pub backup_phones: Vec<String>,
    pub notes: Option<String>,
}

impl Client {
    pub fn new(id: ClientId, details: ClientDetails) -> Self {
        let mut backup_phones = details.backup_phones;
        backup_phones.retain(|phone| !phone.trim().is_empty());
        backup_phones.truncate(2);

        Self {
            id,
            full_name: details.full_name.trim().to_string(),
            national_id: normalize_national_id(&details.national_id),
            address: details.address,
            phone: details.phone,
            backup_phones,
            notes: details.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// strip separators so `20.123.456` and `20123456` compare equal
pub fn normalize_national_id(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}
