use serde::Deserialize;
use std::fmt;

/// Identity a message can be sent from, as configured in `WHATSAPP_CREDENTIALS`.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Credential {
    /// WhatsApp Business phone number ID
    pub phone_number_id: String,
    /// SENSITIVE: Graph API access token for this number
    pub access_token: String,
    /// Display phone number (e.g. "+15550001111")
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("phone_number_id", &self.phone_number_id)
            .field("access_token", &"<redacted>")
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

/// Read-only table of the credentials loaded at startup.
///
/// Order matters: when two records share an identity the first one wins.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    credentials: Vec<Credential>,
}

impl CredentialStore {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self { credentials }
    }

    /// Parses the JSON list held in `WHATSAPP_CREDENTIALS`.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let credentials: Vec<Credential> = serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("WHATSAPP_CREDENTIALS is not a valid credential list: {e}"))?;

        Ok(Self::new(credentials))
    }

    /// Finds the credential for `identity`.
    ///
    /// # Precedence
    /// 1. first record whose `phone_number_id` equals `identity`
    /// 2. first record whose display `phone_number` equals `identity`
    ///
    /// The access token is never compared.
    pub fn resolve(&self, identity: &str) -> Option<&Credential> {
        self.credentials
            .iter()
            .find(|c| c.phone_number_id == identity)
            .or_else(|| {
                self.credentials
                    .iter()
                    .find(|c| c.phone_number.as_deref() == Some(identity))
            })
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_credential(id: &str, number: Option<&str>) -> Credential {
        Credential {
            phone_number_id: id.to_string(),
            access_token: format!("token-{id}"),
            phone_number: number.map(str::to_string),
        }
    }

    #[test]
    fn test_resolve_by_phone_number_id() {
        let store = CredentialStore::new(vec![
            create_test_credential("1000", Some("+2348000000000")),
            create_test_credential("2000", Some("+2348000000001")),
        ]);

        let found = store.resolve("2000").unwrap();
        assert_eq!(found.access_token, "token-2000");
    }

    #[test]
    fn test_resolve_falls_back_to_display_number() {
        let store = CredentialStore::new(vec![create_test_credential("1000", Some("+2348000000000"))]);

        let found = store.resolve("+2348000000000").unwrap();
        assert_eq!(found.phone_number_id, "1000");
    }

    #[test]
    fn test_resolve_prefers_id_over_display_number() {
        // "2000" is the display number of the first record and the id of the second
        let store = CredentialStore::new(vec![
            create_test_credential("1000", Some("2000")),
            create_test_credential("2000", None),
        ]);

        assert_eq!(store.resolve("2000").unwrap().access_token, "token-2000");
    }

    #[test]
    fn test_resolve_first_duplicate_wins() {
        let mut second = create_test_credential("1000", None);
        second.access_token = "other".to_string();
        let store = CredentialStore::new(vec![create_test_credential("1000", None), second]);

        assert_eq!(store.resolve("1000").unwrap().access_token, "token-1000");
    }

    #[test]
    fn test_resolve_never_matches_access_token() {
        let store = CredentialStore::new(vec![create_test_credential("1000", None)]);

        assert!(store.resolve("token-1000").is_none());
        assert!(store.resolve("unknown").is_none());
    }

    #[test]
    fn test_from_json() {
        let raw = r#"[
            {"phone_number_id": "1000", "access_token": "abc", "phone_number": "+2348000000000"},
            {"phone_number_id": "2000", "access_token": "def"}
        ]"#;

        let store = CredentialStore::from_json(raw).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.resolve("2000").unwrap().phone_number, None);
    }

    #[test]
    fn test_from_json_rejects_invalid_list() {
        assert!(CredentialStore::from_json("{\"phone_number_id\": \"1\"}").is_err());
        assert!(CredentialStore::from_json("not json").is_err());
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let debug = format!("{:?}", create_test_credential("1000", None));
        assert!(!debug.contains("token-1000"));
    }
}
