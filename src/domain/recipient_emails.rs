use lettre::Address;

/// One or more contact addresses, as sent by the portal in a single
/// comma-separated field (`"ana@example.com, bo@example.com,"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientEmails(Vec<Address>);

impl RecipientEmails {
    pub fn parse(s: String) -> Result<RecipientEmails, String> {
        let mut emails = Vec::new();
        for candidate in s.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            let address = candidate
                .parse::<Address>()
                .map_err(|e| format!("{candidate:?} is not a valid email address: {e}"))?;
            emails.push(address);
        }

        if emails.is_empty() {
            return Err("at least one recipient email is required".to_string());
        }
        Ok(Self(emails))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.0.iter()
    }
}

impl AsRef<[Address]> for RecipientEmails {
    fn as_ref(&self) -> &[Address] {
        &self.0
    }
}
