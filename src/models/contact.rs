//! Contact model representing one row of an uploaded contact list.

use serde::Serialize;

/// A (name, phone) pair parsed from one CSV row.
///
/// Fields are kept raw as uploaded; normalization happens when the
/// dispatcher runs the phone through the configured policy.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Contact {
    /// Display name used in the personalized greeting
    pub name: String,

    /// Raw phone field, possibly with internal whitespace
    pub phone: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

/// An ordered batch of contacts from one upload.
///
/// Order is file row order and drives send order; the dispatcher never
/// reorders or parallelizes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactBatch {
    contacts: Vec<Contact>,
}

impl ContactBatch {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Contact> {
        self.contacts.iter()
    }
}

impl FromIterator<Contact> for ContactBatch {
    fn from_iter<T: IntoIterator<Item = Contact>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ContactBatch {
    type Item = &'a Contact;
    type IntoIter = std::slice::Iter<'a, Contact>;

    fn into_iter(self) -> Self::IntoIter {
        self.contacts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_preserves_order() {
        let batch: ContactBatch = vec![
            Contact::new("Ada", "201234567890"),
            Contact::new("Bo", "2012"),
            Contact::new("Cy", "201234567891"),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = batch.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Bo", "Cy"]);
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn test_empty_batch() {
        let batch = ContactBatch::default();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }
}
