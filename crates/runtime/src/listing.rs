//! Client-side cache of registered names.

use kot_blockchain_core::Address;

use crate::registry::NameEntry;

/// A registered name as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRecord {
    /// Position in registration order.
    pub id: usize,
    pub name: String,
    pub record: String,
    pub owner: Address,
}

impl MintRecord {
    /// Only the owner may edit a record.
    pub fn is_editable_by(&self, account: Option<Address>) -> bool {
        account == Some(self.owner)
    }

    pub fn has_record(&self) -> bool {
        !self.record.is_empty()
    }
}

/// Last successfully fetched listing.
///
/// Always replaced as a whole; never patched per entry.
#[derive(Debug, Clone, Default)]
pub struct ListingCache {
    records: Vec<MintRecord>,
}

impl ListingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, entries: Vec<NameEntry>) {
        self.records = entries
            .into_iter()
            .enumerate()
            .map(|(id, entry)| MintRecord {
                id,
                name: entry.name,
                record: entry.record,
                owner: entry.owner,
            })
            .collect();
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[MintRecord] {
        &self.records
    }

    pub fn snapshot(&self) -> Vec<MintRecord> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&MintRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Names owned by `account` that still have no record attached.
    ///
    /// These are the leftovers of a registration whose record step failed.
    pub fn unrecorded_for(&self, account: Address) -> Vec<&MintRecord> {
        self.records
            .iter()
            .filter(|r| r.owner == account && !r.has_record())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, record: &str, owner: Address) -> NameEntry {
        NameEntry {
            name: name.into(),
            record: record.into(),
            owner,
        }
    }

    #[test]
    fn replace_assigns_positional_ids() {
        let alice = Address::repeat_byte(1);
        let mut cache = ListingCache::new();
        cache.replace(vec![entry("one", "a", alice), entry("two", "b", alice)]);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.find("two").map(|r| r.id), Some(1));

        cache.replace(vec![entry("three", "c", alice)]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.records()[0].id, 0);
        assert!(cache.find("one").is_none());
    }

    #[test]
    fn only_owner_can_edit() {
        let alice = Address::repeat_byte(1);
        let bob = Address::repeat_byte(2);
        let mut cache = ListingCache::new();
        cache.replace(vec![entry("mine", "", alice), entry("theirs", "x", bob)]);

        let mine = cache.find("mine").unwrap();
        assert!(mine.is_editable_by(Some(alice)));
        assert!(!mine.is_editable_by(Some(bob)));
        assert!(!mine.is_editable_by(None));

        let unrecorded: Vec<_> = cache.unrecorded_for(alice).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(unrecorded, vec!["mine"]);
        assert!(cache.unrecorded_for(bob).is_empty());
    }
}
