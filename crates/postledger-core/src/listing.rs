//! Results of enumerating stored records.

use crate::error::DecodeError;

/// Records read from a prefix, split into those that decoded and those that
/// did not.
///
/// A corrupt record never hides the records after it: enumeration continues
/// and the failure is reported in [`Listing::corrupt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    /// Decoded records in ascending key order.
    pub items: Vec<T>,
    /// Records that failed to decode, in ascending key order.
    pub corrupt: Vec<DecodeError>,
}

impl<T> Listing<T> {
    /// Whether every record decoded.
    pub fn is_clean(&self) -> bool {
        self.corrupt.is_empty()
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            corrupt: Vec::new(),
        }
    }
}

impl<T> FromIterator<Result<T, DecodeError>> for Listing<T> {
    fn from_iter<I: IntoIterator<Item = Result<T, DecodeError>>>(iter: I) -> Self {
        let mut listing = Listing::default();
        for record in iter {
            match record {
                Ok(item) => listing.items.push(item),
                Err(e) => listing.corrupt.push(e),
            }
        }
        listing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_keeps_going_past_corrupt_records() {
        let records = vec![
            Ok(1),
            Err(DecodeError::new(vec![0x02], "bad")),
            Ok(3),
        ];
        let listing: Listing<i32> = records.into_iter().collect();

        assert_eq!(listing.items, vec![1, 3]);
        assert_eq!(listing.corrupt.len(), 1);
        assert_eq!(listing.corrupt[0].key, vec![0x02]);
        assert!(!listing.is_clean());
    }
}
