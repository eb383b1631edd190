use crate::data::model::Chain;

const U238_MEMBERS: &[&str] = &["RA-226", "PB-214", "BI-214"];
const TH232_MEMBERS: &[&str] = &["AC-228", "PB-212", "TL-208", "BI-212"];
const K40_MEMBERS: &[&str] = &["K-40"];

/// Chain a nuclide belongs to, or `None` for untracked nuclides.
///
/// Identifiers are matched exactly as produced by the parser (uppercase).
pub fn classify_chain(nuclide: &str) -> Option<Chain> {
    if U238_MEMBERS.contains(&nuclide) {
        Some(Chain::U238)
    } else if TH232_MEMBERS.contains(&nuclide) {
        Some(Chain::Th232)
    } else if K40_MEMBERS.contains(&nuclide) {
        Some(Chain::K40)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members() {
        assert_eq!(classify_chain("BI-214"), Some(Chain::U238));
        assert_eq!(classify_chain("TL-208"), Some(Chain::Th232));
        assert_eq!(classify_chain("BI-212"), Some(Chain::Th232));
        assert_eq!(classify_chain("K-40"), Some(Chain::K40));
    }

    #[test]
    fn untracked_and_unnormalized() {
        assert_eq!(classify_chain("CS-137"), None);
        assert_eq!(classify_chain("ra-226"), None);
    }
}
