//! Patron information summary selector

/// Which item list a patron information request asks for
///
/// Encoded as a 10-byte field with a single `Y` at the position of the
/// requested list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SummaryType {
    #[default]
    None,
    Hold,
    Overdue,
    Charged,
    Fine,
    Recall,
    Unavailable,
    FeeItems,
}

impl SummaryType {
    /// Width of the summary field
    pub const WIDTH: usize = 10;

    fn position(self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::Hold => Some(0),
            Self::Overdue => Some(1),
            Self::Charged => Some(2),
            Self::Fine => Some(3),
            Self::Recall => Some(4),
            Self::Unavailable => Some(5),
            Self::FeeItems => Some(6),
        }
    }

    /// Render the 10-byte summary field
    pub fn field(self) -> String {
        let mut field = [b' '; Self::WIDTH];
        if let Some(pos) = self.position() {
            field[pos] = b'Y';
        }
        field.iter().map(|&b| b as char).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summary_fields() {
        assert_eq!(SummaryType::None.field(), "          ");
        assert_eq!(SummaryType::Hold.field(), "Y         ");
        assert_eq!(SummaryType::Charged.field(), "  Y       ");
        assert_eq!(SummaryType::FeeItems.field(), "      Y   ");
        assert_eq!(SummaryType::Unavailable.field().len(), SummaryType::WIDTH);
    }
}
